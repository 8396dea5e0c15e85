use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    BudgetBackup, Category, CurrencyCode, EngineError, Expense, Money, NewExpense, NewUser,
    ResultEngine, Theme, User, UserPatch, util::normalize_key,
};

use super::{BudgetStore, sql::parse_reset_millis};

const USER_KEY: &str = "easymoney_user";
const EXPENSES_KEY: &str = "easymoney_expenses";
const CATEGORIES_KEY: &str = "easymoney_categories";
const SYSTEM_KEY: &str = "easymoney_system";

/// Name of the profile seeded into an empty store.
pub const DEMO_USER_NAME: &str = "Demo User";

type Entries = BTreeMap<String, String>;

#[derive(Debug, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemEntry {
    last_reset: Option<String>,
}

/// Single-profile document store kept in one JSON file.
///
/// The file holds string values under fixed keys, the way browser local
/// storage does. Every value is itself a JSON document; a value that fails to
/// parse reads as missing.
///
/// The store holds at most one profile. Creating a profile renames the
/// existing one, deleting it wipes every key, and the next listing seeds a
/// fresh demo profile.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl LocalStore {
    /// Open (or create) the store at `path` and seed the demo profile.
    pub async fn open(path: impl Into<PathBuf>) -> ResultEngine<Self> {
        let path = path.into();
        let entries = load_entries(&path).await?;
        let store = Self {
            path,
            entries: Mutex::new(entries),
        };
        store.initialize().await?;
        Ok(store)
    }

    /// Seed the demo profile and empty lists for whatever key is missing.
    pub async fn initialize(&self) -> ResultEngine<()> {
        let mut guard = self.entries.lock().await;
        let mut next = guard.clone();
        let mut changed = false;

        if read_json::<User>(&next, USER_KEY).is_none() {
            let user = User::new(
                NewUser {
                    name: DEMO_USER_NAME.to_string(),
                    currency: CurrencyCode::default(),
                    theme: Theme::System,
                },
                Utc::now(),
            );
            tracing::info!("seeding local demo profile {}", user.id);
            write_json(&mut next, USER_KEY, &user)?;
            changed = true;
        }
        if !next.contains_key(EXPENSES_KEY) {
            write_json(&mut next, EXPENSES_KEY, &Vec::<Expense>::new())?;
            changed = true;
        }
        if !next.contains_key(CATEGORIES_KEY) {
            write_json(&mut next, CATEGORIES_KEY, &Vec::<Category>::new())?;
            changed = true;
        }

        if changed {
            persist(&self.path, &next).await?;
            *guard = next;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` over a copy of the entries and keep the result only once it
    /// has been written to disk.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Entries) -> ResultEngine<T> + Send,
    ) -> ResultEngine<T> {
        let mut guard = self.entries.lock().await;
        let mut next = guard.clone();
        let value = f(&mut next)?;
        persist(&self.path, &next).await?;
        *guard = next;
        Ok(value)
    }

    async fn read<T>(&self, f: impl FnOnce(&Entries) -> T + Send) -> T {
        let guard = self.entries.lock().await;
        f(&guard)
    }
}

async fn load_entries(path: &Path) -> ResultEngine<Entries> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!("local store {} is corrupt, starting empty: {err}", path.display());
                Ok(Entries::new())
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
        Err(err) => Err(err.into()),
    }
}

async fn persist(path: &Path, entries: &Entries) -> ResultEngine<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let raw = serde_json::to_string_pretty(entries)
        .map_err(|err| EngineError::Storage(err.to_string()))?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, raw).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(entries: &Entries, key: &str) -> Option<T> {
    let raw = entries.get(key)?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring unreadable local entry {key}: {err}");
            None
        }
    }
}

fn read_list<T: DeserializeOwned>(entries: &Entries, key: &str) -> Vec<T> {
    read_json(entries, key).unwrap_or_default()
}

fn write_json<T: Serialize>(entries: &mut Entries, key: &str, value: &T) -> ResultEngine<()> {
    let raw = serde_json::to_string(value).map_err(|err| EngineError::Storage(err.to_string()))?;
    entries.insert(key.to_string(), raw);
    Ok(())
}

/// The stored profile, if it is the one asked for.
fn stored_user(entries: &Entries, user_id: Uuid) -> ResultEngine<User> {
    read_json::<User>(entries, USER_KEY)
        .filter(|user| user.id == user_id)
        .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
}

#[async_trait]
impl BudgetStore for LocalStore {
    async fn list_users(&self) -> ResultEngine<Vec<User>> {
        self.initialize().await?;
        Ok(self
            .read(|entries| read_json::<User>(entries, USER_KEY))
            .await
            .into_iter()
            .collect())
    }

    async fn create_user(&self, new_user: NewUser, now: DateTime<Utc>) -> ResultEngine<User> {
        self.mutate(|entries| {
            let user = match read_json::<User>(entries, USER_KEY) {
                Some(mut user) => {
                    user.apply(UserPatch {
                        name: Some(new_user.name),
                        currency: Some(new_user.currency),
                        theme: Some(new_user.theme),
                        income: None,
                    });
                    user
                }
                None => User::new(new_user, now),
            };
            write_json(entries, USER_KEY, &user)?;
            Ok(user)
        })
        .await
    }

    async fn get_user(&self, user_id: Uuid) -> ResultEngine<Option<User>> {
        Ok(self
            .read(|entries| read_json::<User>(entries, USER_KEY))
            .await
            .filter(|user| user.id == user_id))
    }

    async fn update_user(&self, user_id: Uuid, patch: UserPatch) -> ResultEngine<User> {
        self.mutate(|entries| {
            let mut user = stored_user(entries, user_id)?;
            user.apply(patch);
            write_json(entries, USER_KEY, &user)?;
            Ok(user)
        })
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()> {
        self.mutate(|entries| {
            stored_user(entries, user_id)?;
            entries.remove(USER_KEY);
            entries.remove(EXPENSES_KEY);
            entries.remove(CATEGORIES_KEY);
            Ok(())
        })
        .await
    }

    async fn list_expenses(&self, user_id: Uuid) -> ResultEngine<Vec<Expense>> {
        Ok(self
            .read(|entries| read_list::<Expense>(entries, EXPENSES_KEY))
            .await
            .into_iter()
            .filter(|expense| expense.user_id == user_id)
            .collect())
    }

    async fn create_expense(&self, user_id: Uuid, expense: NewExpense) -> ResultEngine<Expense> {
        self.mutate(|entries| {
            stored_user(entries, user_id)?;
            let expense = Expense::new(user_id, expense);
            let mut expenses = read_list::<Expense>(entries, EXPENSES_KEY);
            expenses.push(expense.clone());
            write_json(entries, EXPENSES_KEY, &expenses)?;
            Ok(expense)
        })
        .await
    }

    async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        self.mutate(|entries| {
            let mut expenses = read_list::<Expense>(entries, EXPENSES_KEY);
            let before = expenses.len();
            expenses.retain(|expense| expense.id != expense_id);
            if expenses.len() == before {
                return Err(EngineError::KeyNotFound("expense not exists".to_string()));
            }
            write_json(entries, EXPENSES_KEY, &expenses)
        })
        .await
    }

    async fn list_categories(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        Ok(self
            .read(|entries| read_list::<Category>(entries, CATEGORIES_KEY))
            .await
            .into_iter()
            .filter(|category| category.user_id == user_id)
            .collect())
    }

    async fn create_category(&self, user_id: Uuid, name: String) -> ResultEngine<Category> {
        self.mutate(|entries| {
            stored_user(entries, user_id)?;
            let mut categories = read_list::<Category>(entries, CATEGORIES_KEY);
            let key = normalize_key(&name);
            if categories.iter().any(|category| category.key() == key) {
                return Err(EngineError::ExistingKey(name));
            }
            let category = Category::new(user_id, name);
            categories.push(category.clone());
            write_json(entries, CATEGORIES_KEY, &categories)?;
            Ok(category)
        })
        .await
    }

    async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        self.mutate(|entries| {
            let mut categories = read_list::<Category>(entries, CATEGORIES_KEY);
            let before = categories.len();
            categories.retain(|category| category.id != category_id);
            if categories.len() == before {
                return Err(EngineError::KeyNotFound("category not exists".to_string()));
            }
            write_json(entries, CATEGORIES_KEY, &categories)
        })
        .await
    }

    async fn replace_budget(&self, user_id: Uuid, backup: BudgetBackup) -> ResultEngine<()> {
        self.mutate(|entries| {
            let mut user = stored_user(entries, user_id)?;
            user.income = backup.income;
            user.currency = backup.currency;
            write_json(entries, USER_KEY, &user)?;

            let expenses: Vec<Expense> = backup
                .expenses
                .into_iter()
                .map(|expense| Expense::new(user_id, expense))
                .collect();
            write_json(entries, EXPENSES_KEY, &expenses)?;

            // Without a `categories` key the existing ones are kept.
            if let Some(names) = backup.categories {
                let categories: Vec<Category> = names
                    .into_iter()
                    .map(|name| Category::new(user_id, name))
                    .collect();
                write_json(entries, CATEGORIES_KEY, &categories)?;
            }
            Ok(())
        })
        .await
    }

    async fn clear_budget(&self, user_id: Uuid) -> ResultEngine<()> {
        self.mutate(|entries| {
            let mut user = stored_user(entries, user_id)?;
            user.income = Money::ZERO;
            write_json(entries, USER_KEY, &user)?;
            write_json(entries, EXPENSES_KEY, &Vec::<Expense>::new())?;
            write_json(entries, CATEGORIES_KEY, &Vec::<Category>::new())
        })
        .await
    }

    async fn reset_all(&self, now: DateTime<Utc>) -> ResultEngine<()> {
        self.mutate(|entries| {
            entries.remove(USER_KEY);
            entries.remove(EXPENSES_KEY);
            entries.remove(CATEGORIES_KEY);
            let system = SystemEntry {
                last_reset: Some(now.timestamp_millis().to_string()),
            };
            write_json(entries, SYSTEM_KEY, &system)
        })
        .await
    }

    async fn last_reset(&self) -> ResultEngine<Option<DateTime<Utc>>> {
        let system = self
            .read(|entries| read_json::<SystemEntry>(entries, SYSTEM_KEY))
            .await
            .unwrap_or_default();
        system
            .last_reset
            .as_deref()
            .map(parse_reset_millis)
            .transpose()
    }
}
