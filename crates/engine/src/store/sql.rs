use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    BudgetBackup, Category, EngineError, Expense, NewExpense, NewUser, ResultEngine, User,
    UserPatch, categories, expenses,
    system_state::{self, LAST_RESET_KEY},
    users,
    util::normalize_key,
};

use super::BudgetStore;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// Relational backend (SQLite through sea-orm).
///
/// Expects the schema created by the `migration` crate.
#[derive(Debug, Clone)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

async fn require_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> ResultEngine<users::Model> {
    users::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
}

async fn delete_budget_rows<C: ConnectionTrait>(db: &C, user_id: Uuid) -> ResultEngine<()> {
    expenses::Entity::delete_many()
        .filter(expenses::Column::UserId.eq(user_id.to_string()))
        .exec(db)
        .await?;
    categories::Entity::delete_many()
        .filter(categories::Column::UserId.eq(user_id.to_string()))
        .exec(db)
        .await?;
    Ok(())
}

#[async_trait]
impl BudgetStore for SqlStore {
    async fn list_users(&self) -> ResultEngine<Vec<User>> {
        users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn create_user(&self, new_user: NewUser, now: DateTime<Utc>) -> ResultEngine<User> {
        let user = User::new(new_user, now);
        users::ActiveModel::from(&user).insert(&self.database).await?;
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> ResultEngine<Option<User>> {
        users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update_user(&self, user_id: Uuid, patch: UserPatch) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let mut user = User::try_from(require_user(&db_tx, user_id).await?)?;
            user.apply(patch);
            users::ActiveModel::from(&user).update(&db_tx).await?;
            Ok(user)
        })
    }

    async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_user(&db_tx, user_id).await?;
            delete_budget_rows(&db_tx, user_id).await?;
            users::Entity::delete_by_id(user_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn list_expenses(&self, user_id: Uuid) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(expenses::Column::Amount)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    async fn create_expense(&self, user_id: Uuid, expense: NewExpense) -> ResultEngine<Expense> {
        require_user(&self.database, user_id).await?;
        let expense = Expense::new(user_id, expense);
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        let res = expenses::Entity::delete_by_id(expense_id.to_string())
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(())
    }

    async fn list_categories(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    async fn create_category(&self, user_id: Uuid, name: String) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            require_user(&db_tx, user_id).await?;
            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(categories::Column::NameNorm.eq(normalize_key(&name)))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let category = Category::new(user_id, name);
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        let res = categories::Entity::delete_by_id(category_id.to_string())
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(())
    }

    async fn replace_budget(&self, user_id: Uuid, backup: BudgetBackup) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_user(&db_tx, user_id).await?;

            let user_model = users::ActiveModel {
                id: ActiveValue::Set(user_id.to_string()),
                income: ActiveValue::Set(backup.income.cents()),
                currency: ActiveValue::Set(backup.currency.code().to_string()),
                ..Default::default()
            };
            user_model.update(&db_tx).await?;

            // Custom categories are replaced even when the document has none.
            delete_budget_rows(&db_tx, user_id).await?;

            if !backup.expenses.is_empty() {
                let models: Vec<expenses::ActiveModel> = backup
                    .expenses
                    .into_iter()
                    .map(|expense| expenses::ActiveModel::from(&Expense::new(user_id, expense)))
                    .collect();
                expenses::Entity::insert_many(models).exec(&db_tx).await?;
            }

            let names = backup.categories.unwrap_or_default();
            if !names.is_empty() {
                let models: Vec<categories::ActiveModel> = names
                    .into_iter()
                    .map(|name| categories::ActiveModel::from(&Category::new(user_id, name)))
                    .collect();
                categories::Entity::insert_many(models).exec(&db_tx).await?;
            }

            Ok(())
        })
    }

    async fn clear_budget(&self, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_user(&db_tx, user_id).await?;
            delete_budget_rows(&db_tx, user_id).await?;
            let user_model = users::ActiveModel {
                id: ActiveValue::Set(user_id.to_string()),
                income: ActiveValue::Set(0),
                ..Default::default()
            };
            user_model.update(&db_tx).await?;
            Ok(())
        })
    }

    async fn reset_all(&self, now: DateTime<Utc>) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            // Children first: the schema declares cascading FKs but SQLite only
            // honours them with `foreign_keys` enabled on the connection.
            expenses::Entity::delete_many().exec(&db_tx).await?;
            categories::Entity::delete_many().exec(&db_tx).await?;
            users::Entity::delete_many().exec(&db_tx).await?;

            let state = system_state::ActiveModel {
                key: ActiveValue::Set(LAST_RESET_KEY.to_string()),
                value: ActiveValue::Set(now.timestamp_millis().to_string()),
            };
            system_state::Entity::insert(state)
                .on_conflict(
                    OnConflict::column(system_state::Column::Key)
                        .update_column(system_state::Column::Value)
                        .to_owned(),
                )
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn last_reset(&self) -> ResultEngine<Option<DateTime<Utc>>> {
        let Some(state) = system_state::Entity::find_by_id(LAST_RESET_KEY.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        parse_reset_millis(&state.value).map(Some)
    }
}

pub(super) fn parse_reset_millis(value: &str) -> ResultEngine<DateTime<Utc>> {
    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| EngineError::Storage(format!("invalid {LAST_RESET_KEY} value: {value}")))
}
