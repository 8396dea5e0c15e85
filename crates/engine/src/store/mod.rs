//! Storage backends behind the engine.
//!
//! [`BudgetStore`] is the data-access interface every action goes through.
//! Two implementations exist:
//!
//! - [`SqlStore`]: relational storage through sea-orm (server deployment).
//! - [`LocalStore`]: a JSON document store on the local disk that mirrors the
//!   browser local-storage demo (single profile, no server database).
//!
//! Both backends receive already validated input; they only enforce the
//! invariants that need a look at stored data (existence, uniqueness).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{BudgetBackup, Category, Expense, NewExpense, NewUser, ResultEngine, User, UserPatch};

mod local;
mod sql;

pub use local::{DEMO_USER_NAME, LocalStore};
pub use sql::SqlStore;

#[async_trait]
pub trait BudgetStore: Send + Sync + std::fmt::Debug {
    /// All profiles, newest first.
    async fn list_users(&self) -> ResultEngine<Vec<User>>;

    async fn create_user(&self, new_user: NewUser, now: DateTime<Utc>) -> ResultEngine<User>;

    async fn get_user(&self, user_id: Uuid) -> ResultEngine<Option<User>>;

    /// Apply `patch` to a profile. `KeyNotFound` when the profile is missing.
    async fn update_user(&self, user_id: Uuid, patch: UserPatch) -> ResultEngine<User>;

    /// Remove a profile together with its expenses and categories.
    async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()>;

    async fn list_expenses(&self, user_id: Uuid) -> ResultEngine<Vec<Expense>>;

    async fn create_expense(&self, user_id: Uuid, expense: NewExpense) -> ResultEngine<Expense>;

    async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()>;

    async fn list_categories(&self, user_id: Uuid) -> ResultEngine<Vec<Category>>;

    /// `ExistingKey` when the profile already has a category with the same
    /// name, ignoring case.
    async fn create_category(&self, user_id: Uuid, name: String) -> ResultEngine<Category>;

    async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()>;

    /// Overwrite income, currency, expenses and categories of a profile in
    /// one step.
    async fn replace_budget(&self, user_id: Uuid, backup: BudgetBackup) -> ResultEngine<()>;

    /// Delete expenses and categories and reset income to zero. The profile
    /// itself is kept.
    async fn clear_budget(&self, user_id: Uuid) -> ResultEngine<()>;

    /// Wipe every profile and record `now` as the last reset.
    async fn reset_all(&self, now: DateTime<Utc>) -> ResultEngine<()>;

    async fn last_reset(&self) -> ResultEngine<Option<DateTime<Utc>>>;
}
