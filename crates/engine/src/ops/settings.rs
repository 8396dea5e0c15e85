use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    BudgetBackup, BudgetExport, CurrencyCode, ResultEngine, User, UserPatch, backup,
};

use super::{Engine, log_failure};

impl Engine {
    pub async fn update_currency(&self, user_id: Uuid, currency: &str) -> ResultEngine<User> {
        let currency = CurrencyCode::try_from(currency)
            .inspect_err(|err| log_failure("update currency", err))?;
        let user = self
            .store
            .update_user(user_id, UserPatch::currency(currency))
            .await
            .inspect_err(|err| log_failure("update currency", err))?;
        tracing::info!("user {user_id} currency set to {}", user.currency);
        Ok(user)
    }

    /// Replace the budget of a profile with the content of a backup document.
    ///
    /// The whole document is validated before anything is written; a bad
    /// document leaves the profile untouched.
    pub async fn import_data(&self, user_id: Uuid, json: &str) -> ResultEngine<()> {
        let backup = BudgetBackup::parse(json).inspect_err(|err| {
            tracing::warn!("user {user_id} import rejected: {err:?}");
        })?;
        let expenses = backup.expenses.len();
        self.store
            .replace_budget(user_id, backup)
            .await
            .inspect_err(|err| log_failure("import", err))?;
        tracing::info!("user {user_id} imported {expenses} expenses");
        Ok(())
    }

    /// Backup document of a profile.
    pub async fn export_data(&self, user_id: Uuid) -> ResultEngine<BudgetExport> {
        let user = self.require_user(user_id).await?;
        let expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("export", err))?;
        let categories = self
            .store
            .list_categories(user_id)
            .await
            .inspect_err(|err| log_failure("export", err))?;
        tracing::debug!("exporting user {user_id}: {} expenses", expenses.len());
        Ok(BudgetExport::from_parts(&user, &expenses, &categories))
    }

    pub fn export_file_name(&self, user: &User, date: NaiveDate) -> String {
        backup::export_file_name(user, date)
    }

    /// Drop every expense and custom category and reset income to zero.
    pub async fn clear_data(&self, user_id: Uuid) -> ResultEngine<()> {
        self.store
            .clear_budget(user_id)
            .await
            .inspect_err(|err| log_failure("clear data", err))?;
        tracing::info!("user {user_id} data cleared");
        Ok(())
    }
}
