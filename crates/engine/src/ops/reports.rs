use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    Breakdown, ResultEngine, Summary,
    aggregation::{breakdown, summary},
    report::render_report,
};

use super::{Engine, log_failure};

impl Engine {
    /// Chart data of a profile.
    pub async fn breakdown(&self, user_id: Uuid) -> ResultEngine<Breakdown> {
        let user = self.require_user(user_id).await?;
        let expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("breakdown", err))?;
        let chart = breakdown(user.income, &expenses);
        tracing::debug!("user {user_id} breakdown has {} slices", chart.slices.len());
        Ok(chart)
    }

    pub async fn summary(&self, user_id: Uuid) -> ResultEngine<Summary> {
        let user = self.require_user(user_id).await?;
        let expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("summary", err))?;
        tracing::debug!("user {user_id} summary over {} expenses", expenses.len());
        Ok(summary(user.income, &expenses))
    }

    /// Printable report of a profile dated `date`.
    pub async fn report(&self, user_id: Uuid, date: NaiveDate) -> ResultEngine<String> {
        let user = self.require_user(user_id).await?;
        let expenses = self.sorted_expenses(user_id).await?;
        tracing::debug!("rendering report of user {user_id} for {date}");
        Ok(render_report(&user, &expenses, date))
    }
}
