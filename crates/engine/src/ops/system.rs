use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ResultEngine;

use super::{Engine, log_failure};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub last_reset: Option<DateTime<Utc>>,
}

impl Engine {
    /// Wipe every profile and record `now` as the last reset.
    pub async fn reset(&self, now: DateTime<Utc>) -> ResultEngine<()> {
        self.store
            .reset_all(now)
            .await
            .inspect_err(|err| log_failure("reset", err))?;
        tracing::info!("all data reset at {now}");
        Ok(())
    }

    pub async fn status(&self) -> ResultEngine<SystemStatus> {
        let last_reset = self
            .store
            .last_reset()
            .await
            .inspect_err(|err| log_failure("status", err))?;
        tracing::debug!("last reset: {last_reset:?}");
        Ok(SystemStatus { last_reset })
    }
}
