//! Hourly data reset of the demo deployment.

use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use engine::Engine;

/// Time left until the next full hour after `now`.
fn until_next_hour(now: DateTime<Utc>) -> Duration {
    let elapsed = u64::from(now.minute()) * 60 + u64::from(now.second());
    let millis = u64::from(now.timestamp_subsec_millis());
    Duration::from_millis(((3600 - elapsed) * 1000).saturating_sub(millis))
}

/// Reset `engine` at the top of every hour, forever.
pub async fn run_hourly_reset(engine: Engine) {
    loop {
        let wait = until_next_hour(Utc::now());
        tracing::debug!("next scheduled reset in {}s", wait.as_secs());
        tokio::time::sleep(wait).await;

        scheduled_reset(&engine, Utc::now()).await;
    }
}

/// Run one reset; returns whether it succeeded.
async fn scheduled_reset(engine: &Engine, now: DateTime<Utc>) -> bool {
    if let Err(err) = engine.reset(now).await {
        tracing::warn!("scheduled reset failed, retrying next hour: {err}");
        return false;
    }
    true
}
