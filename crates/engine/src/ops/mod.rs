use std::sync::Arc;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{BudgetStore, EngineError, ResultEngine, SqlStore, User};

mod budget;
mod categories;
mod reports;
mod settings;
mod system;
mod users;

pub use system::SystemStatus;

/// Entry point of every budget action.
///
/// Inputs are validated here; the store only sees normalized values.
#[derive(Clone, Debug)]
pub struct Engine {
    store: Arc<dyn BudgetStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn store(&self) -> &Arc<dyn BudgetStore> {
        &self.store
    }

    /// Load a profile or fail with `KeyNotFound`.
    async fn require_user(&self, user_id: Uuid) -> ResultEngine<User> {
        let user = self
            .store
            .get_user(user_id)
            .await
            .inspect_err(|err| log_failure("get user", err))?;
        match user {
            Some(user) => Ok(user),
            None => {
                tracing::warn!("user {user_id} not found");
                Err(EngineError::KeyNotFound("user not exists".to_string()))
            }
        }
    }
}

/// Level a failed action is logged at: bad input and misses at `warn`,
/// backend failures at `error`.
fn failure_level(err: &EngineError) -> tracing::Level {
    match err {
        EngineError::Database(_) | EngineError::Storage(_) => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    }
}

fn log_failure(action: &str, err: &EngineError) {
    if failure_level(err) == tracing::Level::ERROR {
        tracing::error!("{action} failed: {err:?}");
    } else {
        tracing::warn!("{action} failed: {err}");
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn BudgetStore>>,
}

impl EngineBuilder {
    /// Use the relational backend over `db`.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.store = Some(Arc::new(SqlStore::new(db)));
        self
    }

    /// Use any backend.
    pub fn store(mut self, store: Arc<dyn BudgetStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Storage("no storage backend configured".to_string()))?;
        Ok(Engine { store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_failures_log_as_errors() {
        assert_eq!(
            failure_level(&EngineError::Storage("disk full".to_string())),
            tracing::Level::ERROR
        );
        assert_eq!(
            failure_level(&EngineError::KeyNotFound("user not exists".to_string())),
            tracing::Level::WARN
        );
        assert_eq!(
            failure_level(&EngineError::InvalidName("Name is required".to_string())),
            tracing::Level::WARN
        );
    }
}
