use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerConfig, router, run, run_with_listener, spawn_with_listener};

mod budget;
mod categories;
mod reports;
mod server;
mod settings;
mod system;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{CurrencyUpdate, IncomeUpdate, UserNew, UserView, UsersResponse};
    }

    pub mod expense {
        pub use api_types::expense::{
            BudgetView, ExpenseListQuery, ExpenseNew, ExpenseView, ExpensesResponse, SortKey,
            SortOrder,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoriesResponse, CategoryNew, CategoryOptionKind, CategoryOptionView,
            CategoryOptionsResponse, CategoryView,
        };
    }

    pub mod backup {
        pub use engine::{BudgetExport, ExportedExpense};
    }

    pub mod stats {
        pub use api_types::stats::{BreakdownView, SliceView, SummaryView};
    }

    pub mod system {
        pub use api_types::system::{ResetResponse, StatusResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Malformed request: bad path segment, query string or JSON body.
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) | EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidName(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidCurrency(_)
        | EngineError::InvalidTheme(_)
        | EngineError::InvalidId(_)
        | EngineError::InvalidImport(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Storage(storage_err) => {
            tracing::error!("storage error: {storage_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {value}");
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        tracing::warn!("rejected request path: {value}");
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        tracing::warn!("rejected query string: {value}");
        Self::Generic(value.body_text())
    }
}
