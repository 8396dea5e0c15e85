//! Request and response bodies of the HTTP API.
//!
//! Amounts travel as integer minor units (`*_minor`, cents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        /// ISO 4217 code, `USD` when missing.
        pub currency: Option<String>,
        pub theme: Option<Theme>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub theme: Theme,
        pub income_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<UserView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub income_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyUpdate {
        pub currency: String,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        pub amount_minor: i64,
        pub category: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub category: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    /// Profile plus expenses, largest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub user: user::UserView,
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortKey {
        Name,
        Amount,
        Category,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        Asc,
        Desc,
    }

    /// Query string of the expense list. Defaults to amount, descending.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub category: Option<String>,
        pub search: Option<String>,
        pub sort: Option<SortKey>,
        pub order: Option<SortOrder>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum CategoryOptionKind {
        Default,
        Custom,
        /// Label only found on existing expenses.
        Historical,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryOptionView {
        pub name: String,
        /// Only custom categories have an id.
        pub id: Option<Uuid>,
        pub custom: bool,
        pub kind: CategoryOptionKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryOptionsResponse {
        pub options: Vec<CategoryOptionView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SliceView {
        pub name: String,
        pub value_minor: i64,
        pub percentage: f64,
        pub unallocated: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BreakdownView {
        pub currency: String,
        pub slices: Vec<SliceView>,
        pub total_value_minor: i64,
        pub total_spent_minor: i64,
        /// No income and no expenses: nothing to chart.
        pub is_empty: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub currency: String,
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub left_to_spend_minor: i64,
        pub percent_spent: f64,
        pub over_budget: bool,
    }
}

pub mod system {
    use super::*;

    /// `lastReset` is the reset time in epoch milliseconds, as a string.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatusResponse {
        pub last_reset: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetResponse {
        pub success: bool,
        pub message: String,
    }
}
