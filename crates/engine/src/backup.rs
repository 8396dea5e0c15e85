//! JSON backup documents (export/import).
//!
//! The on-disk format exchanges amounts as decimal numbers of major units:
//!
//! ```json
//! {
//!   "income": 3200,
//!   "currency": "USD",
//!   "expenses": [{ "name": "Rent", "amount": 1200.5, "category": "Housing" }],
//!   "categories": ["Pets"]
//! }
//! ```
//!
//! `categories` may be omitted on import.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Category, CurrencyCode, EngineError, Expense, Money, NewExpense, ResultEngine, User,
    categories::sort_by_name,
    util::{
        normalize_key, normalize_required_name, validate_expense_amount, validate_income,
        validate_total,
    },
};

/// Serialized backup document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetExport {
    pub income: f64,
    pub currency: String,
    pub expenses: Vec<ExportedExpense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportedExpense {
    pub name: String,
    pub amount: f64,
    pub category: String,
}

/// A backup document that passed validation and is ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetBackup {
    pub income: Money,
    pub currency: CurrencyCode,
    pub expenses: Vec<NewExpense>,
    /// `None` when the document has no `categories` key.
    pub categories: Option<Vec<String>>,
}

impl BudgetBackup {
    /// Parse and validate a JSON document.
    ///
    /// Every failure is reported as [`EngineError::InvalidImport`] with the
    /// underlying cause as detail.
    pub fn parse(json: &str) -> ResultEngine<Self> {
        let document: BudgetExport = serde_json::from_str(json)
            .map_err(|err| EngineError::InvalidImport(err.to_string()))?;
        Self::try_from(document).map_err(|err| EngineError::InvalidImport(err.to_string()))
    }
}

impl TryFrom<BudgetExport> for BudgetBackup {
    type Error = EngineError;

    fn try_from(document: BudgetExport) -> ResultEngine<Self> {
        let income = Money::from_major(document.income)?;
        validate_income(income)?;
        let currency = CurrencyCode::try_from(document.currency)?;

        let expenses = document
            .expenses
            .into_iter()
            .map(|expense| {
                let amount = Money::from_major(expense.amount)?;
                validate_expense_amount(amount)?;
                Ok(NewExpense {
                    name: normalize_required_name(&expense.name, "expense")?,
                    amount,
                    category: normalize_required_name(&expense.category, "category")?,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        validate_total(expenses.iter().map(|expense| expense.amount), Money::ZERO)?;

        let categories = document
            .categories
            .map(|names| {
                let mut seen: Vec<String> = Vec::new();
                let mut out = Vec::new();
                for name in names {
                    let name = normalize_required_name(&name, "category")?;
                    let key = normalize_key(&name);
                    if seen.contains(&key) {
                        continue;
                    }
                    seen.push(key);
                    out.push(name);
                }
                Ok::<_, EngineError>(out)
            })
            .transpose()?;

        Ok(Self {
            income,
            currency,
            expenses,
            categories,
        })
    }
}

impl BudgetExport {
    /// Build the backup document of a profile.
    ///
    /// Expenses are listed by amount descending, categories by name.
    pub fn from_parts(user: &User, expenses: &[Expense], categories: &[Category]) -> Self {
        let mut expenses = expenses.to_vec();
        expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
        let mut categories = categories.to_vec();
        sort_by_name(&mut categories, |category| category.name.as_str());

        Self {
            income: user.income.to_major(),
            currency: user.currency.code().to_string(),
            expenses: expenses
                .into_iter()
                .map(|expense| ExportedExpense {
                    name: expense.name,
                    amount: expense.amount.to_major(),
                    category: expense.category,
                })
                .collect(),
            categories: Some(categories.into_iter().map(|c| c.name).collect()),
        }
    }

    pub fn to_json_pretty(&self) -> ResultEngine<String> {
        serde_json::to_string_pretty(self).map_err(|err| EngineError::Storage(err.to_string()))
    }
}

/// File name offered for a downloaded backup: `budget-{name}-{YYYY-MM-DD}.json`.
pub fn export_file_name(user: &User, date: NaiveDate) -> String {
    format!("budget-{}-{}.json", user.name, date.format("%Y-%m-%d"))
}
