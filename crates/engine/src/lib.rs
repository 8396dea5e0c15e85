pub use aggregation::{
    Breakdown, ExpenseQuery, Slice, SortKey, SortOrder, Summary, UNALLOCATED_LABEL, breakdown,
    summary, totals_by_category, unique_categories,
};
pub use backup::{BudgetBackup, BudgetExport, ExportedExpense, export_file_name};
pub use categories::{
    Category, CategoryKind, CategoryOption, DEFAULT_CATEGORIES, category_options,
};
pub use currency::CurrencyCode;
pub use error::EngineError;
pub use expenses::{Expense, NewExpense};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, SystemStatus};
pub use report::render_report;
pub use store::{BudgetStore, DEMO_USER_NAME, LocalStore, SqlStore};
pub use users::{NewUser, Theme, User, UserBudget, UserPatch};

mod aggregation;
mod backup;
mod categories;
mod currency;
mod error;
mod expenses;
mod money;
mod ops;
mod report;
mod store;
mod system_state;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
