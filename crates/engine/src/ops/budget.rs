use uuid::Uuid;

use crate::{
    Expense, ExpenseQuery, Money, NewExpense, ResultEngine, User, UserBudget, UserPatch,
    aggregation::unique_categories,
    util::{normalize_required_name, validate_expense_amount, validate_income, validate_total},
};

use super::{Engine, log_failure};

impl Engine {
    /// Set the monthly income of a profile.
    pub async fn update_income(&self, user_id: Uuid, income: Money) -> ResultEngine<User> {
        validate_income(income).inspect_err(|err| log_failure("update income", err))?;
        let user = self
            .store
            .update_user(user_id, UserPatch::income(income))
            .await
            .inspect_err(|err| log_failure("update income", err))?;
        tracing::info!("user {user_id} income set to {income}");
        Ok(user)
    }

    /// Add an expense. Fails when the profile's total would overflow.
    pub async fn create_expense(
        &self,
        user_id: Uuid,
        name: &str,
        amount: Money,
        category: &str,
    ) -> ResultEngine<Expense> {
        let expense = new_expense(name, amount, category)
            .inspect_err(|err| log_failure("create expense validation", err))?;
        let existing = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("create expense", err))?;
        validate_total(existing.iter().map(|expense| expense.amount), amount)
            .inspect_err(|err| log_failure("create expense validation", err))?;

        let expense = self
            .store
            .create_expense(user_id, expense)
            .await
            .inspect_err(|err| log_failure("create expense", err))?;
        tracing::info!("user {user_id} added expense {}", expense.id);
        Ok(expense)
    }

    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        self.store
            .delete_expense(expense_id)
            .await
            .inspect_err(|err| log_failure("delete expense", err))?;
        tracing::info!("deleted expense {expense_id}");
        Ok(())
    }

    /// The profile with its expenses sorted by amount, largest first.
    pub async fn get_user_budget(&self, user_id: Uuid) -> ResultEngine<UserBudget> {
        let user = self.require_user(user_id).await?;
        let expenses = self.sorted_expenses(user_id).await?;
        tracing::debug!("loaded budget of user {user_id}: {} expenses", expenses.len());
        Ok(UserBudget { user, expenses })
    }

    /// Expenses of a profile filtered, searched and sorted by `query`.
    pub async fn list_expenses(
        &self,
        user_id: Uuid,
        query: &ExpenseQuery,
    ) -> ResultEngine<Vec<Expense>> {
        self.require_user(user_id).await?;
        let expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("list expenses", err))?;
        let expenses = query.apply(&expenses);
        tracing::debug!("user {user_id} expense query matched {}", expenses.len());
        Ok(expenses)
    }

    /// Category labels in use by the profile's expenses.
    pub async fn expense_categories(&self, user_id: Uuid) -> ResultEngine<Vec<String>> {
        let expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("list expense categories", err))?;
        Ok(unique_categories(&expenses))
    }

    pub(super) async fn sorted_expenses(&self, user_id: Uuid) -> ResultEngine<Vec<Expense>> {
        let mut expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("list expenses", err))?;
        expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(expenses)
    }
}

fn new_expense(name: &str, amount: Money, category: &str) -> ResultEngine<NewExpense> {
    validate_expense_amount(amount)?;
    Ok(NewExpense {
        name: normalize_required_name(name, "expense")?,
        amount,
        category: normalize_required_name(category, "category")?,
    })
}
