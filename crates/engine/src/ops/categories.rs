use uuid::Uuid;

use crate::{
    Category, CategoryOption, ResultEngine,
    categories::{category_options, sort_by_name},
    util::normalize_required_name,
};

use super::{Engine, log_failure};

impl Engine {
    /// Add a custom category. Names are unique per profile, ignoring case.
    pub async fn create_category(&self, user_id: Uuid, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")
            .inspect_err(|err| log_failure("create category validation", err))?;
        let category = self
            .store
            .create_category(user_id, name)
            .await
            .inspect_err(|err| log_failure("create category", err))?;
        tracing::info!("user {user_id} added category {}", category.name);
        Ok(category)
    }

    /// Remove a custom category. Expenses keep their label.
    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        self.store
            .delete_category(category_id)
            .await
            .inspect_err(|err| log_failure("delete category", err))?;
        tracing::info!("deleted category {category_id}");
        Ok(())
    }

    /// Custom categories of a profile by name.
    pub async fn get_categories(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        let mut categories = self
            .store
            .list_categories(user_id)
            .await
            .inspect_err(|err| log_failure("list categories", err))?;
        sort_by_name(&mut categories, |category| category.name.as_str());
        tracing::debug!("user {user_id} has {} custom categories", categories.len());
        Ok(categories)
    }

    /// Built-in, custom and historical categories, as offered when adding an
    /// expense.
    pub async fn category_options(&self, user_id: Uuid) -> ResultEngine<Vec<CategoryOption>> {
        let custom = self
            .store
            .list_categories(user_id)
            .await
            .inspect_err(|err| log_failure("list categories", err))?;
        let expenses = self
            .store
            .list_expenses(user_id)
            .await
            .inspect_err(|err| log_failure("list expenses", err))?;
        let options = category_options(&custom, &expenses);
        tracing::debug!("user {user_id} has {} category options", options.len());
        Ok(options)
    }
}
