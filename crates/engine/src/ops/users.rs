use chrono::Utc;
use uuid::Uuid;

use crate::{CurrencyCode, NewUser, ResultEngine, Theme, User, util::normalize_user_name};

use super::{Engine, log_failure};

impl Engine {
    /// All profiles, newest first.
    pub async fn get_users(&self) -> ResultEngine<Vec<User>> {
        let users = self
            .store
            .list_users()
            .await
            .inspect_err(|err| log_failure("list users", err))?;
        tracing::debug!("listed {} users", users.len());
        Ok(users)
    }

    /// Create a profile. `currency` defaults to USD and `theme` to system.
    pub async fn create_user(
        &self,
        name: &str,
        currency: Option<&str>,
        theme: Option<&str>,
    ) -> ResultEngine<User> {
        let new_user = new_user(name, currency, theme)
            .inspect_err(|err| log_failure("create user validation", err))?;
        let user = self
            .store
            .create_user(new_user, Utc::now())
            .await
            .inspect_err(|err| log_failure("create user", err))?;
        tracing::info!("created user {} ({})", user.id, user.name);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> ResultEngine<Option<User>> {
        let user = self
            .store
            .get_user(user_id)
            .await
            .inspect_err(|err| log_failure("get user", err))?;
        if user.is_none() {
            tracing::warn!("user {user_id} not found");
        } else {
            tracing::debug!("loaded user {user_id}");
        }
        Ok(user)
    }

    /// Delete a profile with all of its data.
    pub async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()> {
        self.store
            .delete_user(user_id)
            .await
            .inspect_err(|err| log_failure("delete user", err))?;
        tracing::info!("deleted user {user_id}");
        Ok(())
    }

    /// Make `user_id` the active profile. Fails when it does not exist.
    pub async fn switch_user(&self, user_id: Uuid) -> ResultEngine<User> {
        let user = self.require_user(user_id).await?;
        tracing::debug!("switched to user {user_id}");
        Ok(user)
    }
}

fn new_user(name: &str, currency: Option<&str>, theme: Option<&str>) -> ResultEngine<NewUser> {
    Ok(NewUser {
        name: normalize_user_name(name)?,
        currency: currency
            .map(CurrencyCode::try_from)
            .transpose()?
            .unwrap_or_default(),
        theme: theme.map(Theme::try_from).transpose()?.unwrap_or_default(),
    })
}
