//! Budget profiles.
//!
//! A profile owns one monthly income, a list of expenses and its custom
//! categories. Profiles never share data.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CurrencyCode, EngineError, Money, ResultEngine, util::parse_uuid};

/// Display preference stored with the profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl TryFrom<&str> for Theme {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(EngineError::InvalidTheme(format!(
                "expected light, dark or system, got '{other}'"
            ))),
        }
    }
}

/// A budget profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub currency: CurrencyCode,
    pub theme: Theme,
    /// Monthly income.
    pub income: Money,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(new_user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_user.name,
            currency: new_user.currency,
            theme: new_user.theme,
            income: Money::ZERO,
            created_at,
        }
    }

    /// Apply the fields set in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(income) = patch.income {
            self.income = income;
        }
    }
}

/// Validated input for a new profile.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub currency: CurrencyCode,
    pub theme: Theme,
}

/// Partial update of a profile. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub currency: Option<CurrencyCode>,
    pub theme: Option<Theme>,
    pub income: Option<Money>,
}

impl UserPatch {
    pub fn income(income: Money) -> Self {
        Self {
            income: Some(income),
            ..Default::default()
        }
    }

    pub fn currency(currency: CurrencyCode) -> Self {
        Self {
            currency: Some(currency),
            ..Default::default()
        }
    }
}

/// A profile together with its expenses, largest amount first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserBudget {
    pub user: User,
    pub expenses: Vec<crate::Expense>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub currency: String,
    pub theme: String,
    pub income: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::categories::Entity")]
    Categories,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: ActiveValue::Set(user.id.to_string()),
            name: ActiveValue::Set(user.name.clone()),
            currency: ActiveValue::Set(user.currency.code().to_string()),
            theme: ActiveValue::Set(user.theme.as_str().to_string()),
            income: ActiveValue::Set(user.income.cents()),
            created_at: ActiveValue::Set(user.created_at),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "user")?,
            name: model.name,
            currency: CurrencyCode::try_from(model.currency)?,
            theme: Theme::try_from(model.theme.as_str())?,
            income: Money::new(model.income),
            created_at: model.created_at,
        })
    }
}
