//! Custom categories per profile.
//!
//! Every profile can pick from [`DEFAULT_CATEGORIES`]; custom categories are
//! added on top of those and are the only ones persisted.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ResultEngine,
    util::{normalize_key, parse_uuid},
};

/// Built-in categories offered to every profile.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Debt",
    "Education",
    "Entertainment",
    "Food",
    "Healthcare",
    "Housing",
    "Insurance",
    "Personal",
    "Savings",
    "Shopping",
    "Subscriptions",
    "Transportation",
    "Utilities",
    "Other",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
}

impl Category {
    pub fn new(user_id: Uuid, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            user_id,
        }
    }

    /// Case-insensitive comparison key for this category's name.
    #[must_use]
    pub fn key(&self) -> String {
        normalize_key(&self.name)
    }
}

/// Where a category offered to the user comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Default,
    Custom,
    /// Only carried by existing expenses (a deleted custom category, an
    /// imported label).
    Historical,
}

/// An entry of the category picker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub name: String,
    /// Set for custom categories only (those can be deleted).
    pub id: Option<Uuid>,
    pub kind: CategoryKind,
}

/// Merge built-in, custom and historical categories for the picker.
///
/// Names are de-duplicated by exact match, first source wins: built-in,
/// then custom, then the labels of `expenses`. The result is sorted by
/// name, case-insensitively.
pub fn category_options(custom: &[Category], expenses: &[Expense]) -> Vec<CategoryOption> {
    let mut options: Vec<CategoryOption> = DEFAULT_CATEGORIES
        .iter()
        .map(|name| CategoryOption {
            name: (*name).to_string(),
            id: None,
            kind: CategoryKind::Default,
        })
        .collect();

    for category in custom {
        if options.iter().any(|option| option.name == category.name) {
            continue;
        }
        options.push(CategoryOption {
            name: category.name.clone(),
            id: Some(category.id),
            kind: CategoryKind::Custom,
        });
    }

    for expense in expenses {
        if options.iter().any(|option| option.name == expense.category) {
            continue;
        }
        options.push(CategoryOption {
            name: expense.category.clone(),
            id: None,
            kind: CategoryKind::Historical,
        });
    }

    sort_by_name(&mut options, |option| option.name.as_str());
    options
}

/// Sort by name ignoring case, falling back to the raw name for ties.
pub(crate) fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        let (a, b) = (name(a), name(b));
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id.to_string()),
            name: ActiveValue::Set(category.name.clone()),
            name_norm: ActiveValue::Set(category.key()),
            user_id: ActiveValue::Set(category.user_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "category")?,
            name: model.name,
            user_id: parse_uuid(&model.user_id, "user")?,
        })
    }
}
