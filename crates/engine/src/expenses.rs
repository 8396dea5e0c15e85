//! Monthly expenses of a profile.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

/// A single expense line.
///
/// `category` is a free label: it can name a built-in category, a custom one
/// or one that has since been deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub amount: Money,
    pub category: String,
    pub user_id: Uuid,
}

impl Expense {
    pub fn new(user_id: Uuid, new_expense: NewExpense) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_expense.name,
            amount: new_expense.amount,
            category: new_expense.category,
            user_id,
        }
    }
}

/// Validated input for a new expense.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub amount: Money,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub amount: i64,
    pub category: String,
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

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            name: ActiveValue::Set(expense.name.clone()),
            amount: ActiveValue::Set(expense.amount.cents()),
            category: ActiveValue::Set(expense.category.clone()),
            user_id: ActiveValue::Set(expense.user_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            name: model.name,
            amount: Money::new(model.amount),
            category: model.category,
            user_id: parse_uuid(&model.user_id, "user")?,
        })
    }
}
