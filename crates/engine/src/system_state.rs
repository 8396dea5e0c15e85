//! Deployment-wide key/value state.

use sea_orm::entity::prelude::*;

/// Key holding the timestamp of the last data reset (milliseconds since epoch).
pub const LAST_RESET_KEY: &str = "lastReset";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
