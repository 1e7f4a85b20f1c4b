//! User entity - Represents a Telegram user known to the ledger.
//!
//! Rows are inserted idempotently the first time a user records an entry and
//! are never mutated or deleted afterward. The primary key is the external
//! Telegram user id, not an auto-incremented value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// External Telegram user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Telegram handle, absent for users without one
    pub username: Option<String>,
    /// First name as reported by Telegram
    pub first_name: String,
    /// Last name, optional on Telegram
    pub last_name: Option<String>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user can author many ledger entries
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
