//! Transaction entity - Represents one immutable ledger entry.
//!
//! Each entry has a `user_id`, a `kind` (`"income"`, `"expense"`, or the
//! `"clear"` sentinel), a non-negative amount, a free-text note, and a
//! server-assigned creation timestamp. Entries are created once and never
//! updated or deleted; the sign of an amount is encoded by `kind`, not by
//! the stored value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier; insertion order matches `created_at` order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Telegram user id of the author
    pub user_id: i64,
    /// Entry kind: `"income"`, `"expense"`, or `"clear"`
    pub kind: String,
    /// Non-negative magnitude; `0.0` only for `"clear"` rows
    pub amount: f64,
    /// Free-text note supplied with the entry
    pub note: String,
    /// When the entry was recorded (server-assigned)
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry is authored by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
