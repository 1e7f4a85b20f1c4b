//! Ledger business logic - recording and listing entries.
//!
//! Entries are immutable facts: created once, never updated or deleted. The
//! leading sign of the `/add` amount selects the kind (negative is an
//! expense, positive or unsigned an income) and the magnitude is stored
//! unsigned. A `clear` sentinel row marks a balance reset point; recording
//! one is a no-op when the most recent row is already a sentinel.

use crate::{
    entities::{Transaction, User, transaction, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};

/// Note stored on every `clear` sentinel row.
pub const CLEAR_NOTE: &str = "balance reset";

/// Kind of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Money added to the shared pot.
    Income,
    /// Money spent from the shared pot.
    Expense,
    /// Sentinel marking a balance reset point.
    Clear,
}

impl EntryKind {
    /// Stable string stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Clear => "clear",
        }
    }
}

/// Outcome of a `/clear` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// A new sentinel row was written.
    Recorded,
    /// The most recent row was already a sentinel; nothing was written.
    AlreadyCleared,
}

/// Parses an `/add` amount argument into a kind and unsigned magnitude.
///
/// A leading `-` selects [`EntryKind::Expense`]; anything else (including an
/// explicit `+`) selects [`EntryKind::Income`]. Zero and non-finite values
/// are rejected, so a stored amount is always strictly positive.
pub fn parse_amount(input: &str) -> Result<(EntryKind, f64)> {
    let invalid = || Error::InvalidAmount {
        input: input.to_string(),
    };

    let value: f64 = input.parse().map_err(|_| invalid())?;
    // f64 parsing accepts "nan" and "inf"; neither is a usable amount
    if !value.is_finite() || value == 0.0 {
        return Err(invalid());
    }

    if value < 0.0 {
        Ok((EntryKind::Expense, -value))
    } else {
        Ok((EntryKind::Income, value))
    }
}

/// Records an income or expense entry with a server-assigned timestamp.
///
/// The amount must be the unsigned magnitude produced by [`parse_amount`];
/// zero or non-finite amounts are rejected here as well so no invalid row can
/// reach the database through another path.
pub async fn record_entry(
    db: &DatabaseConnection,
    user_id: i64,
    kind: EntryKind,
    amount: f64,
    note: String,
) -> Result<transaction::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount {
            input: amount.to_string(),
        });
    }

    insert_row(db, user_id, kind, amount, note).await
}

/// Retrieves the newest `limit` entries of any kind together with their
/// authors, newest first.
pub async fn latest_entries(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<(transaction::Model, Option<user::Model>)>> {
    Transaction::find()
        .find_also_related(User)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a `clear` sentinel, unless the most recent row already is one.
pub async fn record_clear(db: &DatabaseConnection, user_id: i64) -> Result<ClearOutcome> {
    let latest = Transaction::find()
        .order_by_desc(transaction::Column::Id)
        .one(db)
        .await?;

    if latest.is_some_and(|entry| entry.kind == EntryKind::Clear.as_str()) {
        return Ok(ClearOutcome::AlreadyCleared);
    }

    insert_row(db, user_id, EntryKind::Clear, 0.0, CLEAR_NOTE.to_string()).await?;
    Ok(ClearOutcome::Recorded)
}

/// Id of the most recent `clear` sentinel, if any.
///
/// Aggregations count only rows with a larger id, so earlier history stops
/// contributing to totals once the ledger has been cleared.
pub async fn last_clear_id(db: &DatabaseConnection) -> Result<Option<i64>> {
    let sentinel = Transaction::find()
        .filter(transaction::Column::Kind.eq(EntryKind::Clear.as_str()))
        .order_by_desc(transaction::Column::Id)
        .one(db)
        .await?;

    Ok(sentinel.map(|entry| entry.id))
}

async fn insert_row(
    db: &DatabaseConnection,
    user_id: i64,
    kind: EntryKind,
    amount: f64,
    note: String,
) -> Result<transaction::Model> {
    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        kind: Set(kind.as_str().to_string()),
        amount: Set(amount),
        note: Set(note),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}
