//! Shared test utilities for `TallyBot`.
//!
//! This module provides common helper functions for setting up in-memory
//! test databases and seeding users and ledger entries with sensible
//! defaults.

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{DatabaseConnection, Set, prelude::*};

use crate::{
    core::{
        ledger::{self, EntryKind},
        user,
    },
    entities::transaction,
    errors::Result,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test user and returns its id for convenience.
pub async fn seed_user(
    db: &DatabaseConnection,
    id: i64,
    username: Option<&str>,
    first_name: &str,
) -> Result<i64> {
    user::upsert_user(
        db,
        id,
        username.map(ToString::to_string),
        first_name.to_string(),
        None,
    )
    .await?;
    Ok(id)
}

/// Sets up a database with one registered user.
/// Returns (db, `user_id`) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, i64)> {
    let db = setup_test_db().await?;
    let user_id = seed_user(&db, 1, Some("tester"), "Tester").await?;
    Ok((db, user_id))
}

/// Records an income entry with a default note.
pub async fn record_income(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
) -> Result<transaction::Model> {
    ledger::record_entry(db, user_id, EntryKind::Income, amount, "test income".to_string()).await
}

/// Records an expense entry with a default note.
pub async fn record_expense(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
) -> Result<transaction::Model> {
    ledger::record_entry(
        db,
        user_id,
        EntryKind::Expense,
        amount,
        "test expense".to_string(),
    )
    .await
}

/// Inserts an entry with an explicit creation day (noon UTC), bypassing the
/// server-assigned timestamp so window aggregations are testable.
pub async fn insert_entry_at(
    db: &DatabaseConnection,
    user_id: i64,
    kind: EntryKind,
    amount: f64,
    day: NaiveDate,
) -> Result<transaction::Model> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        kind: Set(kind.as_str().to_string()),
        amount: Set(amount),
        note: Set("test entry".to_string()),
        created_at: Set(day.and_time(noon).and_utc()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}
