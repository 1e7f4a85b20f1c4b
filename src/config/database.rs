//! Database configuration module.
//!
//! Handles the database connection and table creation using `SeaORM`. The
//! connection URL comes from `DATABASE_URL` and may point at any backend the
//! crate is compiled for (`SQLite` locally and in tests, `MySQL` in the
//! original deployment). Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! struct definitions without manual SQL.

use crate::entities::{Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default local database used when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/tally_bot.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL`
/// environment variable, falling back to a local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the `users` and `transactions` tables from the entity definitions.
///
/// Statements carry `IF NOT EXISTS`, so this is safe to run on every startup
/// against an already-populated database.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    user_table.if_not_exists();
    db.execute(builder.build(&user_table)).await?;

    let mut transaction_table = schema.create_table_from_entity(Transaction);
    transaction_table.if_not_exists();
    db.execute(builder.build(&transaction_table)).await?;

    Ok(())
}
