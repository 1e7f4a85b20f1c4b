//! Unified error type for the whole crate.
//!
//! Handler-level failures are converted to plain-text replies at the command
//! dispatch boundary; only startup failures propagate out of `main`.

use thiserror::Error;

/// All errors the bot can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problem (missing or malformed environment variable).
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of what is misconfigured.
        message: String,
    },

    /// Any database failure, converted from `SeaORM`.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The amount argument of `/add` could not be parsed, or was zero
    /// or non-finite.
    #[error("invalid amount: {input}")]
    InvalidAmount {
        /// The raw text the user supplied.
        input: String,
    },

    /// Telegram API failure while sending or configuring.
    #[error("telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Environment variable lookup failure.
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
