//! Core business logic - framework-agnostic ledger operations.
//!
//! Everything in here takes a `DatabaseConnection` and plain data, and knows
//! nothing about Telegram. The bot layer translates commands into these
//! operations and formats the results into replies.

/// Entry recording, listing, amount parsing, and the clear sentinel
pub mod ledger;

/// Balance, per-user summaries, and week/month expense windows
pub mod report;

/// User upsert and display-name fallbacks
pub mod user;
