//! Bot layer - Telegram-specific interface and command handlers
//!
//! This module provides the Telegram interface for the ledger, including the
//! command definitions, their handlers, and the long-polling dispatcher.

/// Command definitions, handlers, and reply formatting
pub mod commands;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use teloxide::{dispatching::Dispatcher, dptree, prelude::*, utils::command::BotCommands};
use tracing::info;

use crate::errors::Result;
use commands::Command;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all ledger operations
    pub db: DatabaseConnection,
    /// Admin allow-list for `/clear`; empty disables the gate
    pub admin_ids: Vec<i64>,
}

impl BotData {
    /// Creates the shared context handed to every command handler.
    #[must_use]
    pub const fn new(db: DatabaseConnection, admin_ids: Vec<i64>) -> Self {
        Self { db, admin_ids }
    }
}

/// Runs the bot until the update stream ends.
///
/// Registers the command menu, then processes the inbound update stream
/// sequentially via long polling. Non-command messages are ignored.
pub async fn run_bot(token: String, db: DatabaseConnection, admin_ids: Vec<i64>) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot.get_me().await?;
    info!("Logged in as @{}", me.username());

    bot.set_my_commands(Command::bot_commands()).await?;
    info!("Command menu registered");

    let state = Arc::new(BotData::new(db, admin_ids));

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(commands::handle_command);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .build()
        .dispatch()
        .await;

    Ok(())
}
