//! Telegram command handlers and reply formatting.
//!
//! Every command maps to one core operation followed by string formatting.
//! Failures are caught at the dispatch boundary and converted into a
//! plain-text error reply, so no handler error is fatal.

use std::sync::Arc;

use chrono::Utc;
use teloxide::{prelude::*, types::User, utils::command::BotCommands};
use tracing::error;

use crate::{
    bot::BotData,
    config::admins,
    core::{
        ledger::{self, ClearOutcome, EntryKind},
        report::{self, Period},
        user as core_user,
    },
    entities::{transaction, user},
    errors::{Error, Result},
};

/// Number of entries shown by `/list`.
const LIST_PAGE_SIZE: u64 = 20;

/// Text commands understood by the bot.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Group ledger commands:")]
pub enum Command {
    /// Welcome message with usage help.
    #[command(description = "start and show available commands")]
    Start,
    /// Record an entry; the argument is `[±amount] [note]`.
    #[command(description = "record an income (+) or expense (-) entry")]
    Add(String),
    /// Show the most recent entries.
    #[command(description = "show recent entries")]
    List,
    /// Reset the ledger (admin-gated).
    #[command(description = "reset the ledger totals")]
    Clear,
    /// Total income, expense, and net balance.
    #[command(description = "show the current balance")]
    Balance,
    /// Per-user income/expense totals.
    #[command(description = "show per-user totals")]
    Summary,
    /// Expenses for the current week, or the previous one with `last`.
    #[command(description = "show this week's expenses (`/week last` for last week)")]
    Week(String),
    /// Expenses for the current month, or the previous one with `last`.
    #[command(description = "show this month's expenses (`/month last` for last month)")]
    Month(String),
}

/// Dispatcher endpoint: runs the command and sends exactly one reply.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotData>,
) -> ResponseResult<()> {
    let reply = match dispatch(&msg, cmd, &state).await {
        Ok(text) => text,
        Err(err) => {
            error!("command failed: {err}");
            error_reply(&err)
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn dispatch(msg: &Message, cmd: Command, state: &BotData) -> Result<String> {
    match cmd {
        Command::Start => Ok(help_text().to_string()),
        Command::Add(args) => match msg.from() {
            Some(from) => add(state, from, &args).await,
            None => Ok(anonymous_reply()),
        },
        Command::List => list(state).await,
        Command::Clear => match msg.from() {
            Some(from) => clear(state, from).await,
            None => Ok(anonymous_reply()),
        },
        Command::Balance => balance(state).await,
        Command::Summary => summary(state).await,
        Command::Week(args) => week(state, &args).await,
        Command::Month(args) => month(state, &args).await,
    }
}

async fn add(state: &BotData, from: &User, args: &str) -> Result<String> {
    let mut fields = args.split_whitespace();
    let Some(amount_raw) = fields.next() else {
        return Ok(add_usage().to_string());
    };
    let note = fields.collect::<Vec<_>>().join(" ");
    if note.is_empty() {
        return Ok(add_usage().to_string());
    }

    let (kind, amount) = ledger::parse_amount(amount_raw)?;

    core_user::upsert_user(
        &state.db,
        telegram_user_id(from),
        from.username.clone(),
        from.first_name.clone(),
        from.last_name.clone(),
    )
    .await?;

    let entry = ledger::record_entry(&state.db, telegram_user_id(from), kind, amount, note).await?;
    Ok(format!(
        "✅ Recorded {} {:.2}, note: {}",
        kind.as_str(),
        entry.amount,
        entry.note
    ))
}

async fn list(state: &BotData) -> Result<String> {
    let entries = ledger::latest_entries(&state.db, LIST_PAGE_SIZE).await?;
    if entries.is_empty() {
        return Ok("The ledger is empty. Use /add to record the first entry.".to_string());
    }

    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, (entry, author))| format_entry_line(i + 1, entry, author.as_ref()))
        .collect();
    Ok(lines.join("\n"))
}

async fn clear(state: &BotData, from: &User) -> Result<String> {
    let user_id = telegram_user_id(from);
    if !admins::is_authorized(&state.admin_ids, user_id) {
        return Ok("❌ Only admins may reset the ledger.".to_string());
    }

    core_user::upsert_user(
        &state.db,
        user_id,
        from.username.clone(),
        from.first_name.clone(),
        from.last_name.clone(),
    )
    .await?;

    match ledger::record_clear(&state.db, user_id).await? {
        ClearOutcome::AlreadyCleared => {
            Ok("ℹ️ The ledger was already reset by the most recent entry.".to_string())
        }
        ClearOutcome::Recorded => {
            Ok("✅ Ledger reset. Earlier entries no longer count toward totals.".to_string())
        }
    }
}

async fn balance(state: &BotData) -> Result<String> {
    let report = report::balance(&state.db).await?;
    Ok(format_balance(&report))
}

async fn summary(state: &BotData) -> Result<String> {
    let rows = report::per_user_summary(&state.db).await?;
    if rows.is_empty() {
        return Ok("Nothing to summarize yet.".to_string());
    }

    let mut text = String::from("👥 Per-user totals:\n");
    for row in &rows {
        text.push_str(&format!(
            "{}: income {:.2}, expense {:.2}, net {:.2}\n",
            row.name,
            row.income,
            row.expense,
            row.net()
        ));
    }
    Ok(text.trim_end().to_string())
}

async fn week(state: &BotData, args: &str) -> Result<String> {
    let period = Period::from_arg(args);
    let total = report::weekly_expense(&state.db, period, Utc::now().date_naive()).await?;
    Ok(match period {
        Period::Current => format!("Expenses this week: {total:.2}"),
        Period::Previous => format!("Expenses last week: {total:.2}"),
    })
}

async fn month(state: &BotData, args: &str) -> Result<String> {
    let period = Period::from_arg(args);
    let total = report::monthly_expense(&state.db, period, Utc::now().date_naive()).await?;
    Ok(match period {
        Period::Current => format!("Expenses this month: {total:.2}"),
        Period::Previous => format!("Expenses last month: {total:.2}"),
    })
}

/// One `/list` line: index, kind, amount, note, timestamp, author.
fn format_entry_line(
    index: usize,
    entry: &transaction::Model,
    author: Option<&user::Model>,
) -> String {
    format!(
        "{index}. [{}] {:.2} - {} ({}) by @{}",
        entry.kind,
        entry.amount,
        entry.note,
        entry.created_at.format("%Y-%m-%d %H:%M"),
        core_user::display_name(author, entry.user_id),
    )
}

fn format_balance(report: &report::BalanceReport) -> String {
    format!(
        "📊 Net balance: {:.2}\nIncome: {:.2}\nExpense: {:.2}",
        report.net(),
        report.income,
        report.expense
    )
}

fn error_reply(err: &Error) -> String {
    match err {
        Error::InvalidAmount { input } => format!(
            "❌ \"{input}\" is not a valid amount. Use a number with an optional leading sign, e.g. /add -12.50 lunch"
        ),
        other => format!("⚠️ Something went wrong: {other}"),
    }
}

fn add_usage() -> &'static str {
    "Usage: /add [±amount] [note]\nExample: /add -12.50 lunch"
}

fn anonymous_reply() -> String {
    "⚠️ I can't tell who sent this command, so it was ignored.".to_string()
}

fn help_text() -> &'static str {
    "Welcome to the group ledger bot!\n\n\
    Available commands:\n\
    /add [±amount] [note] - record an expense (-) or income (+) entry\n\
    /list - show the most recent entries\n\
    /clear - reset the ledger (admins only)\n\
    /balance - show total balance\n\
    /summary - per-user income and expense totals\n\
    /week [last] - expenses for this (or last) week\n\
    /month [last] - expenses for this (or last) month"
}

// Cast safety: Telegram user ids fit comfortably in i64; the wrap can only
// happen for ids above 2^63, which Telegram does not issue.
#[allow(clippy::cast_possible_wrap)]
fn telegram_user_id(from: &User) -> i64 {
    from.id.0 as i64
}
