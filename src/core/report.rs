//! Reporting business logic - balances, per-user summaries, and
//! date-bucketed expense totals.
//!
//! Every aggregation counts only entries recorded after the most recent
//! `clear` sentinel, so clearing the ledger resets what the totals see while
//! leaving the raw history intact. Week buckets are ISO weeks starting on
//! Monday; month buckets are calendar months. The window functions are pure
//! so the bucketing can be tested with fixed dates.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Weekday};
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, prelude::*};

use crate::{
    core::{
        ledger::{self, EntryKind},
        user,
    },
    entities::{Transaction, User, transaction},
    errors::Result,
};

/// Which aggregation period a command refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The period containing today.
    Current,
    /// The period immediately before the current one.
    Previous,
}

impl Period {
    /// Maps the optional `/week` and `/month` argument: exactly `last`
    /// selects the previous period, anything else the current one.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg.trim() == "last" {
            Self::Previous
        } else {
            Self::Current
        }
    }
}

/// Income and expense totals since the last clear sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceReport {
    /// Total income.
    pub income: f64,
    /// Total expense.
    pub expense: f64,
}

impl BalanceReport {
    /// Net balance (income minus expense).
    #[must_use]
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Per-user totals since the last clear sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    /// Telegram user id the totals belong to.
    pub user_id: i64,
    /// Display name, falling back to `"unknown"`.
    pub name: String,
    /// Total income recorded by this user.
    pub income: f64,
    /// Total expense recorded by this user.
    pub expense: f64,
}

impl UserSummary {
    /// Net contribution (income minus expense).
    #[must_use]
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Computes the total income and expense since the last clear sentinel.
pub async fn balance(db: &DatabaseConnection) -> Result<BalanceReport> {
    let cutoff = ledger::last_clear_id(db).await?;
    let income = sum_amount(db, EntryKind::Income, cutoff, None).await?;
    let expense = sum_amount(db, EntryKind::Expense, cutoff, None).await?;

    Ok(BalanceReport { income, expense })
}

/// Groups income and expense totals by user, ordered by user id.
///
/// Only entries after the last clear sentinel contribute. A user whose row
/// carries neither a username nor a first name is shown as `"unknown"`.
pub async fn per_user_summary(db: &DatabaseConnection) -> Result<Vec<UserSummary>> {
    let cutoff = ledger::last_clear_id(db).await?;

    let mut query = Transaction::find()
        .find_also_related(User)
        .filter(transaction::Column::Kind.ne(EntryKind::Clear.as_str()))
        .order_by_asc(transaction::Column::Id);
    if let Some(id) = cutoff {
        query = query.filter(transaction::Column::Id.gt(id));
    }

    let mut by_user: BTreeMap<i64, UserSummary> = BTreeMap::new();
    for (entry, author) in query.all(db).await? {
        let summary = by_user.entry(entry.user_id).or_insert_with(|| UserSummary {
            user_id: entry.user_id,
            name: user::summary_name(author.as_ref()),
            income: 0.0,
            expense: 0.0,
        });

        if entry.kind == EntryKind::Income.as_str() {
            summary.income += entry.amount;
        } else if entry.kind == EntryKind::Expense.as_str() {
            summary.expense += entry.amount;
        }
    }

    Ok(by_user.into_values().collect())
}

/// Expense total for the current or previous ISO week.
pub async fn weekly_expense(
    db: &DatabaseConnection,
    period: Period,
    today: NaiveDate,
) -> Result<f64> {
    let (start, end) = week_window(today, period);
    windowed_expense(db, start, end).await
}

/// Expense total for the current or previous calendar month.
pub async fn monthly_expense(
    db: &DatabaseConnection,
    period: Period,
    today: NaiveDate,
) -> Result<f64> {
    let (start, end) = month_window(today, period);
    windowed_expense(db, start, end).await
}

/// Half-open date range `[start, end)` of the ISO week (Monday start)
/// containing `today`, or the week before it.
#[must_use]
pub fn week_window(today: NaiveDate, period: Period) -> (NaiveDate, NaiveDate) {
    let anchor = match period {
        Period::Current => today,
        Period::Previous => today - Days::new(7),
    };

    let start = anchor.week(Weekday::Mon).first_day();
    (start, start + Days::new(7))
}

/// Half-open date range `[start, end)` of the calendar month containing
/// `today`, or the month before it.
#[must_use]
pub fn month_window(today: NaiveDate, period: Period) -> (NaiveDate, NaiveDate) {
    let anchor = match period {
        Period::Current => today,
        Period::Previous => today.checked_sub_months(Months::new(1)).unwrap_or(today),
    };

    let start = anchor.with_day(1).unwrap_or(anchor);
    let end = start.checked_add_months(Months::new(1)).unwrap_or(start);
    (start, end)
}

async fn windowed_expense(db: &DatabaseConnection, start: NaiveDate, end: NaiveDate) -> Result<f64> {
    let cutoff = ledger::last_clear_id(db).await?;
    sum_amount(
        db,
        EntryKind::Expense,
        cutoff,
        Some((day_start(start), day_start(end))),
    )
    .await
}

#[derive(FromQueryResult)]
struct SumRow {
    total: Option<f64>,
}

async fn sum_amount(
    db: &DatabaseConnection,
    kind: EntryKind,
    cutoff: Option<i64>,
    window: Option<(DateTimeUtc, DateTimeUtc)>,
) -> Result<f64> {
    let mut query = Transaction::find()
        .select_only()
        .column_as(transaction::Column::Amount.sum(), "total")
        .filter(transaction::Column::Kind.eq(kind.as_str()));

    if let Some(id) = cutoff {
        query = query.filter(transaction::Column::Id.gt(id));
    }
    if let Some((start, end)) = window {
        query = query
            .filter(transaction::Column::CreatedAt.gte(start))
            .filter(transaction::Column::CreatedAt.lt(end));
    }

    let row = query.into_model::<SumRow>().one(db).await?;
    Ok(row.and_then(|r| r.total).unwrap_or(0.0))
}

fn day_start(date: NaiveDate) -> DateTimeUtc {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::ledger::record_clear;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_from_arg() {
        assert_eq!(Period::from_arg(""), Period::Current);
        assert_eq!(Period::from_arg("last"), Period::Previous);
        assert_eq!(Period::from_arg(" last "), Period::Previous);
        assert_eq!(Period::from_arg("next"), Period::Current);
    }

    #[test]
    fn test_week_window_current() {
        // 2024-05-15 is a Wednesday; its ISO week is Mon 13th through Sun 19th
        let (start, end) = week_window(date(2024, 5, 15), Period::Current);
        assert_eq!(start, date(2024, 5, 13));
        assert_eq!(end, date(2024, 5, 20));
    }

    #[test]
    fn test_week_window_previous() {
        let (start, end) = week_window(date(2024, 5, 15), Period::Previous);
        assert_eq!(start, date(2024, 5, 6));
        assert_eq!(end, date(2024, 5, 13));
    }

    #[test]
    fn test_week_window_monday_is_its_own_week_start() {
        let (start, _) = week_window(date(2024, 5, 13), Period::Current);
        assert_eq!(start, date(2024, 5, 13));
    }

    #[test]
    fn test_week_window_across_year_boundary() {
        // 2024-01-02 is a Tuesday; the previous week starts in December 2023
        let (start, end) = week_window(date(2024, 1, 2), Period::Previous);
        assert_eq!(start, date(2023, 12, 25));
        assert_eq!(end, date(2024, 1, 1));
    }

    #[test]
    fn test_month_window_current() {
        let (start, end) = month_window(date(2024, 5, 15), Period::Current);
        assert_eq!(start, date(2024, 5, 1));
        assert_eq!(end, date(2024, 6, 1));
    }

    #[test]
    fn test_month_window_previous() {
        let (start, end) = month_window(date(2024, 5, 15), Period::Previous);
        assert_eq!(start, date(2024, 4, 1));
        assert_eq!(end, date(2024, 5, 1));
    }

    #[test]
    fn test_month_window_previous_across_year_boundary() {
        let (start, end) = month_window(date(2024, 1, 10), Period::Previous);
        assert_eq!(start, date(2023, 12, 1));
        assert_eq!(end, date(2024, 1, 1));
    }

    #[tokio::test]
    async fn test_balance_empty_ledger() -> Result<()> {
        let db = setup_test_db().await?;

        let report = balance(&db).await?;
        assert_eq!(report.income, 0.0);
        assert_eq!(report.expense, 0.0);
        assert_eq!(report.net(), 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_sums_by_kind() -> Result<()> {
        let (db, user_id) = setup_with_user().await?;

        record_income(&db, user_id, 100.0).await?;
        record_income(&db, user_id, 50.0).await?;
        record_expense(&db, user_id, 30.0).await?;

        let report = balance(&db).await?;
        assert_eq!(report.income, 150.0);
        assert_eq!(report.expense, 30.0);
        assert_eq!(report.net(), 120.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_resets_at_clear_sentinel() -> Result<()> {
        let (db, user_id) = setup_with_user().await?;

        record_income(&db, user_id, 100.0).await?;
        record_expense(&db, user_id, 40.0).await?;
        record_clear(&db, user_id).await?;
        record_income(&db, user_id, 10.0).await?;

        let report = balance(&db).await?;
        assert_eq!(report.income, 10.0);
        assert_eq!(report.expense, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_per_user_summary_groups_by_user() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = seed_user(&db, 1, Some("alice"), "Alice").await?;
        let bob = seed_user(&db, 2, None, "Bob").await?;

        record_income(&db, alice, 100.0).await?;
        record_expense(&db, alice, 25.0).await?;
        record_expense(&db, bob, 40.0).await?;

        let rows = per_user_summary(&db).await?;
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].name, "alice");
        assert_eq!(rows[0].income, 100.0);
        assert_eq!(rows[0].expense, 25.0);
        assert_eq!(rows[0].net(), 75.0);

        assert_eq!(rows[1].name, "Bob");
        assert_eq!(rows[1].income, 0.0);
        assert_eq!(rows[1].expense, 40.0);
        assert_eq!(rows[1].net(), -40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_per_user_summary_unknown_name_placeholder() -> Result<()> {
        let db = setup_test_db().await?;
        let user_id = seed_user(&db, 5, None, "").await?;
        record_expense(&db, user_id, 12.0).await?;

        let rows = per_user_summary(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "unknown");

        Ok(())
    }

    #[tokio::test]
    async fn test_per_user_summary_resets_at_clear_sentinel() -> Result<()> {
        let (db, user_id) = setup_with_user().await?;

        record_income(&db, user_id, 100.0).await?;
        record_clear(&db, user_id).await?;

        assert!(per_user_summary(&db).await?.is_empty());

        record_expense(&db, user_id, 5.0).await?;
        let rows = per_user_summary(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expense, 5.0);
        assert_eq!(rows[0].income, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_weekly_expense_buckets() -> Result<()> {
        let (db, user_id) = setup_with_user().await?;
        let today = date(2024, 5, 15);

        // In the current week (Mon 13th .. Sun 19th)
        insert_entry_at(&db, user_id, EntryKind::Expense, 10.0, date(2024, 5, 13)).await?;
        insert_entry_at(&db, user_id, EntryKind::Expense, 2.5, date(2024, 5, 19)).await?;
        // Income in the current week must not count
        insert_entry_at(&db, user_id, EntryKind::Income, 99.0, date(2024, 5, 14)).await?;
        // In the previous week
        insert_entry_at(&db, user_id, EntryKind::Expense, 7.0, date(2024, 5, 12)).await?;

        assert_eq!(weekly_expense(&db, Period::Current, today).await?, 12.5);
        assert_eq!(weekly_expense(&db, Period::Previous, today).await?, 7.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_expense_buckets() -> Result<()> {
        let (db, user_id) = setup_with_user().await?;
        let today = date(2024, 5, 15);

        insert_entry_at(&db, user_id, EntryKind::Expense, 20.0, date(2024, 5, 1)).await?;
        insert_entry_at(&db, user_id, EntryKind::Expense, 5.0, date(2024, 5, 31)).await?;
        insert_entry_at(&db, user_id, EntryKind::Expense, 8.0, date(2024, 4, 30)).await?;

        assert_eq!(monthly_expense(&db, Period::Current, today).await?, 25.0);
        assert_eq!(monthly_expense(&db, Period::Previous, today).await?, 8.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_windowed_expense_resets_at_clear_sentinel() -> Result<()> {
        let (db, user_id) = setup_with_user().await?;
        let today = date(2024, 5, 15);

        insert_entry_at(&db, user_id, EntryKind::Expense, 10.0, date(2024, 5, 14)).await?;
        record_clear(&db, user_id).await?;
        insert_entry_at(&db, user_id, EntryKind::Expense, 3.0, date(2024, 5, 15)).await?;

        assert_eq!(weekly_expense(&db, Period::Current, today).await?, 3.0);

        Ok(())
    }
}
