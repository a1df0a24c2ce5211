//! Derived financial metrics, recomputed on demand from repository queries.
//!
//! Nothing here reads the wall clock: every date-dependent function takes the
//! reference instant as a parameter so aggregation is deterministic under test.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::Database;
use crate::models::{Expense, ExpenseStatus, Income};

/// One slice of the current month's expenses, as a percentage of the month
/// total. Display-only, hence f64.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

/// An income or expense flattened into the combined recent-activity feed.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
}

/// Total balance: all income minus paid expenses.
pub(crate) fn balance(db: &Database) -> Decimal {
    let income: Decimal = db.get_incomes().iter().map(|i| i.amount).sum();
    let paid: Decimal = db
        .get_expenses()
        .iter()
        .filter(|e| e.status == ExpenseStatus::Paid)
        .map(|e| e.amount)
        .sum();
    income - paid
}

/// Incomes dated within `today`'s calendar month.
pub(crate) fn incomes_for_month(db: &Database, today: NaiveDate) -> Vec<Income> {
    let (start, end) = month_bounds(today);
    db.get_incomes_between(start, end)
}

/// Expenses due within `today`'s calendar month.
pub(crate) fn expenses_for_month(db: &Database, today: NaiveDate) -> Vec<Expense> {
    let (start, end) = month_bounds(today);
    db.get_expenses_between(start, end)
}

pub(crate) fn monthly_income_total(db: &Database, today: NaiveDate) -> Decimal {
    incomes_for_month(db, today).iter().map(|i| i.amount).sum()
}

pub(crate) fn monthly_expense_total(db: &Database, today: NaiveDate) -> Decimal {
    expenses_for_month(db, today).iter().map(|e| e.amount).sum()
}

/// Current-month expenses grouped by category as percentages of the month
/// total, sorted by category name. Empty when the month total is zero, which
/// also sidesteps the division.
pub(crate) fn category_breakdown(db: &Database, today: NaiveDate) -> Vec<CategoryShare> {
    let expenses = expenses_for_month(db, today);
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    if total <= Decimal::ZERO {
        return Vec::new();
    }

    let mut by_category: HashMap<String, Decimal> = HashMap::new();
    for expense in &expenses {
        *by_category.entry(expense.category.clone()).or_default() += expense.amount;
    }

    let mut shares: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            percent: (amount / total * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0),
        })
        .collect();
    shares.sort_by(|a, b| a.category.cmp(&b.category));
    shares
}

/// Income totals for the trailing `months` calendar months, oldest first,
/// `today`'s month last.
pub(crate) fn trailing_monthly_series(db: &Database, today: NaiveDate, months: u32) -> Vec<f64> {
    let mut series = Vec::with_capacity(months as usize);
    for back in (0..months).rev() {
        let month = months_back(today, back);
        let total = monthly_income_total(db, month);
        series.push(total.to_f64().unwrap_or(0.0));
    }
    series
}

/// Incomes and expenses merged into one feed, newest first, truncated to
/// `limit`. Expenses are dated by due date.
pub(crate) fn recent_entries(db: &Database, limit: usize) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = Vec::new();

    for income in db.get_incomes() {
        entries.push(LedgerEntry {
            kind: EntryKind::Income,
            id: income.id,
            description: income.description,
            amount: income.amount,
            date: income.date,
        });
    }
    for expense in db.get_expenses() {
        entries.push(LedgerEntry {
            kind: EntryKind::Expense,
            id: expense.id,
            description: expense.description,
            amount: expense.amount,
            date: expense.due_date,
        });
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    entries
}

// ── Calendar helpers ──────────────────────────────────────────

/// Inclusive bounds of `day`'s calendar month: first day at 00:00:00 through
/// last day at 23:59:59.
pub(crate) fn month_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let first = day.with_day(1).unwrap_or(day);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .unwrap_or(first);
    let last = next_first.pred_opt().unwrap_or(first);
    (
        first.and_hms_opt(0, 0, 0).unwrap_or_default(),
        last.and_hms_opt(23, 59, 59).unwrap_or_default(),
    )
}

/// The first day of the month `back` months before `day`'s month.
fn months_back(day: NaiveDate, back: u32) -> NaiveDate {
    let total = day.year() * 12 + day.month0() as i32 - back as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(day)
}
