#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

// ── Expense status ────────────────────────────────────────────

#[test]
fn test_status_parse_roundtrip() {
    assert_eq!(ExpenseStatus::parse("Paid"), ExpenseStatus::Paid);
    assert_eq!(ExpenseStatus::parse("paid"), ExpenseStatus::Paid);
    assert_eq!(ExpenseStatus::parse("Late"), ExpenseStatus::Late);
    assert_eq!(ExpenseStatus::parse("Unpaid"), ExpenseStatus::Unpaid);
    // Unknown values degrade to Unpaid
    assert_eq!(ExpenseStatus::parse("???"), ExpenseStatus::Unpaid);
}

// ── Derived expense properties ────────────────────────────────

#[test]
fn test_expense_due_in_two_days_is_due_soon_not_overdue() {
    let now = at(2024, 6, 10, 12);
    let mut e = Expense::new(dec!(50), "Internet".into(), "Utilities".into(), at(2024, 6, 12, 12));
    assert!(!e.is_overdue(now));
    assert!(e.is_due_soon(now));

    // Same expense due yesterday is overdue
    e.due_date = at(2024, 6, 9, 12);
    assert!(e.is_overdue(now));
    assert!(!e.is_due_soon(now));
}

#[test]
fn test_expense_due_today_is_due_soon() {
    let now = at(2024, 6, 10, 8);
    let e = Expense::new(dec!(10), "Gym".into(), "Health".into(), at(2024, 6, 10, 20));
    assert!(e.is_due_soon(now));
    assert!(!e.is_overdue(now));
}

#[test]
fn test_expense_due_in_four_days_not_due_soon() {
    let now = at(2024, 6, 10, 12);
    let e = Expense::new(dec!(10), "Rent".into(), "Housing".into(), at(2024, 6, 14, 12));
    assert!(!e.is_due_soon(now));
}

#[test]
fn test_paid_expense_never_overdue_or_due_soon() {
    let now = at(2024, 6, 10, 12);
    let mut e = Expense::new(dec!(10), "Rent".into(), "Housing".into(), at(2024, 6, 1, 12));
    e.mark_paid(now);
    assert_eq!(e.status, ExpenseStatus::Paid);
    assert_eq!(e.paid_date, Some(now));
    assert!(!e.is_overdue(now));
    assert!(!e.is_due_soon(now));
}

// ── Derived goal properties ───────────────────────────────────

#[test]
fn test_goal_complete_at_target() {
    let mut g = Goal::new("Trip".into(), dec!(1000));
    g.accumulated = dec!(1000);
    assert!(g.is_complete());
    assert_eq!(g.percent(), 100);
    assert_eq!(g.remaining(), Decimal::ZERO);
    assert!((g.progress() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_goal_partial_progress() {
    let mut g = Goal::new("Car".into(), dec!(20000));
    g.accumulated = dec!(5000);
    assert!(!g.is_complete());
    assert_eq!(g.percent(), 25);
    assert_eq!(g.remaining(), dec!(15000));
}

#[test]
fn test_goal_progress_clamped() {
    let mut g = Goal::new("Over".into(), dec!(100));
    g.accumulated = dec!(250);
    assert!((g.progress() - 1.0).abs() < f64::EPSILON);
    assert_eq!(g.remaining(), Decimal::ZERO);

    g.accumulated = dec!(-50);
    assert_eq!(g.progress(), 0.0);
    assert_eq!(g.percent(), 0);
    assert_eq!(g.remaining(), dec!(150));
}

#[test]
fn test_goal_zero_target_has_zero_progress() {
    let g = Goal::new("Empty".into(), Decimal::ZERO);
    assert_eq!(g.progress(), 0.0);
    assert_eq!(g.percent(), 0);
    // accumulated (0) >= target (0)
    assert!(g.is_complete());
}

#[test]
fn test_goal_days_remaining() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let mut g = Goal::new("Trip".into(), dec!(1000));
    assert_eq!(g.days_remaining(today), None);

    g.deadline = Some(at(2024, 6, 20, 0));
    assert_eq!(g.days_remaining(today), Some(10));

    g.deadline = Some(at(2024, 6, 5, 0));
    assert_eq!(g.days_remaining(today), Some(-5));
}

#[test]
fn test_goal_default_color() {
    let g = Goal::new("Trip".into(), dec!(1000));
    assert_eq!(g.color, DEFAULT_GOAL_COLOR);
}

// ── Income ────────────────────────────────────────────────────

#[test]
fn test_income_ids_unique() {
    let date = at(2024, 6, 1, 0);
    let a = Income::new(dec!(100), "Salary".into(), date);
    let b = Income::new(dec!(100), "Salary".into(), date);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_no_validation_on_construction() {
    // Negative amounts and empty descriptions are accepted; validation is a
    // UI-layer concern.
    let i = Income::new(dec!(-10), String::new(), at(2024, 6, 1, 0));
    assert_eq!(i.amount, dec!(-10));
    let e = Expense::new(dec!(-5), String::new(), String::new(), at(2020, 1, 1, 0));
    assert_eq!(e.amount, dec!(-5));
}
