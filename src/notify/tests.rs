#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn unpaid(due: NaiveDateTime) -> Expense {
    Expense::new(dec!(80), "Internet".into(), "Utilities".into(), due)
}

/// Records scheduler calls for assertions; `fail` makes schedule() error.
#[derive(Default)]
struct FakeScheduler {
    scheduled: Vec<Reminder>,
    cancelled: Vec<String>,
    fail: bool,
}

impl ReminderScheduler for FakeScheduler {
    fn schedule(&mut self, reminder: &Reminder) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("center rejected request");
        }
        self.scheduled.push(reminder.clone());
        Ok(())
    }

    fn cancel(&mut self, id: &str) {
        self.cancelled.push(id.to_string());
        self.scheduled.retain(|r| r.id != id);
    }

    fn cancel_all(&mut self) {
        self.scheduled.clear();
    }
}

// ── Pure planning ─────────────────────────────────────────────

#[test]
fn test_due_in_five_days_plans_both_reminders() {
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 15, 9));

    let plan = plan_reminders(&expense, now);
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].id, format!("{}{LEAD_SUFFIX}", expense.id));
    assert_eq!(plan[0].fire_at, at(2024, 6, 12, 9));
    assert_eq!(plan[1].id, format!("{}{DUE_SUFFIX}", expense.id));
    assert_eq!(plan[1].fire_at, at(2024, 6, 15, 9));
}

#[test]
fn test_due_tomorrow_plans_only_due_reminder() {
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 11, 9));

    let plan = plan_reminders(&expense, now);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].id, format!("{}{DUE_SUFFIX}", expense.id));
}

#[test]
fn test_past_due_plans_nothing() {
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 9, 9));
    assert!(plan_reminders(&expense, now).is_empty());
}

#[test]
fn test_paid_expense_plans_nothing() {
    let now = at(2024, 6, 10, 9);
    let mut expense = unpaid(at(2024, 6, 20, 9));
    expense.mark_paid(now);
    assert!(plan_reminders(&expense, now).is_empty());
}

#[test]
fn test_reminder_body_includes_description_and_amount() {
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 20, 9));
    let plan = plan_reminders(&expense, now);
    assert_eq!(plan[0].body, "Internet - $80.00");
}

// ── Planner over the scheduler boundary ───────────────────────

#[test]
fn test_sync_cancels_before_scheduling() {
    let mut planner = NotificationPlanner::new(FakeScheduler::default());
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 20, 9));

    planner.sync_expense(&expense, now);
    planner.sync_expense(&expense, now);

    // Both ids cancelled on each sync, and no duplicates scheduled
    assert_eq!(planner.scheduler.cancelled.len(), 4);
    assert_eq!(planner.scheduler.scheduled.len(), 2);
}

#[test]
fn test_sync_all_replans_unpaid_only() {
    let db = crate::db::Database::open_in_memory().unwrap();
    let now = at(2024, 6, 10, 9);
    db.insert_expense(&unpaid(at(2024, 6, 20, 9))).unwrap();
    db.insert_expense(&unpaid(at(2024, 6, 25, 9))).unwrap();
    let mut paid = unpaid(at(2024, 6, 30, 9));
    paid.mark_paid(now);
    db.insert_expense(&paid).unwrap();

    let mut planner = NotificationPlanner::new(FakeScheduler::default());
    planner.sync_all(&db, now);
    assert_eq!(planner.scheduler.scheduled.len(), 4);
}

#[test]
fn test_cancel_expense_removes_both_ids() {
    let mut planner = NotificationPlanner::new(FakeScheduler::default());
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 20, 9));

    planner.sync_expense(&expense, now);
    planner.cancel_expense(expense.id);
    assert!(planner.scheduler.scheduled.is_empty());
}

#[test]
fn test_scheduler_failure_is_swallowed() {
    let mut planner = NotificationPlanner::new(FakeScheduler {
        fail: true,
        ..FakeScheduler::default()
    });
    let now = at(2024, 6, 10, 9);
    let expense = unpaid(at(2024, 6, 20, 9));

    // Must not panic or propagate
    planner.sync_expense(&expense, now);
    assert!(planner.scheduler.scheduled.is_empty());
}
