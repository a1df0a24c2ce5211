//! Reminder planning for expense due dates.
//!
//! Planning is a pure function of an expense and the current instant; delivery
//! goes through the [`ReminderScheduler`] boundary (the OS notification center
//! in a desktop build). Scheduling failures are logged, never propagated.

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::db::Database;
use crate::models::{Expense, ExpenseStatus};

/// Reminder id suffixes carried over from the original app data so replanning
/// replaces previously scheduled reminders instead of duplicating them.
pub(crate) const LEAD_SUFFIX: &str = "-3dias";
pub(crate) const DUE_SUFFIX: &str = "-vencimento";

/// Days before the due date at which the early reminder fires.
const LEAD_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: NaiveDateTime,
}

/// The notification-center boundary: schedule by id, cancel by id.
pub(crate) trait ReminderScheduler {
    fn schedule(&mut self, reminder: &Reminder) -> Result<()>;
    fn cancel(&mut self, id: &str);
    fn cancel_all(&mut self);
}

/// Derives zero, one or two reminders for an expense. Only unpaid expenses get
/// reminders, and only for instants still in the future.
pub(crate) fn plan_reminders(expense: &Expense, now: NaiveDateTime) -> Vec<Reminder> {
    if expense.status != ExpenseStatus::Unpaid {
        return Vec::new();
    }

    let mut reminders = Vec::new();
    let body = format!("{} - ${:.2}", expense.description, expense.amount);

    let lead = expense.due_date - Duration::days(LEAD_DAYS);
    if lead > now {
        reminders.push(Reminder {
            id: format!("{}{LEAD_SUFFIX}", expense.id),
            title: "Expense due in 3 days".into(),
            body: body.clone(),
            fire_at: lead,
        });
    }

    if expense.due_date > now {
        reminders.push(Reminder {
            id: format!("{}{DUE_SUFFIX}", expense.id),
            title: "Expense due today!".into(),
            body,
            fire_at: expense.due_date,
        });
    }

    reminders
}

/// The two reminder ids an expense can own.
pub(crate) fn reminder_ids(expense_id: Uuid) -> [String; 2] {
    [
        format!("{expense_id}{LEAD_SUFFIX}"),
        format!("{expense_id}{DUE_SUFFIX}"),
    ]
}

pub(crate) struct NotificationPlanner<S: ReminderScheduler> {
    scheduler: S,
}

impl<S: ReminderScheduler> NotificationPlanner<S> {
    pub(crate) fn new(scheduler: S) -> Self {
        Self { scheduler }
    }

    /// Replaces whatever was scheduled for this expense with the current plan.
    /// Idempotent: the fixed ids make a re-sync cancel before it schedules.
    pub(crate) fn sync_expense(&mut self, expense: &Expense, now: NaiveDateTime) {
        self.cancel_expense(expense.id);
        for reminder in plan_reminders(expense, now) {
            if let Err(e) = self.scheduler.schedule(&reminder) {
                tracing::warn!("failed to schedule reminder {}: {e}", reminder.id);
            }
        }
    }

    pub(crate) fn cancel_expense(&mut self, expense_id: Uuid) {
        for id in reminder_ids(expense_id) {
            self.scheduler.cancel(&id);
        }
    }

    /// Replans every unpaid expense in the store.
    pub(crate) fn sync_all(&mut self, db: &Database, now: NaiveDateTime) {
        for expense in db.get_unpaid_expenses() {
            self.sync_expense(&expense, now);
        }
    }

    #[allow(dead_code)]
    pub(crate) fn cancel_all(&mut self) {
        self.scheduler.cancel_all();
    }
}

/// Stands in for the OS notification center: reminders are only logged.
pub(crate) struct LogScheduler;

impl ReminderScheduler for LogScheduler {
    fn schedule(&mut self, reminder: &Reminder) -> Result<()> {
        tracing::info!(
            "reminder {} at {}: {} ({})",
            reminder.id,
            reminder.fire_at,
            reminder.title,
            reminder.body
        );
        Ok(())
    }

    fn cancel(&mut self, id: &str) {
        tracing::debug!("cancel reminder {id}");
    }

    fn cancel_all(&mut self) {
        tracing::debug!("cancel all reminders");
    }
}

#[cfg(test)]
mod tests;
