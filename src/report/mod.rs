//! Financial report assembly and export.
//!
//! [`build_report`] gathers the data; rendering goes through the
//! [`ReportRenderer`] boundary so the document backend (PDF in the original
//! desktop app) stays out of the core. The bundled [`TextRenderer`] emits a
//! fixed-width plain-text layout with the same sections.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

use crate::db::Database;
use crate::metrics;
use crate::models::{Expense, Goal, Income};

/// How many line items each of the income/expense sections shows.
const MAX_ITEMS: usize = 10;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render the report: {0}")]
    Render(String),
    #[error("failed to write the report file: {0}")]
    Io(#[from] std::io::Error),
}

/// Snapshot of everything the exported report shows.
#[derive(Debug, Clone)]
pub struct Report {
    pub generated_at: NaiveDateTime,
    pub balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    /// Current-month incomes, newest first, at most [`MAX_ITEMS`].
    pub incomes: Vec<Income>,
    /// Current-month expenses, latest due first, at most [`MAX_ITEMS`].
    pub expenses: Vec<Expense>,
    pub goals: Vec<Goal>,
}

pub(crate) fn build_report(db: &Database, now: NaiveDateTime) -> Report {
    let today = now.date();

    let mut incomes = metrics::incomes_for_month(db, today);
    incomes.sort_by(|a, b| b.date.cmp(&a.date));
    incomes.truncate(MAX_ITEMS);

    let mut expenses = metrics::expenses_for_month(db, today);
    expenses.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    expenses.truncate(MAX_ITEMS);

    Report {
        generated_at: now,
        balance: metrics::balance(db),
        monthly_income: metrics::monthly_income_total(db, today),
        monthly_expenses: metrics::monthly_expense_total(db, today),
        incomes,
        expenses,
        goals: db.get_goals(),
    }
}

/// The paginated-document boundary.
pub(crate) trait ReportRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, ReportError>;
    /// File extension for documents this renderer produces.
    fn extension(&self) -> &'static str;
}

pub(crate) struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        use std::fmt::Write;

        let mut out = String::new();
        let rule = "─".repeat(60);

        let mut w = |line: String| {
            // String formatting cannot fail; keep the writeln! error path anyway
            // so a future writer swap keeps the Render cause.
            writeln!(out, "{line}").map_err(|e| ReportError::Render(e.to_string()))
        };

        w("FINANCIAL REPORT".into())?;
        w(format!(
            "Moneta - generated {}",
            report.generated_at.format("%Y-%m-%d %H:%M")
        ))?;
        w(rule.clone())?;
        w(String::new())?;

        w("SUMMARY".into())?;
        w(format!("  Balance:          ${:.2}", report.balance))?;
        w(format!("  Monthly income:   ${:.2}", report.monthly_income))?;
        w(format!("  Monthly expenses: ${:.2}", report.monthly_expenses))?;
        w(String::new())?;

        w("INCOME THIS MONTH".into())?;
        if report.incomes.is_empty() {
            w("  (no income recorded)".into())?;
        } else {
            for income in &report.incomes {
                w(format!(
                    "  • {:<30} ${:>10.2}  {}",
                    income.description,
                    income.amount,
                    income.date.format("%Y-%m-%d")
                ))?;
            }
        }
        w(String::new())?;

        w("EXPENSES THIS MONTH".into())?;
        if report.expenses.is_empty() {
            w("  (no expenses recorded)".into())?;
        } else {
            for expense in &report.expenses {
                w(format!(
                    "  • {:<30} ${:>10.2}  [{}]",
                    expense.description,
                    expense.amount,
                    expense.status.as_str().to_uppercase()
                ))?;
            }
        }
        w(String::new())?;

        w("SAVINGS GOALS".into())?;
        if report.goals.is_empty() {
            w("  (no goals yet)".into())?;
        } else {
            for goal in &report.goals {
                w(format!("  • {}", goal.name))?;
                w(format!(
                    "    target ${:.2} | saved ${:.2} | {}% complete",
                    goal.target,
                    goal.accumulated,
                    goal.percent()
                ))?;
            }
        }
        w(String::new())?;

        w(rule)?;
        w("Moneta - your personal finance assistant".into())?;

        Ok(out.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// Renders the report and writes it under `dir`; the file name carries a
/// timestamp so repeated exports never clobber each other.
pub(crate) fn export_report_to<R: ReportRenderer>(
    db: &Database,
    now: NaiveDateTime,
    renderer: &R,
    dir: &std::path::Path,
) -> Result<PathBuf, ReportError> {
    let report = build_report(db, now);
    let bytes = renderer.render(&report)?;
    let path = dir.join(format!(
        "moneta-report-{}.{}",
        now.format("%Y%m%d%H%M%S"),
        renderer.extension()
    ));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Exports to the OS temporary directory and returns the file path for the
/// caller to reveal or open.
pub(crate) fn export_report<R: ReportRenderer>(
    db: &Database,
    now: NaiveDateTime,
    renderer: &R,
) -> Result<PathBuf, ReportError> {
    export_report_to(db, now, renderer, &std::env::temp_dir())
}
