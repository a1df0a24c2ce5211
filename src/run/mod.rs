use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::{settings_path, Settings};
use crate::db::Database;
use crate::metrics;
use crate::models::{Expense, Goal, Income};
use crate::notify::{LogScheduler, NotificationPlanner};
use crate::report::{self, TextRenderer};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        return cli_summary(db);
    }

    match args[1].as_str() {
        "income" => cli_income(&args[2..], db),
        "expense" => cli_expense(&args[2..], db),
        "goal" => cli_goal(&args[2..], db),
        "summary" | "s" => cli_summary(db),
        "report" => cli_report(db),
        "remind" => cli_remind(db),
        "settings" => cli_settings(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("moneta {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Moneta — local-only personal finance tracker");
    println!();
    println!("Usage: moneta [command]");
    println!();
    println!("Commands:");
    println!("  (none), summary               Print the dashboard summary");
    println!("  income add <amount> <desc>    Record an income");
    println!("    --category <name>           Optional category");
    println!("    --date <YYYY-MM-DD>         Date (default: today)");
    println!("    --goal <id>                 Credit a savings goal");
    println!("  income list                   List incomes");
    println!("  income rm <id>                Delete an income");
    println!("  expense add <amount> <desc> <category> <due YYYY-MM-DD>");
    println!("  expense list                  List expenses");
    println!("  expense pay <id>              Mark an expense as paid");
    println!("  expense rm <id>               Delete an expense");
    println!("  goal add <name> <target>      Create a savings goal");
    println!("    --deadline <YYYY-MM-DD>     Optional deadline");
    println!("    --notes <text>              Optional description");
    println!("  goal list                     List goals with progress");
    println!("  goal fund <id> <amount>       Add to a goal (negative allowed)");
    println!("  goal rm <id>                  Delete a goal");
    println!("  report                        Export the financial report");
    println!("  remind                        Replan due-date reminders");
    println!("  settings [--name <n>] [--alerts on|off] [--widgets on|off]");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Income ───────────────────────────────────────────────────

fn cli_income(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => {
            let rest = &args[1..];
            if rest.len() < 2 {
                anyhow::bail!("Usage: moneta income add <amount> <description> [--category <c>] [--date <YYYY-MM-DD>] [--goal <id>]");
            }
            let amount = parse_amount(&rest[0])?;
            let date = match flag(rest, "--date") {
                Some(d) => parse_date(&d)?,
                None => now(),
            };
            let mut income = Income::new(amount, rest[1].clone(), date);
            income.category = flag(rest, "--category");
            if let Some(goal_arg) = flag(rest, "--goal") {
                let goals = db.get_goals();
                let goal = match_id(&goals, |g| g.id, &goal_arg)?;
                income.goal_id = Some(goal.id);
            }

            db.insert_income(&income)
                .context("Could not save the income")?;
            println!("Recorded income: {} ({})", income.description, format_amount(amount));
            if let Some(goal_id) = income.goal_id {
                if let Some(goal) = db.get_goal_by_id(goal_id) {
                    println!(
                        "Credited goal '{}': now {}% complete",
                        goal.name,
                        goal.percent()
                    );
                }
            }
            Ok(())
        }
        Some("list") => {
            let incomes = db.get_incomes();
            if incomes.is_empty() {
                println!("No incomes recorded");
                return Ok(());
            }
            println!("{:<9} {:<11} {:<28} {:<14} Amount", "ID", "Date", "Description", "Category");
            println!("{}", "─".repeat(75));
            for income in &incomes {
                println!(
                    "{:<9} {:<11} {:<28} {:<14} {}",
                    short_id(income.id),
                    income.date.format("%Y-%m-%d"),
                    truncate(&income.description, 27),
                    truncate(income.category.as_deref().unwrap_or("-"), 13),
                    format_amount(income.amount),
                );
            }
            Ok(())
        }
        Some("rm") => {
            let id_arg = args.get(1).context("Usage: moneta income rm <id>")?;
            let incomes = db.get_incomes();
            let id = match_id(&incomes, |i| i.id, id_arg)?.id;
            match db.get_income_by_id(id) {
                Some(income) if db.delete_income(id).context("Could not delete the income")? => {
                    println!("Deleted income: {}", income.description);
                }
                _ => println!("Income not found: {id_arg}"),
            }
            Ok(())
        }
        _ => {
            anyhow::bail!("Usage: moneta income <add|list|rm>");
        }
    }
}

// ── Expense ──────────────────────────────────────────────────

fn cli_expense(args: &[String], db: &mut Database) -> Result<()> {
    let mut planner = NotificationPlanner::new(LogScheduler);

    match args.first().map(String::as_str) {
        Some("add") => {
            let rest = &args[1..];
            if rest.len() < 4 {
                anyhow::bail!(
                    "Usage: moneta expense add <amount> <description> <category> <due YYYY-MM-DD>"
                );
            }
            let amount = parse_amount(&rest[0])?;
            let due = parse_due_date(&rest[3])?;
            let expense = Expense::new(amount, rest[1].clone(), rest[2].clone(), due);

            db.insert_expense(&expense)
                .context("Could not save the expense")?;
            planner.sync_expense(&expense, now());
            println!(
                "Recorded expense: {} ({}) due {}",
                expense.description,
                format_amount(amount),
                due.format("%Y-%m-%d")
            );
            Ok(())
        }
        Some("list") => {
            let expenses = db.get_expenses();
            if expenses.is_empty() {
                println!("No expenses recorded");
                return Ok(());
            }
            let now = now();
            println!(
                "{:<9} {:<11} {:<26} {:<13} {:<8} Amount",
                "ID", "Due", "Description", "Category", "Status"
            );
            println!("{}", "─".repeat(80));
            for expense in &expenses {
                let marker = if expense.is_overdue(now) {
                    " (overdue)"
                } else if expense.is_due_soon(now) {
                    " (due soon)"
                } else {
                    ""
                };
                println!(
                    "{:<9} {:<11} {:<26} {:<13} {:<8} {}{marker}",
                    short_id(expense.id),
                    expense.due_date.format("%Y-%m-%d"),
                    truncate(&expense.description, 25),
                    truncate(&expense.category, 12),
                    expense.status.as_str(),
                    format_amount(expense.amount),
                );
            }
            Ok(())
        }
        Some("pay") => {
            let id_arg = args.get(1).context("Usage: moneta expense pay <id>")?;
            let expenses = db.get_expenses();
            let id = match_id(&expenses, |e| e.id, id_arg)?.id;
            let Some(mut expense) = db.get_expense_by_id(id) else {
                println!("Expense not found: {id_arg}");
                return Ok(());
            };
            expense.mark_paid(now());
            if db
                .update_expense(&expense)
                .context("Could not update the expense")?
            {
                planner.sync_expense(&expense, now());
                println!("Marked as paid: {}", expense.description);
            } else {
                println!("Expense not found: {id_arg}");
            }
            Ok(())
        }
        Some("rm") => {
            let id_arg = args.get(1).context("Usage: moneta expense rm <id>")?;
            let expenses = db.get_expenses();
            let expense = match_id(&expenses, |e| e.id, id_arg)?;
            let (id, description) = (expense.id, expense.description.clone());
            if db
                .delete_expense(id)
                .context("Could not delete the expense")?
            {
                planner.cancel_expense(id);
                println!("Deleted expense: {description}");
            } else {
                println!("Expense not found: {id_arg}");
            }
            Ok(())
        }
        _ => {
            anyhow::bail!("Usage: moneta expense <add|list|pay|rm>");
        }
    }
}

// ── Goal ─────────────────────────────────────────────────────

fn cli_goal(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => {
            let rest = &args[1..];
            if rest.len() < 2 {
                anyhow::bail!("Usage: moneta goal add <name> <target> [--deadline <YYYY-MM-DD>] [--notes <text>]");
            }
            let target = parse_amount(&rest[1])?;
            let mut goal = Goal::new(rest[0].clone(), target);
            if let Some(d) = flag(rest, "--deadline") {
                goal.deadline = Some(parse_date(&d)?);
            }
            goal.description = flag(rest, "--notes");

            db.insert_goal(&goal).context("Could not save the goal")?;
            println!("Created goal: {} ({})", goal.name, format_amount(target));
            Ok(())
        }
        Some("list") => {
            let goals = db.get_goals();
            if goals.is_empty() {
                println!("No goals yet");
                return Ok(());
            }
            let today = now().date();
            for goal in &goals {
                let deadline = match goal.days_remaining(today) {
                    Some(days) if days >= 0 => format!(", {days} days left"),
                    Some(_) => ", deadline passed".to_string(),
                    None => String::new(),
                };
                println!(
                    "{}  {} — {}% ({} of {}, {} to go{})",
                    short_id(goal.id),
                    goal.name,
                    goal.percent(),
                    format_amount(goal.accumulated),
                    format_amount(goal.target),
                    format_amount(goal.remaining()),
                    deadline,
                );
            }
            Ok(())
        }
        Some("fund") => {
            if args.len() < 3 {
                anyhow::bail!("Usage: moneta goal fund <id> <amount>");
            }
            let goals = db.get_goals();
            let goal = match_id(&goals, |g| g.id, &args[1])?;
            let amount = parse_amount(&args[2])?;
            if db
                .add_goal_contribution(goal.id, amount)
                .context("Could not update the goal")?
            {
                if let Some(updated) = db.get_goal_by_id(goal.id) {
                    println!(
                        "Goal '{}': {} saved ({}%)",
                        updated.name,
                        format_amount(updated.accumulated),
                        updated.percent()
                    );
                }
            } else {
                println!("Goal not found: {}", args[1]);
            }
            Ok(())
        }
        Some("rm") => {
            let id_arg = args.get(1).context("Usage: moneta goal rm <id>")?;
            let goals = db.get_goals();
            let goal = match_id(&goals, |g| g.id, id_arg)?;
            let (id, name) = (goal.id, goal.name.clone());
            if db.delete_goal(id).context("Could not delete the goal")? {
                println!("Deleted goal: {name}");
            } else {
                println!("Goal not found: {id_arg}");
            }
            Ok(())
        }
        _ => {
            anyhow::bail!("Usage: moneta goal <add|list|fund|rm>");
        }
    }
}

// ── Dashboard, report, reminders, settings ───────────────────

fn cli_summary(db: &mut Database) -> Result<()> {
    let settings = Settings::load_from(&settings_path()?).unwrap_or_default();
    let now = now();
    let today = now.date();

    if settings.display_name.is_empty() {
        println!("Moneta — {}", today.format("%Y-%m-%d"));
    } else {
        println!("Moneta — hello, {}! {}", settings.display_name, today.format("%Y-%m-%d"));
    }
    println!("{}", "─".repeat(46));
    println!("  Balance:          {}", format_amount(metrics::balance(db)));
    println!(
        "  Income (month):   {}",
        format_amount(metrics::monthly_income_total(db, today))
    );
    println!(
        "  Expenses (month): {}",
        format_amount(metrics::monthly_expense_total(db, today))
    );

    let overdue = db
        .get_expenses()
        .iter()
        .filter(|e| e.is_overdue(now))
        .count();
    let due_soon = db
        .get_expenses()
        .iter()
        .filter(|e| e.is_due_soon(now))
        .count();
    if overdue + due_soon > 0 {
        println!("  Attention:        {overdue} overdue, {due_soon} due soon");
    }

    let shares = metrics::category_breakdown(db, today);
    if !shares.is_empty() {
        println!();
        println!("Spending by category (this month):");
        for share in &shares {
            println!("  {:<24} {:>5.1}%", share.category, share.percent);
        }
    }

    let entries = metrics::recent_entries(db, 10);
    if !entries.is_empty() {
        println!();
        println!("Recent activity:");
        for entry in &entries {
            let sign = match entry.kind {
                metrics::EntryKind::Income => "+",
                metrics::EntryKind::Expense => "-",
            };
            println!(
                "  {} {:<28} {}{}",
                entry.date.format("%Y-%m-%d"),
                truncate(&entry.description, 27),
                sign,
                format_amount(entry.amount),
            );
        }
    }

    let goals = db.get_goals();
    if !goals.is_empty() {
        println!();
        println!("Goals:");
        for goal in &goals {
            println!(
                "  {:<24} {:>3}%  ({} of {})",
                truncate(&goal.name, 23),
                goal.percent(),
                format_amount(goal.accumulated),
                format_amount(goal.target),
            );
        }
    }

    Ok(())
}

fn cli_report(db: &mut Database) -> Result<()> {
    let path = report::export_report(db, now(), &TextRenderer)
        .context("Could not export the report")?;
    println!("Report written to {}", path.display());
    Ok(())
}

fn cli_remind(db: &mut Database) -> Result<()> {
    let mut planner = NotificationPlanner::new(LogScheduler);
    let unpaid = db.get_unpaid_expenses();
    planner.sync_all(db, now());
    println!("Replanned reminders for {} unpaid expense(s)", unpaid.len());
    Ok(())
}

fn cli_settings(args: &[String]) -> Result<()> {
    let path = settings_path()?;
    let mut settings = Settings::load_from(&path)?;

    let mut changed = false;
    if let Some(name) = flag(args, "--name") {
        settings.display_name = name;
        changed = true;
    }
    if let Some(v) = flag(args, "--alerts") {
        settings.show_alerts = parse_toggle(&v)?;
        changed = true;
    }
    if let Some(v) = flag(args, "--widgets") {
        settings.sync_widgets = parse_toggle(&v)?;
        changed = true;
    }

    if changed {
        settings.save_to(&path)?;
        println!("Settings saved");
    }

    let name = if settings.display_name.is_empty() {
        "(not set)"
    } else {
        settings.display_name.as_str()
    };
    println!("  Display name: {name}");
    println!("  Alerts:       {}", if settings.show_alerts { "on" } else { "off" });
    println!("  Widget sync:  {}", if settings.sync_widgets { "on" } else { "off" });
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn flag(args: &[String], name: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].clone())
}

fn parse_amount(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).with_context(|| format!("Invalid amount: {s}"))
}

/// Parses "YYYY-MM-DD" as noon of that day.
fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {s}"))?;
    date.and_hms_opt(12, 0, 0)
        .with_context(|| format!("Invalid date: {s}"))
}

/// Due dates land at the end of the day so an expense due today does not
/// immediately count as overdue.
fn parse_due_date(s: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {s}"))?;
    date.and_hms_opt(23, 59, 0)
        .with_context(|| format!("Invalid date: {s}"))
}

fn parse_toggle(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => anyhow::bail!("Expected on|off, got: {other}"),
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Matches a full or prefix record id; ambiguous prefixes are an error.
fn match_id<'a, T>(items: &'a [T], id_of: impl Fn(&T) -> Uuid, arg: &str) -> Result<&'a T> {
    let needle = arg.to_lowercase();
    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(item).to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => anyhow::bail!("No record matches id: {arg}"),
        [one] => Ok(one),
        _ => anyhow::bail!("Ambiguous id prefix: {arg}"),
    }
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests;
