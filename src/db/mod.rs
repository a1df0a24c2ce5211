mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;

/// Storage format for all timestamps; zero-padded so lexicographic order
/// matches chronological order.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A write to the local store failed (disk or permission trouble). Read
/// failures never surface as this; they degrade to empty results.
#[derive(Debug, Error)]
#[error("failed to write to the local store: {0}")]
pub struct PersistenceError(#[from] rusqlite::Error);

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Incomes ───────────────────────────────────────────────

    /// Inserts an income. When the income references a goal, the row insert
    /// and the goal credit commit as one transaction.
    pub(crate) fn insert_income(&mut self, income: &Income) -> Result<(), PersistenceError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO incomes (id, amount, description, category, date, goal_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                income.id.to_string(),
                income.amount.to_string(),
                income.description,
                income.category,
                fmt_dt(income.date),
                income.goal_id.map(|g| g.to_string()),
            ],
        )?;
        if let Some(goal_id) = income.goal_id {
            credit_goal(&tx, goal_id, income.amount)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// All incomes, newest first. Degrades to empty on a read failure.
    pub(crate) fn get_incomes(&self) -> Vec<Income> {
        self.try_get_incomes().unwrap_or_else(|e| {
            tracing::warn!("income query failed, returning empty: {e}");
            Vec::new()
        })
    }

    fn try_get_incomes(&self) -> rusqlite::Result<Vec<Income>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, description, category, date, goal_id
             FROM incomes ORDER BY date DESC",
        )?;
        let rows = stmt.query_map([], income_from_row)?;
        rows.collect()
    }

    /// Incomes whose date falls within [start, end], unsorted.
    pub(crate) fn get_incomes_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<Income> {
        let result = (|| -> rusqlite::Result<Vec<Income>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, amount, description, category, date, goal_id
                 FROM incomes WHERE date >= ?1 AND date <= ?2",
            )?;
            let rows = stmt.query_map(params![fmt_dt(start), fmt_dt(end)], income_from_row)?;
            rows.collect()
        })();
        result.unwrap_or_else(|e| {
            tracing::warn!("income range query failed, returning empty: {e}");
            Vec::new()
        })
    }

    pub(crate) fn get_income_by_id(&self, id: Uuid) -> Option<Income> {
        let result = self.conn.query_row(
            "SELECT id, amount, description, category, date, goal_id
             FROM incomes WHERE id = ?1",
            params![id.to_string()],
            income_from_row,
        );
        match result {
            Ok(i) => Some(i),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                tracing::warn!("income lookup failed: {e}");
                None
            }
        }
    }

    /// Overwrites all mutable fields of the income with the given id.
    /// Returns false when no such income exists. Does not re-credit any goal.
    pub(crate) fn update_income(&self, income: &Income) -> Result<bool, PersistenceError> {
        let n = self.conn.execute(
            "UPDATE incomes SET amount = ?2, description = ?3, category = ?4,
                    date = ?5, goal_id = ?6
             WHERE id = ?1",
            params![
                income.id.to_string(),
                income.amount.to_string(),
                income.description,
                income.category,
                fmt_dt(income.date),
                income.goal_id.map(|g| g.to_string()),
            ],
        )?;
        Ok(n > 0)
    }

    /// Returns false when no such income exists. The credit an income may have
    /// made to a goal is not reversed.
    pub(crate) fn delete_income(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let n = self
            .conn
            .execute("DELETE FROM incomes WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT INTO expenses (id, amount, description, category, due_date, status, goal_id, paid_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                expense.id.to_string(),
                expense.amount.to_string(),
                expense.description,
                expense.category,
                fmt_dt(expense.due_date),
                expense.status.as_str(),
                expense.goal_id.map(|g| g.to_string()),
                expense.paid_date.map(fmt_dt),
            ],
        )?;
        Ok(())
    }

    /// All expenses, latest due date first. Degrades to empty on a read failure.
    pub(crate) fn get_expenses(&self) -> Vec<Expense> {
        self.try_get_expenses("ORDER BY due_date DESC").unwrap_or_else(|e| {
            tracing::warn!("expense query failed, returning empty: {e}");
            Vec::new()
        })
    }

    /// Unpaid expenses, earliest due date first.
    pub(crate) fn get_unpaid_expenses(&self) -> Vec<Expense> {
        let result = (|| -> rusqlite::Result<Vec<Expense>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, amount, description, category, due_date, status, goal_id, paid_date
                 FROM expenses WHERE status = ?1 ORDER BY due_date ASC",
            )?;
            let rows = stmt.query_map(params![ExpenseStatus::Unpaid.as_str()], expense_from_row)?;
            rows.collect()
        })();
        result.unwrap_or_else(|e| {
            tracing::warn!("unpaid expense query failed, returning empty: {e}");
            Vec::new()
        })
    }

    /// Expenses whose due date falls within [start, end], unsorted.
    pub(crate) fn get_expenses_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<Expense> {
        let result = (|| -> rusqlite::Result<Vec<Expense>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, amount, description, category, due_date, status, goal_id, paid_date
                 FROM expenses WHERE due_date >= ?1 AND due_date <= ?2",
            )?;
            let rows = stmt.query_map(params![fmt_dt(start), fmt_dt(end)], expense_from_row)?;
            rows.collect()
        })();
        result.unwrap_or_else(|e| {
            tracing::warn!("expense range query failed, returning empty: {e}");
            Vec::new()
        })
    }

    fn try_get_expenses(&self, order: &str) -> rusqlite::Result<Vec<Expense>> {
        let sql = format!(
            "SELECT id, amount, description, category, due_date, status, goal_id, paid_date
             FROM expenses {order}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], expense_from_row)?;
        rows.collect()
    }

    pub(crate) fn get_expense_by_id(&self, id: Uuid) -> Option<Expense> {
        let result = self.conn.query_row(
            "SELECT id, amount, description, category, due_date, status, goal_id, paid_date
             FROM expenses WHERE id = ?1",
            params![id.to_string()],
            expense_from_row,
        );
        match result {
            Ok(e) => Some(e),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                tracing::warn!("expense lookup failed: {e}");
                None
            }
        }
    }

    /// Overwrites all mutable fields of the expense with the given id.
    /// Returns false when no such expense exists.
    pub(crate) fn update_expense(&self, expense: &Expense) -> Result<bool, PersistenceError> {
        let n = self.conn.execute(
            "UPDATE expenses SET amount = ?2, description = ?3, category = ?4,
                    due_date = ?5, status = ?6, goal_id = ?7, paid_date = ?8
             WHERE id = ?1",
            params![
                expense.id.to_string(),
                expense.amount.to_string(),
                expense.description,
                expense.category,
                fmt_dt(expense.due_date),
                expense.status.as_str(),
                expense.goal_id.map(|g| g.to_string()),
                expense.paid_date.map(fmt_dt),
            ],
        )?;
        Ok(n > 0)
    }

    /// Returns false when no such expense exists.
    pub(crate) fn delete_expense(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let n = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }

    // ── Goals ─────────────────────────────────────────────────

    pub(crate) fn insert_goal(&self, goal: &Goal) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT INTO goals (id, name, target, accumulated, deadline, description, color)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.id.to_string(),
                goal.name,
                goal.target.to_string(),
                goal.accumulated.to_string(),
                goal.deadline.map(fmt_dt),
                goal.description,
                goal.color,
            ],
        )?;
        Ok(())
    }

    /// All goals, sorted by name. Degrades to empty on a read failure.
    pub(crate) fn get_goals(&self) -> Vec<Goal> {
        let result = (|| -> rusqlite::Result<Vec<Goal>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, name, target, accumulated, deadline, description, color
                 FROM goals ORDER BY name ASC",
            )?;
            let rows = stmt.query_map([], goal_from_row)?;
            rows.collect()
        })();
        result.unwrap_or_else(|e| {
            tracing::warn!("goal query failed, returning empty: {e}");
            Vec::new()
        })
    }

    pub(crate) fn get_goal_by_id(&self, id: Uuid) -> Option<Goal> {
        let result = self.conn.query_row(
            "SELECT id, name, target, accumulated, deadline, description, color
             FROM goals WHERE id = ?1",
            params![id.to_string()],
            goal_from_row,
        );
        match result {
            Ok(g) => Some(g),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                tracing::warn!("goal lookup failed: {e}");
                None
            }
        }
    }

    /// Overwrites all mutable fields of the goal with the given id, including
    /// `accumulated` (the only path that can lower it). Returns false when no
    /// such goal exists.
    pub(crate) fn update_goal(&self, goal: &Goal) -> Result<bool, PersistenceError> {
        let n = self.conn.execute(
            "UPDATE goals SET name = ?2, target = ?3, accumulated = ?4,
                    deadline = ?5, description = ?6, color = ?7
             WHERE id = ?1",
            params![
                goal.id.to_string(),
                goal.name,
                goal.target.to_string(),
                goal.accumulated.to_string(),
                goal.deadline.map(fmt_dt),
                goal.description,
                goal.color,
            ],
        )?;
        Ok(n > 0)
    }

    /// Returns false when no such goal exists.
    pub(crate) fn delete_goal(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let n = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }

    /// Adds `amount` (signed, unguarded) to the goal's accumulated total.
    /// Returns false when no such goal exists.
    pub(crate) fn add_goal_contribution(
        &self,
        id: Uuid,
        amount: Decimal,
    ) -> Result<bool, PersistenceError> {
        Ok(credit_goal(&self.conn, id, amount)?)
    }
}

/// Reads the goal's current accumulated total, adds `amount` and writes the
/// result back. Returns false when the goal does not exist.
fn credit_goal(conn: &Connection, id: Uuid, amount: Decimal) -> rusqlite::Result<bool> {
    let current: Option<String> = match conn.query_row(
        "SELECT accumulated FROM goals WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    ) {
        Ok(v) => Some(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(e),
    };

    let Some(current) = current else {
        return Ok(false);
    };

    let updated = Decimal::from_str(&current).unwrap_or_default() + amount;
    conn.execute(
        "UPDATE goals SET accumulated = ?2 WHERE id = ?1",
        params![id.to_string(), updated.to_string()],
    )?;
    Ok(true)
}

// ── Row mapping ───────────────────────────────────────────────

pub(crate) fn fmt_dt(dt: NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATE_FORMAT).unwrap_or_default()
}

fn parse_id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or_default()
}

fn income_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Income> {
    let amount: String = row.get(1)?;
    let date: String = row.get(4)?;
    let goal_id: Option<String> = row.get(5)?;
    Ok(Income {
        id: parse_id(&row.get::<_, String>(0)?),
        amount: Decimal::from_str(&amount).unwrap_or_default(),
        description: row.get(2)?,
        category: row.get(3)?,
        date: parse_dt(&date),
        goal_id: goal_id.map(|g| parse_id(&g)),
    })
}

fn expense_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let amount: String = row.get(1)?;
    let due_date: String = row.get(4)?;
    let status: String = row.get(5)?;
    let goal_id: Option<String> = row.get(6)?;
    let paid_date: Option<String> = row.get(7)?;
    Ok(Expense {
        id: parse_id(&row.get::<_, String>(0)?),
        amount: Decimal::from_str(&amount).unwrap_or_default(),
        description: row.get(2)?,
        category: row.get(3)?,
        due_date: parse_dt(&due_date),
        status: ExpenseStatus::parse(&status),
        goal_id: goal_id.map(|g| parse_id(&g)),
        paid_date: paid_date.map(|p| parse_dt(&p)),
    })
}

fn goal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
    let target: String = row.get(2)?;
    let accumulated: String = row.get(3)?;
    let deadline: Option<String> = row.get(4)?;
    Ok(Goal {
        id: parse_id(&row.get::<_, String>(0)?),
        name: row.get(1)?,
        target: Decimal::from_str(&target).unwrap_or_default(),
        accumulated: Decimal::from_str(&accumulated).unwrap_or_default(),
        deadline: deadline.map(|d| parse_dt(&d)),
        description: row.get(5)?,
        color: row.get(6)?,
    })
}
