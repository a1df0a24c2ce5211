pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS incomes (
    id          TEXT PRIMARY KEY,
    amount      TEXT NOT NULL,
    description TEXT NOT NULL,
    category    TEXT,
    date        TEXT NOT NULL,
    goal_id     TEXT
);

CREATE INDEX IF NOT EXISTS idx_incomes_date ON incomes(date);
CREATE INDEX IF NOT EXISTS idx_incomes_goal ON incomes(goal_id);

CREATE TABLE IF NOT EXISTS expenses (
    id          TEXT PRIMARY KEY,
    amount      TEXT NOT NULL,
    description TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT '',
    due_date    TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'Unpaid',
    goal_id     TEXT,
    paid_date   TEXT
);

CREATE INDEX IF NOT EXISTS idx_expenses_due ON expenses(due_date);
CREATE INDEX IF NOT EXISTS idx_expenses_status ON expenses(status);

CREATE TABLE IF NOT EXISTS goals (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    target      TEXT NOT NULL,
    accumulated TEXT NOT NULL DEFAULT '0',
    deadline    TEXT,
    description TEXT,
    color       TEXT NOT NULL DEFAULT '#007AFF'
);

CREATE INDEX IF NOT EXISTS idx_goals_name ON goals(name);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE expenses ADD COLUMN recurring BOOLEAN NOT NULL DEFAULT 0;"),
];
