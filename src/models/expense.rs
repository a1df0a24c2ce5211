use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseStatus {
    Paid,
    Unpaid,
    /// Storable for forward compatibility but never assigned by any code path;
    /// lateness is the derived `is_overdue`, not a stored state.
    Late,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::Late => "Late",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "paid" => Self::Paid,
            "late" => Self::Late,
            _ => Self::Unpaid,
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded outflow of money with a due date and a paid/unpaid status.
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub due_date: NaiveDateTime,
    pub status: ExpenseStatus,
    pub goal_id: Option<Uuid>,
    pub paid_date: Option<NaiveDateTime>,
}

impl Expense {
    pub fn new(
        amount: Decimal,
        description: String,
        category: String,
        due_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            description,
            category,
            due_date,
            status: ExpenseStatus::Unpaid,
            goal_id: None,
            paid_date: None,
        }
    }

    /// Unpaid and past its due instant.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status == ExpenseStatus::Unpaid && self.due_date < now
    }

    /// Unpaid and due within the next three calendar days (today included).
    pub fn is_due_soon(&self, now: NaiveDateTime) -> bool {
        if self.status != ExpenseStatus::Unpaid {
            return false;
        }
        let days = (self.due_date.date() - now.date()).num_days();
        (0..=3).contains(&days)
    }

    pub fn mark_paid(&mut self, now: NaiveDateTime) {
        self.status = ExpenseStatus::Paid;
        self.paid_date = Some(now);
    }
}
