use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

pub const DEFAULT_GOAL_COLOR: &str = "#007AFF";

/// A savings target with a running accumulated amount.
#[derive(Debug, Clone)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target: Decimal,
    pub accumulated: Decimal,
    pub deadline: Option<NaiveDateTime>,
    pub description: Option<String>,
    /// Hex color for display purposes.
    pub color: String,
}

impl Goal {
    pub fn new(name: String, target: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            target,
            accumulated: Decimal::ZERO,
            deadline: None,
            description: None,
            color: DEFAULT_GOAL_COLOR.to_string(),
        }
    }

    /// Completion ratio in [0.0, 1.0]; zero when the target is not positive.
    pub fn progress(&self) -> f64 {
        if self.target <= Decimal::ZERO {
            return 0.0;
        }
        (self.accumulated / self.target)
            .to_f64()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    /// Whole percent complete, 0..=100.
    pub fn percent(&self) -> i64 {
        (self.progress() * 100.0) as i64
    }

    pub fn remaining(&self) -> Decimal {
        let rest = self.target - self.accumulated;
        if rest > Decimal::ZERO {
            rest
        } else {
            Decimal::ZERO
        }
    }

    pub fn is_complete(&self) -> bool {
        self.accumulated >= self.target
    }

    /// Calendar days until the deadline, negative when it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.deadline.map(|d| (d.date() - today).num_days())
    }
}
