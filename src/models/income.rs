use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A recorded inflow of money. When `goal_id` is set at creation time, the
/// amount is also credited to that goal's accumulated total.
#[derive(Debug, Clone)]
pub struct Income {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub category: Option<String>,
    pub date: NaiveDateTime,
    pub goal_id: Option<Uuid>,
}

impl Income {
    pub fn new(amount: Decimal, description: String, date: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            description,
            category: None,
            date,
            goal_id: None,
        }
    }
}
