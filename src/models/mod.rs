mod expense;
mod goal;
mod income;

pub use expense::{Expense, ExpenseStatus};
pub use goal::{Goal, DEFAULT_GOAL_COLOR};
pub use income::Income;

#[cfg(test)]
mod tests;
