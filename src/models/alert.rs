use rust_decimal::Decimal;

use super::Category;
use crate::error::{FinanceError, Result};

/// Reminder for a charge that recurs on the same day every month.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    /// 1-31, stored as entered even for months that are shorter.
    pub due_day: u32,
    pub category_id: Option<i64>,
    pub is_active: bool,
    pub last_notified_at: Option<String>,
    pub created_at: String,
    pub category: Option<Category>,
}

impl Alert {
    pub fn new(name: String, amount: Decimal, due_day: u32) -> Self {
        Self {
            id: None,
            name,
            amount,
            due_day,
            category_id: None,
            is_active: true,
            last_notified_at: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            category: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_due_day(self.due_day)?;
        if self.amount < Decimal::ZERO {
            return Err(FinanceError::Invalid(format!(
                "alert amount must not be negative (got {})",
                self.amount
            )));
        }
        if self.name.trim().is_empty() {
            return Err(FinanceError::Invalid("alert name is empty".into()));
        }
        Ok(())
    }
}

pub(crate) fn validate_due_day(day: u32) -> Result<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(FinanceError::Invalid(format!(
            "due day must be between 1 and 31 (got {day})"
        )))
    }
}
