//! Partial updates. `None` leaves a column untouched; for category
//! references `Some(None)` clears the reference.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{CategoryKind, Frequency, Icon, PaymentMethod};

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
    pub icon: Option<Icon>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IncomePatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<Option<i64>>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
    pub frequency: Option<Option<Frequency>>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category_id: Option<Option<i64>>,
    pub date: Option<NaiveDate>,
    pub is_fixed: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

impl ExpensePatch {
    pub fn fixed(is_fixed: bool) -> Self {
        Self {
            is_fixed: Some(is_fixed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub due_day: Option<u32>,
    pub category_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
    pub last_notified_at: Option<Option<String>>,
}

impl AlertPatch {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub fn notified_at(timestamp: String) -> Self {
        Self {
            last_notified_at: Some(Some(timestamp)),
            ..Self::default()
        }
    }
}
