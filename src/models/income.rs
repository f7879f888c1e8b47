use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Category, Entry};
use crate::error::{FinanceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "semanal" => Some(Self::Weekly),
            "biweekly" | "quincenal" => Some(Self::Biweekly),
            "monthly" | "mensual" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Biweekly => "Biweekly",
            Self::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: Option<i64>,
    pub description: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub created_at: String,
    /// Joined category row, filled in when listed from the store.
    pub category: Option<Category>,
}

impl Income {
    pub fn new(description: String, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            description,
            amount,
            category_id: None,
            date,
            is_recurring: false,
            frequency: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            category: None,
        }
    }

    /// Marks the income as recurring with the given cadence.
    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurring = true;
        self.frequency = Some(frequency);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(FinanceError::Invalid(format!(
                "income amount must not be negative (got {})",
                self.amount
            )));
        }
        Ok(())
    }

    /// "Weekly", "Biweekly", "Monthly", or "One-off" for non-recurring income.
    pub fn frequency_label(&self) -> &'static str {
        self.frequency.map(|f| f.label()).unwrap_or("One-off")
    }
}

impl Entry for Income {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }
}
