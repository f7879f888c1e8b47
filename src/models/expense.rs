use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Category, Entry};
use crate::error::{FinanceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Yape,
    Plin,
    Card,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Yape => "yape",
            Self::Plin => "plin",
            Self::Card => "card",
            Self::Bank => "bank",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Some(Self::Cash),
            "yape" => Some(Self::Yape),
            "plin" => Some(Self::Plin),
            "card" | "tarjeta" => Some(Self::Card),
            "bank" | "banco" => Some(Self::Bank),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Yape => "Yape",
            Self::Plin => "Plin",
            Self::Card => "Card",
            Self::Bank => "Mobile banking",
        }
    }

    pub fn all() -> &'static [PaymentMethod] {
        &[Self::Cash, Self::Yape, Self::Plin, Self::Card, Self::Bank]
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub description: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub is_fixed: bool,
    pub payment_method: PaymentMethod,
    pub created_at: String,
    /// Joined category row, filled in when listed from the store.
    pub category: Option<Category>,
}

impl Expense {
    pub fn new(description: String, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            description,
            amount,
            category_id: None,
            date,
            is_fixed: false,
            payment_method: PaymentMethod::default(),
            created_at: chrono::Utc::now().to_rfc3339(),
            category: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(FinanceError::Invalid(format!(
                "expense amount must not be negative (got {})",
                self.amount
            )));
        }
        Ok(())
    }
}

impl Entry for Expense {
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
