mod alert;
mod category;
mod expense;
mod icon;
mod income;
mod patch;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub use alert::Alert;
pub(crate) use alert::validate_due_day;
pub use category::{is_valid_color, Category, CategoryKind, DEFAULT_COLOR};
pub use expense::{Expense, PaymentMethod};
pub use icon::Icon;
pub use income::{Frequency, Income};
pub use patch::{AlertPatch, CategoryPatch, ExpensePatch, IncomePatch};

/// The four record collections owned by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Categories,
    Incomes,
    Expenses,
    Alerts,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Incomes => "incomes",
            Self::Expenses => "expenses",
            Self::Alerts => "alerts",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Categories => "category",
            Self::Incomes => "income",
            Self::Expenses => "expense",
            Self::Alerts => "alert",
        };
        write!(f, "{name}")
    }
}

/// A dated money movement: the common shape of incomes and expenses.
pub trait Entry {
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
    fn description(&self) -> &str;
    fn category_id(&self) -> Option<i64>;
    fn category(&self) -> Option<&Category>;
}

#[cfg(test)]
mod tests;
