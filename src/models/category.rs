use std::sync::LazyLock;

use regex::Regex;

use super::Icon;
use crate::error::{FinanceError, Result};

pub const DEFAULT_COLOR: &str = "#6b7280";

static COLOR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new("^#[0-9a-fA-F]{6}$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Some(Self::Income),
            "expense" | "gasto" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `true` for `#rrggbb` hex colors.
pub fn is_valid_color(color: &str) -> bool {
    COLOR_RE.as_ref().is_some_and(|re| re.is_match(color))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub kind: CategoryKind,
    pub icon: Icon,
    pub color: String,
    pub created_at: String,
}

impl Category {
    pub fn new(name: String, kind: CategoryKind) -> Self {
        Self {
            id: None,
            name,
            kind,
            icon: Icon::default(),
            color: DEFAULT_COLOR.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::Invalid("category name is empty".into()));
        }
        if !is_valid_color(&self.color) {
            return Err(FinanceError::Invalid(format!(
                "invalid color '{}', expected #rrggbb",
                self.color
            )));
        }
        Ok(())
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
