#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::FinanceError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Icon ──────────────────────────────────────────────────────

#[test]
fn test_icon_parse_stored_names() {
    assert_eq!(Icon::parse("ShoppingCart"), Some(Icon::ShoppingCart));
    assert_eq!(Icon::parse("Utensils"), Some(Icon::Utensils));
    assert_eq!(Icon::parse("PiggyBank"), Some(Icon::PiggyBank));
}

#[test]
fn test_icon_parse_loose_spellings() {
    assert_eq!(Icon::parse("shopping-cart"), Some(Icon::ShoppingCart));
    assert_eq!(Icon::parse("trending_up"), Some(Icon::TrendingUp));
    assert_eq!(Icon::parse("piggy bank"), Some(Icon::PiggyBank));
    assert_eq!(Icon::parse("HOME"), Some(Icon::Home));
}

#[test]
fn test_icon_parse_short_names() {
    let names = [
        "wallet", "cart", "home", "car", "bus", "utensils", "coffee", "heart", "book", "gift",
        "phone", "wifi", "zap", "film", "briefcase", "piggy-bank", "trending-up", "shirt",
        "plane", "circle",
    ];
    let parsed: Vec<Icon> = names.iter().filter_map(|n| Icon::parse(n)).collect();
    assert_eq!(parsed, Icon::all());
    assert_eq!(Icon::parse("cart"), Some(Icon::ShoppingCart));
    assert_eq!(Icon::parse("Phone"), Some(Icon::Smartphone));
}

#[test]
fn test_icon_parse_unknown() {
    assert_eq!(Icon::parse("Spaceship"), None);
    assert_eq!(Icon::parse(""), None);
}

#[test]
fn test_icon_default_is_circle() {
    assert_eq!(Icon::default(), Icon::Circle);
}

#[test]
fn test_icon_roundtrip() {
    for icon in Icon::all() {
        assert_eq!(Icon::parse(icon.as_str()), Some(*icon), "{icon}");
    }
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_new_defaults() {
    let cat = Category::new("Food".into(), CategoryKind::Expense);
    assert!(cat.id.is_none());
    assert_eq!(cat.icon, Icon::Circle);
    assert_eq!(cat.color, DEFAULT_COLOR);
    assert!(!cat.created_at.is_empty());
    assert!(cat.validate().is_ok());
}

#[test]
fn test_category_rejects_empty_name() {
    let cat = Category::new("   ".into(), CategoryKind::Income);
    assert!(matches!(cat.validate(), Err(FinanceError::Invalid(_))));
}

#[test]
fn test_category_rejects_bad_color() {
    let mut cat = Category::new("Rent".into(), CategoryKind::Expense);
    cat.color = "red".into();
    assert!(cat.validate().is_err());
    cat.color = "#12345".into();
    assert!(cat.validate().is_err());
    cat.color = "#ABCdef".into();
    assert!(cat.validate().is_ok());
}

#[test]
fn test_category_kind_parse() {
    assert_eq!(CategoryKind::parse("income"), Some(CategoryKind::Income));
    assert_eq!(CategoryKind::parse("EXPENSE"), Some(CategoryKind::Expense));
    assert_eq!(CategoryKind::parse("gasto"), Some(CategoryKind::Expense));
    assert_eq!(CategoryKind::parse("savings"), None);
}

#[test]
fn test_category_find_helpers() {
    let mut food = Category::new("Food".into(), CategoryKind::Expense);
    food.id = Some(1);
    let mut salary = Category::new("Salary".into(), CategoryKind::Income);
    salary.id = Some(2);
    let cats = vec![food, salary];

    assert_eq!(Category::find_by_name(&cats, "food").unwrap().id, Some(1));
    assert_eq!(Category::find_by_id(&cats, 2).unwrap().name, "Salary");
    assert!(Category::find_by_id(&cats, 3).is_none());
}

// ── Income / Expense ──────────────────────────────────────────

#[test]
fn test_income_recurring_builder() {
    let income = Income::new("Salary".into(), dec!(3000), date(2026, 10, 1))
        .recurring(Frequency::Monthly);
    assert!(income.is_recurring);
    assert_eq!(income.frequency, Some(Frequency::Monthly));
    assert_eq!(income.frequency_label(), "Monthly");
}

#[test]
fn test_income_one_off_label() {
    let income = Income::new("Gift".into(), dec!(50), date(2026, 10, 1));
    assert_eq!(income.frequency_label(), "One-off");
}

#[test]
fn test_negative_amounts_rejected() {
    let income = Income::new("Oops".into(), dec!(-1), date(2026, 10, 1));
    assert!(income.validate().is_err());
    let expense = Expense::new("Oops".into(), dec!(-0.01), date(2026, 10, 1));
    assert!(expense.validate().is_err());
    let zero = Expense::new("Free".into(), Decimal::ZERO, date(2026, 10, 1));
    assert!(zero.validate().is_ok());
}

#[test]
fn test_payment_method_parse() {
    assert_eq!(PaymentMethod::parse("yape"), Some(PaymentMethod::Yape));
    assert_eq!(PaymentMethod::parse("tarjeta"), Some(PaymentMethod::Card));
    assert_eq!(PaymentMethod::parse("Bank"), Some(PaymentMethod::Bank));
    assert_eq!(PaymentMethod::parse("crypto"), None);
    for m in PaymentMethod::all() {
        assert_eq!(PaymentMethod::parse(m.as_str()), Some(*m));
    }
}

#[test]
fn test_frequency_parse() {
    assert_eq!(Frequency::parse("biweekly"), Some(Frequency::Biweekly));
    assert_eq!(Frequency::parse("quincenal"), Some(Frequency::Biweekly));
    assert_eq!(Frequency::parse("daily"), None);
}

// ── Alert ─────────────────────────────────────────────────────

#[test]
fn test_alert_due_day_bounds() {
    assert!(Alert::new("Rent".into(), dec!(900), 1).validate().is_ok());
    assert!(Alert::new("Rent".into(), dec!(900), 31).validate().is_ok());
    assert!(Alert::new("Rent".into(), dec!(900), 0).validate().is_err());
    assert!(Alert::new("Rent".into(), dec!(900), 32).validate().is_err());
}

#[test]
fn test_alert_new_is_active() {
    let alert = Alert::new("Netflix".into(), dec!(44.90), 15);
    assert!(alert.is_active);
    assert!(alert.last_notified_at.is_none());
}

// ── Collection ────────────────────────────────────────────────

#[test]
fn test_collection_names() {
    assert_eq!(Collection::Expenses.table(), "expenses");
    assert_eq!(Collection::Categories.to_string(), "category");
}
