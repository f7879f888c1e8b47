#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn income(amount: Decimal, d: NaiveDate) -> Income {
    Income::new("Salary".into(), amount, d)
}

fn expense(desc: &str, amount: Decimal, d: NaiveDate) -> Expense {
    Expense::new(desc.into(), amount, d)
}

fn category(id: i64, name: &str, kind: CategoryKind) -> Category {
    let mut c = Category::new(name.into(), kind);
    c.id = Some(id);
    c
}

fn with_category(mut e: Expense, cat: &Category) -> Expense {
    e.category_id = cat.id;
    e.category = Some(cat.clone());
    e
}

// ── MonthRange ────────────────────────────────────────────────

#[test]
fn test_month_range_real_lengths() {
    let feb = MonthRange::new(2026, 2).unwrap();
    assert_eq!(feb.start, date(2026, 2, 1));
    assert_eq!(feb.end, date(2026, 2, 28));

    let leap = MonthRange::new(2024, 2).unwrap();
    assert_eq!(leap.end, date(2024, 2, 29));

    let dec = MonthRange::new(2026, 12).unwrap();
    assert_eq!(dec.end, date(2026, 12, 31));
}

#[test]
fn test_month_range_invalid() {
    assert!(MonthRange::new(2026, 0).is_none());
    assert!(MonthRange::new(2026, 13).is_none());
}

#[test]
fn test_month_range_contains_inclusive() {
    let oct = MonthRange::containing(date(2026, 10, 16));
    assert!(oct.contains(date(2026, 10, 1)));
    assert!(oct.contains(date(2026, 10, 31)));
    assert!(!oct.contains(date(2026, 9, 30)));
    assert!(!oct.contains(date(2026, 11, 1)));
}

#[test]
fn test_month_range_navigation() {
    let jan = MonthRange::new(2026, 1).unwrap();
    assert_eq!(jan.previous(), MonthRange::new(2025, 12).unwrap());
    assert_eq!(jan.next(), MonthRange::new(2026, 2).unwrap());
    assert_eq!(MonthRange::new(2026, 12).unwrap().next().key(), "2027-01");
}

#[test]
fn test_month_range_at_calendar_limits() {
    let last = MonthRange::parse("262142-12").unwrap();
    assert_eq!(last.start, date(262142, 12, 1));
    assert_eq!(last.end, NaiveDate::MAX);
    assert_eq!(last.next(), last);
    assert_eq!(last.previous(), MonthRange::new(262142, 11).unwrap());

    let first = MonthRange::containing(NaiveDate::MIN);
    assert_eq!(first.start, NaiveDate::MIN);
    assert_eq!(first.previous(), first);
    assert!(MonthRange::parse("262143-01").is_none());
}

#[test]
fn test_month_range_parse_and_format() {
    let m = MonthRange::parse("2026-03").unwrap();
    assert_eq!(m.key(), "2026-03");
    assert_eq!(m.title(), "March 2026");
    assert_eq!(m.to_string(), "2026-03");
    assert!(MonthRange::parse("2026-13").is_none());
    assert!(MonthRange::parse("March").is_none());
}

// ── Totals and savings ────────────────────────────────────────

#[test]
fn test_monthly_total_empty_is_zero() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let none: Vec<Expense> = Vec::new();
    assert_eq!(monthly_total(&none, &oct), Decimal::ZERO);
}

#[test]
fn test_monthly_total_only_counts_month() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let expenses = vec![
        expense("a", dec!(10.50), date(2026, 10, 1)),
        expense("b", dec!(4.50), date(2026, 10, 31)),
        expense("c", dec!(100), date(2026, 11, 1)),
    ];
    assert_eq!(monthly_total(&expenses, &oct), dec!(15.00));
    assert_eq!(in_month(&expenses, &oct).len(), 2);
}

#[test]
fn test_savings_rate_zero_income() {
    assert_eq!(savings_rate(Decimal::ZERO, dec!(500)), Decimal::ZERO);
    assert_eq!(spent_percentage(Decimal::ZERO, dec!(500)), Decimal::ZERO);
}

#[test]
fn test_classification_bands() {
    assert_eq!(SavingsHealth::classify(dec!(35)), SavingsHealth::Healthy);
    assert_eq!(SavingsHealth::classify(dec!(20)), SavingsHealth::Healthy);
    assert_eq!(SavingsHealth::classify(dec!(19.9)), SavingsHealth::Acceptable);
    assert_eq!(SavingsHealth::classify(dec!(10)), SavingsHealth::Acceptable);
    assert_eq!(SavingsHealth::classify(dec!(9.9)), SavingsHealth::NeedsAttention);
    assert_eq!(SavingsHealth::classify(dec!(0.1)), SavingsHealth::NeedsAttention);
    assert_eq!(SavingsHealth::classify(dec!(0)), SavingsHealth::Critical);
    assert_eq!(SavingsHealth::classify(dec!(-40)), SavingsHealth::Critical);
}

#[test]
fn test_report_healthy_month() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let incomes = vec![income(dec!(3000), date(2026, 10, 1))];
    let expenses = vec![
        expense("rent", dec!(1500), date(2026, 10, 2)),
        expense("food", dec!(900), date(2026, 10, 15)),
    ];
    let report = MonthlyReport::build(&incomes, &expenses, oct);
    assert_eq!(report.balance, dec!(600));
    assert_eq!(report.savings_rate, dec!(20.0));
    assert_eq!(report.spent_pct, dec!(80.0));
    assert_eq!(report.health, SavingsHealth::Healthy);
}

#[test]
fn test_report_overspent_month() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let incomes = vec![income(dec!(3000), date(2026, 10, 1))];
    let expenses = vec![expense("everything", dec!(3500), date(2026, 10, 2))];
    let report = MonthlyReport::build(&incomes, &expenses, oct);
    assert_eq!(report.balance, dec!(-500));
    assert_eq!(report.savings_rate, dec!(-16.7));
    assert_eq!(report.health, SavingsHealth::Critical);
    assert!(report.advice().contains("exceed"));
}

#[test]
fn test_report_classifies_rounded_rate() {
    // 19.96% rounds up to 20.0 and is shown and classified as healthy.
    let oct = MonthRange::new(2026, 10).unwrap();
    let incomes = vec![income(dec!(10000), date(2026, 10, 1))];
    let expenses = vec![expense("x", dec!(8004), date(2026, 10, 2))];
    let report = MonthlyReport::build(&incomes, &expenses, oct);
    assert_eq!(report.savings_rate, dec!(20.0));
    assert_eq!(report.health, SavingsHealth::Healthy);
}

// ── Breakdown ─────────────────────────────────────────────────

#[test]
fn test_breakdown_groups_and_sorts() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let food = category(1, "Food", CategoryKind::Expense);
    let home = category(2, "Home", CategoryKind::Expense);
    let expenses = vec![
        with_category(expense("lunch", dec!(20), date(2026, 10, 3)), &food),
        with_category(expense("rent", dec!(800), date(2026, 10, 1)), &home),
        expense("misc", dec!(50), date(2026, 10, 9)),
        with_category(expense("dinner", dec!(35), date(2026, 10, 4)), &food),
        with_category(expense("old", dec!(999), date(2026, 9, 4)), &food),
    ];

    let groups = breakdown_by_category(&expenses, &oct);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Food", UNCATEGORIZED]);
    assert_eq!(groups[1].total, dec!(55));
    assert_eq!(groups[1].count, 2);
    assert_eq!(groups[2].category_id, None);

    let sum: Decimal = groups.iter().map(|g| g.total).sum();
    assert_eq!(sum, monthly_total(&expenses, &oct));
}

#[test]
fn test_breakdown_empty() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let none: Vec<Income> = Vec::new();
    assert!(breakdown_by_category(&none, &oct).is_empty());
}

// ── Fixed vs variable ─────────────────────────────────────────

#[test]
fn test_fixed_variable_split() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let mut rent = expense("rent", dec!(750), date(2026, 10, 1));
    rent.is_fixed = true;
    let food = expense("food", dec!(250), date(2026, 10, 5));
    let split = fixed_variable_split(&[rent, food], &oct);
    assert_eq!(split.fixed, dec!(750));
    assert_eq!(split.variable, dec!(250));
    assert_eq!(split.fixed_pct, dec!(75));
    assert_eq!(split.variable_pct, dec!(25));
}

#[test]
fn test_fixed_variable_split_empty_month() {
    let oct = MonthRange::new(2026, 10).unwrap();
    let split = fixed_variable_split(&[], &oct);
    assert_eq!(split.fixed_pct, Decimal::ZERO);
    assert_eq!(split.variable_pct, Decimal::ZERO);
}

// ── Quick entry ───────────────────────────────────────────────

#[test]
fn test_quick_entry_ranking() {
    let today = date(2026, 10, 16);
    let food = category(1, "Food", CategoryKind::Expense);
    let taxi = category(2, "Taxi", CategoryKind::Expense);
    let salary = category(3, "Salary", CategoryKind::Income);
    let categories = vec![food.clone(), taxi.clone(), salary.clone()];

    let mut paycheck = expense("misfiled", dec!(1), date(2026, 10, 10));
    paycheck.category_id = salary.id;
    let expenses = vec![
        with_category(expense("taxi", dec!(12), date(2026, 10, 15)), &taxi),
        with_category(expense("lunch", dec!(18), date(2026, 10, 14)), &food),
        with_category(expense("lunch", dec!(16), date(2026, 10, 2)), &food),
        with_category(expense("taxi", dec!(9), date(2026, 9, 16)), &taxi),
        with_category(expense("taxi", dec!(30), date(2026, 9, 15)), &taxi),
        paycheck,
    ];

    let picks = quick_entry_ranking(&categories, &expenses, today);
    let names: Vec<&str> = picks.iter().map(|p| p.category.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Taxi"]);
    assert_eq!(picks[0].count, 2);
    // Last by position in the collection, not by date.
    assert_eq!(picks[0].last_amount, Some(dec!(16)));
    // 2026-09-16 is exactly 30 days back and still counts.
    assert_eq!(picks[1].count, 2);
    assert_eq!(picks[1].last_amount, Some(dec!(9)));
}

#[test]
fn test_quick_entry_ranking_caps_at_six() {
    let today = date(2026, 10, 16);
    let categories: Vec<Category> = (1..=8)
        .map(|i| category(i, &format!("c{i}"), CategoryKind::Expense))
        .collect();
    let mut expenses = Vec::new();
    for cat in &categories {
        let uses = cat.id.unwrap() as usize;
        for _ in 0..uses {
            expenses.push(with_category(expense("x", dec!(1), today), cat));
        }
    }
    let picks = quick_entry_ranking(&categories, &expenses, today);
    assert_eq!(picks.len(), QUICK_PICKS);
    assert_eq!(picks[0].category.name, "c8");
    assert_eq!(picks[5].category.name, "c3");
}

// ── Recent movements ──────────────────────────────────────────

#[test]
fn test_recent_movements_merged_newest_first() {
    let incomes = vec![income(dec!(100), date(2026, 10, 5))];
    let mut rent = expense("rent", dec!(40), date(2026, 10, 7));
    rent.is_fixed = true;
    let expenses = vec![rent, expense("snack", dec!(3), date(2026, 10, 1))];

    let recent = recent_movements(&incomes, &expenses, 10, false);
    let descs: Vec<&str> = recent.iter().map(|m| m.description()).collect();
    assert_eq!(descs, vec!["rent", "Salary", "snack"]);
    assert_eq!(recent[0].signed_amount(), dec!(-40));
    assert!(recent[1].is_income());

    assert_eq!(recent_movements(&incomes, &expenses, 2, false).len(), 2);

    let fixed = recent_movements(&incomes, &expenses, 10, true);
    assert_eq!(fixed.len(), 1);
    assert_eq!(fixed[0].description(), "rent");
}
