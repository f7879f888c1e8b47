//! Monthly aggregation over incomes and expenses.
//!
//! Everything here is pure: functions borrow the collections and return
//! fresh values, nothing is cached between calls.

use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Category, CategoryKind, Entry, Expense, Income};

pub(crate) const UNCATEGORIZED: &str = "Uncategorized";
/// Trailing window of the quick-entry ranking, in days.
pub(crate) const QUICK_WINDOW_DAYS: u64 = 30;
pub(crate) const QUICK_PICKS: usize = 6;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// First through last calendar day of one month, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthRange {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl MonthRange {
    /// `month` is 1-based. Returns `None` for an invalid year/month pair.
    pub(crate) fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::containing)
    }

    pub(crate) fn containing(date: NaiveDate) -> Self {
        let start = date
            .checked_sub_days(Days::new(u64::from(date.day0())))
            .unwrap_or(date);
        // December of the last representable year ends at `NaiveDate::MAX`.
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Parses `YYYY-MM`.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Stays put at the first representable month.
    pub(crate) fn previous(&self) -> Self {
        self.start.pred_opt().map_or(*self, Self::containing)
    }

    /// Stays put at the last representable month.
    pub(crate) fn next(&self) -> Self {
        self.end.succ_opt().map_or(*self, Self::containing)
    }

    /// `YYYY-MM`
    pub(crate) fn key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    /// e.g. `October 2026`
    pub(crate) fn title(&self) -> String {
        let name = MONTH_NAMES[self.start.month0() as usize];
        format!("{name} {}", self.start.year())
    }
}

impl std::fmt::Display for MonthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Entries dated within `month`, in collection order.
pub(crate) fn in_month<'a, E: Entry>(entries: &'a [E], month: &MonthRange) -> Vec<&'a E> {
    entries.iter().filter(|e| month.contains(e.date())).collect()
}

pub(crate) fn monthly_total<E: Entry>(entries: &[E], month: &MonthRange) -> Decimal {
    entries
        .iter()
        .filter(|e| month.contains(e.date()))
        .map(|e| e.amount())
        .sum()
}

pub(crate) fn balance(income: Decimal, expense: Decimal) -> Decimal {
    income - expense
}

/// Share of income left over, in percent. Zero when there is no income.
pub(crate) fn savings_rate(income: Decimal, expense: Decimal) -> Decimal {
    if income > Decimal::ZERO {
        balance(income, expense) / income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Share of income spent, in percent. Zero when there is no income.
pub(crate) fn spent_percentage(income: Decimal, expense: Decimal) -> Decimal {
    percentage_of(expense, income)
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// One decimal place, halves away from zero.
pub(crate) fn round_pct(pct: Decimal) -> Decimal {
    pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SavingsHealth {
    Healthy,
    Acceptable,
    NeedsAttention,
    Critical,
}

impl SavingsHealth {
    pub(crate) fn classify(rate: Decimal) -> Self {
        if rate >= Decimal::from(20) {
            Self::Healthy
        } else if rate >= Decimal::TEN {
            Self::Acceptable
        } else if rate > Decimal::ZERO {
            Self::NeedsAttention
        } else {
            Self::Critical
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Acceptable => "Acceptable",
            Self::NeedsAttention => "Needs attention",
            Self::Critical => "Critical",
        }
    }

    pub(crate) fn advice(&self, rate: Decimal) -> String {
        match self {
            Self::Healthy => "You are saving more than 20% of your income. Keep it up and \
                consider investing your savings."
                .into(),
            Self::Acceptable => format!(
                "You are saving {rate}% of your income. Cut unnecessary expenses to \
                 save more."
            ),
            Self::NeedsAttention => format!(
                "You are only saving {rate}% of your income. Review your expenses and \
                 set a stricter budget."
            ),
            Self::Critical => "Your expenses meet or exceed your income. Reduce expenses \
                or look for additional income."
                .into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub(crate) category_id: Option<i64>,
    pub(crate) name: String,
    pub(crate) total: Decimal,
    pub(crate) count: usize,
}

/// Totals per category for the entries of `month`, largest first. Entries
/// without a category are grouped under [`UNCATEGORIZED`].
pub(crate) fn breakdown_by_category<E: Entry>(
    entries: &[E],
    month: &MonthRange,
) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<Option<i64>, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| month.contains(e.date())) {
        let key = entry.category_id();
        let slot = *index.entry(key).or_insert_with(|| {
            let name = match (key, entry.category()) {
                (Some(_), Some(cat)) => cat.name.clone(),
                (Some(id), None) => format!("Category #{id}"),
                (None, _) => UNCATEGORIZED.to_string(),
            };
            groups.push(CategoryTotal {
                category_id: key,
                name,
                total: Decimal::ZERO,
                count: 0,
            });
            groups.len() - 1
        });
        groups[slot].total += entry.amount();
        groups[slot].count += 1;
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FixedVariableSplit {
    pub(crate) fixed: Decimal,
    pub(crate) variable: Decimal,
    pub(crate) fixed_pct: Decimal,
    pub(crate) variable_pct: Decimal,
}

pub(crate) fn fixed_variable_split(expenses: &[Expense], month: &MonthRange) -> FixedVariableSplit {
    let (fixed, variable) = expenses
        .iter()
        .filter(|e| month.contains(e.date))
        .fold((Decimal::ZERO, Decimal::ZERO), |(f, v), e| {
            if e.is_fixed {
                (f + e.amount, v)
            } else {
                (f, v + e.amount)
            }
        });
    let total = fixed + variable;
    FixedVariableSplit {
        fixed,
        variable,
        fixed_pct: percentage_of(fixed, total),
        variable_pct: percentage_of(variable, total),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QuickPick<'a> {
    pub(crate) category: &'a Category,
    pub(crate) count: usize,
    pub(crate) last_amount: Option<Decimal>,
}

/// Expense categories used most over the last [`QUICK_WINDOW_DAYS`] days,
/// at most [`QUICK_PICKS`] of them. `last_amount` is the amount of the
/// category's entry that comes last in `expenses`, whatever its date.
pub(crate) fn quick_entry_ranking<'a>(
    categories: &'a [Category],
    expenses: &[Expense],
    today: NaiveDate,
) -> Vec<QuickPick<'a>> {
    let since = today - Days::new(QUICK_WINDOW_DAYS);
    let mut counts: HashMap<i64, usize> = HashMap::new();
    let mut last_amounts: HashMap<i64, Decimal> = HashMap::new();

    for expense in expenses.iter().filter(|e| e.date >= since) {
        if let Some(id) = expense.category_id {
            *counts.entry(id).or_insert(0) += 1;
            last_amounts.insert(id, expense.amount);
        }
    }

    let mut picks: Vec<QuickPick> = categories
        .iter()
        .filter(|c| c.kind == CategoryKind::Expense)
        .filter_map(|c| {
            let id = c.id?;
            let count = counts.get(&id).copied().unwrap_or(0);
            (count > 0).then(|| QuickPick {
                category: c,
                count,
                last_amount: last_amounts.get(&id).copied(),
            })
        })
        .collect();
    picks.sort_by(|a, b| b.count.cmp(&a.count));
    picks.truncate(QUICK_PICKS);
    picks
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Movement<'a> {
    Income(&'a Income),
    Expense(&'a Expense),
}

impl Movement<'_> {
    fn entry(&self) -> &dyn Entry {
        match self {
            Self::Income(i) => *i,
            Self::Expense(e) => *e,
        }
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.entry().date()
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.entry().amount()
    }

    /// Income as positive, expense as negative.
    pub(crate) fn signed_amount(&self) -> Decimal {
        match self {
            Self::Income(i) => i.amount,
            Self::Expense(e) => -e.amount,
        }
    }

    pub(crate) fn description(&self) -> &str {
        self.entry().description()
    }

    pub(crate) fn category(&self) -> Option<&Category> {
        self.entry().category()
    }

    pub(crate) fn is_income(&self) -> bool {
        matches!(self, Self::Income(_))
    }
}

/// Incomes and expenses merged, newest first, at most `limit` entries.
/// With `fixed_only` only fixed expenses are kept.
pub(crate) fn recent_movements<'a>(
    incomes: &'a [Income],
    expenses: &'a [Expense],
    limit: usize,
    fixed_only: bool,
) -> Vec<Movement<'a>> {
    let mut all: Vec<Movement> = incomes
        .iter()
        .map(Movement::Income)
        .chain(expenses.iter().map(Movement::Expense))
        .filter(|m| !fixed_only || matches!(m, Movement::Expense(e) if e.is_fixed))
        .collect();
    all.sort_by(|a, b| b.date().cmp(&a.date()));
    all.truncate(limit);
    all
}

/// Everything the dashboard and the report screen show for one month.
#[derive(Debug, Clone)]
pub(crate) struct MonthlyReport<'a> {
    pub(crate) month: MonthRange,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) balance: Decimal,
    /// Rounded to one decimal place; both shown and classified.
    pub(crate) savings_rate: Decimal,
    pub(crate) spent_pct: Decimal,
    pub(crate) health: SavingsHealth,
    pub(crate) expenses_by_category: Vec<CategoryTotal>,
    pub(crate) incomes_by_category: Vec<CategoryTotal>,
    pub(crate) split: FixedVariableSplit,
    pub(crate) incomes: Vec<&'a Income>,
    pub(crate) expenses: Vec<&'a Expense>,
}

impl<'a> MonthlyReport<'a> {
    pub(crate) fn build(incomes: &'a [Income], expenses: &'a [Expense], month: MonthRange) -> Self {
        let income = monthly_total(incomes, &month);
        let expense = monthly_total(expenses, &month);
        let savings_rate = round_pct(savings_rate(income, expense));
        Self {
            month,
            income,
            expense,
            balance: balance(income, expense),
            savings_rate,
            spent_pct: round_pct(spent_percentage(income, expense)),
            health: SavingsHealth::classify(savings_rate),
            expenses_by_category: breakdown_by_category(expenses, &month),
            incomes_by_category: breakdown_by_category(incomes, &month),
            split: fixed_variable_split(expenses, &month),
            incomes: in_month(incomes, &month),
            expenses: in_month(expenses, &month),
        }
    }

    pub(crate) fn advice(&self) -> String {
        self.health.advice(self.savings_rate)
    }
}

#[cfg(test)]
mod tests;
