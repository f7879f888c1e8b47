//! Due-date proximity for monthly payment reminders.
//!
//! Every month is treated as 31 days long: an alert due on the 3rd seen
//! from the 28th is 6 days away regardless of the calendar month.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::models::{Alert, Expense};
use crate::report::MonthRange;

pub(crate) const CYCLE_DAYS: u32 = 31;

/// Window of the "payments coming up" banner.
pub(crate) const NOTIFY_WINDOW: u32 = 3;
/// Window of the dashboard's next-charges panel.
pub(crate) const DASHBOARD_WINDOW: u32 = 5;
/// Window counted in the alert statistics.
pub(crate) const STATS_WINDOW: u32 = 7;

/// Days until `due_day` comes around again, seen from `today`.
/// Both arguments are days of the month in `1..=31`.
pub(crate) fn days_until_due(today: u32, due_day: u32) -> u32 {
    if due_day >= today {
        due_day - today
    } else {
        CYCLE_DAYS - today + due_day
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Urgency {
    DueToday,
    DueTomorrow,
    Urgent,
    Upcoming,
    /// More than a week away; left out of proximity views.
    Later,
}

impl Urgency {
    pub(crate) fn from_days(days: u32) -> Self {
        match days {
            0 => Self::DueToday,
            1 => Self::DueTomorrow,
            2..=3 => Self::Urgent,
            4..=7 => Self::Upcoming,
            _ => Self::Later,
        }
    }

    pub(crate) fn is_shown(&self) -> bool {
        !matches!(self, Self::Later)
    }

    pub(crate) fn describe(&self, days: u32) -> String {
        match self {
            Self::DueToday => "Due today!".into(),
            Self::DueTomorrow => "Due tomorrow!".into(),
            _ => format!("In {days} days"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Proximity<'a> {
    pub(crate) alert: &'a Alert,
    pub(crate) days_remaining: u32,
    pub(crate) urgency: Urgency,
}

impl<'a> Proximity<'a> {
    pub(crate) fn of(alert: &'a Alert, today: u32) -> Self {
        let days_remaining = days_until_due(today, alert.due_day);
        Self {
            alert,
            days_remaining,
            urgency: Urgency::from_days(days_remaining),
        }
    }
}

/// Every alert, active or not, annotated with its proximity and kept in
/// collection order. Used by management views.
pub(crate) fn annotate(alerts: &[Alert], today: u32) -> Vec<Proximity<'_>> {
    alerts.iter().map(|a| Proximity::of(a, today)).collect()
}

/// Active alerts due within `window` days, closest first. Ties keep the
/// collection order.
pub(crate) fn upcoming(alerts: &[Alert], today: u32, window: u32) -> Vec<Proximity<'_>> {
    let mut due: Vec<Proximity> = alerts
        .iter()
        .filter(|a| a.is_active)
        .map(|a| Proximity::of(a, today))
        .filter(|p| p.days_remaining <= window)
        .collect();
    due.sort_by_key(|p| p.days_remaining);
    due
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AlertStats {
    pub(crate) active: usize,
    pub(crate) monthly_total: Decimal,
    pub(crate) due_this_week: usize,
}

pub(crate) fn stats(alerts: &[Alert], today: u32) -> AlertStats {
    let active: Vec<&Alert> = alerts.iter().filter(|a| a.is_active).collect();
    AlertStats {
        active: active.len(),
        monthly_total: active.iter().map(|a| a.amount).sum(),
        due_this_week: upcoming(alerts, today, STATS_WINDOW).len(),
    }
}

/// Fixed expenses of `month` that no alert covers yet. An alert covers an
/// expense when its name matches the description (ignoring case) or when
/// both point at the same category.
pub(crate) fn fixed_without_alert<'a>(
    expenses: &'a [Expense],
    alerts: &[Alert],
    month: &MonthRange,
) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| e.is_fixed && month.contains(e.date))
        .filter(|e| {
            let description = e.description.to_lowercase();
            !alerts.iter().any(|a| {
                a.name.to_lowercase() == description
                    || (a.category_id.is_some() && a.category_id == e.category_id)
            })
        })
        .collect()
}

/// Alert reminding of `expense` on the same day every month.
pub(crate) fn alert_for_expense(expense: &Expense) -> Alert {
    let mut alert = Alert::new(expense.description.clone(), expense.amount, expense.date.day());
    alert.category_id = expense.category_id;
    alert
}
