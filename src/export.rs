use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::{Expense, Income};
use crate::report::{recent_movements, MonthRange, Movement};

const HEADER: [&str; 7] = [
    "date",
    "type",
    "description",
    "category",
    "amount",
    "fixed",
    "method",
];

/// Writes the incomes and expenses of `month` (all months when `None`) as
/// CSV, newest first. Returns the number of data rows written.
pub(crate) fn write_csv<W: Write>(
    out: W,
    incomes: &[Income],
    expenses: &[Expense],
    month: Option<&MonthRange>,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;

    let rows = recent_movements(incomes, expenses, usize::MAX, false);
    let mut count = 0;
    for movement in rows
        .iter()
        .filter(|m| month.map_or(true, |range| range.contains(m.date())))
    {
        wtr.write_record(record(movement))?;
        count += 1;
    }
    wtr.flush()?;
    Ok(count)
}

pub(crate) fn export_to_file(
    path: &Path,
    incomes: &[Income],
    expenses: &[Expense],
    month: Option<&MonthRange>,
) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, incomes, expenses, month)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn record(movement: &Movement) -> [String; 7] {
    let category = movement
        .category()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let (kind, fixed, method) = match movement {
        Movement::Income(_) => ("income", String::new(), String::new()),
        Movement::Expense(e) => (
            "expense",
            e.is_fixed.to_string(),
            e.payment_method.as_str().to_string(),
        ),
    };
    [
        movement.date().format("%Y-%m-%d").to_string(),
        kind.to_string(),
        movement.description().to_string(),
        category,
        movement.amount().to_string(),
        fixed,
        method,
    ]
}
