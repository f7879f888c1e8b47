use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::alerts;
use crate::db::Database;
use crate::finance::{Finance, QuickEntry};
use crate::models::*;
use crate::report::{self, MonthRange};
use crate::session::Session;
use crate::ui::util::{format_amount, format_pct, parse_amount};

/// Flags that take a value; their values are never positional arguments.
const VALUE_FLAGS: &[&str] = &[
    "--icon",
    "--color",
    "--category",
    "--date",
    "--recurring",
    "--method",
    "--times",
    "--description",
    "--month",
    "--name",
    "--amount",
    "--day",
];

pub(crate) fn as_cli(args: &[String], db: &Database, session: Session) -> Result<()> {
    let mut finance = Finance::new(session);
    let rest = &args[2..];

    match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("mifinanzas {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    finance.refresh(db).context("Failed to load data")?;
    let today = Local::now().date_naive();

    match args[1].as_str() {
        "summary" | "s" => cli_summary(rest, &finance, today),
        "alerts" => cli_alerts(&finance, today),
        "upcoming" => cli_upcoming(rest, &finance, db, today),
        "categories" => cli_categories(rest, &finance, db),
        "add-category" => cli_add_category(rest, &mut finance, db),
        "edit-category" => cli_edit_category(rest, &mut finance, db),
        "delete-category" => cli_delete(rest, Collection::Categories, &mut finance, db),
        "add-income" => cli_add_income(rest, &mut finance, db, today),
        "add-expense" => cli_add_expense(rest, &mut finance, db, today),
        "edit-income" => cli_edit_income(rest, &mut finance, db),
        "edit-expense" => cli_edit_expense(rest, &mut finance, db),
        "delete-income" => cli_delete(rest, Collection::Incomes, &mut finance, db),
        "delete-expense" => cli_delete(rest, Collection::Expenses, &mut finance, db),
        "toggle-fixed" => cli_toggle_fixed(rest, &mut finance, db),
        "quick" => cli_quick(rest, &mut finance, db, today),
        "quick-top" => cli_quick_top(&finance, today),
        "add-alert" => cli_add_alert(rest, &mut finance, db),
        "edit-alert" => cli_edit_alert(rest, &mut finance, db),
        "toggle-alert" => cli_toggle_alert(rest, &mut finance, db),
        "delete-alert" => cli_delete(rest, Collection::Alerts, &mut finance, db),
        "suggest-alerts" => cli_suggest_alerts(rest, &mut finance, db, today),
        "recent" => cli_recent(rest, &finance),
        "export" => cli_export(rest, &finance, db, today),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("MiFinanzas - personal income, expense and payment reminder tracker");
    println!();
    println!("Usage: mifinanzas [--user <id>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive dashboard");
    println!("  summary [YYYY-MM]                   Monthly report with savings health");
    println!("  recent [n]                          Latest incomes and expenses");
    println!("  categories [income|expense]         List categories");
    println!("  add-category <name> <income|expense> [--icon <icon>] [--color <#hex>]");
    println!("                                      (default color {DEFAULT_COLOR})");
    println!("  edit-category <id>                  [--name <name>] [--icon <icon>] [--color <#hex>]");
    println!("  delete-category <id>                Delete a category (records keep no category)");
    println!("  add-income <amount> <description>   [--category <id|name>] [--date YYYY-MM-DD]");
    println!("                                      [--recurring weekly|biweekly|monthly]");
    println!("  add-expense <amount> <description>  [--category <id|name>] [--date YYYY-MM-DD]");
    println!("                                      [--fixed] [--method cash|yape|plin|card|bank]");
    println!("  edit-income <id>, edit-expense <id> [--amount <a>] [--description <d>] [--date YYYY-MM-DD]");
    println!("                                      [--category <id|name|none>] [--recurring <f|none>] [--method <m>]");
    println!("  delete-income <id>, delete-expense <id>");
    println!("  toggle-fixed <expense-id>           Mark an expense fixed or variable");
    println!("  quick <category-id> <amount>        [--times N] [--method <m>] [--description <d>]");
    println!("  quick-top                           Most used expense categories (30 days)");
    println!("  alerts                              All payment alerts with days remaining");
    println!("  upcoming [days]                     Active alerts due within [days] (default 7)");
    println!("  add-alert <name> <amount> <day>     [--category <id|name>]");
    println!("  edit-alert <id>                     [--name <n>] [--amount <a>] [--day <d>] [--category <id|name|none>]");
    println!("  toggle-alert <id>, delete-alert <id>");
    println!("  suggest-alerts [--create]           Fixed expenses without an alert");
    println!("  export [path] [--month YYYY-MM]     Export to CSV (default: current month)");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("The user comes from --user or MIFINANZAS_USER.");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("Usage: mifinanzas {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid id '{raw}'"))
}

fn parse_money(raw: &str) -> Result<Decimal> {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        anyhow::bail!("Invalid amount '{raw}'");
    }
    Ok(parse_amount(raw))
}

fn parse_date(args: &[String], today: NaiveDate) -> Result<NaiveDate> {
    match flag(args, "--date") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD")),
        None => Ok(today),
    }
}

/// `--category` takes an id or a category name.
fn category_flag(args: &[String], categories: &[Category]) -> Result<Option<i64>> {
    let Some(raw) = flag(args, "--category") else {
        return Ok(None);
    };
    if let Ok(id) = raw.parse() {
        return Ok(Some(id));
    }
    Category::find_by_name(categories, raw)
        .and_then(|c| c.id)
        .map(Some)
        .ok_or_else(|| anyhow::anyhow!("Unknown category '{raw}'"))
}

/// Like `--category`, but `none` clears the reference.
fn category_patch_flag(args: &[String], categories: &[Category]) -> Result<Option<Option<i64>>> {
    if flag(args, "--category") == Some("none") {
        return Ok(Some(None));
    }
    Ok(category_flag(args, categories)?.map(Some))
}

fn amount_flag(args: &[String]) -> Result<Option<Decimal>> {
    flag(args, "--amount").map(parse_money).transpose()
}

fn optional_date_flag(args: &[String]) -> Result<Option<NaiveDate>> {
    flag(args, "--date")
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
        })
        .transpose()
}

fn method_flag(args: &[String]) -> Result<PaymentMethod> {
    match flag(args, "--method") {
        Some(raw) => PaymentMethod::parse(raw).ok_or_else(|| {
            let names: Vec<&str> = PaymentMethod::all().iter().map(|m| m.as_str()).collect();
            anyhow::anyhow!("Unknown payment method '{raw}'. Use one of: {}", names.join(", "))
        }),
        None => Ok(PaymentMethod::default()),
    }
}

fn category_label(category: Option<&Category>) -> String {
    category.map_or_else(
        || report::UNCATEGORIZED.to_string(),
        |c| format!("{} {}", c.icon.glyph(), c.name),
    )
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary(args: &[String], finance: &Finance, today: NaiveDate) -> Result<()> {
    let month = match positionals(args).first() {
        Some(raw) => MonthRange::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{raw}', expected YYYY-MM"))?,
        None => MonthRange::containing(today),
    };
    let report = finance.report(month);

    println!("MiFinanzas - {}", month.title());
    println!("{}", "─".repeat(44));
    println!("  Income:        {:>16}", format_amount(report.income));
    println!("  Expenses:      {:>16}", format_amount(report.expense));
    println!("  Balance:       {:>16}", format_amount(report.balance));
    println!("  Savings rate:  {:>16}", format_pct(report.savings_rate));
    println!("  Income spent:  {:>16}", format_pct(report.spent_pct));
    println!();
    println!("  {}: {}", report.health.title(), report.advice());

    if !report.expenses_by_category.is_empty() {
        println!();
        println!("Expenses by category:");
        for group in &report.expenses_by_category {
            println!(
                "  {:<24} {:>16}  ({} records)",
                group.name,
                format_amount(group.total),
                group.count
            );
        }
        println!();
        println!(
            "  Fixed:    {:>16} ({:.1}%)",
            format_amount(report.split.fixed),
            report.split.fixed_pct
        );
        println!(
            "  Variable: {:>16} ({:.1}%)",
            format_amount(report.split.variable),
            report.split.variable_pct
        );
    }

    if !report.incomes_by_category.is_empty() {
        println!();
        println!("Incomes by category:");
        for group in &report.incomes_by_category {
            println!("  {:<24} {:>16}", group.name, format_amount(group.total));
        }
    }
    Ok(())
}

fn cli_recent(args: &[String], finance: &Finance) -> Result<()> {
    let limit = match positionals(args).first() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid count '{raw}'"))?,
        None => 10,
    };
    let movements = report::recent_movements(&finance.incomes, &finance.expenses, limit, false);
    if movements.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    println!("{:<11} {:<28} {:<20} {:>14}", "Date", "Description", "Category", "Amount");
    println!("{}", "─".repeat(76));
    for m in &movements {
        println!(
            "{:<11} {:<28} {:<20} {:>14}",
            m.date().format("%Y-%m-%d"),
            m.description(),
            category_label(m.category()),
            format_amount(m.signed_amount()),
        );
    }
    Ok(())
}

fn cli_export(args: &[String], finance: &Finance, db: &Database, today: NaiveDate) -> Result<()> {
    let month = match flag(args, "--month") {
        Some(raw) => MonthRange::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{raw}', expected YYYY-MM"))?,
        None => MonthRange::containing(today),
    };

    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/mifinanzas-export-{}.csv", month.key())
        });

    let (incomes, expenses) = finance.month_movements(db, &month)?;
    let count = crate::export::export_to_file(
        &PathBuf::from(&output_path),
        &incomes,
        &expenses,
        Some(&month),
    )?;
    if count == 0 {
        println!("No transactions for {month}");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

// ── Categories ───────────────────────────────────────────────

fn cli_categories(args: &[String], finance: &Finance, db: &Database) -> Result<()> {
    let kind = match positionals(args).first() {
        Some(raw) => Some(
            CategoryKind::parse(raw)
                .ok_or_else(|| anyhow::anyhow!("Unknown kind '{raw}', use income or expense"))?,
        ),
        None => None,
    };
    let categories = match kind {
        Some(kind) => finance.categories_of_kind(db, kind)?,
        None => finance.categories.clone(),
    };
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!("{:<4} {:<3} {:<24} {:<8} Color", "ID", "", "Name", "Kind");
    println!("{}", "─".repeat(50));
    for cat in &categories {
        println!(
            "{:<4} {:<3} {:<24} {:<8} {}",
            cat.id.unwrap_or(0),
            cat.icon.glyph(),
            cat.name,
            cat.kind,
            cat.color,
        );
    }
    Ok(())
}

fn cli_add_category(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let pos = positionals(args);
    let (Some(name), Some(kind)) = (pos.first(), pos.get(1)) else {
        anyhow::bail!("Usage: mifinanzas add-category <name> <income|expense> [--icon <icon>] [--color <#hex>]");
    };
    let kind = CategoryKind::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown kind '{kind}', use income or expense"))?;

    let mut category = Category::new(name.to_string(), kind);
    if let Some(raw) = flag(args, "--icon") {
        category.icon = Icon::parse(raw).ok_or_else(|| {
            let names: Vec<&str> = Icon::all().iter().map(|i| i.as_str()).collect();
            anyhow::anyhow!("Unknown icon '{raw}'. Available: {}", names.join(", "))
        })?;
    }
    if let Some(color) = flag(args, "--color") {
        category.color = color.to_string();
    }

    let stored = finance.add_category(db, &category)?;
    println!(
        "Created {} category {} '{}'",
        stored.kind,
        stored.id.unwrap_or(0),
        stored.name
    );
    Ok(())
}

fn cli_edit_category(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "edit-category <id> [--name <name>] [--icon <icon>] [--color <#hex>]")?;
    let icon = flag(args, "--icon")
        .map(|raw| Icon::parse(raw).ok_or_else(|| anyhow::anyhow!("Unknown icon '{raw}'")))
        .transpose()?;
    let patch = CategoryPatch {
        name: flag(args, "--name").map(str::to_string),
        icon,
        color: flag(args, "--color").map(str::to_string),
        ..CategoryPatch::default()
    };
    finance.update_category(db, id, &patch)?;
    println!("Updated category {id}");
    Ok(())
}

fn cli_delete(
    args: &[String],
    collection: Collection,
    finance: &mut Finance,
    db: &Database,
) -> Result<()> {
    let usage = format!("delete-{collection} <id>");
    let id = parse_id(positionals(args).first().copied(), &usage)?;
    match collection {
        Collection::Categories => finance.delete_category(db, id)?,
        Collection::Incomes => finance.delete_income(db, id)?,
        Collection::Expenses => finance.delete_expense(db, id)?,
        Collection::Alerts => finance.delete_alert(db, id)?,
    }
    println!("Deleted {collection} {id}");
    Ok(())
}

// ── Incomes and expenses ─────────────────────────────────────

fn cli_add_income(args: &[String], finance: &mut Finance, db: &Database, today: NaiveDate) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: mifinanzas add-income <amount> <description> [--category <id|name>] [--date YYYY-MM-DD] [--recurring <frequency>]");
    }
    let mut income = Income::new(pos[1..].join(" "), parse_money(pos[0])?, parse_date(args, today)?);
    income.category_id = category_flag(args, &finance.categories)?;
    if let Some(raw) = flag(args, "--recurring") {
        let frequency = Frequency::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown frequency '{raw}', use weekly, biweekly or monthly"))?;
        income = income.recurring(frequency);
    }

    let stored = finance.add_income(db, &income)?;
    println!(
        "Added income {} '{}' {} on {} ({})",
        stored.id.unwrap_or(0),
        stored.description,
        format_amount(stored.amount),
        stored.date,
        stored.frequency_label()
    );
    Ok(())
}

fn cli_add_expense(args: &[String], finance: &mut Finance, db: &Database, today: NaiveDate) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: mifinanzas add-expense <amount> <description> [--category <id|name>] [--date YYYY-MM-DD] [--fixed] [--method <method>]");
    }
    let mut expense = Expense::new(pos[1..].join(" "), parse_money(pos[0])?, parse_date(args, today)?);
    expense.category_id = category_flag(args, &finance.categories)?;
    expense.is_fixed = has_flag(args, "--fixed");
    expense.payment_method = method_flag(args)?;

    let stored = finance.add_expense(db, &expense)?;
    println!(
        "Added {} expense {} '{}' {} on {} via {}",
        if stored.is_fixed { "fixed" } else { "variable" },
        stored.id.unwrap_or(0),
        stored.description,
        format_amount(stored.amount),
        stored.date,
        stored.payment_method
    );
    Ok(())
}

fn cli_edit_income(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "edit-income <id> [options]")?;
    let mut patch = IncomePatch {
        description: flag(args, "--description").map(str::to_string),
        amount: amount_flag(args)?,
        category_id: category_patch_flag(args, &finance.categories)?,
        date: optional_date_flag(args)?,
        ..IncomePatch::default()
    };
    match flag(args, "--recurring") {
        Some("none") => {
            patch.is_recurring = Some(false);
            patch.frequency = Some(None);
        }
        Some(raw) => {
            let frequency = Frequency::parse(raw)
                .ok_or_else(|| anyhow::anyhow!("Unknown frequency '{raw}'"))?;
            patch.is_recurring = Some(true);
            patch.frequency = Some(Some(frequency));
        }
        None => {}
    }
    finance.update_income(db, id, &patch)?;
    println!("Updated income {id}");
    Ok(())
}

fn cli_edit_expense(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "edit-expense <id> [options]")?;
    let patch = ExpensePatch {
        description: flag(args, "--description").map(str::to_string),
        amount: amount_flag(args)?,
        category_id: category_patch_flag(args, &finance.categories)?,
        date: optional_date_flag(args)?,
        payment_method: flag(args, "--method").map(|_| method_flag(args)).transpose()?,
        ..ExpensePatch::default()
    };
    finance.update_expense(db, id, &patch)?;
    println!("Updated expense {id}");
    Ok(())
}

fn cli_toggle_fixed(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "toggle-fixed <expense-id>")?;
    let fixed = finance.toggle_fixed(db, id)?;
    println!(
        "Expense {id} is now {}",
        if fixed { "fixed" } else { "variable" }
    );
    Ok(())
}

fn cli_quick(args: &[String], finance: &mut Finance, db: &Database, today: NaiveDate) -> Result<()> {
    let pos = positionals(args);
    let usage = "quick <category-id> <amount> [--times N] [--method <m>] [--description <d>]";
    let category_id = parse_id(pos.first().copied(), usage)?;
    let amount = parse_money(
        pos.get(1)
            .ok_or_else(|| anyhow::anyhow!("Usage: mifinanzas {usage}"))?,
    )?;
    let times = match flag(args, "--times") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid --times '{raw}'"))?,
        None => 1,
    };

    let entry = QuickEntry {
        category_id,
        amount,
        times,
        payment_method: method_flag(args)?,
        description: flag(args, "--description").map(str::to_string),
        date: today,
    };
    let inserted = finance.quick_add_expense(db, &entry)?;
    println!(
        "Added {inserted} × {} to category {category_id}",
        format_amount(amount)
    );
    Ok(())
}

fn cli_quick_top(finance: &Finance, today: NaiveDate) -> Result<()> {
    let picks = report::quick_entry_ranking(&finance.categories, &finance.expenses, today);
    if picks.is_empty() {
        println!("No expenses in the last {} days", report::QUICK_WINDOW_DAYS);
        return Ok(());
    }
    println!("{:<4} {:<24} {:>5} {:>14}", "ID", "Category", "Uses", "Last amount");
    println!("{}", "─".repeat(50));
    for pick in &picks {
        println!(
            "{:<4} {:<24} {:>5} {:>14}",
            pick.category.id.unwrap_or(0),
            format!("{} {}", pick.category.icon.glyph(), pick.category.name),
            pick.count,
            pick.last_amount.map(format_amount).unwrap_or_default(),
        );
    }
    Ok(())
}

// ── Alerts ───────────────────────────────────────────────────

fn cli_alerts(finance: &Finance, today: NaiveDate) -> Result<()> {
    if finance.alerts.is_empty() {
        println!("No alerts");
        return Ok(());
    }
    println!(
        "{:<4} {:>3} {:<24} {:>14} {:<8} Next",
        "ID", "Day", "Name", "Amount", "State"
    );
    println!("{}", "─".repeat(70));
    for p in alerts::annotate(&finance.alerts, today.day()) {
        let marker = if p.alert.is_active && p.urgency.is_shown() { "*" } else { " " };
        let next = format!("{marker} {}", p.urgency.describe(p.days_remaining));
        println!(
            "{:<4} {:>3} {:<24} {:>14} {:<8} {}",
            p.alert.id.unwrap_or(0),
            p.alert.due_day,
            p.alert.name,
            format_amount(p.alert.amount),
            if p.alert.is_active { "active" } else { "paused" },
            next,
        );
    }

    let stats = alerts::stats(&finance.alerts, today.day());
    println!();
    println!(
        "{} active · {} per month · {} due this week",
        stats.active,
        format_amount(stats.monthly_total),
        stats.due_this_week
    );
    Ok(())
}

fn cli_upcoming(args: &[String], finance: &Finance, db: &Database, today: NaiveDate) -> Result<()> {
    let window = match positionals(args).first() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid number of days '{raw}'"))?,
        None => alerts::STATS_WINDOW,
    };
    let active = finance.active_alerts(db)?;
    let due = alerts::upcoming(&active, today.day(), window);
    if due.is_empty() {
        println!("Nothing due in the next {window} days");
        return Ok(());
    }
    for p in due {
        println!(
            "{:<14} {:<24} {:>14}",
            p.urgency.describe(p.days_remaining),
            p.alert.name,
            format_amount(p.alert.amount)
        );
    }
    Ok(())
}

fn cli_add_alert(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let pos = positionals(args);
    let (Some(name), Some(amount), Some(day)) = (pos.first(), pos.get(1), pos.get(2)) else {
        anyhow::bail!("Usage: mifinanzas add-alert <name> <amount> <day> [--category <id|name>]");
    };
    let due_day: u32 = day
        .parse()
        .with_context(|| format!("Invalid day '{day}'"))?;
    let mut alert = Alert::new(name.to_string(), parse_money(amount)?, due_day);
    alert.category_id = category_flag(args, &finance.categories)?;

    let stored = finance.add_alert(db, &alert)?;
    println!(
        "Added alert {} '{}' {} every day {}",
        stored.id.unwrap_or(0),
        stored.name,
        format_amount(stored.amount),
        stored.due_day
    );
    Ok(())
}

fn cli_edit_alert(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "edit-alert <id> [--name <n>] [--amount <a>] [--day <d>] [--category <id|name|none>]")?;
    let due_day = flag(args, "--day")
        .map(|raw| raw.parse::<u32>().with_context(|| format!("Invalid day '{raw}'")))
        .transpose()?;
    let patch = AlertPatch {
        name: flag(args, "--name").map(str::to_string),
        amount: amount_flag(args)?,
        due_day,
        category_id: category_patch_flag(args, &finance.categories)?,
        ..AlertPatch::default()
    };
    finance.update_alert(db, id, &patch)?;
    println!("Updated alert {id}");
    Ok(())
}

fn cli_toggle_alert(args: &[String], finance: &mut Finance, db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "toggle-alert <id>")?;
    let active = finance.toggle_alert(db, id)?;
    println!(
        "Alert {id} {}",
        if active { "resumed" } else { "paused" }
    );
    Ok(())
}

fn cli_suggest_alerts(
    args: &[String],
    finance: &mut Finance,
    db: &Database,
    today: NaiveDate,
) -> Result<()> {
    let suggestions: Vec<(Option<i64>, String, Decimal, u32)> = finance
        .suggest_alerts(today)
        .iter()
        .map(|e| (e.id, e.description.clone(), e.amount, e.date.day()))
        .collect();
    if suggestions.is_empty() {
        println!("Every fixed expense this month has an alert");
        return Ok(());
    }

    let create = has_flag(args, "--create");
    for (id, description, amount, day) in suggestions {
        if create {
            if let Some(id) = id {
                let alert = finance.create_alert_from_expense(db, id)?;
                println!(
                    "Created alert {} '{}' for day {}",
                    alert.id.unwrap_or(0),
                    alert.name,
                    alert.due_day
                );
            }
        } else {
            println!("  day {day:>2}  {description:<24} {:>14}", format_amount(amount));
        }
    }
    if !create {
        println!();
        println!("Run `mifinanzas suggest-alerts --create` to add alerts for them");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positionals_skip_flag_values() {
        let a = args(&["12.50", "Lunch", "--category", "3", "--fixed", "downtown"]);
        assert_eq!(positionals(&a), vec!["12.50", "Lunch", "downtown"]);
    }

    #[test]
    fn test_flag_lookup() {
        let a = args(&["--method", "yape", "--fixed"]);
        assert_eq!(flag(&a, "--method"), Some("yape"));
        assert_eq!(flag(&a, "--date"), None);
        assert!(has_flag(&a, "--fixed"));
        assert_eq!(method_flag(&a).unwrap(), PaymentMethod::Yape);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("S/ 1,200.50").unwrap(), dec!(1200.50));
        assert!(parse_money("lots").is_err());
    }

    #[test]
    fn test_parse_date_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(parse_date(&args(&[]), today).unwrap(), today);
        let a = args(&["--date", "2026-02-28"]);
        assert_eq!(
            parse_date(&a, today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert!(parse_date(&args(&["--date", "28/02/2026"]), today).is_err());
    }

    #[test]
    fn test_category_flag() {
        let mut food = Category::new("Food".into(), CategoryKind::Expense);
        food.id = Some(4);
        let categories = vec![food];
        assert_eq!(category_flag(&args(&["--category", "7"]), &categories).unwrap(), Some(7));
        assert_eq!(category_flag(&args(&["--category", "food"]), &categories).unwrap(), Some(4));
        assert_eq!(category_flag(&args(&[]), &categories).unwrap(), None);
        assert!(category_flag(&args(&["--category", "rent"]), &categories).is_err());
    }

    #[test]
    fn test_add_and_delete_via_cli() {
        let db = Database::open_in_memory().unwrap();
        let user = crate::session::UserId::new("ana").unwrap();
        let mut finance = Finance::new(Session::authenticated(user));
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        cli_add_expense(
            &args(&["45.90", "Internet", "bill", "--fixed", "--method", "card"]),
            &mut finance,
            &db,
            today,
        )
        .unwrap();
        assert_eq!(finance.expenses.len(), 1);
        let expense = &finance.expenses[0];
        assert_eq!(expense.description, "Internet bill");
        assert!(expense.is_fixed);
        assert_eq!(expense.payment_method, PaymentMethod::Card);
        let id = expense.id.unwrap();

        cli_suggest_alerts(&args(&["--create"]), &mut finance, &db, today).unwrap();
        assert_eq!(finance.alerts.len(), 1);
        assert_eq!(finance.alerts[0].due_day, 16);

        let id_arg = id.to_string();
        cli_delete(&args(&[id_arg.as_str()]), Collection::Expenses, &mut finance, &db).unwrap();
        assert!(finance.expenses.is_empty());
    }

    #[test]
    fn test_cli_requires_user_for_mutations() {
        let db = Database::open_in_memory().unwrap();
        let mut finance = Finance::new(Session::anonymous());
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let err = cli_add_income(&args(&["100", "Gift"]), &mut finance, &db, today).unwrap_err();
        assert!(err.to_string().contains("not authenticated"));
    }

    #[test]
    fn test_category_patch_flag_clears_with_none() {
        assert_eq!(category_patch_flag(&args(&["--category", "none"]), &[]).unwrap(), Some(None));
        assert_eq!(category_patch_flag(&args(&["--category", "2"]), &[]).unwrap(), Some(Some(2)));
        assert_eq!(category_patch_flag(&args(&[]), &[]).unwrap(), None);
    }

    #[test]
    fn test_edit_income_and_alert_via_cli() {
        let db = Database::open_in_memory().unwrap();
        let user = crate::session::UserId::new("ana").unwrap();
        let mut finance = Finance::new(Session::authenticated(user));
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        cli_add_income(&args(&["3000", "Salary", "--recurring", "monthly"]), &mut finance, &db, today)
            .unwrap();
        let id = finance.incomes[0].id.unwrap().to_string();
        cli_edit_income(
            &args(&[id.as_str(), "--amount", "3200", "--recurring", "none"]),
            &mut finance,
            &db,
        )
        .unwrap();
        assert_eq!(finance.incomes[0].amount, dec!(3200));
        assert!(!finance.incomes[0].is_recurring);
        assert_eq!(finance.incomes[0].frequency, None);

        cli_add_alert(&args(&["Rent", "900", "1"]), &mut finance, &db).unwrap();
        let id = finance.alerts[0].id.unwrap().to_string();
        cli_edit_alert(&args(&[id.as_str(), "--day", "5"]), &mut finance, &db).unwrap();
        assert_eq!(finance.alerts[0].due_day, 5);
        assert!(cli_edit_alert(&args(&[id.as_str(), "--day", "32"]), &mut finance, &db).is_err());
    }

    #[test]
    fn test_shellexpand() {
        assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
        assert!(!shellexpand("~/x.csv").starts_with('~'));
    }
}
