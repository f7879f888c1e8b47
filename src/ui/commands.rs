use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::report::MonthRange;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit MiFinanzas", cmd_quit, r);
    register_command!("quit", "Quit MiFinanzas", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("al", "Go to Alerts", cmd_alerts, r);
    register_command!("alerts", "Go to Alerts", cmd_alerts, r);
    register_command!("rp", "Go to Reports", cmd_reports, r);
    register_command!("reports", "Go to Reports", cmd_reports, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("month", "Set month (e.g. :month 2026-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2026-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!("refresh", "Reload all data", cmd_refresh, r);
    register_command!(
        "export",
        "Export the month to CSV (e.g. :export ~/finanzas.csv)",
        cmd_export,
        r
    );
    register_command!(
        "toggle-alert",
        "Pause or resume the selected alert",
        cmd_toggle_alert,
        r
    );
    register_command!(
        "notified",
        "Mark the selected alert as notified",
        cmd_notified,
        r
    );
    register_command!(
        "delete-alert",
        "Delete the selected alert",
        cmd_delete_alert,
        r
    );
    register_command!(
        "delete-category",
        "Delete the selected category",
        cmd_delete_category,
        r
    );
    register_command!(
        "suggest",
        "List fixed expenses that have no alert",
        cmd_suggest,
        r
    );
    register_command!(
        "reset-prefs",
        "Forget local preferences (shows the welcome banner again)",
        cmd_reset_prefs,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2)
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Accepts `YYYY-MM`, or a bare month number within the year of `current`.
pub(crate) fn parse_month_arg(args: &str, current: &MonthRange) -> Option<MonthRange> {
    use chrono::Datelike;
    if args.len() <= 2 {
        let month: u32 = args.parse().ok()?;
        MonthRange::new(current.start.year(), month)
    } else {
        MonthRange::parse(args)
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_alerts(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Alerts;
    Ok(())
}

fn cmd_reports(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Reports;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let current = MonthRange::containing(app.today);
        app.set_month(current);
        return Ok(());
    }
    match parse_month_arg(args, &app.month) {
        Some(month) => app.set_month(month),
        None => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2026-01)"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let next = app.month.next();
    app.set_month(next);
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let previous = app.month.previous();
    app.set_month(previous);
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.refresh_all(db)?;
    app.set_status("Data reloaded");
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/mifinanzas-export-{}.csv", app.month.key())
    } else {
        crate::run::shellexpand(args)
    };

    let count = crate::export::export_to_file(
        &PathBuf::from(&path),
        &app.finance.incomes,
        &app.finance.expenses,
        Some(&app.month),
    )?;
    if count == 0 {
        app.set_status("No transactions to export");
    } else {
        app.set_status(format!("Exported {count} transactions to {path}"));
    }
    Ok(())
}

fn selected_alert(app: &App) -> Option<(i64, String)> {
    if app.screen != Screen::Alerts {
        return None;
    }
    let alert = app.finance.alerts.get(app.alert_index)?;
    Some((alert.id?, alert.name.clone()))
}

fn cmd_toggle_alert(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let Some((id, name)) = selected_alert(app) else {
        app.set_status("Select an alert on the Alerts tab first");
        return Ok(());
    };
    let active = app.finance.toggle_alert(db, id)?;
    let state = if active { "resumed" } else { "paused" };
    app.set_status(format!("Alert '{name}' {state}"));
    Ok(())
}

fn cmd_notified(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let Some((id, name)) = selected_alert(app) else {
        app.set_status("Select an alert on the Alerts tab first");
        return Ok(());
    };
    app.finance.mark_alert_notified(db, id)?;
    app.set_status(format!("Alert '{name}' marked as notified"));
    Ok(())
}

fn cmd_delete_alert(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let Some((id, name)) = selected_alert(app) else {
        app.set_status("Select an alert on the Alerts tab first");
        return Ok(());
    };
    app.confirm_message = format!("Delete alert '{name}'?");
    app.pending_action = Some(PendingAction::DeleteAlert { id, name });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_delete_category(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    if app.screen != Screen::Categories {
        app.set_status("Navigate to Categories first");
        return Ok(());
    }
    let Some((id, name)) = app
        .finance
        .categories
        .get(app.category_index)
        .and_then(|c| c.id.map(|id| (id, c.name.clone())))
    else {
        app.set_status("No category selected");
        return Ok(());
    };
    app.confirm_message =
        format!("Delete category '{name}'? Its transactions and alerts keep no category");
    app.pending_action = Some(PendingAction::DeleteCategory { id, name });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_suggest(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let names: Vec<String> = app
        .finance
        .suggest_alerts(app.today)
        .iter()
        .map(|e| format!("{} (day {})", e.description, chrono::Datelike::day(&e.date)))
        .collect();
    if names.is_empty() {
        app.set_status("Every fixed expense this month has an alert");
    } else {
        app.set_status(format!(
            "Fixed expenses without alert: {}. Create them with `mifinanzas suggest-alerts --create`",
            names.join(", ")
        ));
    }
    Ok(())
}

/// `:reset-prefs` clears every local flag; `:reset-prefs <key>` just one.
fn cmd_reset_prefs(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let Some(user) = app.finance.session().user().cloned() else {
        app.set_status("No user signed in");
        return Ok(());
    };
    if args.is_empty() {
        app.prefs.clear_user(&user);
        app.set_status("Local preferences cleared");
    } else {
        app.prefs.remove(&user, args);
        app.set_status(format!("Preference '{args}' cleared"));
    }
    app.show_welcome = !app.prefs.has_seen_welcome(&user);
    Ok(())
}

/// Runs a confirmed [`PendingAction`].
pub(crate) fn confirm(action: PendingAction, app: &mut App, db: &Database) -> anyhow::Result<()> {
    match action {
        PendingAction::DeleteAlert { id, name } => {
            app.finance.delete_alert(db, id)?;
            app.set_status(format!("Deleted alert: {name}"));
        }
        PendingAction::DeleteCategory { id, name } => {
            app.finance.delete_category(db, id)?;
            app.set_status(format!("Deleted category: {name}"));
        }
    }
    app.clamp_cursors();
    Ok(())
}
