#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use super::commands::*;
use crate::db::Database;
use crate::models::Alert;
use crate::prefs::Prefs;
use crate::report::MonthRange;
use crate::session::{Session, UserId};

fn setup() -> (App, Database) {
    let user = UserId::new("ana").unwrap();
    let app = App::new(Session::authenticated(user), Prefs::open_in_memory());
    (app, Database::open_in_memory().unwrap())
}

// ── Suggestions ───────────────────────────────────────────────

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("alerts", "alerts"), 0);
    assert_eq!(levenshtein("alrets", "alerts"), 2);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
}

#[test]
fn test_find_closest() {
    assert_eq!(find_closest("alerst"), "alerts");
    assert_eq!(find_closest("refesh"), "refresh");
    assert_eq!(find_closest("nxt-month"), "next-month");
}

#[test]
fn test_find_closest_skips_short_aliases() {
    assert_ne!(find_closest("qq").len(), 1);
    assert!(find_closest("xyz").len() > 2);
}

// ── Month arguments ───────────────────────────────────────────

#[test]
fn test_parse_month_arg() {
    let current = MonthRange::new(2026, 10).unwrap();
    assert_eq!(
        parse_month_arg("2025-12", &current),
        MonthRange::new(2025, 12)
    );
    assert_eq!(parse_month_arg("3", &current), MonthRange::new(2026, 3));
    assert_eq!(parse_month_arg("13", &current), None);
    assert_eq!(parse_month_arg("march", &current), None);
    assert_eq!(parse_month_arg("2026-13", &current), None);
}

// ── Dispatch ──────────────────────────────────────────────────

#[test]
fn test_navigation_commands() {
    let (mut app, db) = setup();
    handle_command("alerts", &mut app, &db).unwrap();
    assert_eq!(app.screen, Screen::Alerts);
    handle_command("rp", &mut app, &db).unwrap();
    assert_eq!(app.screen, Screen::Reports);
    handle_command("c", &mut app, &db).unwrap();
    assert_eq!(app.screen, Screen::Categories);
    handle_command("  d  ", &mut app, &db).unwrap();
    assert_eq!(app.screen, Screen::Dashboard);
    handle_command("help", &mut app, &db).unwrap();
    assert!(app.show_help);
}

#[test]
fn test_month_commands() {
    let (mut app, db) = setup();
    handle_command("month 2026-01", &mut app, &db).unwrap();
    assert_eq!(app.month, MonthRange::new(2026, 1).unwrap());
    assert!(app.status_message.contains("January 2026"));

    handle_command("prev-month", &mut app, &db).unwrap();
    assert_eq!(app.month, MonthRange::new(2025, 12).unwrap());
    handle_command("next-month", &mut app, &db).unwrap();
    handle_command("next-month", &mut app, &db).unwrap();
    assert_eq!(app.month, MonthRange::new(2026, 2).unwrap());

    handle_command("m", &mut app, &db).unwrap();
    assert_eq!(app.month, MonthRange::containing(app.today));
}

#[test]
fn test_invalid_month_keeps_current() {
    let (mut app, db) = setup();
    let before = app.month;
    handle_command("month someday", &mut app, &db).unwrap();
    assert_eq!(app.month, before);
    assert!(app.status_message.starts_with("Invalid month"));
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, db) = setup();
    handle_command("refrsh", &mut app, &db).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :refrsh. Did you mean :refresh?"
    );
}

#[test]
fn test_quit() {
    let (mut app, db) = setup();
    handle_command("q", &mut app, &db).unwrap();
    assert!(!app.running);
}

#[test]
fn test_reset_prefs_shows_welcome_again() {
    let (mut app, db) = setup();
    app.dismiss_welcome();
    assert!(!app.show_welcome);
    let user = UserId::new("ana").unwrap();
    assert!(app.prefs.has_seen_welcome(&user));

    handle_command("reset-prefs", &mut app, &db).unwrap();
    assert!(app.show_welcome);
    assert!(!app.prefs.has_seen_welcome(&user));
}

#[test]
fn test_alert_commands_need_alerts_tab() {
    let (mut app, db) = setup();
    handle_command("toggle-alert", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Select an alert on the Alerts tab first");
}

#[test]
fn test_toggle_and_delete_selected_alert() {
    let (mut app, db) = setup();
    app.finance
        .add_alert(&db, &Alert::new("Rent".into(), dec!(900), 1))
        .unwrap();
    app.screen = Screen::Alerts;

    handle_command("toggle-alert", &mut app, &db).unwrap();
    assert!(!app.finance.alerts[0].is_active);
    assert_eq!(app.status_message, "Alert 'Rent' paused");

    handle_command("delete-alert", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    let action = app.pending_action.take().unwrap();
    assert!(matches!(action, PendingAction::DeleteAlert { ref name, .. } if name == "Rent"));

    confirm(action, &mut app, &db).unwrap();
    assert!(app.finance.alerts.is_empty());
    assert_eq!(app.alert_index, 0);
}

#[test]
fn test_export_writes_file() {
    let (mut app, db) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    handle_command(&format!("export {}", path.display()), &mut app, &db).unwrap();
    assert_eq!(app.status_message, "No transactions to export");
    assert!(path.exists());
}

#[test]
fn test_reset_single_pref() {
    let (mut app, db) = setup();
    let user = UserId::new("ana").unwrap();
    app.dismiss_welcome();
    app.prefs.set(&user, "theme", "dark");

    handle_command("reset-prefs theme", &mut app, &db).unwrap();
    assert_eq!(app.prefs.get(&user, "theme"), None);
    assert!(!app.show_welcome);

    handle_command("reset-prefs has_seen_welcome", &mut app, &db).unwrap();
    assert!(app.show_welcome);
}
