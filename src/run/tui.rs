use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::prefs::Prefs;
use crate::session::Session;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &Database, session: Session, prefs: Prefs) -> Result<()> {
    let mut app = App::new(session, prefs);
    app.refresh_all(db)?;
    if app.finance.session().user().is_none() {
        app.set_status("Not signed in: set MIFINANZAS_USER or pass --user <id>");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(8) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let outcome = match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db),
                InputMode::Command => handle_command_input(key, app, db),
                InputMode::Confirm => handle_confirm_input(key, app, db),
            };
            // Failed commands surface in the status bar.
            if let Err(e) = outcome {
                app.set_status(format!("Error: {e}"));
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => app.screen = Screen::Dashboard,
        KeyCode::Char('2') => app.screen = Screen::Alerts,
        KeyCode::Char('3') => app.screen = Screen::Reports,
        KeyCode::Char('4') => app.screen = Screen::Categories,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.screen = screens[(idx + 1) % screens.len()];
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            app.screen = screens[prev];
        }
        KeyCode::Esc => app.status_message.clear(),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('r') => commands::handle_command("refresh", app, db)?,
        KeyCode::Char('w') if app.show_welcome => app.dismiss_welcome(),
        KeyCode::Char('a') if app.screen == Screen::Alerts => {
            commands::handle_command("toggle-alert", app, db)?;
        }
        KeyCode::Char('H') => {
            commands::handle_command("prev-month", app, db)?;
        }
        KeyCode::Char('L') => {
            commands::handle_command("next-month", app, db)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                commands::confirm(action, app, db)?;
            }
        }
        _ => {
            app.pending_action = None;
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Alerts => scroll_down(
            &mut app.alert_index,
            &mut app.alert_scroll,
            app.finance.alerts.len(),
            page,
        ),
        Screen::Categories => scroll_down(
            &mut app.category_index,
            &mut app.category_scroll,
            app.finance.categories.len(),
            page,
        ),
        Screen::Reports => app.report_scroll += 1,
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Alerts => scroll_up(&mut app.alert_index, &mut app.alert_scroll),
        Screen::Categories => scroll_up(&mut app.category_index, &mut app.category_scroll),
        Screen::Reports => app.report_scroll = app.report_scroll.saturating_sub(1),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Alerts => scroll_to_top(&mut app.alert_index, &mut app.alert_scroll),
        Screen::Categories => scroll_to_top(&mut app.category_index, &mut app.category_scroll),
        Screen::Reports => app.report_scroll = 0,
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Alerts => scroll_to_bottom(
            &mut app.alert_index,
            &mut app.alert_scroll,
            app.finance.alerts.len(),
            page,
        ),
        Screen::Categories => scroll_to_bottom(
            &mut app.category_index,
            &mut app.category_scroll,
            app.finance.categories.len(),
            page,
        ),
        Screen::Reports | Screen::Dashboard => {}
    }
}
