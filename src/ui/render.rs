use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;
use crate::alerts;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let banner = due_soon_banner(app);
    let banner_height = u16::from(banner.is_some()) + u16::from(app.show_welcome);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Tab bar
            Constraint::Length(banner_height), // Welcome + due-soon banners
            Constraint::Min(5),                // Main content
            Constraint::Length(1),             // Status bar
            Constraint::Length(1),             // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_banners(f, chunks[1], app, banner);
    render_screen(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
    render_command_bar(f, chunks[4], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

/// Alerts due within the notification window, as one line.
pub(crate) fn due_soon_banner(app: &App) -> Option<String> {
    let due = app
        .finance
        .upcoming_alerts(app.today, alerts::NOTIFY_WINDOW);
    if due.is_empty() {
        return None;
    }
    let parts: Vec<String> = due
        .iter()
        .map(|p| format!("{} ({})", p.alert.name, p.urgency.describe(p.days_remaining)))
        .collect();
    Some(format!(" ⚠ Payments coming up: {}", parts.join(" · ")))
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), Style::default().fg(theme::TEXT_DIM)),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("{num}:{s}"),
                    Style::default().fg(theme::TEXT_DIM),
                ))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

fn render_banners(f: &mut Frame, area: Rect, app: &App, due: Option<String>) {
    let mut lines = Vec::new();
    if app.show_welcome {
        lines.push(Line::from(Span::styled(
            " Welcome to MiFinanzas! Record incomes and expenses with the CLI, \
             watch your month here. Press w to dismiss.",
            Style::default().fg(theme::HEADER_BG).bg(theme::ACCENT),
        )));
    }
    if let Some(text) = due {
        lines.push(Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme::HEADER_BG)
                .bg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, area, app),
        Screen::Alerts => super::screens::alerts::render(f, area, app),
        Screen::Reports => super::screens::reports::render(f, area, app),
        Screen::Categories => super::screens::categories::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
        InputMode::Command => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::GREEN)
            .add_modifier(Modifier::BOLD),
        InputMode::Confirm => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::RED)
            .add_modifier(Modifier::BOLD),
    };

    let user = app
        .finance
        .session()
        .user()
        .map_or_else(|| "not signed in".to_string(), |u| u.to_string());
    let info = format!(" {} | {} | {user}", app.screen, app.month.title());

    let right = match app.screen {
        _ if app.finance.is_loading() => " loading... ",
        Screen::Dashboard => " H/L month | r refresh | ? help ",
        Screen::Alerts => " a toggle | :delete-alert | :suggest | ? help ",
        Screen::Reports => " H/L month | j/k scroll | :export | ? help ",
        Screen::Categories => " :delete-category | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.len() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, theme::normal_style()))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " MiFinanzas Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        help_line("  j/k or Up/Down   Move cursor           1-4        Switch tabs"),
        help_line("  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom"),
        help_line("  H/L              Prev/Next month       Ctrl-q     Quit"),
        Line::from(""),
        section("Actions"),
        help_line("  :               Command mode           r          Refresh"),
        help_line("  a (Alerts)      Pause/resume alert     w          Dismiss welcome"),
        Line::from(""),
        section("Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<18} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 80.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
