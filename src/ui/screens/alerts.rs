use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::alerts;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_alert_table(f, chunks[0], app);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(chunks[1]);
    render_stats(f, side[0], app);
    render_suggestions(f, side[1], app);
}

fn render_alert_table(f: &mut Frame, area: Rect, app: &App) {
    let annotated = alerts::annotate(&app.finance.alerts, app.today.day());

    let header = Row::new(vec!["Day", "Name", "Amount", "Category", "Next"])
        .style(theme::header_style())
        .height(1);

    let rows: Vec<Row> = annotated
        .iter()
        .enumerate()
        .skip(app.alert_scroll)
        .take(app.visible_rows)
        .map(|(i, p)| {
            let alert = p.alert;
            let next = if !alert.is_active {
                Span::styled("Paused", theme::dim_style())
            } else if !p.urgency.is_shown() {
                Span::styled(format!("In {} days", p.days_remaining), theme::dim_style())
            } else {
                Span::styled(
                    p.urgency.describe(p.days_remaining),
                    Style::default()
                        .fg(theme::urgency_color(p.urgency))
                        .add_modifier(Modifier::BOLD),
                )
            };
            let category = alert
                .category
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            let style = if i == app.alert_index {
                theme::selected_style()
            } else if !alert.is_active {
                theme::dim_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(format!("{:>2}", alert.due_day)),
                Cell::from(truncate(&alert.name, 24)),
                Cell::from(format_amount(alert.amount)),
                Cell::from(truncate(&category, 16)),
                Cell::from(next),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                format!(" Alerts ({}) ", app.finance.alerts.len()),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let stats = alerts::stats(&app.finance.alerts, app.today.day());
    let lines = vec![
        Line::from(vec![
            Span::styled("Active:        ", theme::dim_style()),
            Span::styled(stats.active.to_string(), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("Monthly total: ", theme::dim_style()),
            Span::styled(format_amount(stats.monthly_total), theme::expense_style()),
        ]),
        Line::from(vec![
            Span::styled("Due this week: ", theme::dim_style()),
            Span::styled(
                stats.due_this_week.to_string(),
                Style::default().fg(theme::YELLOW),
            ),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Summary ", theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &App) {
    let missing = app.finance.suggest_alerts(app.today);
    let lines: Vec<Line> = if missing.is_empty() {
        vec![Line::from(Span::styled(
            "Every fixed expense has an alert",
            theme::dim_style(),
        ))]
    } else {
        missing
            .iter()
            .map(|e| {
                Line::from(vec![
                    Span::styled(format!("day {:>2}  ", e.date.day()), theme::dim_style()),
                    Span::styled(truncate(&e.description, 18), theme::normal_style()),
                    Span::styled(format!("  {}", format_amount(e.amount)), theme::dim_style()),
                ])
            })
            .collect()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Fixed expenses without alert ", theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
