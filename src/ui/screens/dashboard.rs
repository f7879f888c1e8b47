use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::alerts;
use crate::report::{quick_entry_ranking, recent_movements, MonthlyReport};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{bar, format_amount, format_pct, truncate};

const RECENT_LIMIT: usize = 10;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let report = app.finance.report(app.month);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Length(3), // Spent gauge
            Constraint::Min(8),    // Lists
        ])
        .split(area);

    render_summary_cards(f, chunks[0], &report);
    render_spent_gauge(f, chunks[1], &report);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_recent(f, lists[0], app);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(lists[1]);
    render_next_charges(f, side[0], app);
    render_quick_picks(f, side[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Income",
        format_amount(report.income),
        theme::GREEN,
        format!("{} records", report.incomes.len()),
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        format_amount(report.expense),
        theme::RED,
        format!("{} records", report.expenses.len()),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        format_amount(report.balance),
        if report.balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        report.month.title(),
    );
    render_card(
        f,
        cards[3],
        "Savings rate",
        format_pct(report.savings_rate),
        theme::health_color(report.health),
        report.health.title().to_string(),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_spent_gauge(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let width = (area.width as usize).saturating_sub(24).max(10);
    let color = if report.spent_pct > Decimal::ONE_HUNDRED {
        theme::RED
    } else {
        theme::ACCENT
    };
    let line = Line::from(vec![
        Span::styled(bar(report.spent_pct, width), Style::default().fg(color)),
        Span::styled(
            format!(" {} spent", format_pct(report.spent_pct)),
            theme::normal_style(),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Income spent ", theme::title_style()));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let movements = recent_movements(
        &app.finance.incomes,
        &app.finance.expenses,
        RECENT_LIMIT,
        false,
    );

    let header = Row::new(vec!["Date", "Description", "Category", "Amount"])
        .style(theme::header_style())
        .height(1);

    let rows: Vec<Row> = movements
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let category = m
                .category()
                .map(|c| format!("{} {}", c.icon.glyph(), c.name))
                .unwrap_or_else(|| "—".into());
            let amount_style = if m.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let row_style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(m.date().format("%d %b").to_string()),
                Cell::from(truncate(m.description(), 28)),
                Cell::from(truncate(&category, 18)),
                Cell::from(Span::styled(format_amount(m.signed_amount()), amount_style)),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(12),
            Constraint::Length(18),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Recent transactions ", theme::title_style())),
    );
    f.render_widget(table, area);
}

fn render_next_charges(f: &mut Frame, area: Rect, app: &App) {
    let due = app
        .finance
        .upcoming_alerts(app.today, alerts::DASHBOARD_WINDOW);
    let lines: Vec<Line> = if due.is_empty() {
        vec![Line::from(Span::styled(
            "Nothing due in the next days",
            theme::dim_style(),
        ))]
    } else {
        due.iter()
            .map(|p| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<14}", p.urgency.describe(p.days_remaining)),
                        Style::default().fg(theme::urgency_color(p.urgency)),
                    ),
                    Span::styled(truncate(&p.alert.name, 16), theme::normal_style()),
                    Span::styled(format!("  {}", format_amount(p.alert.amount)), theme::dim_style()),
                ])
            })
            .collect()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Next charges ", theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quick_picks(f: &mut Frame, area: Rect, app: &App) {
    let picks = quick_entry_ranking(&app.finance.categories, &app.finance.expenses, app.today);
    let lines: Vec<Line> = if picks.is_empty() {
        vec![Line::from(Span::styled(
            "No expenses in the last 30 days",
            theme::dim_style(),
        ))]
    } else {
        picks
            .iter()
            .map(|p| {
                let last = p.last_amount.map(format_amount).unwrap_or_default();
                Line::from(vec![
                    Span::styled(
                        format!("{} ", p.category.icon.glyph()),
                        Style::default().fg(theme::hex_color(&p.category.color)),
                    ),
                    Span::styled(
                        format!("{:<16}", truncate(&p.category.name, 16)),
                        theme::normal_style(),
                    ),
                    Span::styled(format!("{:>3}× ", p.count), theme::dim_style()),
                    Span::styled(last, theme::dim_style()),
                ])
            })
            .collect()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Quick entry ", theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
