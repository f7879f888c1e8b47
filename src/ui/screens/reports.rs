use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::report::{CategoryTotal, MonthlyReport};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{bar, format_amount, format_pct, truncate};

const BAR_WIDTH: usize = 16;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let report = app.finance.report(app.month);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    render_health(f, chunks[0], &report);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let mut expense_lines = breakdown_lines(&report.expenses_by_category, report.expense);
    expense_lines.push(Line::from(""));
    expense_lines.extend(split_lines(&report));
    render_panel(f, cols[0], " Expenses by category ", expense_lines, app.report_scroll);
    render_panel(
        f,
        cols[1],
        " Incomes by category ",
        breakdown_lines(&report.incomes_by_category, report.income),
        app.report_scroll,
    );
}

fn render_health(f: &mut Frame, area: Rect, report: &MonthlyReport) {
    let color = theme::health_color(report.health);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", report.health.title()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "· savings rate {} · balance {}",
                    format_pct(report.savings_rate),
                    format_amount(report.balance)
                ),
                theme::normal_style(),
            ),
        ]),
        Line::from(Span::styled(report.advice(), theme::dim_style())),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" Financial health · {} ", report.month.title()),
            theme::title_style(),
        ));
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn breakdown_lines(groups: &[CategoryTotal], total: rust_decimal::Decimal) -> Vec<Line<'static>> {
    if groups.is_empty() {
        return vec![Line::from(Span::styled(
            "Nothing recorded this month",
            theme::dim_style(),
        ))];
    }
    groups
        .iter()
        .map(|g| {
            let pct = if total > rust_decimal::Decimal::ZERO {
                g.total / total * rust_decimal::Decimal::ONE_HUNDRED
            } else {
                rust_decimal::Decimal::ZERO
            };
            Line::from(vec![
                Span::styled(format!("{:<18}", truncate(&g.name, 18)), theme::normal_style()),
                Span::styled(bar(pct, BAR_WIDTH), Style::default().fg(theme::ACCENT)),
                Span::styled(
                    format!(" {:>14} ({})", format_amount(g.total), g.count),
                    theme::dim_style(),
                ),
            ])
        })
        .collect()
}

fn split_lines(report: &MonthlyReport) -> Vec<Line<'static>> {
    let split = &report.split;
    vec![
        Line::from(Span::styled(
            "Fixed vs variable",
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Fixed"), theme::normal_style()),
            Span::styled(bar(split.fixed_pct, BAR_WIDTH), Style::default().fg(theme::RED)),
            Span::styled(
                format!(" {:>14} ({:.0}%)", format_amount(split.fixed), split.fixed_pct),
                theme::dim_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Variable"), theme::normal_style()),
            Span::styled(bar(split.variable_pct, BAR_WIDTH), Style::default().fg(theme::GREEN)),
            Span::styled(
                format!(
                    " {:>14} ({:.0}%)",
                    format_amount(split.variable),
                    split.variable_pct
                ),
                theme::dim_style(),
            ),
        ]),
    ]
}

fn render_panel(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title.to_string(), theme::title_style()));
    let offset = u16::try_from(scroll).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)).block(block), area);
}
