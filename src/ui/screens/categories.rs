use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::models::CategoryKind;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["", "Name", "Kind", "Color", "Records"])
        .style(theme::header_style())
        .height(1);

    let rows: Vec<Row> = app
        .finance
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(app.visible_rows)
        .map(|(i, cat)| {
            let uses = cat.id.map_or(0, |id| {
                let incomes = app
                    .finance
                    .incomes
                    .iter()
                    .filter(|t| t.category_id == Some(id))
                    .count();
                let expenses = app
                    .finance
                    .expenses
                    .iter()
                    .filter(|t| t.category_id == Some(id))
                    .count();
                incomes + expenses
            });
            let kind_style = match cat.kind {
                CategoryKind::Income => theme::income_style(),
                CategoryKind::Expense => theme::expense_style(),
            };
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    cat.icon.glyph(),
                    Style::default().fg(theme::hex_color(&cat.color)),
                )),
                Cell::from(truncate(&cat.name, 28)),
                Cell::from(Span::styled(cat.kind.label(), kind_style)),
                Cell::from(cat.color.clone()),
                Cell::from(uses.to_string()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                format!(" Categories ({}) ", app.finance.categories.len()),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}
