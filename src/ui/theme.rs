use ratatui::style::{Color, Modifier, Style};

use crate::alerts::Urgency;
use crate::report::SavingsHealth;

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const HEADER_FG: Color = Color::Rgb(205, 214, 244);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const ORANGE: Color = Color::Rgb(250, 179, 135);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(127, 132, 156);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const COMMAND_BG: Color = Color::Rgb(24, 24, 37);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn income_style() -> Style {
    Style::default().fg(GREEN)
}

pub(crate) fn expense_style() -> Style {
    Style::default().fg(RED)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

pub(crate) fn title_style() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD)
}

pub(crate) fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::DueToday => RED,
        Urgency::DueTomorrow => ORANGE,
        Urgency::Urgent => YELLOW,
        Urgency::Upcoming => ACCENT,
        Urgency::Later => TEXT_DIM,
    }
}

pub(crate) fn health_color(health: SavingsHealth) -> Color {
    match health {
        SavingsHealth::Healthy => GREEN,
        SavingsHealth::Acceptable => ACCENT,
        SavingsHealth::NeedsAttention => YELLOW,
        SavingsHealth::Critical => RED,
    }
}

/// Parses a `#rrggbb` category color, falling back to the dim text color.
pub(crate) fn hex_color(hex: &str) -> Color {
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
    };
    match (hex.starts_with('#'), parse(1..3), parse(3..5), parse(5..7)) {
        (true, Some(r), Some(g), Some(b)) if hex.len() == 7 => Color::Rgb(r, g, b),
        _ => TEXT_DIM,
    }
}
