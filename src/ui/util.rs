use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub(crate) const CURRENCY: &str = "S/";

static NOT_AMOUNT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^0-9.\-]").ok());

/// Format a decimal amount in soles with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"S/ 1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{CURRENCY} {with_commas}.{dec_part}")
    } else {
        format!("{CURRENCY} {with_commas}.{dec_part}")
    }
}

/// Parse user-typed money such as `"S/ 1,250.50"`. Everything but digits,
/// `.` and `-` is dropped; unparseable input yields zero.
pub(crate) fn parse_amount(input: &str) -> Decimal {
    let cleaned = match NOT_AMOUNT_RE.as_ref() {
        Some(re) => re.replace_all(input, "").into_owned(),
        None => input.trim().to_string(),
    };
    Decimal::from_str(&cleaned).unwrap_or_default()
}

/// Percentage with one decimal place, e.g. `"20.0%"`.
pub(crate) fn format_pct(pct: Decimal) -> String {
    format!("{pct:.1}%")
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Horizontal bar of `width` cells filled to `pct` percent.
pub(crate) fn bar(pct: Decimal, width: usize) -> String {
    let clamped = pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Keep a cursor inside a list that may have shrunk.
pub(crate) fn clamp_index(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
