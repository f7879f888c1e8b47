#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    // Japanese characters are multi-byte UTF-8
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

#[test]
fn test_truncate_emoji() {
    assert_eq!(truncate("🎉🎊🎈🎁", 3), "🎉🎊…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_mixed_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

#[test]
fn test_truncate_two_chars() {
    assert_eq!(truncate("hello", 2), "h…");
}

#[test]
fn test_truncate_single_char_string() {
    assert_eq!(truncate("a", 1), "a");
    assert_eq!(truncate("a", 5), "a");
}

#[test]
fn test_truncate_max_one_with_long_string() {
    // max=1 should always produce "…" for strings longer than 1
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("abc", 1), "…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "S/ 1,234.56");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99)), "S/ 999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "S/ 0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-500)), "-S/ 500.00");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000.00)), "S/ 10,000,000.00");
}

#[test]
fn test_format_amount_pads_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "S/ 1.50");
}

// ── parse_amount ───────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("45.90"), dec!(45.90));
}

#[test]
fn test_parse_amount_strips_currency_and_commas() {
    assert_eq!(parse_amount("S/ 1,250.50"), dec!(1250.50));
}

#[test]
fn test_parse_amount_negative() {
    assert_eq!(parse_amount("-12"), dec!(-12));
}

#[test]
fn test_parse_amount_garbage_is_zero() {
    assert_eq!(parse_amount("abc"), Decimal::ZERO);
    assert_eq!(parse_amount(""), Decimal::ZERO);
    assert_eq!(parse_amount("1.2.3"), Decimal::ZERO);
}

// ── format_pct / bar ───────────────────────────────────────

#[test]
fn test_format_pct() {
    assert_eq!(format_pct(dec!(20)), "20.0%");
    assert_eq!(format_pct(dec!(-16.7)), "-16.7%");
}

#[test]
fn test_bar_fill() {
    assert_eq!(bar(dec!(50), 4), "██░░");
    assert_eq!(bar(dec!(0), 3), "░░░");
    assert_eq!(bar(dec!(250), 3), "███");
    assert_eq!(bar(dec!(-10), 2), "░░");
}

// ── scrolling ──────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 2);
    scroll_down(&mut index, &mut scroll, 5, 3);
    assert_eq!((index, scroll), (4, 2));
}

#[test]
fn test_scroll_up_and_top_bottom() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_index_after_shrink() {
    let (mut index, mut scroll) = (7, 5);
    clamp_index(&mut index, &mut scroll, 3);
    assert_eq!((index, scroll), (2, 2));
    clamp_index(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
