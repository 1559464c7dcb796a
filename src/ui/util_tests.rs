#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── format_won ────────────────────────────────────────────────

#[test]
fn test_format_won() {
    assert_eq!(format_won(0), "0원");
    assert_eq!(format_won(500), "500원");
    assert_eq!(format_won(500_000), "500,000원");
    assert_eq!(format_won(100_000_000), "100,000,000원");
}

#[test]
fn test_format_won_negative() {
    assert_eq!(format_won(-1_500_000), "-1,500,000원");
}

// ── format_percent ────────────────────────────────────────────

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(Some(dec!(3.5))), "3.5%");
    assert_eq!(format_percent(Some(dec!(3.125))), "3.1%");
    assert_eq!(format_percent(Some(dec!(100))), "100.0%");
}

#[test]
fn test_format_percent_undefined() {
    assert_eq!(format_percent(None), "–");
}

// ── parsing ───────────────────────────────────────────────────

#[test]
fn test_parse_won() {
    assert_eq!(parse_won("500000"), Some(500_000));
    assert_eq!(parse_won("1,000,000"), Some(1_000_000));
    assert_eq!(parse_won("1,000,000원"), Some(1_000_000));
    assert_eq!(parse_won(" 42 "), Some(42));
    assert_eq!(parse_won("-300"), Some(-300));
    assert_eq!(parse_won("abc"), None);
    assert_eq!(parse_won(""), None);
}

#[test]
fn test_parse_ratio() {
    assert_eq!(parse_ratio("40"), Some(dec!(40)));
    assert_eq!(parse_ratio("12.5"), Some(dec!(12.5)));
    assert_eq!(parse_ratio(""), Some(dec!(0)));
    assert_eq!(parse_ratio("  "), Some(dec!(0)));
    assert_eq!(parse_ratio("4할"), None);
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello w…");
}

#[test]
fn test_truncate_multibyte() {
    // Korean titles must never split a character
    assert_eq!(truncate("의료 진단 시스템", 5), "의료 진…");
    assert_eq!(truncate("의료", 5), "의료");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

// ── progress_bar ──────────────────────────────────────────────

#[test]
fn test_progress_bar_empty_and_full() {
    assert_eq!(progress_bar(Some(dec!(0)), 10), "[░░░░░░░░░░]");
    assert_eq!(progress_bar(Some(dec!(100)), 10), "[██████████]");
}

#[test]
fn test_progress_bar_half() {
    assert_eq!(progress_bar(Some(dec!(50)), 10), "[█████░░░░░]");
}

#[test]
fn test_progress_bar_clamps_overspend() {
    assert_eq!(progress_bar(Some(dec!(175)), 10), "[██████████]");
}

#[test]
fn test_progress_bar_undefined_is_empty() {
    assert_eq!(progress_bar(None, 10), "[░░░░░░░░░░]");
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_and_up() {
    let (mut index, mut scroll) = (0, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (1, 0));

    scroll_down(&mut index, &mut scroll, 10, 3);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));

    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_jumps() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));

    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_jumps_empty_list() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 5);
    assert_eq!((index, scroll), (0, 0));
}
