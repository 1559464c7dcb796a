use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format a won amount with thousand separators and the unit suffix.
/// e.g. `1234567` → `"1,234,567원"`
pub(crate) fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let with_commas: String = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if amount < 0 {
        format!("-{with_commas}원")
    } else {
        format!("{with_commas}원")
    }
}

/// Format a percentage with one decimal place; `None` (no budget to measure
/// against) renders as a dash.
pub(crate) fn format_percent(percent: Option<Decimal>) -> String {
    match percent {
        Some(p) => format!("{:.1}%", p),
        None => "–".into(),
    }
}

/// Parse a won amount the way users type it: plain digits, with thousand
/// separators, or with the unit suffix.
pub(crate) fn parse_won(raw: &str) -> Option<i64> {
    let cleaned = raw.replace(',', "").replace('원', "");
    cleaned.trim().parse().ok()
}

/// Parse a percentage field; empty input counts as 0 so a cleared ratio
/// field drops the category rather than blocking the form.
pub(crate) fn parse_ratio(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    trimmed.parse().ok()
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

/// Render a utilization bar like `[████░░░░░░]`. `percent` beyond the bar is
/// clamped; the caller colors the result.
pub(crate) fn progress_bar(percent: Option<Decimal>, width: usize) -> String {
    let ratio = percent
        .and_then(|p| (p / Decimal::ONE_HUNDRED).to_f64())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
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
