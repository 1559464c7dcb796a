use ratatui::style::{Color, Modifier, Style};

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const HEADER_FG: Color = Color::Rgb(205, 214, 244);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const MAUVE: Color = Color::Rgb(203, 166, 247);
pub(crate) const PINK: Color = Color::Rgb(245, 194, 231);
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

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

/// Accent color for a budget category chip.
pub(crate) fn category_color(category: &str) -> Color {
    match category {
        "인건비" => ACCENT,
        "학생인건비" => MAUVE,
        "재료비" => GREEN,
        "연구활동비" => YELLOW,
        "연구수당" => PINK,
        _ => TEXT_DIM,
    }
}

/// Project-level utilization: alarming past 90%, warning past 70%.
pub(crate) fn utilization_color(percent: f64) -> Color {
    if percent > 90.0 {
        RED
    } else if percent > 70.0 {
        YELLOW
    } else {
        GREEN
    }
}

/// Category-level utilization: overspend is the alarm threshold.
pub(crate) fn category_percent_color(percent: f64) -> Color {
    if percent > 100.0 {
        RED
    } else if percent > 90.0 {
        YELLOW
    } else {
        GREEN
    }
}
