use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;

/// Full-screen lock prompt shown until the gate grants access.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let background = Block::default().style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(background, area);

    let masked = "*".repeat(app.passphrase_input.chars().count());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GranTUI",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Research grant budget tracker",
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Passphrase: ", theme::normal_style()),
            Span::styled(masked, Style::default().fg(theme::YELLOW)),
            Span::styled("_", theme::dim_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            if app.status_message.is_empty() {
                String::new()
            } else {
                app.status_message.clone()
            },
            Style::default().fg(theme::RED),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter unlock · Ctrl-q quit",
            theme::dim_style(),
        )),
    ];

    let popup_width = 48.min(area.width.saturating_sub(4));
    let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(lines).centered().block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(popup, popup_area);
}
