use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_percent, format_won, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(8),    // Utilization by project
            Constraint::Length(9), // Recent expenses
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_utilization(f, chunks[1], app);
    render_recent_expenses(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let balance_color = if app.portfolio.total_balance >= 0 {
        theme::GREEN
    } else {
        theme::RED
    };

    render_card(
        f,
        cards[0],
        "Projects",
        app.projects.len().to_string(),
        theme::ACCENT,
        Some(format!("{} expenses", app.expenses.len())),
    );
    render_card(
        f,
        cards[1],
        "Total Budget",
        format_won(app.portfolio.total_budget),
        theme::TEXT,
        None,
    );
    render_card(
        f,
        cards[2],
        "Total Spent",
        format_won(app.portfolio.total_spent),
        theme::RED,
        None,
    );
    render_card(
        f,
        cards[3],
        "Balance",
        format_won(app.portfolio.total_balance),
        balance_color,
        None,
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub_text, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_utilization(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Budget Utilization ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.projects.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No projects yet. Create one with :new",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .projects
        .iter()
        .zip(&app.project_summaries)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(project, summary)| {
            let percent = summary
                .utilization
                .and_then(|p| p.to_f64())
                .unwrap_or(0.0);
            let color = theme::utilization_color(percent);

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<20}", truncate(&project.code, 18)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:<26}", truncate(&project.title, 24)),
                    theme::dim_style(),
                ),
                Span::styled(
                    format!(
                        "{:>14} / {:<14} ",
                        format_won(summary.total_spent),
                        format_won(project.total_budget)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(summary.utilization, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {}", format_percent(summary.utilization)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_recent_expenses(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Recent Expenses ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.expenses.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses yet. Record one with :expense",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .expenses
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|expense| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", expense.date), theme::dim_style()),
                Span::styled(
                    format!("{:<18}", truncate(app.project_code(expense.project_id), 16)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:<12}", expense.category),
                    Style::default().fg(theme::category_color(&expense.category)),
                ),
                Span::styled(
                    format!("{:>14}  ", format_won(expense.amount)),
                    theme::normal_style(),
                ),
                Span::styled(truncate(&expense.description, 30), theme::dim_style()),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
