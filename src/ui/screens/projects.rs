use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::models::{Project, BUDGET_CATEGORIES};
use crate::rollup;
use crate::ui::app::{App, ProjectsStep};
use crate::ui::theme;
use crate::ui::util::{format_percent, format_won, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    match app.projects_step {
        ProjectsStep::List => render_list(f, area, app),
        ProjectsStep::Detail => render_detail(f, area, app),
        ProjectsStep::Form => super::form::render(f, area, app),
    }
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    if app.projects.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No projects yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :new",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Projects (0) ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Code", "Title", "Type", "Agency", "Period", "Budget"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .projects
        .iter()
        .enumerate()
        .skip(app.project_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, project)| {
            let style = if i == app.project_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(truncate(&project.code, 18)),
                Cell::from(truncate(&project.title, 32)),
                Cell::from(project.project_type.clone()),
                Cell::from(truncate(&project.agency, 12)),
                Cell::from(project.period()),
                Cell::from(format_won(project.total_budget)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(20),
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(25),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Projects ({}) ", app.projects.len()),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(project) = app.selected_project() else {
        render_list(f, area, app);
        return;
    };
    let Some(summary) = app.selected_summary() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),  // Header
            Constraint::Min(8),     // Category table
            Constraint::Length(8),  // Recent expenses
        ])
        .split(area);

    render_header(f, chunks[0], project, summary);
    render_categories(f, chunks[1], app, project);
    render_project_expenses(f, chunks[2], app, project);
}

fn render_header(
    f: &mut Frame,
    area: Rect,
    project: &Project,
    summary: &rollup::ProjectSummary,
) {
    let percent = summary.utilization.and_then(|p| p.to_f64()).unwrap_or(0.0);
    let color = theme::utilization_color(percent);

    let balance_color = if summary.balance < 0 {
        theme::RED
    } else {
        theme::GREEN
    };

    let lines = vec![
        Line::from(Span::styled(
            project.title.clone(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(project.code.clone(), theme::dim_style()),
            Span::styled("  |  ", Style::default().fg(theme::OVERLAY)),
            Span::styled(project.project_type.clone(), theme::dim_style()),
            Span::styled("  |  ", Style::default().fg(theme::OVERLAY)),
            Span::styled(project.agency.clone(), theme::dim_style()),
            Span::styled("  |  ", Style::default().fg(theme::OVERLAY)),
            Span::styled(project.period(), theme::dim_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Budget ", theme::dim_style()),
            Span::styled(format_won(project.total_budget), theme::normal_style()),
            Span::styled("   Spent ", theme::dim_style()),
            Span::styled(
                format_won(summary.total_spent),
                Style::default().fg(theme::RED),
            ),
            Span::styled("   Balance ", theme::dim_style()),
            Span::styled(
                format_won(summary.balance),
                Style::default().fg(balance_color),
            ),
        ]),
        Line::from(vec![
            Span::styled("Used   ", theme::dim_style()),
            Span::styled(progress_bar(summary.utilization, 40), Style::default().fg(color)),
            Span::styled(
                format!(" {}", format_percent(summary.utilization)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App, project: &Project) {
    let header_cells = ["Category", "Allocated", "Spent", "Balance", "Used"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    // The five fixed categories, then whatever extra keys the allocation has
    let mut categories: Vec<&str> = BUDGET_CATEGORIES.to_vec();
    for category in project.allocation.keys() {
        if !categories.contains(&category.as_str()) {
            categories.push(category);
        }
    }

    let rows: Vec<Row> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let summary = rollup::summarize_category(project, &app.expenses, category);
            let percent = summary.percent.to_f64().unwrap_or(0.0);
            let color = theme::category_percent_color(percent);

            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(Span::styled(
                    (*category).to_string(),
                    Style::default().fg(theme::category_color(category)),
                )),
                Cell::from(format_won(summary.allocated)),
                Cell::from(format_won(summary.spent)),
                Cell::from(Span::styled(
                    format_won(summary.balance),
                    Style::default().fg(if summary.balance < 0 {
                        theme::RED
                    } else {
                        theme::GREEN
                    }),
                )),
                Cell::from(Span::styled(
                    format!(
                        "{} {}",
                        progress_bar(Some(summary.percent), 12),
                        format_percent(Some(summary.percent))
                    ),
                    Style::default().fg(color),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Budget by Category ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_project_expenses(f: &mut Frame, area: Rect, app: &App, project: &Project) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Recent Expenses ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let items: Vec<ListItem> = app
        .expenses
        .iter()
        .filter(|e| Some(e.project_id) == project.id)
        .take(area.height.saturating_sub(2) as usize)
        .map(|expense| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", expense.date), theme::dim_style()),
                Span::styled(
                    format!("{:<12}", expense.category),
                    Style::default().fg(theme::category_color(&expense.category)),
                ),
                Span::styled(
                    format!("{:>14}  ", format_won(expense.amount)),
                    theme::normal_style(),
                ),
                Span::styled(truncate(&expense.description, 40), theme::dim_style()),
            ]))
        })
        .collect();

    if items.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses for this project. Press a to record one",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    f.render_widget(List::new(items).block(block), area);
}
