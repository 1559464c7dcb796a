use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::allocation;
use crate::ui::app::{App, SCALAR_FIELDS};
use crate::ui::theme;
use crate::ui::util::format_won;

const FIELD_LABELS: [&str; SCALAR_FIELDS] = [
    "Title",
    "Code",
    "Type",
    "Agency",
    "Start date",
    "End date",
    "Total budget",
    "Direct cost %",
];

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_fields(f, chunks[0], app);
    render_preview(f, chunks[1], app);
}

fn render_fields(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let title = if form.editing_id.is_some() {
        " Edit Project "
    } else {
        " New Project "
    };

    let mut items: Vec<ListItem> = Vec::with_capacity(form.field_count() + 2);

    for (i, label) in FIELD_LABELS.iter().enumerate() {
        items.push(field_item(app, i, label, form.value(i)));
    }

    items.push(ListItem::new(Line::from(Span::styled(
        " Category ratios (must sum to 100%)",
        theme::dim_style(),
    ))));

    for (offset, (category, input)) in form.ratios.iter().enumerate() {
        let i = SCALAR_FIELDS + offset;
        items.push(field_item(app, i, category, &format!("{input}%")));
    }

    let save_style = if form.field_index == form.save_index() {
        theme::selected_style()
    } else {
        Style::default()
            .fg(theme::GREEN)
            .add_modifier(Modifier::BOLD)
    };
    items.push(ListItem::new(Line::from(Span::styled(
        "  [ Save ]",
        save_style,
    ))));

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}

fn field_item(app: &App, index: usize, label: &str, value: &str) -> ListItem<'static> {
    let selected = app.form.field_index == index;
    let label_style = if selected {
        theme::selected_style()
    } else {
        theme::normal_style()
    };
    let value_style = if selected {
        theme::selected_style()
    } else {
        Style::default().fg(theme::ACCENT)
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("  {label:<14}"), label_style),
        Span::styled(value.to_string(), value_style),
    ]))
}

fn render_preview(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let direct = form.direct_cost();
    let sum = form.ratio_sum();
    let balanced = allocation::ratios_balanced(&form.category_ratios());

    let sum_span = if balanced {
        Span::styled(
            format!("Ratio sum: {}% ✓", sum.normalize()),
            Style::default().fg(theme::GREEN),
        )
    } else {
        Span::styled(
            format!("Ratio sum: {}% (need 100%)", sum.normalize()),
            Style::default().fg(theme::RED),
        )
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Total budget  ", theme::dim_style()),
            Span::styled(format_won(form.total_budget_value()), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("Direct cost   ", theme::dim_style()),
            Span::styled(
                format_won(direct.floor().to_i64().unwrap_or(0)),
                theme::normal_style(),
            ),
            Span::styled(
                format!("  ({}%)", form.direct_cost_ratio_value().normalize()),
                theme::dim_style(),
            ),
        ]),
        Line::from(""),
        Line::from(sum_span),
        Line::from(""),
    ];

    let preview = form.allocation_preview();
    for (category, input) in &form.ratios {
        let amount = preview.get(category).copied().unwrap_or(0);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{category:<10}"),
                Style::default().fg(theme::category_color(category)),
            ),
            Span::styled(format!("{input:>6}%  "), theme::dim_style()),
            Span::styled(format_won(amount), theme::normal_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Amounts are floored; a few won may go unallocated",
        theme::dim_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Allocation Preview ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
