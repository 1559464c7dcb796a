use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::auth::AccessGate;
use crate::db::Database;
use crate::ui::app::{App, InputMode, ProjectsStep, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database, gate: AccessGate) -> Result<()> {
    let mut app = App::new(gate);
    if app.gate.is_authorized() {
        app.refresh_all(db)?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if !app.gate.is_authorized() {
                handle_login_input(key, app, db)?;
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Search => handle_search_input(key, app),
                InputMode::Editing => handle_editing_input(key, app),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_login_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Enter => {
            let granted = app.gate.attempt(&app.passphrase_input)?;
            app.passphrase_input.clear();
            if granted {
                app.status_message.clear();
                app.refresh_all(db)?;
            } else {
                app.set_status("Wrong passphrase");
            }
        }
        KeyCode::Esc => {
            app.passphrase_input.clear();
            app.status_message.clear();
        }
        KeyCode::Backspace => {
            app.passphrase_input.pop();
        }
        KeyCode::Char(c) => {
            app.passphrase_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Projects)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Expenses)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Enter => handle_enter(app, db)?,
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('+') | KeyCode::Char('=') => handle_adjust_field(app, 1),
        KeyCode::Char('-') => handle_adjust_field(app, -1),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('e')
            if app.screen == Screen::Projects && app.projects_step != ProjectsStep::Form =>
        {
            commands::handle_command("edit", app, db)?;
        }
        KeyCode::Char('a')
            if app.screen == Screen::Projects && app.projects_step == ProjectsStep::Detail =>
        {
            if let Some(code) = app.selected_project().map(|p| p.code.clone()) {
                app.input_mode = InputMode::Command;
                app.command_input = format!("expense {code} ");
            }
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.apply_expense_filters();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            live_search(app);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            live_search(app);
        }
        _ => {}
    }
}

/// Filter as you type, from the in-memory snapshot.
fn live_search(app: &mut App) {
    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.apply_expense_filters();
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            let value = app.command_input.trim().to_string();
            let index = app.form.field_index;
            app.form.set_value(index, value);
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    if screen == Screen::Projects {
        app.projects_step = ProjectsStep::List;
    }
    app.refresh_all(db)?;
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Projects => match app.projects_step {
            ProjectsStep::List => scroll_down(
                &mut app.project_index,
                &mut app.project_scroll,
                app.projects.len(),
                page,
            ),
            ProjectsStep::Form => {
                if app.form.field_index + 1 < app.form.field_count() {
                    app.form.field_index += 1;
                }
            }
            ProjectsStep::Detail => {}
        },
        Screen::Expenses => scroll_down(
            &mut app.expense_index,
            &mut app.expense_scroll,
            app.expense_rows.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Projects => match app.projects_step {
            ProjectsStep::List => scroll_up(&mut app.project_index, &mut app.project_scroll),
            ProjectsStep::Form => {
                app.form.field_index = app.form.field_index.saturating_sub(1);
            }
            ProjectsStep::Detail => {}
        },
        Screen::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_enter(app: &mut App, db: &mut Database) -> Result<()> {
    if app.screen != Screen::Projects {
        return Ok(());
    }
    match app.projects_step {
        ProjectsStep::List => {
            if !app.projects.is_empty() {
                app.projects_step = ProjectsStep::Detail;
            }
        }
        ProjectsStep::Form => {
            if app.form.on_save_row() {
                save_form(app, db)?;
            } else if app.form.is_cycle_field() {
                app.form.cycle_field(1);
            } else {
                let value = app.form.value(app.form.field_index).to_string();
                app.command_input = value;
                app.input_mode = InputMode::Editing;
            }
        }
        ProjectsStep::Detail => {}
    }
    Ok(())
}

fn save_form(app: &mut App, db: &mut Database) -> Result<()> {
    let project = match app.form.validate_and_build() {
        Ok(project) => project,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };

    let editing = project.id.is_some();
    let persisted = if editing {
        db.update_project(&project)
    } else {
        db.insert_project(&project).map(|_| ())
    };
    // A failed write leaves the form up so the entry can be retried
    if let Err(e) = persisted {
        app.set_status(format!("Save failed: {e:#}"));
        return Ok(());
    }

    app.refresh_all(db)?;
    if let Some(idx) = app
        .projects
        .iter()
        .position(|p| if editing { p.id == project.id } else { p.code == project.code })
    {
        app.project_index = idx;
    }
    app.projects_step = ProjectsStep::Detail;
    app.set_status(format!(
        "{} project {}",
        if editing { "Updated" } else { "Created" },
        project.code
    ));
    Ok(())
}

fn handle_escape(app: &mut App) {
    if app.screen == Screen::Projects {
        match app.projects_step {
            ProjectsStep::Form => {
                app.projects_step = if app.form.editing_id.is_some() {
                    ProjectsStep::Detail
                } else {
                    ProjectsStep::List
                };
                return;
            }
            ProjectsStep::Detail => {
                app.projects_step = ProjectsStep::List;
                return;
            }
            ProjectsStep::List => {}
        }
    }
    app.status_message.clear();
    if !app.search_input.is_empty() {
        app.search_input.clear();
        app.apply_expense_filters();
    }
}

fn handle_adjust_field(app: &mut App, delta: i32) {
    if app.screen == Screen::Projects && app.projects_step == ProjectsStep::Form {
        app.form.adjust_field(delta);
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Projects if app.projects_step == ProjectsStep::List => {
            scroll_to_top(&mut app.project_index, &mut app.project_scroll);
        }
        Screen::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        _ => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Projects if app.projects_step == ProjectsStep::List => scroll_to_bottom(
            &mut app.project_index,
            &mut app.project_scroll,
            app.projects.len(),
            page,
        ),
        Screen::Expenses => scroll_to_bottom(
            &mut app.expense_index,
            &mut app.expense_scroll,
            app.expense_rows.len(),
            page,
        ),
        _ => {}
    }
}
