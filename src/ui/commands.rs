use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Local;

use super::app::{App, ProjectForm, ProjectsStep, Screen};
use crate::db::Database;
use crate::models::Expense;
use crate::ui::util::{format_won, parse_won};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit GranTUI", cmd_quit, r);
    register_command!("quit", "Quit GranTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("p", "Go to Projects", cmd_projects, r);
    register_command!("projects", "Go to Projects", cmd_projects, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("new", "Create a new project", cmd_new, r);
    register_command!("edit", "Edit the selected project", cmd_edit, r);
    register_command!(
        "project",
        "Open a project by code (e.g. :project 2024R1A1A1234567)",
        cmd_project,
        r
    );
    register_command!(
        "expense",
        "Record an expense (e.g. :expense 2024R1 재료비 500,000 시약 구매)",
        cmd_expense,
        r
    );
    register_command!(
        "search",
        "Search expenses (e.g. :search 시약)",
        cmd_search,
        r
    );
    register_command!("s", "Search expenses (e.g. :s 시약)", cmd_search, r);
    register_command!(
        "filter-project",
        "Filter expenses by project code (e.g. :filter-project 2024R1)",
        cmd_filter_project,
        r
    );
    register_command!(
        "fp",
        "Filter expenses by project code",
        cmd_filter_project,
        r
    );
    register_command!(
        "export",
        "Export expenses to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );
    register_command!("logout", "Lock the tracker again", cmd_logout, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2) // skip short aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_all(db)?;
    Ok(())
}

fn cmd_projects(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Projects;
    app.projects_step = ProjectsStep::List;
    app.refresh_all(db)?;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh_all(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_new(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.form = ProjectForm::new();
    app.screen = Screen::Projects;
    app.projects_step = ProjectsStep::Form;
    app.set_status("New project — j/k to move, Enter to edit a field");
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Projects {
        app.set_status("Navigate to Projects and select one first");
        return Ok(());
    }
    let Some(project) = app.selected_project().cloned() else {
        app.set_status("No project selected");
        return Ok(());
    };
    app.form = ProjectForm::edit(&project);
    app.projects_step = ProjectsStep::Form;
    app.set_status("Editing — ratios are derived from stored amounts");
    Ok(())
}

fn cmd_project(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :project <code>");
        return Ok(());
    }

    if let Some(idx) = app.projects.iter().position(|p| p.code == args) {
        app.project_index = idx;
        app.screen = Screen::Projects;
        app.projects_step = ProjectsStep::Detail;
    } else {
        app.set_status(format!("Project '{args}' not found"));
    }
    Ok(())
}

fn cmd_expense(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :expense <code> <category> <amount> [date] <description>";

    let tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.len() < 4 {
        app.set_status(USAGE);
        return Ok(());
    }

    let code = tokens[0];
    let category = tokens[1];
    let Some(amount) = parse_won(tokens[2]) else {
        app.set_status(format!("Invalid amount: {}", tokens[2]));
        return Ok(());
    };
    if amount < 0 {
        app.set_status("Amount must be non-negative");
        return Ok(());
    }

    // An explicit date is optional; without one the expense lands today
    let rest = &tokens[3..];
    let (date, description) =
        if chrono::NaiveDate::parse_from_str(rest[0], "%Y-%m-%d").is_ok() {
            (rest[0].to_string(), rest[1..].join(" "))
        } else {
            (
                Local::now().date_naive().format("%Y-%m-%d").to_string(),
                rest.join(" "),
            )
        };
    if description.is_empty() {
        app.set_status("Description is required");
        return Ok(());
    }

    let Some(project) = db.get_project_by_code(code)? else {
        app.set_status(format!("Project '{code}' not found"));
        return Ok(());
    };
    let Some(project_id) = project.id else {
        app.set_status(format!("Project '{code}' not found"));
        return Ok(());
    };

    let expense = Expense::new(
        project_id,
        category.to_string(),
        amount,
        date,
        description,
    );
    // A failed write leaves nothing persisted; the command can be retried
    if let Err(e) = db.insert_expense(&expense) {
        app.set_status(format!("Save failed: {e:#}"));
        return Ok(());
    }
    app.refresh_all(db)?;
    app.set_status(format!(
        "Recorded {category} {} against {code}",
        format_won(amount)
    ));
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.apply_expense_filters();

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

fn cmd_filter_project(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.expense_filter_project = None;
        app.screen = Screen::Expenses;
        app.apply_expense_filters();
        app.set_status("Project filter cleared - showing all expenses");
        return Ok(());
    }

    let found = app
        .projects
        .iter()
        .find(|p| p.code == args)
        .map(|p| (p.id, p.code.clone()));
    if let Some((id, code)) = found {
        app.expense_filter_project = id;
        app.screen = Screen::Expenses;
        app.expense_index = 0;
        app.expense_scroll = 0;
        app.apply_expense_filters();
        app.set_status(format!("Filtering by project: {code}"));
    } else {
        let codes = app
            .projects
            .iter()
            .map(|p| p.code.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        app.set_status(format!("Project not found. Available: {codes}"));
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/granttui-expenses.csv")
    } else {
        crate::run::shellexpand(args)
    };

    let count = db.export_to_csv(&path, app.expense_filter_project)?;
    if count == 0 {
        app.set_status("No expenses to export");
    } else {
        app.set_status(format!("Exported {count} expenses to {path}"));
    }
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.gate.revoke()?;
    app.passphrase_input.clear();
    app.set_status("Locked");
    Ok(())
}
