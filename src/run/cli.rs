use anyhow::Result;
use std::path::Path;

use crate::auth::AccessGate;
use crate::db::Database;
use crate::rollup;
use crate::ui::util::{format_percent, format_won};

pub(crate) fn as_cli(args: &[String], db: &mut Database, gate: &AccessGate) -> Result<()> {
    match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("granttui {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    if !gate.is_authorized() {
        anyhow::bail!(
            "Locked. Launch the TUI and enter the passphrase first (set via {})",
            crate::auth::PASSPHRASE_VAR
        );
    }

    match args[1].as_str() {
        "summary" | "s" => cli_summary(db),
        "projects" => cli_projects(db),
        "export" => cli_export(&args[2..], db),
        "import" => cli_import(&args[2..], db),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("GranTUI — research grant budget tracker");
    println!();
    println!("Usage: granttui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary                       Print portfolio and per-project totals");
    println!("  projects                      List all projects");
    println!("  export [path]                 Export the expense ledger to CSV");
    println!("    --project <code>            Only this project's expenses");
    println!("  import <file.csv>             Import expenses (date,category,amount,description)");
    println!("    --project <code>            Project to import into (required)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_summary(db: &mut Database) -> Result<()> {
    let projects = db.get_projects()?;
    let expenses = db.get_expenses(None, None, None, None)?;

    let portfolio = rollup::summarize_all(&projects, &expenses);
    println!("Projects:     {}", projects.len());
    println!("Total budget: {}", format_won(portfolio.total_budget));
    println!("Total spent:  {}", format_won(portfolio.total_spent));
    println!("Balance:      {}", format_won(portfolio.total_balance));

    if projects.is_empty() {
        return Ok(());
    }

    println!();
    for project in &projects {
        let summary = rollup::summarize_project(project, &expenses);
        println!(
            "  {}  {}  spent {} of {}  ({})",
            project.code,
            project.title,
            format_won(summary.total_spent),
            format_won(project.total_budget),
            format_percent(summary.utilization),
        );
    }
    Ok(())
}

fn cli_projects(db: &mut Database) -> Result<()> {
    let projects = db.get_projects()?;
    if projects.is_empty() {
        println!("No projects. Launch the TUI and create one with :new");
        return Ok(());
    }

    for project in &projects {
        println!(
            "{}  {}  [{} / {}]  {}  {}",
            project.code,
            project.title,
            project.project_type,
            project.agency,
            project.period(),
            format_won(project.total_budget),
        );
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let project_id = project_flag(args, db)?;

    // Output path is the first non-flag argument
    let output_path = args
        .iter()
        .take_while(|a| a.as_str() != "--project")
        .find(|a| !a.starts_with('-'))
        .map(|a| crate::run::shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/granttui-expenses.csv")
        });

    let count = db.export_to_csv(&output_path, project_id)?;
    if count == 0 {
        println!("No expenses to export");
    } else {
        println!("Exported {count} expenses to {output_path}");
    }
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let Some(file) = args.first().filter(|a| !a.starts_with('-')) else {
        anyhow::bail!("Usage: granttui import <file.csv> --project <code>");
    };
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("File not found: {file}");
    }

    let Some(project_id) = project_flag(args, db)? else {
        anyhow::bail!("--project <code> is required for import");
    };

    let expenses = crate::import::read_expenses_csv(path, project_id)?;
    if expenses.is_empty() {
        println!("Nothing to import");
        return Ok(());
    }

    let count = db.insert_expenses_batch(&expenses)?;
    println!("Imported {count} expenses");
    Ok(())
}

/// Resolves a `--project <code>` flag to a stored project id; `None` when
/// the flag was not given.
fn project_flag(args: &[String], db: &Database) -> Result<Option<i64>> {
    let Some(code) = args
        .windows(2)
        .find(|w| w[0] == "--project")
        .map(|w| w[1].as_str())
    else {
        return Ok(None);
    };

    let id = db
        .get_project_by_code(code)?
        .and_then(|p| p.id)
        .ok_or_else(|| anyhow::anyhow!("Project '{code}' not found"))?;
    Ok(Some(id))
}
