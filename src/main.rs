mod allocation;
mod auth;
mod db;
mod import;
mod models;
mod rollup;
mod run;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    let mut db = db::Database::open(&data_dir.join("granttui.db"))?;
    let gate = auth::AccessGate::from_env(&data_dir);

    match args.len() {
        1 => run::as_tui(&mut db, gate),
        2.. => run::as_cli(&args, &mut db, &gate),
        _ => {
            eprintln!("Usage: granttui [command]");
            Ok(())
        }
    }
}

fn get_data_dir() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "granttui", "GranTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
