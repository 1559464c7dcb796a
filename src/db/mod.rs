mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Projects ──────────────────────────────────────────────

    /// Inserts a project together with its allocation map. The store assigns
    /// the id and both timestamps.
    pub(crate) fn insert_project(&mut self, project: &Project) -> Result<i64> {
        let now = now();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO projects (title, code, project_type, agency, start_date, end_date,
                                   total_budget, direct_cost_ratio, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                project.title,
                project.code,
                project.project_type,
                project.agency,
                project.start_date,
                project.end_date,
                project.total_budget,
                project.direct_cost_ratio.to_string(),
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        for (category, amount) in &project.allocation {
            tx.execute(
                "INSERT INTO allocations (project_id, category, amount) VALUES (?1, ?2, ?3)",
                params![id, category, amount],
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    /// Overwrites every editable field of an existing project and refreshes
    /// `updated_at`; `created_at` is preserved.
    pub(crate) fn update_project(&mut self, project: &Project) -> Result<()> {
        let id = project
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a project that was never saved"))?;

        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE projects SET title = ?1, code = ?2, project_type = ?3, agency = ?4,
                                 start_date = ?5, end_date = ?6, total_budget = ?7,
                                 direct_cost_ratio = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                project.title,
                project.code,
                project.project_type,
                project.agency,
                project.start_date,
                project.end_date,
                project.total_budget,
                project.direct_cost_ratio.to_string(),
                now(),
                id,
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Project {id} not found");
        }
        tx.execute("DELETE FROM allocations WHERE project_id = ?1", params![id])?;
        for (category, amount) in &project.allocation {
            tx.execute(
                "INSERT INTO allocations (project_id, category, amount) VALUES (?1, ?2, ?3)",
                params![id, category, amount],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// All projects, newest first.
    pub(crate) fn get_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, code, project_type, agency, start_date, end_date,
                    total_budget, direct_cost_ratio, created_at, updated_at
             FROM projects ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], map_project_row)?;
        let mut projects = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        for project in &mut projects {
            if let Some(id) = project.id {
                project.allocation = self.get_allocation(id)?;
            }
        }
        Ok(projects)
    }

    pub(crate) fn get_project_by_id(&self, id: i64) -> Result<Option<Project>> {
        let result = self.conn.query_row(
            "SELECT id, title, code, project_type, agency, start_date, end_date,
                    total_budget, direct_cost_ratio, created_at, updated_at
             FROM projects WHERE id = ?1",
            params![id],
            map_project_row,
        );
        match result {
            Ok(mut project) => {
                project.allocation = self.get_allocation(id)?;
                Ok(Some(project))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Looks a project up by its grant code. Codes are unique by convention
    /// only; on duplicates the newest project wins.
    pub(crate) fn get_project_by_code(&self, code: &str) -> Result<Option<Project>> {
        let result = self.conn.query_row(
            "SELECT id, title, code, project_type, agency, start_date, end_date,
                    total_budget, direct_cost_ratio, created_at, updated_at
             FROM projects WHERE code = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
            params![code],
            map_project_row,
        );
        match result {
            Ok(mut project) => {
                if let Some(id) = project.id {
                    project.allocation = self.get_allocation(id)?;
                }
                Ok(Some(project))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_allocation(&self, project_id: i64) -> Result<Allocation> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT category, amount FROM allocations WHERE project_id = ?1")?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut allocation = Allocation::new();
        for row in rows {
            let (category, amount) = row?;
            allocation.insert(category, amount);
        }
        Ok(allocation)
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Inserts an expense. The store assigns the id and `created_at`.
    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (project_id, category, amount, date, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                expense.project_id,
                expense.category,
                expense.amount,
                expense.date,
                expense.description,
                now(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn insert_expenses_batch(&mut self, expenses: &[Expense]) -> Result<usize> {
        let now = now();
        let tx = self.conn.transaction()?;
        for expense in expenses {
            tx.execute(
                "INSERT INTO expenses (project_id, category, amount, date, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    expense.project_id,
                    expense.category,
                    expense.amount,
                    expense.date,
                    expense.description,
                    now,
                ],
            )?;
        }
        tx.commit()?;
        Ok(expenses.len())
    }

    pub(crate) fn get_expenses(
        &self,
        limit: Option<u32>,
        project_id: Option<i64>,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Expense>> {
        let mut sql = String::from(
            "SELECT id, project_id, category, amount, date, description, created_at
             FROM expenses WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(pid) = project_id {
            sql.push_str(&format!(" AND project_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(pid));
        }
        if let Some(cat) = category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cat.to_string()));
        }
        if let Some(s) = search {
            sql.push_str(&format!(
                " AND (description LIKE ?{0} OR category LIKE ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok(Expense {
                id: Some(row.get(0)?),
                project_id: row.get(1)?,
                category: row.get(2)?,
                amount: row.get(3)?,
                date: row.get(4)?,
                description: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    // ── Export ────────────────────────────────────────────────

    /// Writes the expense ledger to a CSV file, optionally for one project.
    /// Orphan expenses export with an empty project code.
    pub(crate) fn export_to_csv(&self, path: &str, project_id: Option<i64>) -> Result<usize> {
        let (sql, param_values): (String, Vec<Box<dyn rusqlite::types::ToSql>>) =
            if let Some(pid) = project_id {
                (
                    "SELECT e.date, COALESCE(p.code, ''), e.category, e.amount, e.description
                     FROM expenses e LEFT JOIN projects p ON e.project_id = p.id
                     WHERE e.project_id = ?1
                     ORDER BY e.date DESC, e.id DESC"
                        .into(),
                    vec![Box::new(pid)],
                )
            } else {
                (
                    "SELECT e.date, COALESCE(p.code, ''), e.category, e.amount, e.description
                     FROM expenses e LEFT JOIN projects p ON e.project_id = p.id
                     ORDER BY e.date DESC, e.id DESC"
                        .into(),
                    vec![],
                )
            };

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        wtr.write_record(["date", "project", "category", "amount", "description"])?;

        let mut count = 0;
        for row in rows {
            let (date, code, category, amount, description) = row?;
            wtr.write_record([
                date.as_str(),
                code.as_str(),
                category.as_str(),
                amount.to_string().as_str(),
                description.as_str(),
            ])?;
            count += 1;
        }
        wtr.flush()?;
        Ok(count)
    }
}

fn map_project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    let ratio_str: String = row.get(8)?;
    Ok(Project {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        code: row.get(2)?,
        project_type: row.get(3)?,
        agency: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        total_budget: row.get(7)?,
        direct_cost_ratio: Decimal::from_str(&ratio_str).unwrap_or_default(),
        allocation: Allocation::new(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests;
