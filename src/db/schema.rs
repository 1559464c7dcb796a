pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    title             TEXT NOT NULL,
    code              TEXT NOT NULL,
    project_type      TEXT NOT NULL DEFAULT '',
    agency            TEXT NOT NULL DEFAULT '',
    start_date        TEXT NOT NULL,
    end_date          TEXT NOT NULL,
    total_budget      INTEGER NOT NULL,
    direct_cost_ratio TEXT NOT NULL,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_projects_code ON projects(code);

CREATE TABLE IF NOT EXISTS allocations (
    project_id INTEGER NOT NULL REFERENCES projects(id),
    category   TEXT NOT NULL,
    amount     INTEGER NOT NULL,
    UNIQUE(project_id, category)
);

-- No foreign key on expenses.project_id: an expense may outlive or predate
-- its project and is then simply excluded from that project's rollup.
CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id  INTEGER NOT NULL,
    category    TEXT NOT NULL,
    amount      INTEGER NOT NULL,
    date        TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_project ON expenses(project_id);
CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE expenses ADD COLUMN receipt TEXT NOT NULL DEFAULT '';"),
];
