use anyhow::Result;
use chrono::{Days, Local};
use rust_decimal::Decimal;

use crate::allocation;
use crate::auth::AccessGate;
use crate::db::Database;
use crate::models::*;
use crate::rollup;
use crate::ui::util::{parse_ratio, parse_won};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Projects,
    Expenses,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Projects, Self::Expenses]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Projects => write!(f, "Projects"),
            Self::Expenses => write!(f, "Expenses"),
        }
    }
}

/// Sub-state of the Projects screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProjectsStep {
    List,
    Detail,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
        }
    }
}

// Field order of the project form: eight scalar fields, then one ratio row
// per fixed category, then the save row.
pub(crate) const FIELD_TITLE: usize = 0;
pub(crate) const FIELD_CODE: usize = 1;
pub(crate) const FIELD_TYPE: usize = 2;
pub(crate) const FIELD_AGENCY: usize = 3;
pub(crate) const FIELD_START: usize = 4;
pub(crate) const FIELD_END: usize = 5;
pub(crate) const FIELD_BUDGET: usize = 6;
pub(crate) const FIELD_DIRECT_RATIO: usize = 7;
pub(crate) const SCALAR_FIELDS: usize = 8;

/// Editable state behind the create/edit project form.
pub(crate) struct ProjectForm {
    /// `Some` when editing an existing project, `None` when creating.
    pub(crate) editing_id: Option<i64>,
    pub(crate) title: String,
    pub(crate) code: String,
    pub(crate) project_type: String,
    pub(crate) agency: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) total_budget: String,
    pub(crate) direct_cost_ratio: String,
    /// (category, percent input), in taxonomy order.
    pub(crate) ratios: Vec<(String, String)>,
    pub(crate) field_index: usize,
}

impl ProjectForm {
    pub(crate) fn new() -> Self {
        let today = Local::now().date_naive();
        let next_year = today
            .checked_add_days(Days::new(365))
            .unwrap_or(today)
            .format("%Y-%m-%d")
            .to_string();

        // Default splits mirror a typical grant plan
        let defaults = ["40", "20", "20", "15", "5"];
        let ratios = BUDGET_CATEGORIES
            .iter()
            .zip(defaults)
            .map(|(c, r)| ((*c).to_string(), r.to_string()))
            .collect();

        Self {
            editing_id: None,
            title: String::new(),
            code: String::new(),
            project_type: PROJECT_TYPES[0].to_string(),
            agency: AGENCIES[0].to_string(),
            start_date: today.format("%Y-%m-%d").to_string(),
            end_date: next_year,
            total_budget: String::new(),
            direct_cost_ratio: "80".to_string(),
            ratios,
            field_index: 0,
        }
    }

    /// Pre-fills the form from a stored project. Ratios come back through the
    /// lossy inverse mapping, so they approximate what was originally typed.
    pub(crate) fn edit(project: &Project) -> Self {
        let derived = allocation::derive_ratios(
            project.total_budget,
            project.direct_cost_ratio,
            &project.allocation,
        );
        let ratios = BUDGET_CATEGORIES
            .iter()
            .map(|c| {
                let ratio = derived.get(*c).copied().unwrap_or(Decimal::ZERO);
                ((*c).to_string(), ratio.to_string())
            })
            .collect();

        Self {
            editing_id: project.id,
            title: project.title.clone(),
            code: project.code.clone(),
            project_type: project.project_type.clone(),
            agency: project.agency.clone(),
            start_date: project.start_date.clone(),
            end_date: project.end_date.clone(),
            total_budget: project.total_budget.to_string(),
            direct_cost_ratio: project.direct_cost_ratio.to_string(),
            ratios,
            field_index: 0,
        }
    }

    pub(crate) fn save_index(&self) -> usize {
        SCALAR_FIELDS + self.ratios.len()
    }

    pub(crate) fn field_count(&self) -> usize {
        self.save_index() + 1
    }

    pub(crate) fn on_save_row(&self) -> bool {
        self.field_index == self.save_index()
    }

    /// Type and agency cycle through their taxonomies instead of free editing.
    pub(crate) fn is_cycle_field(&self) -> bool {
        matches!(self.field_index, FIELD_TYPE | FIELD_AGENCY)
    }

    pub(crate) fn cycle_field(&mut self, delta: i32) {
        match self.field_index {
            FIELD_TYPE => cycle(&mut self.project_type, &PROJECT_TYPES, delta),
            FIELD_AGENCY => cycle(&mut self.agency, &AGENCIES, delta),
            _ => {}
        }
    }

    /// +/- nudges a percentage field by one point.
    pub(crate) fn adjust_field(&mut self, delta: i32) {
        if self.is_cycle_field() {
            self.cycle_field(delta);
            return;
        }
        let input = match self.field_index {
            FIELD_DIRECT_RATIO => &mut self.direct_cost_ratio,
            i if i >= SCALAR_FIELDS && i < self.save_index() => {
                &mut self.ratios[i - SCALAR_FIELDS].1
            }
            _ => return,
        };
        let current = parse_ratio(input).unwrap_or(Decimal::ZERO);
        let adjusted = (current + Decimal::from(delta)).max(Decimal::ZERO);
        *input = adjusted.normalize().to_string();
    }

    pub(crate) fn value(&self, index: usize) -> &str {
        match index {
            FIELD_TITLE => &self.title,
            FIELD_CODE => &self.code,
            FIELD_TYPE => &self.project_type,
            FIELD_AGENCY => &self.agency,
            FIELD_START => &self.start_date,
            FIELD_END => &self.end_date,
            FIELD_BUDGET => &self.total_budget,
            FIELD_DIRECT_RATIO => &self.direct_cost_ratio,
            i if i < self.save_index() => &self.ratios[i - SCALAR_FIELDS].1,
            _ => "",
        }
    }

    pub(crate) fn set_value(&mut self, index: usize, value: String) {
        match index {
            FIELD_TITLE => self.title = value,
            FIELD_CODE => self.code = value,
            FIELD_START => self.start_date = value,
            FIELD_END => self.end_date = value,
            FIELD_BUDGET => self.total_budget = value,
            FIELD_DIRECT_RATIO => self.direct_cost_ratio = value,
            i if i >= SCALAR_FIELDS && i < self.save_index() => {
                self.ratios[i - SCALAR_FIELDS].1 = value;
            }
            _ => {}
        }
    }

    pub(crate) fn total_budget_value(&self) -> i64 {
        parse_won(&self.total_budget).unwrap_or(0).max(0)
    }

    pub(crate) fn direct_cost_ratio_value(&self) -> Decimal {
        parse_ratio(&self.direct_cost_ratio).unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn direct_cost(&self) -> Decimal {
        allocation::direct_cost(self.total_budget_value(), self.direct_cost_ratio_value())
    }

    pub(crate) fn category_ratios(&self) -> allocation::CategoryRatios {
        self.ratios
            .iter()
            .map(|(category, input)| {
                let ratio = parse_ratio(input).unwrap_or(Decimal::ZERO);
                (category.clone(), ratio)
            })
            .collect()
    }

    pub(crate) fn ratio_sum(&self) -> Decimal {
        allocation::ratio_sum(&self.category_ratios())
    }

    /// Preview of the allocation the current inputs would persist.
    pub(crate) fn allocation_preview(&self) -> Allocation {
        allocation::compute_allocation(
            self.total_budget_value(),
            self.direct_cost_ratio_value(),
            &self.category_ratios(),
        )
    }

    /// Full form validation; on success returns the project ready to persist,
    /// with its allocation computed from the entered ratios.
    pub(crate) fn validate_and_build(&self) -> std::result::Result<Project, String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".into());
        }
        if self.code.trim().is_empty() {
            return Err("Code is required".into());
        }
        for (label, value) in [("Start", &self.start_date), ("End", &self.end_date)] {
            if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                return Err(format!("{label} date must be YYYY-MM-DD"));
            }
        }

        let total_budget = match parse_won(&self.total_budget) {
            Some(v) if v >= 0 => v,
            Some(_) => return Err("Total budget must be non-negative".into()),
            None => return Err(format!("Invalid total budget: {}", self.total_budget)),
        };

        let direct_cost_ratio = match parse_ratio(&self.direct_cost_ratio) {
            Some(r) if r >= Decimal::ZERO && r <= Decimal::ONE_HUNDRED => r,
            Some(_) => return Err("Direct cost ratio must be between 0 and 100".into()),
            None => return Err(format!("Invalid ratio: {}", self.direct_cost_ratio)),
        };

        for (category, input) in &self.ratios {
            match parse_ratio(input) {
                Some(r) if r >= Decimal::ZERO => {}
                _ => return Err(format!("Invalid ratio for {category}: {input}")),
            }
        }

        let ratios = self.category_ratios();
        if !allocation::ratios_balanced(&ratios) {
            return Err(format!(
                "Category ratios add up to {}%, need 100%",
                allocation::ratio_sum(&ratios).normalize()
            ));
        }

        let mut project = Project::new(
            self.title.trim().to_string(),
            self.code.trim().to_string(),
            self.project_type.clone(),
            self.agency.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            total_budget,
            direct_cost_ratio,
            allocation::compute_allocation(total_budget, direct_cost_ratio, &ratios),
        );
        project.id = self.editing_id;
        Ok(project)
    }
}

fn cycle(current: &mut String, options: &[&str], delta: i32) {
    let idx = options
        .iter()
        .position(|o| *o == current.as_str())
        .unwrap_or(0) as i32;
    let len = options.len() as i32;
    let next = (idx + delta).rem_euclid(len) as usize;
    *current = options[next].to_string();
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) gate: AccessGate,
    pub(crate) passphrase_input: String,

    // Snapshots, refreshed wholesale from the store
    pub(crate) projects: Vec<Project>,
    pub(crate) expenses: Vec<Expense>,

    // Derived from the current snapshot
    pub(crate) portfolio: crate::rollup::PortfolioSummary,
    /// Parallel to `projects`.
    pub(crate) project_summaries: Vec<crate::rollup::ProjectSummary>,

    // Projects screen
    pub(crate) projects_step: ProjectsStep,
    pub(crate) project_index: usize,
    pub(crate) project_scroll: usize,
    pub(crate) form: ProjectForm,

    // Expenses screen
    pub(crate) expense_rows: Vec<Expense>,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) expense_filter_project: Option<i64>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(gate: AccessGate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            gate,
            passphrase_input: String::new(),

            projects: Vec::new(),
            expenses: Vec::new(),

            portfolio: crate::rollup::PortfolioSummary::default(),
            project_summaries: Vec::new(),

            projects_step: ProjectsStep::List,
            project_index: 0,
            project_scroll: 0,
            form: ProjectForm::new(),

            expense_rows: Vec::new(),
            expense_index: 0,
            expense_scroll: 0,
            expense_filter_project: None,

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Pulls a fresh snapshot from the store and re-runs every rollup over
    /// it. Called after each write and on screen switches.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.projects = db.get_projects()?;
        let mut expenses = db.get_expenses(None, None, None, None)?;
        rollup::sort_expenses(&mut expenses);
        self.expenses = expenses;

        self.portfolio = rollup::summarize_all(&self.projects, &self.expenses);
        self.project_summaries = self
            .projects
            .iter()
            .map(|p| rollup::summarize_project(p, &self.expenses))
            .collect();

        if self.project_index >= self.projects.len() {
            self.project_index = self.projects.len().saturating_sub(1);
        }
        self.apply_expense_filters();
        Ok(())
    }

    /// Rebuilds the Expenses screen rows from the snapshot, applying the
    /// project filter and live search.
    pub(crate) fn apply_expense_filters(&mut self) {
        let needle = self.search_input.to_lowercase();
        self.expense_rows = self
            .expenses
            .iter()
            .filter(|e| {
                self.expense_filter_project
                    .is_none_or(|pid| e.project_id == pid)
            })
            .filter(|e| {
                needle.is_empty()
                    || e.description.to_lowercase().contains(&needle)
                    || e.category.to_lowercase().contains(&needle)
                    || e.date.contains(&needle)
            })
            .cloned()
            .collect();

        if self.expense_index >= self.expense_rows.len() {
            self.expense_index = self.expense_rows.len().saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
    }

    pub(crate) fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.project_index)
    }

    pub(crate) fn selected_summary(&self) -> Option<&crate::rollup::ProjectSummary> {
        self.project_summaries.get(self.project_index)
    }

    /// Grant code for an expense row; orphans show a dash.
    pub(crate) fn project_code(&self, project_id: i64) -> &str {
        self.projects
            .iter()
            .find(|p| p.id == Some(project_id))
            .map_or("—", |p| p.code.as_str())
    }
}
