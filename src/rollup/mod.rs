//! Aggregation engine: folds snapshot lists of projects and expenses into
//! spent totals, balances, and utilization figures.
//!
//! Every function here is pure and re-run against a fresh snapshot after each
//! store refresh; nothing is updated incrementally.

use rust_decimal::Decimal;

use crate::models::{Expense, Project};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProjectSummary {
    pub(crate) total_spent: i64,
    /// `total_budget - total_spent`; negative on overspend.
    pub(crate) balance: i64,
    /// Spent share of the total budget in percent. `None` when the project
    /// has no budget to measure against; display policy is the caller's.
    pub(crate) utilization: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategorySummary {
    pub(crate) allocated: i64,
    pub(crate) spent: i64,
    pub(crate) balance: i64,
    /// Spent share of the allocation in percent. An unallocated category
    /// reports 0, unlike the project-level `None` policy.
    pub(crate) percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct PortfolioSummary {
    pub(crate) total_budget: i64,
    pub(crate) total_spent: i64,
    pub(crate) total_balance: i64,
}

/// Rolls the expenses of one project up into totals.
///
/// Expenses pointing at other (or missing) projects are ignored here; they
/// still count in [`summarize_all`].
pub(crate) fn summarize_project(project: &Project, expenses: &[Expense]) -> ProjectSummary {
    let total_spent: i64 = expenses
        .iter()
        .filter(|e| Some(e.project_id) == project.id)
        .map(|e| e.amount)
        .sum();

    let utilization = if project.total_budget == 0 {
        None
    } else {
        Some(percent_of(total_spent, project.total_budget))
    };

    ProjectSummary {
        total_spent,
        balance: project.total_budget - total_spent,
        utilization,
    }
}

/// Rolls one budget category of one project up into totals. Category match
/// is exact and case-sensitive.
pub(crate) fn summarize_category(
    project: &Project,
    expenses: &[Expense],
    category: &str,
) -> CategorySummary {
    let allocated = project.allocated(category);
    let spent: i64 = expenses
        .iter()
        .filter(|e| Some(e.project_id) == project.id && e.category == category)
        .map(|e| e.amount)
        .sum();

    let percent = if allocated == 0 {
        Decimal::ZERO
    } else {
        percent_of(spent, allocated)
    };

    CategorySummary {
        allocated,
        spent,
        balance: allocated - spent,
        percent,
    }
}

/// Plain sums across every record, regardless of linkage: an expense whose
/// project is gone still counts here.
pub(crate) fn summarize_all(projects: &[Project], expenses: &[Expense]) -> PortfolioSummary {
    let total_budget: i64 = projects.iter().map(|p| p.total_budget).sum();
    let total_spent: i64 = expenses.iter().map(|e| e.amount).sum();

    PortfolioSummary {
        total_budget,
        total_spent,
        total_balance: total_budget - total_spent,
    }
}

/// Orders expenses most recent first. Stable, so same-day expenses keep
/// their snapshot order.
pub(crate) fn sort_expenses(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}

fn percent_of(part: i64, whole: i64) -> Decimal {
    Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
}
