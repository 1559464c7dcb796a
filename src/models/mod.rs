mod expense;
mod project;
mod taxonomy;

pub use expense::Expense;
pub use project::{Allocation, Project};
pub use taxonomy::{AGENCIES, BUDGET_CATEGORIES, PROJECT_TYPES};
