use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Per-category budget amounts. Keys are conventionally the five fixed
/// categories from [`crate::models::BUDGET_CATEGORIES`], but arbitrary extra
/// keys are carried through untouched.
pub type Allocation = BTreeMap<String, i64>;

#[derive(Debug, Clone)]
pub struct Project {
    pub id: Option<i64>,
    pub title: String,
    /// Grant code, e.g. "2024R1A1A1234567". Unique by convention only.
    pub code: String,
    /// Free text; `PROJECT_TYPES` lists the conventional values.
    pub project_type: String,
    /// Free text; `AGENCIES` lists the conventional values.
    pub agency: String,
    /// Format: "YYYY-MM-DD"
    pub start_date: String,
    /// Format: "YYYY-MM-DD". No end > start invariant.
    pub end_date: String,
    /// Total grant budget in won.
    pub total_budget: i64,
    /// Direct-cost share of the total budget, as a percentage in [0, 100].
    pub direct_cost_ratio: Decimal,
    pub allocation: Allocation,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: String,
        code: String,
        project_type: String,
        agency: String,
        start_date: String,
        end_date: String,
        total_budget: i64,
        direct_cost_ratio: Decimal,
        allocation: Allocation,
    ) -> Self {
        Self {
            id: None,
            title,
            code,
            project_type,
            agency,
            start_date,
            end_date,
            total_budget,
            direct_cost_ratio,
            allocation,
            // Assigned by the store on insert/update
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Amount allocated to a category, 0 when the category has no entry.
    pub fn allocated(&self, category: &str) -> i64 {
        self.allocation.get(category).copied().unwrap_or(0)
    }

    pub fn period(&self) -> String {
        format!("{} ~ {}", self.start_date, self.end_date)
    }
}
