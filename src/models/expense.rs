#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    /// Reference to a project. Not enforced by the store; an expense whose
    /// project is missing simply drops out of that project's rollup.
    pub project_id: i64,
    /// Budget category. Conventionally one of `BUDGET_CATEGORIES`, not
    /// constrained.
    pub category: String,
    /// Amount spent in won, non-negative.
    pub amount: i64,
    /// Format: "YYYY-MM-DD". Used for sorting and display only.
    pub date: String,
    pub description: String,
    pub created_at: String,
}

impl Expense {
    pub fn new(
        project_id: i64,
        category: String,
        amount: i64,
        date: String,
        description: String,
    ) -> Self {
        Self {
            id: None,
            project_id,
            category,
            amount,
            date,
            description,
            created_at: String::new(),
        }
    }
}
