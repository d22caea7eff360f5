use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const BUDGETS_TABLE: &str = "budgets";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
}

/// Body of `POST /api/budgets`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBudget {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

/// Row written to the store.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetRow {
    pub user_id: String,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl From<NewBudget> for BudgetRow {
    fn from(budget: NewBudget) -> Self {
        Self {
            user_id: budget.user_id,
            category: budget.category.trim().to_string(),
            amount: budget.amount,
            period: budget.period,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
