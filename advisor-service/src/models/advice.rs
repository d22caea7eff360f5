use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// Profile fields for `/api/financial-advice`.
///
/// Absent fields default (0, empty list, empty question); present fields
/// must have the right type and amounts must not be negative.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdviceRequest {
    #[validate(range(min = 0.0))]
    pub income: Option<f64>,
    #[validate(range(min = 0.0))]
    pub expenses: Option<f64>,
    pub goals: Option<Vec<String>>,
    pub question: Option<String>,
}

/// Defaults applied; what the prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceProfile {
    pub income: f64,
    pub expenses: f64,
    pub goals: Vec<String>,
    pub question: String,
}

impl AdviceProfile {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

impl From<AdviceRequest> for AdviceProfile {
    fn from(req: AdviceRequest) -> Self {
        Self {
            income: req.income.unwrap_or(0.0),
            expenses: req.expenses.unwrap_or(0.0),
            goals: req
                .goals
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
            question: req.question.unwrap_or_default().trim().to_string(),
        }
    }
}

/// Present fields whose JSON type is wrong. `null` counts as absent.
pub fn mistyped_fields(body: &Value) -> Vec<&'static str> {
    let mut bad = Vec::new();
    let field = |name: &str| body.get(name).filter(|v| !v.is_null());

    for name in ["income", "expenses"] {
        if field(name).is_some_and(|v| !v.is_number()) {
            bad.push(name);
        }
    }
    if field("goals").is_some_and(|v| {
        !v.as_array()
            .is_some_and(|goals| goals.iter().all(Value::is_string))
    }) {
        bad.push("goals");
    }
    if field("question").is_some_and(|v| !v.is_string()) {
        bad.push("question");
    }
    bad
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_default() {
        let req: AdviceRequest = serde_json::from_value(json!({"question": "Where to save?"})).unwrap();
        let profile = AdviceProfile::from(req);
        assert_eq!(profile.income, 0.0);
        assert_eq!(profile.expenses, 0.0);
        assert!(profile.goals.is_empty());
        assert_eq!(profile.question, "Where to save?");
    }

    #[test]
    fn negative_amounts_fail_validation() {
        let req: AdviceRequest = serde_json::from_value(json!({"income": -5})).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn wrong_types_fail_to_parse() {
        assert!(serde_json::from_value::<AdviceRequest>(json!({"income": "lots"})).is_err());
        assert!(serde_json::from_value::<AdviceRequest>(json!({"goals": "house"})).is_err());
    }

    #[test]
    fn mistyped_fields_are_named() {
        let body = json!({"income": "lots", "expenses": 10, "goals": ["a", 1], "question": null});
        assert_eq!(mistyped_fields(&body), vec!["income", "goals"]);
        assert!(mistyped_fields(&json!({"income": 1, "goals": []})).is_empty());
    }

    #[test]
    fn net_is_income_minus_expenses() {
        let profile = AdviceProfile {
            income: 50000.0,
            expenses: 30000.0,
            goals: vec![],
            question: String::new(),
        };
        assert_eq!(profile.net(), 20000.0);
    }
}
