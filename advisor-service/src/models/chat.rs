use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /api/advisor/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: Option<ChatContext>,
}

/// Optional snapshot of the user's finances sent alongside a question.
///
/// Goals and transactions are taken as loose rows; entries that cannot be
/// read are dropped rather than failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatContext {
    pub income: Option<f64>,
    pub expenses: Option<f64>,
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub goals: Vec<Value>,
}

impl ChatContext {
    /// Goal labels: plain strings, or the `title` of a goal row.
    pub fn goal_labels(&self) -> Vec<String> {
        self.goals
            .iter()
            .filter_map(|goal| match goal {
                Value::String(s) => Some(s.as_str()),
                other => other.get("title").and_then(Value::as_str),
            })
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Transactions that carry a numeric amount, in the order sent.
    pub fn readable_transactions(&self) -> impl Iterator<Item = ContextTransaction> + '_ {
        self.transactions
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextTransaction {
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> ChatContext {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn goals_from_strings_and_rows() {
        let ctx = context(json!({
            "goals": ["car", {"title": "House", "target_amount": 5000000}, {"id": 3}, 42, "  "]
        }));
        assert_eq!(ctx.goal_labels(), vec!["car", "House"]);
    }

    #[test]
    fn unreadable_transactions_are_skipped() {
        let ctx = context(json!({
            "transactions": [
                {"amount": null, "category": "Food"},
                {"category": "Rent"},
                {"amount": 1200, "category": "Transport", "type": "expense"},
                "not a row"
            ]
        }));
        let readable: Vec<ContextTransaction> = ctx.readable_transactions().collect();
        assert_eq!(readable.len(), 1);
        assert_eq!(readable[0].category, "Transport");
    }
}
