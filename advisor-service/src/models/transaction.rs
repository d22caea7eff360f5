//! Transaction rows are owned by the store; this layer only checks that the
//! required keys are present before forwarding a body verbatim.

use serde_json::Value;

pub const TRANSACTIONS_TABLE: &str = "transactions";

pub const REQUIRED_FIELDS: [&str; 7] = [
    "user_id",
    "amount",
    "category",
    "description",
    "type",
    "date",
    "source",
];

/// Required keys absent from `body`, in declaration order.
///
/// A non-object body is missing every field.
pub fn missing_fields(body: &Value) -> Vec<&'static str> {
    match body.as_object() {
        Some(fields) => REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| !fields.contains_key(*f))
            .collect(),
        None => REQUIRED_FIELDS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_body_has_no_missing_fields() {
        let body = json!({
            "user_id": "u", "amount": 1, "category": "Food", "description": "lunch",
            "type": "expense", "date": "2024-01-01", "source": "manual"
        });
        assert!(missing_fields(&body).is_empty());
    }

    #[test]
    fn reports_each_missing_field() {
        let body = json!({"user_id": "u", "amount": 1, "type": "expense"});
        assert_eq!(
            missing_fields(&body),
            vec!["category", "description", "date", "source"]
        );
    }

    #[test]
    fn null_values_count_as_present() {
        let body = json!({
            "user_id": "u", "amount": null, "category": "Food", "description": "",
            "type": "expense", "date": "2024-01-01", "source": "manual"
        });
        assert!(missing_fields(&body).is_empty());
    }

    #[test]
    fn non_object_body_misses_everything() {
        assert_eq!(missing_fields(&json!("text")).len(), REQUIRED_FIELDS.len());
    }
}
