//! Aggregation behind `GET /api/transactions/summary`.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A calendar month given as `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month(String);

impl Month {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 7 {
            return None;
        }
        NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok()?;
        Some(Month(raw.to_string()))
    }

    /// Dates are ISO strings, so month membership is a prefix check.
    fn contains(&self, date: &str) -> bool {
        date.get(..7) == Some(self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub transaction_count: usize,
    /// Largest category first.
    pub expenses_by_category: Vec<CategoryTotal>,
}

/// Amounts may arrive as numbers or numeric strings.
fn amount_of(row: &Value) -> Option<f64> {
    match row.get("amount")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn summarize(rows: &[Value], month: Option<&Month>) -> TransactionSummary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut transaction_count = 0;
    let mut by_category: HashMap<String, f64> = HashMap::new();

    for row in rows {
        let date = row.get("date").and_then(Value::as_str).unwrap_or_default();
        if month.is_some_and(|m| !m.contains(date)) {
            continue;
        }

        let Some(amount) = amount_of(row) else {
            let id = row.get("id").map(ToString::to_string).unwrap_or_default();
            tracing::warn!(id = %id, "Skipping transaction with non-numeric amount");
            continue;
        };

        transaction_count += 1;
        match row.get("type").and_then(Value::as_str) {
            Some("income") => total_income += amount,
            Some("expense") => {
                total_expenses += amount;
                let category = row
                    .get("category")
                    .and_then(Value::as_str)
                    .filter(|c| !c.is_empty())
                    .unwrap_or("Uncategorized");
                *by_category.entry(category.to_string()).or_insert(0.0) += amount;
            }
            _ => {}
        }
    }

    let mut expenses_by_category: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal { category, amount })
        .collect();
    expenses_by_category.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    TransactionSummary {
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        transaction_count,
        expenses_by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({"type": "income", "amount": 50000, "category": "Salary", "date": "2024-03-01"}),
            json!({"type": "expense", "amount": 12000, "category": "Rent", "date": "2024-03-02"}),
            json!({"type": "expense", "amount": "3000", "category": "Food", "date": "2024-03-10"}),
            json!({"type": "expense", "amount": 2000, "category": "Food", "date": "2024-03-15"}),
            json!({"type": "expense", "amount": 700, "category": "Food", "date": "2024-02-28"}),
            json!({"type": "expense", "amount": "n/a", "category": "Food", "date": "2024-03-20"}),
        ]
    }

    #[test]
    fn totals_for_a_month() {
        let month = Month::parse("2024-03").unwrap();
        let summary = summarize(&rows(), Some(&month));

        assert_eq!(summary.total_income, 50000.0);
        assert_eq!(summary.total_expenses, 17000.0);
        assert_eq!(summary.net, 33000.0);
        assert_eq!(summary.transaction_count, 4);
        assert_eq!(
            summary.expenses_by_category,
            vec![
                CategoryTotal { category: "Rent".to_string(), amount: 12000.0 },
                CategoryTotal { category: "Food".to_string(), amount: 5000.0 },
            ]
        );
    }

    #[test]
    fn no_month_means_all_rows() {
        let summary = summarize(&rows(), None);
        assert_eq!(summary.total_expenses, 17700.0);
        assert_eq!(summary.transaction_count, 5);
    }

    #[test]
    fn month_parsing() {
        assert!(Month::parse("2024-12").is_some());
        assert!(Month::parse("2024-13").is_none());
        assert!(Month::parse("2024-3").is_none());
        assert!(Month::parse("March").is_none());
    }
}
