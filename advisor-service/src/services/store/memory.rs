//! In-process row store for local runs and tests.
//!
//! Mimics the hosted store closely enough for handlers: inserted rows get an
//! `id` and `created_at` when missing, and ordering compares the column's
//! text form (ISO dates sort correctly).

use super::{EqFilter, RowStore, SelectQuery, StoreError};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed, for asserting a call never happened.
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Rows currently held in `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

/// Text form used for both equality and ordering.
fn column_text(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches_all(row: &Value, filters: &[EqFilter]) -> bool {
    filters
        .iter()
        .all(|f| column_text(row, &f.column).as_deref() == Some(f.value.as_str()))
}

#[async_trait]
impl RowStore for InMemoryStore {
    async fn insert(
        &self,
        table: &str,
        row: &Value,
        _request_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);

        let Value::Object(fields) = row else {
            return Err(StoreError::Rejected {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        };

        let mut stored = fields.clone();
        stored
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        stored.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        });
        let stored = Value::Object(stored);

        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());

        Ok(Value::Array(vec![stored]))
    }

    async fn select(
        &self,
        table: &str,
        query: &SelectQuery,
        _request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);

        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            rows.sort_by(|a, b| {
                let ord = column_text(a, &order.column).cmp(&column_text(b, &order.column));
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        Ok(rows)
    }

    async fn delete(
        &self,
        table: &str,
        filters: &[EqFilter],
        _request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);

        if filters.is_empty() {
            return Err(StoreError::InvalidResponse(
                "refusing unfiltered delete".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let (removed, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|row| matches_all(row, filters));
        *rows = kept;

        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
