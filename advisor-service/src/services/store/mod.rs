//! Row store abstraction over a hosted table service.
//!
//! Rows are opaque JSON objects; the store owns the schema. Only three
//! operations exist: insert, equality-filtered ordered select, and
//! equality-filtered delete.

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store not configured: {0}")]
    NotConfigured(String),

    /// Rejection reported by the store itself; the message is its own text.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid store response: {0}")]
    InvalidResponse(String),

    #[error("Store network error: {0}")]
    NetworkError(String),

    #[error("Data store request timed out")]
    Timeout,
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotConfigured(_) => "not_configured",
            StoreError::Rejected { .. } => "rejected",
            StoreError::InvalidResponse(_) => "invalid_response",
            StoreError::NetworkError(_) => "network_error",
            StoreError::Timeout => "timeout",
        }
    }
}

/// `column = value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqFilter {
    pub column: String,
    pub value: String,
}

impl EqFilter {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub filters: Vec<EqFilter>,
    pub order_by: Option<OrderBy>,
}

impl SelectQuery {
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(EqFilter::new(column, value));
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy::desc(column));
        self
    }
}

/// Trait for table stores.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert one row and return the store's representation of what was written.
    async fn insert(&self, table: &str, row: &Value, request_id: Option<&str>)
        -> Result<Value, StoreError>;

    async fn select(
        &self,
        table: &str,
        query: &SelectQuery,
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Delete matching rows and return them.
    async fn delete(
        &self,
        table: &str,
        filters: &[EqFilter],
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError>;

    fn name(&self) -> &'static str;
}
