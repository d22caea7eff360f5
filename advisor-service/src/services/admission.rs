//! Per-dependency admission control.
//!
//! Every external dependency sits behind a bounded semaphore and a deadline.
//! Waiting for a permit counts against the same deadline as the call itself,
//! so a saturated dependency surfaces as a timeout rather than an unbounded
//! queue.

use crate::services::metrics::{record_provider_call, record_store_call};
use crate::services::providers::{CompletionProvider, CompletionRequest, ProviderError};
use crate::services::store::{EqFilter, RowStore, SelectQuery, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Bounded concurrency plus a deadline for one dependency.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

/// The gate's deadline passed before the call finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

impl AdmissionGate {
    pub fn new(max_in_flight: usize, timeout: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            timeout,
        }
    }

    /// Same permits, different deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            semaphore: self.semaphore.clone(),
            timeout,
        }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run `call` once a permit is held, within the deadline.
    pub async fn run<F, T>(&self, call: F) -> Result<T, Elapsed>
    where
        F: Future<Output = T>,
    {
        let semaphore = self.semaphore.clone();
        tokio::time::timeout(self.timeout, async move {
            // The semaphore is never closed, so acquire only fails on shutdown.
            let _permit = semaphore.acquire_owned().await.ok();
            call.await
        })
        .await
        .map_err(|_| Elapsed)
    }
}

/// Completion provider behind an [`AdmissionGate`].
pub struct GatedProvider {
    inner: Arc<dyn CompletionProvider>,
    gate: AdmissionGate,
}

impl GatedProvider {
    pub fn new(inner: Arc<dyn CompletionProvider>, gate: AdmissionGate) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl CompletionProvider for GatedProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        request_id: Option<&str>,
    ) -> Result<String, ProviderError> {
        let start = Instant::now();
        let result = self
            .gate
            .run(self.inner.complete(request, request_id))
            .await
            .unwrap_or(Err(ProviderError::Timeout));

        record_provider_call(self.inner.name(), &result, start.elapsed());
        result
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Row store behind an [`AdmissionGate`].
pub struct GatedStore {
    inner: Arc<dyn RowStore>,
    gate: AdmissionGate,
}

impl GatedStore {
    pub fn new(inner: Arc<dyn RowStore>, gate: AdmissionGate) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl RowStore for GatedStore {
    async fn insert(
        &self,
        table: &str,
        row: &Value,
        request_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        let start = Instant::now();
        let result = self
            .gate
            .run(self.inner.insert(table, row, request_id))
            .await
            .unwrap_or(Err(StoreError::Timeout));

        record_store_call(self.inner.name(), "insert", table, &result, start.elapsed());
        result
    }

    async fn select(
        &self,
        table: &str,
        query: &SelectQuery,
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let start = Instant::now();
        let result = self
            .gate
            .run(self.inner.select(table, query, request_id))
            .await
            .unwrap_or(Err(StoreError::Timeout));

        record_store_call(self.inner.name(), "select", table, &result, start.elapsed());
        result
    }

    async fn delete(
        &self,
        table: &str,
        filters: &[EqFilter],
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let start = Instant::now();
        let result = self
            .gate
            .run(self.inner.delete(table, filters, request_id))
            .await
            .unwrap_or(Err(StoreError::Timeout));

        record_store_call(self.inner.name(), "delete", table, &result, start.elapsed());
        result
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
