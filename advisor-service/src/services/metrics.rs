//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use crate::services::providers::ProviderError;
use crate::services::store::StoreError;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Safe to call more than once; only the first call installs a recorder.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_provider_call<T>(
    provider: &'static str,
    result: &Result<T, ProviderError>,
    elapsed: Duration,
) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };

    counter!(
        "advisor_provider_requests_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("advisor_provider_latency_seconds", "provider" => provider)
        .record(elapsed.as_secs_f64());
}

pub fn record_store_call<T>(
    store: &'static str,
    operation: &'static str,
    table: &str,
    result: &Result<T, StoreError>,
    elapsed: Duration,
) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };

    counter!(
        "advisor_store_requests_total",
        "store" => store,
        "operation" => operation,
        "table" => table.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "advisor_store_latency_seconds",
        "store" => store,
        "operation" => operation
    )
    .record(elapsed.as_secs_f64());
}
