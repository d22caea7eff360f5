pub mod metrics;
pub mod timeout;
pub mod tracing;
