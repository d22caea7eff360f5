//! W3C trace context for outbound calls to third-party APIs.
//!
//! Completion and store requests carry `traceparent` (and `x-request-id`
//! when known) so vendor-side request logs can be matched against ours.

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub use crate::middleware::tracing::REQUEST_ID_HEADER;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Format the current span's context as a `traceparent` value.
///
/// Returns `None` when no OpenTelemetry context is active.
pub fn current_traceparent() -> Option<String> {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return None;
    }

    Some(format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    ))
}

/// Build the propagation headers for one outbound request.
pub fn outbound_headers(request_id: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(value) = current_traceparent().and_then(|tp| HeaderValue::from_str(&tp).ok()) {
        headers.insert(TRACEPARENT_HEADER, value);

        let context = Span::current().context();
        let state = context.span().span_context().trace_state().header();
        if !state.is_empty()
            && let Ok(value) = HeaderValue::from_str(&state)
        {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }

    if let Some(id) = request_id
        && let Ok(value) = HeaderValue::from_str(id)
    {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    headers
}
