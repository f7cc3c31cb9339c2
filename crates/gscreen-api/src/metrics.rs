//! Prometheus metrics for the API server.

use std::future::Future;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "gscreen_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "gscreen_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "gscreen_http_requests_in_flight";

    // Inference API metrics
    pub const UPSTREAM_CALLS_TOTAL: &str = "gscreen_upstream_calls_total";
    pub const UPSTREAM_CALL_DURATION_SECONDS: &str = "gscreen_upstream_call_duration_seconds";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one call to the inference API.
pub fn record_upstream_call(operation: &'static str, success: bool, duration_secs: f64) {
    let labels = [
        ("operation", operation.to_string()),
        ("outcome", if success { "ok" } else { "error" }.to_string()),
    ];

    counter!(names::UPSTREAM_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::UPSTREAM_CALL_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Await an inference API call and record its outcome.
pub async fn track_upstream<T, E, F>(operation: &'static str, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = call.await;
    record_upstream_call(operation, result.is_ok(), start.elapsed().as_secs_f64());
    result
}

/// Label for requests that matched no route.
const UNMATCHED_PATH: &str = "unmatched";

/// Metrics middleware for HTTP requests.
///
/// Requests are labelled with their route template so arbitrary request
/// paths cannot grow the label set.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
