//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{create_prediction, get_prediction, health, upload_file};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/file", post(upload_file))
        .route("/prediction", get(get_prediction).post(create_prediction))
        // Uploads arrive as base64 inside JSON and have no local size cap
        .layer(DefaultBodyLimit::disable());

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let router = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes);

    let router = match state.config.max_body_size {
        Some(limit) => router.layer(RequestBodyLimitLayer::new(limit)),
        None => router,
    };

    // Security headers wrap CORS so preflight responses carry them too
    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}
