//! Axum HTTP proxy server.
//!
//! This crate provides:
//! - `POST /api/file`: stage a data-URI payload with remote storage
//! - `POST /api/prediction`: create a prediction
//! - `GET /api/prediction`: read a prediction without its logs
//! - Cross-origin isolation and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
