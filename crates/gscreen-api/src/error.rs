//! API error types.
//!
//! Every handler failure is reported as `{ "error": "<message>" }` with a
//! 200 status; callers distinguish failure only by the `error` key.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::warn;

use gscreen_inference::InferenceError;
use gscreen_models::{ApiEnvelope, ModelError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        warn!(error = %message, "Request failed");

        let body: ApiEnvelope<()> = ApiEnvelope::error(message);
        (StatusCode::OK, Json(body)).into_response()
    }
}
