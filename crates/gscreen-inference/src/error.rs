//! Inference client error types.

use thiserror::Error;

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prediction still {status} after {attempts} polls")]
    PollExhausted { attempts: u32, status: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InferenceError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}
