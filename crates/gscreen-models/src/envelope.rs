//! Response envelope shared by every proxy endpoint.

use serde::{Deserialize, Serialize};

/// Either `{ "data": ... }` or `{ "error": "<message>" }`.
///
/// Callers tell success from failure only by which key is present; there is
/// no machine-readable error code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiEnvelope<T> {
    Data { data: T },
    Error { error: String },
}

impl<T> ApiEnvelope<T> {
    pub fn data(data: T) -> Self {
        ApiEnvelope::Data { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiEnvelope::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ApiEnvelope::Error { .. })
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ApiEnvelope::Data { data } => Ok(data),
            ApiEnvelope::Error { error } => Err(error),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for ApiEnvelope<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => ApiEnvelope::data(data),
            Err(e) => ApiEnvelope::error(e.to_string()),
        }
    }
}
