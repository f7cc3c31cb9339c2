//! Prediction (inference job) definitions.
//!
//! A prediction's shape is owned by the remote service and varies by model
//! version, so [`Prediction`] wraps the raw JSON object and only offers typed
//! accessors for the few fields every descriptor carries.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field holding the verbose execution log of a prediction.
pub const LOGS_FIELD: &str = "logs";

/// Identifier assigned to a prediction by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(pub String);

impl PredictionId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of a prediction-creation request.
///
/// Both fields are forwarded untouched. A field the caller left out stays
/// out of the outbound body; an explicit `null` is sent as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Model version identifier
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<Value>,
    /// Model input
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub input: Option<Value>,
}

impl PredictionRequest {
    pub fn new(version: impl Into<String>, input: Value) -> Self {
        Self {
            version: Some(Value::String(version.into())),
            input: Some(input),
        }
    }
}

/// Maps any present value, `null` included, to `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Prediction status as reported by the remote service.
///
/// Labels outside the known set are kept verbatim in [`PredictionStatus::Other`]
/// and count as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl PredictionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
            PredictionStatus::Other(label) => label,
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

impl From<&str> for PredictionStatus {
    fn from(label: &str) -> Self {
        match label {
            "starting" => PredictionStatus::Starting,
            "processing" => PredictionStatus::Processing,
            "succeeded" => PredictionStatus::Succeeded,
            "failed" => PredictionStatus::Failed,
            "canceled" => PredictionStatus::Canceled,
            other => PredictionStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PredictionStatus {
    fn from(label: String) -> Self {
        PredictionStatus::from(label.as_str())
    }
}

impl From<PredictionStatus> for String {
    fn from(status: PredictionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job descriptor returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(pub Value);

impl Prediction {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn id(&self) -> Option<PredictionId> {
        self.fields()?
            .get("id")?
            .as_str()
            .map(PredictionId::from_string)
    }

    pub fn status(&self) -> Option<PredictionStatus> {
        self.fields()?
            .get("status")?
            .as_str()
            .map(PredictionStatus::from)
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_some_and(|s| s.is_terminal())
    }

    pub fn output(&self) -> Option<&Value> {
        self.fields()?.get("output")
    }

    pub fn error(&self) -> Option<&Value> {
        self.fields()?.get("error").filter(|e| !e.is_null())
    }

    pub fn has_logs(&self) -> bool {
        self.fields().is_some_and(|f| f.contains_key(LOGS_FIELD))
    }

    /// Drop the execution log field, if present.
    pub fn without_logs(mut self) -> Self {
        if let Some(fields) = self.0.as_object_mut() {
            fields.remove(LOGS_FIELD);
        }
        self
    }
}

impl From<Value> for Prediction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
