//! Shared data models for the Green Screen job proxy.
//!
//! This crate provides Serde-serializable types for:
//! - Per-request credentials
//! - Data-URI asset payloads and stored asset references
//! - Prediction requests, descriptors and statuses
//! - The `{ data }` / `{ error }` response envelope

pub mod asset;
pub mod credential;
pub mod envelope;
pub mod error;
pub mod prediction;

// Re-export common types
pub use asset::{AssetReference, DataUri};
pub use credential::Credential;
pub use envelope::ApiEnvelope;
pub use error::{ModelError, ModelResult};
pub use prediction::{Prediction, PredictionId, PredictionRequest, PredictionStatus};
