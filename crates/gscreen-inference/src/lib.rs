//! Client for the remote inference service.
//!
//! The service exposes three calls this project relies on:
//! - `POST /files` to stage a binary asset (multipart)
//! - `POST /predictions` to create an asynchronous prediction
//! - `GET /predictions/{id}` to read a prediction's current state
//!
//! Every call takes the caller's [`Credential`](gscreen_models::Credential)
//! explicitly; the client itself holds no token.

pub mod client;
pub mod error;
pub mod poll;
pub mod types;

pub use client::{InferenceClient, InferenceClientConfig};
pub use error::{InferenceError, InferenceResult};
pub use poll::{PollConfig, PredictionPoller};
