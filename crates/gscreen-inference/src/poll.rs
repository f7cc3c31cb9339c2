//! Caller-side polling of a prediction until it settles.
//!
//! The proxy endpoints never classify statuses or bound polling; whoever
//! drives the lifecycle does. This is that driver for Rust callers:
//! `starting -> processing -> {succeeded, failed, canceled}`.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use gscreen_models::Prediction;

use crate::error::{InferenceError, InferenceResult};

/// Polling cadence and bound.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status reads
    pub interval: Duration,
    /// Give up after this many reads; `None` polls until a terminal status
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// Repeatedly reads a prediction until its status is terminal.
#[derive(Debug, Clone, Default)]
pub struct PredictionPoller {
    config: PollConfig,
}

impl PredictionPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Drive `fetch` until it yields a terminal prediction.
    ///
    /// A failed read ends polling immediately with that error.
    pub async fn poll<F, Fut>(&self, mut fetch: F) -> InferenceResult<Prediction>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = InferenceResult<Prediction>>,
    {
        let mut attempts = 0u32;

        loop {
            let prediction = fetch().await?;
            attempts += 1;

            if prediction.is_terminal() {
                return Ok(prediction);
            }

            let status = prediction
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());

            if let Some(max) = self.config.max_attempts {
                if attempts >= max {
                    return Err(InferenceError::PollExhausted { attempts, status });
                }
            }

            debug!(
                attempts,
                status = %status,
                "Prediction not settled, polling again in {:?}",
                self.config.interval
            );
            tokio::time::sleep(self.config.interval).await;
        }
    }
}
