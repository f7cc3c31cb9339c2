//! Inference service HTTP client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use gscreen_models::{AssetReference, Credential, Prediction, PredictionId, PredictionRequest};

use crate::error::{InferenceError, InferenceResult};
use crate::poll::PredictionPoller;
use crate::types::{FileUploadResponse, RemoteErrorBody};

/// Default base URL of the remote inference API.
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "content";

/// Configuration for the inference client.
#[derive(Debug, Clone)]
pub struct InferenceClientConfig {
    /// Base URL of the inference API
    pub base_url: Url,
    /// Request timeout; `None` leaves outbound calls unbounded
    pub timeout: Option<Duration>,
}

impl Default for InferenceClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: None,
        }
    }
}

impl InferenceClientConfig {
    /// Build a config for the given base URL.
    pub fn with_base_url(base_url: &str) -> InferenceResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| InferenceError::InvalidConfig(format!("base URL {}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(InferenceError::InvalidConfig(format!(
                "base URL {} cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            timeout: None,
        })
    }

    /// Create config from environment variables.
    pub fn from_env() -> InferenceResult<Self> {
        let base_url =
            std::env::var("INFERENCE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::with_base_url(&base_url)?;
        config.timeout = std::env::var("INFERENCE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        Ok(config)
    }
}

/// Client for the remote inference service.
///
/// Holds only the connection pool and base URL; credentials are passed into
/// every call.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    config: InferenceClientConfig,
}

impl InferenceClient {
    /// Create a new inference client.
    pub fn new(config: InferenceClientConfig) -> InferenceResult<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("gscreen-inference/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(InferenceError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> InferenceResult<Self> {
        Self::new(InferenceClientConfig::from_env()?)
    }

    pub fn config(&self) -> &InferenceClientConfig {
        &self.config
    }

    /// Stage a file with the remote storage API and return its fetch URL.
    pub async fn upload_file(
        &self,
        credential: &Credential,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> InferenceResult<AssetReference> {
        let url = self.endpoint(&["files"])?;

        debug!(file_name, size = bytes.len(), "Uploading file to {}", url);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(url)
            .bearer_auth(credential.expose())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = Self::read_json(response, "upload_file").await?;

        match serde_json::from_value::<FileUploadResponse>(body.clone()) {
            Ok(upload) => Ok(AssetReference(upload.urls.get)),
            Err(_) => {
                let detail = serde_json::from_value::<RemoteErrorBody>(body)
                    .map(|e| format!(": {}", e.detail))
                    .unwrap_or_default();
                Err(InferenceError::invalid_response(format!(
                    "file upload returned {} without urls.get{}",
                    status, detail
                )))
            }
        }
    }

    /// Create a prediction. The response is returned as sent, including
    /// API-level error bodies.
    pub async fn create_prediction(
        &self,
        credential: &Credential,
        request: &PredictionRequest,
    ) -> InferenceResult<Prediction> {
        let url = self.endpoint(&["predictions"])?;

        debug!(version = ?request.version, "Creating prediction at {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await?;

        Ok(Prediction(
            Self::read_json(response, "create_prediction").await?,
        ))
    }

    /// Read a prediction's current descriptor.
    pub async fn get_prediction(
        &self,
        credential: &Credential,
        id: &PredictionId,
    ) -> InferenceResult<Prediction> {
        let url = self.endpoint(&["predictions", id.as_str()])?;

        debug!(prediction_id = %id, "Fetching prediction from {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(credential.expose())
            .send()
            .await?;

        Ok(Prediction(Self::read_json(response, "get_prediction").await?))
    }

    /// Poll a prediction until it reaches a terminal status.
    pub async fn wait_for_prediction(
        &self,
        credential: &Credential,
        id: &PredictionId,
        poller: &PredictionPoller,
    ) -> InferenceResult<Prediction> {
        poller.poll(|| self.get_prediction(credential, id)).await
    }

    fn endpoint(&self, segments: &[&str]) -> InferenceResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                InferenceError::InvalidConfig(format!(
                    "base URL {} cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Parse a response body as JSON regardless of status code.
    async fn read_json(response: Response, operation: &str) -> InferenceResult<Value> {
        let status = response.status();
        if !status.is_success() {
            warn!(operation, status = %status, "Inference API returned non-success status");
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(InferenceError::Json)
    }
}
