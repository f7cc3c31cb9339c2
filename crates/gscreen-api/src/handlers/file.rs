//! File staging handler.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use gscreen_models::{ApiEnvelope, AssetReference, Credential, DataUri};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::metrics::track_upstream;
use crate::state::AppState;

/// Body of `POST /api/file`.
#[derive(Debug, Deserialize)]
pub struct UploadFileRequest {
    pub api_token: Credential,
    pub file_name: String,
    /// `<mime-prefix>,<base64>` data URI
    pub data: DataUri,
}

/// POST /api/file
///
/// Decode the data URI and stage the bytes with remote storage.
///
/// Returns `{ data: "<fetch url>" }` or `{ error }`.
pub async fn upload_file(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UploadFileRequest>,
) -> ApiResult<Json<ApiEnvelope<AssetReference>>> {
    let bytes = request.data.decode()?;

    info!(file_name = %request.file_name, size = bytes.len(), "upload_file");

    let reference = track_upstream(
        "upload_file",
        state
            .inference
            .upload_file(&request.api_token, &request.file_name, bytes),
    )
    .await?;

    Ok(Json(ApiEnvelope::data(reference)))
}
