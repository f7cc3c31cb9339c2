//! Prediction handlers.
//!
//! Both handlers return the remote descriptor as-is inside `data`, including
//! API-level error bodies the remote service sends as JSON. Only transport
//! and parse failures become `{ error }`.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use gscreen_models::{ApiEnvelope, Credential, Prediction, PredictionId, PredictionRequest};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::metrics::track_upstream;
use crate::state::AppState;

/// Body of `POST /api/prediction`.
#[derive(Debug, Deserialize)]
pub struct CreatePredictionRequest {
    pub api_token: Credential,
    #[serde(flatten)]
    pub prediction: PredictionRequest,
}

/// Query of `GET /api/prediction`.
#[derive(Debug, Deserialize)]
pub struct GetPredictionQuery {
    pub api_token: Credential,
    pub id: PredictionId,
}

/// POST /api/prediction
///
/// Create a prediction from `{ version, input }`.
pub async fn create_prediction(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePredictionRequest>,
) -> ApiResult<Json<ApiEnvelope<Prediction>>> {
    info!(version = ?request.prediction.version, "create_prediction");

    let prediction = track_upstream(
        "create_prediction",
        state
            .inference
            .create_prediction(&request.api_token, &request.prediction),
    )
    .await?;

    // Creation responses keep their logs; only status reads are trimmed.
    Ok(Json(ApiEnvelope::data(prediction)))
}

/// GET /api/prediction?api_token=..&id=..
///
/// Read a prediction's current state with the `logs` field removed.
pub async fn get_prediction(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GetPredictionQuery>,
) -> ApiResult<Json<ApiEnvelope<Prediction>>> {
    info!(prediction_id = %query.id, "get_prediction");

    let prediction = track_upstream(
        "get_prediction",
        state.inference.get_prediction(&query.api_token, &query.id),
    )
    .await?;

    Ok(Json(ApiEnvelope::data(prediction.without_logs())))
}
