use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::{error, warn};

use crate::dto::{PredictRequest, PredictResponse};
use crate::error::AppError;
use crate::services::predict as predict_service;
use crate::state::AppState;

/// POST /predict - Score one row object or an array of row objects.
///
/// The body is parsed as JSON whatever its `Content-Type`.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    let request = PredictRequest::from_slice(&body).map_err(|e| {
        warn!("Rejected predict body: {:?}", e);
        e
    })?;

    let response = predict_service::predict(&state, request).await.map_err(|e| {
        error!("Prediction failed: {:?}", e);
        e
    })?;

    Ok(Json(response))
}
