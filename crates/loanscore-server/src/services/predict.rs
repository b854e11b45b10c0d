//! Batch scoring service behind `/predict`.

use std::sync::Arc;

use loanscore_engine::score_batch;
use tracing::info;

use crate::dto::{PredictRequest, PredictResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Scores every row in the request with one artifact call.
///
/// Inference runs on the blocking pool so large batches do not stall the
/// async workers.
pub async fn predict(
    state: &Arc<AppState>,
    request: PredictRequest,
) -> Result<PredictResponse, AppError> {
    info!("Scoring {} row(s)", request.len());

    let artifact = Arc::clone(&state.artifact);
    tokio::task::spawn_blocking(move || -> Result<PredictResponse, AppError> {
        match request {
            PredictRequest::Single(row) => {
                let mut results = score_batch(artifact.as_ref(), std::slice::from_ref(&row))?;
                results
                    .pop()
                    .map(PredictResponse::Single)
                    .ok_or_else(|| AppError::Internal("artifact returned no result".into()))
            }
            PredictRequest::Batch(rows) => {
                Ok(PredictResponse::Batch(score_batch(artifact.as_ref(), &rows)?))
            }
        }
    })
    .await
    .map_err(AppError::internal)?
}
