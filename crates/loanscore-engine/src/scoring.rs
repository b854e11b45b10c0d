use loanscore_core::{PredictionResult, ScoringArtifact, ScoringError};
use serde_json::{Map, Value};
use tracing::debug;

use crate::policy::build_feature_row;

/// Scores a batch of payloads with a single artifact call.
///
/// Each payload becomes its own row; results come back in input order.
pub fn score_batch(
    artifact: &dyn ScoringArtifact,
    payloads: &[Map<String, Value>],
) -> Result<Vec<PredictionResult>, ScoringError> {
    if payloads.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<_> = payloads.iter().map(build_feature_row).collect();
    let probabilities = artifact.predict_proba(&rows)?;

    if probabilities.len() != rows.len() {
        return Err(ScoringError::BatchMismatch {
            expected: rows.len(),
            actual: probabilities.len(),
        });
    }

    debug!(rows = rows.len(), "Batch scored");
    Ok(probabilities.into_iter().map(PredictionResult::from_probability).collect())
}
