use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use loanscore_config::{load_json_anywhere, FormSchema, SAMPLE_FILE};
use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::services::form;
use crate::state::AppState;

/// GET / - Render the scoring form.
///
/// Assets are re-read on every request so edits show up without a restart.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let dirs = state.settings.asset_dirs();
    let (schema, sample) = tokio::task::spawn_blocking(move || {
        let schema = FormSchema::load(&dirs);
        let sample = load_json_anywhere(&dirs, SAMPLE_FILE);
        (schema, sample)
    })
    .await
    .map_err(AppError::internal)?;

    let sample = sample
        .filter(|v| !is_empty_json(v))
        .unwrap_or_else(|| Value::Object(Default::default()));

    if schema.is_empty() {
        info!("Rendering raw JSON mode");
    } else {
        info!("Rendering form with {} fields", schema.fields().len());
    }

    Ok(Html(form::render_index(&schema, &sample)))
}

/// Samples that carry nothing to prefill render as `{}`.
fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}
