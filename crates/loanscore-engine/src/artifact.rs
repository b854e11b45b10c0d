//! Standardized logistic scoring artifact.
//!
//! The artifact is a JSON document with a top-level `pipeline` object:
//!
//! ```json
//! {
//!   "pipeline": {
//!     "numeric": [{ "column": "Age", "mean": 43.5, "scale": 14.9, "coef": -0.61 }],
//!     "categorical": [{ "column": "LoanPurpose", "weights": { "Medical": 0.12 } }],
//!     "intercept": -1.9
//!   },
//!   "metadata": { "name": "loan-default", "version": "3" }
//! }
//! ```
//!
//! Numeric terms contribute `coef * (x - mean) / scale`. Categorical terms are
//! one-hot; a category missing from `weights` contributes nothing.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use loanscore_core::{Column, ColumnKind, FeatureRow, ScoringArtifact, ScoringError};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    pipeline: PipelineSpec,
    #[serde(default)]
    metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PipelineSpec {
    #[serde(default)]
    numeric: Vec<NumericSpec>,
    #[serde(default)]
    categorical: Vec<CategoricalSpec>,
    intercept: f64,
}

#[derive(Debug, Deserialize)]
struct NumericSpec {
    column: String,
    #[serde(default)]
    mean: f64,
    #[serde(default = "default_scale")]
    scale: f64,
    coef: f64,
}

#[derive(Debug, Deserialize)]
struct CategoricalSpec {
    column: String,
    weights: HashMap<String, f64>,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq)]
struct NumericTerm {
    column: Column,
    mean: f64,
    scale: f64,
    coef: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct CategoricalTerm {
    column: Column,
    weights: HashMap<String, f64>,
}

/// Logistic regression over standardized numeric and one-hot categorical
/// columns.
#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    numeric: Vec<NumericTerm>,
    categorical: Vec<CategoricalTerm>,
    intercept: f64,
    metadata: Map<String, Value>,
}

impl LogisticPipeline {
    /// Parses and validates an artifact document.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ScoringError> {
        let file: ArtifactFile = serde_json::from_slice(bytes)?;
        Self::compile(file)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ScoringError> {
        Self::from_json_slice(s.as_bytes())
    }

    fn compile(file: ArtifactFile) -> Result<Self, ScoringError> {
        let spec = file.pipeline;
        let mut seen = HashSet::new();

        ensure_finite("intercept", spec.intercept)?;

        let numeric = spec
            .numeric
            .into_iter()
            .map(|term| -> Result<NumericTerm, ScoringError> {
                let column = resolve_column(&term.column, ColumnKind::Numeric, &mut seen)?;
                let params = [("mean", term.mean), ("scale", term.scale), ("coef", term.coef)];
                for (field, value) in params {
                    ensure_finite(&format!("{}.{}", term.column, field), value)?;
                }
                let scale = if term.scale == 0.0 { 1.0 } else { term.scale };
                Ok(NumericTerm { column, mean: term.mean, scale, coef: term.coef })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categorical = spec
            .categorical
            .into_iter()
            .map(|term| -> Result<CategoricalTerm, ScoringError> {
                let column = resolve_column(&term.column, ColumnKind::Categorical, &mut seen)?;
                for (category, weight) in &term.weights {
                    ensure_finite(&format!("{}[{}]", term.column, category), *weight)?;
                }
                Ok(CategoricalTerm { column, weights: term.weights })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { numeric, categorical, intercept: spec.intercept, metadata: file.metadata })
    }

    /// Columns this pipeline reads, numeric terms first.
    pub fn columns(&self) -> Vec<Column> {
        self.numeric
            .iter()
            .map(|t| t.column)
            .chain(self.categorical.iter().map(|t| t.column))
            .collect()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    fn score_row(&self, row: &FeatureRow) -> Result<f64, ScoringError> {
        let mut z = self.intercept;

        for term in &self.numeric {
            let x = row
                .number(term.column)
                .ok_or_else(|| ScoringError::InvalidRow(term.column.to_string()))?;
            z += bounded(term.coef * (x - term.mean) / term.scale);
        }

        for term in &self.categorical {
            let category = row
                .category(term.column)
                .ok_or_else(|| ScoringError::InvalidRow(term.column.to_string()))?;
            z += bounded(term.weights.get(category).copied().unwrap_or(0.0));
        }

        Ok(sigmoid(z))
    }
}

impl ScoringArtifact for LogisticPipeline {
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ScoringError> {
        rows.iter().map(|row| self.score_row(row)).collect()
    }

    fn describe(&self) -> String {
        let name = self.metadata.get("name").and_then(Value::as_str).unwrap_or("logistic");
        match self.metadata.get("version").and_then(Value::as_str) {
            Some(version) => format!("{} v{} ({} terms)", name, version, self.columns().len()),
            None => format!("{} ({} terms)", name, self.columns().len()),
        }
    }
}

/// Reads and validates the artifact at `path`.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<LogisticPipeline, ScoringError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading scoring artifact");

    let bytes = fs::read(path)?;
    let pipeline = LogisticPipeline::from_json_slice(&bytes)?;

    info!(
        numeric = pipeline.numeric.len(),
        categorical = pipeline.categorical.len(),
        "Scoring artifact loaded: {}",
        pipeline.describe()
    );
    Ok(pipeline)
}

fn resolve_column(
    name: &str,
    expected: ColumnKind,
    seen: &mut HashSet<Column>,
) -> Result<Column, ScoringError> {
    let column = Column::from_name(name)
        .ok_or_else(|| ScoringError::InvalidArtifact(format!("unknown column {}", name)))?;
    if column.kind() != expected {
        return Err(ScoringError::InvalidArtifact(format!(
            "column {} is {:?}, not {:?}",
            name,
            column.kind(),
            expected
        )));
    }
    if !seen.insert(column) {
        return Err(ScoringError::InvalidArtifact(format!("column {} listed twice", name)));
    }
    Ok(column)
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::InvalidArtifact(format!("{} is not finite", field)))
    }
}

/// Largest magnitude a single term may add to the logit.
///
/// Keeps the running sum finite so opposing overflowed terms cannot produce
/// NaN. `sigmoid` is already saturated far below this.
const TERM_LIMIT: f64 = 1e6;

fn bounded(term: f64) -> f64 {
    if term.is_nan() {
        0.0
    } else {
        term.clamp(-TERM_LIMIT, TERM_LIMIT)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use loanscore_core::FeatureValue;

    use super::*;
    use crate::build_feature_row;

    const ARTIFACT: &str = r#"{
        "pipeline": {
            "numeric": [
                { "column": "Age", "mean": 40.0, "scale": 10.0, "coef": -0.5 },
                { "column": "LoanAmount", "mean": 0.0, "scale": 10000.0, "coef": 1.0 }
            ],
            "categorical": [
                { "column": "LoanPurpose", "weights": { "Medical": 0.25, "Vacation": -0.25 } }
            ],
            "intercept": 0.0
        },
        "metadata": { "name": "loan-default", "version": "3" }
    }"#;

    fn row(value: serde_json::Value) -> FeatureRow {
        build_feature_row(value.as_object().unwrap())
    }

    #[test]
    fn test_parses_and_describes() {
        let pipeline = LogisticPipeline::from_json_str(ARTIFACT).unwrap();
        assert_eq!(
            pipeline.columns(),
            vec![Column::Age, Column::LoanAmount, Column::LoanPurpose]
        );
        assert_eq!(pipeline.describe(), "loan-default v3 (3 terms)");
    }

    #[test]
    fn test_linear_score_through_sigmoid() {
        let pipeline = LogisticPipeline::from_json_str(ARTIFACT).unwrap();
        let rows = vec![
            row(serde_json::json!({ "age": 40, "loan_amount": 0 })),
            row(serde_json::json!({ "age": 30, "loan_amount": 10000, "purpose": "medical" })),
            row(serde_json::json!({ "age": 40, "loan_amount": 0, "purpose": "wedding" })),
        ];

        let probs = pipeline.predict_proba(&rows).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs[0] - 0.5).abs() < 1e-12);
        // z = -0.5 * (30 - 40) / 10 + 1.0 + 0.25 = 1.75
        assert!((probs[1] - sigmoid(1.75)).abs() < 1e-12);
        assert!((probs[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bundled_model_loads() {
        let bundled = include_str!("../../../models/loan_default.json");
        let pipeline = LogisticPipeline::from_json_str(bundled).unwrap();
        assert_eq!(pipeline.columns().len(), Column::COUNT);

        let probs = pipeline.predict_proba(&[row(serde_json::json!({}))]).unwrap();
        assert!(probs[0] > 0.0 && probs[0] < 1.0);
    }

    #[test]
    fn test_zero_scale_is_treated_as_unit() {
        let pipeline = LogisticPipeline::from_json_str(
            r#"{"pipeline": {
                "numeric": [{"column": "Income", "scale": 0.0, "coef": 0.001}],
                "intercept": 0.0
            }}"#,
        )
        .unwrap();
        let probs = pipeline
            .predict_proba(&[row(serde_json::json!({ "income": 1000 }))])
            .unwrap();
        assert!((probs[0] - sigmoid(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_overflowing_terms_stay_a_probability() {
        let pipeline = LogisticPipeline::from_json_str(
            r#"{"pipeline": {
                "numeric": [
                    {"column": "Age", "coef": 1e300},
                    {"column": "Income", "coef": -1e300}
                ],
                "intercept": 0.0
            }}"#,
        )
        .unwrap();

        let rows = [
            row(serde_json::json!({ "age": 1e10, "income": 1e10 })),
            row(serde_json::json!({ "age": 1e10 })),
            row(serde_json::json!({ "income": 1e10 })),
        ];
        let probs = pipeline.predict_proba(&rows).unwrap();

        for p in &probs {
            assert!((0.0..=1.0).contains(p), "{}", p);
        }
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert_eq!(probs[1], 1.0);
        assert_eq!(probs[2], 0.0);
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_rejects_unknown_column() {
        let err = LogisticPipeline::from_json_str(
            r#"{"pipeline": {"numeric": [{"column": "PastDue", "coef": 1.0}], "intercept": 0.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_kind_mismatch() {
        let err = LogisticPipeline::from_json_str(
            r#"{"pipeline": {
                "numeric": [{"column": "Education", "coef": 1.0}],
                "intercept": 0.0
            }}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_duplicate_column() {
        let err = LogisticPipeline::from_json_str(
            r#"{"pipeline": {"numeric": [
                {"column": "Age", "coef": 1.0},
                {"column": "Age", "coef": 2.0}
            ], "intercept": 0.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_missing_pipeline_key() {
        let err = LogisticPipeline::from_json_str(r#"{"model": {}}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Parse(_)));
    }

    #[test]
    fn test_rejects_corrupt_bytes() {
        let err = LogisticPipeline::from_json_slice(b"\x80\x04\x95not-json").unwrap_err();
        assert!(matches!(err, ScoringError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_artifact("/nonexistent/loanscore/model.pkl").unwrap_err();
        assert!(matches!(err, ScoringError::Io(_)));
    }

    #[test]
    fn test_mistyped_cell_is_row_error() {
        let pipeline = LogisticPipeline::from_json_str(ARTIFACT).unwrap();
        let bad = FeatureRow::from_fn(|_| FeatureValue::category("x"));
        let err = pipeline.predict_proba(&[bad]).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidRow(ref c) if c == "Age"));
    }
}
