use loanscore_core::PredictionResult;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// A `/predict` body: one row object or an array of them.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictRequest {
    Single(Map<String, Value>),
    Batch(Vec<Map<String, Value>>),
}

impl PredictRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(row) => Ok(PredictRequest::Single(row)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(row) => Ok(row),
                    _ => Err(AppError::BadRequest(format!("row {} is not a JSON object", i))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(PredictRequest::Batch),
            _ => Err(AppError::BadRequest(
                "body must be a JSON object or an array of objects".into(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PredictRequest::Single(_) => 1,
            PredictRequest::Batch(rows) => rows.len(),
        }
    }
}

/// Mirrors the request shape: an object for an object, an array for an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Single(PredictionResult),
    Batch(Vec<PredictionResult>),
}
