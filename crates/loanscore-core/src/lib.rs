//! Core domain types and error definitions for loanscore.
//!
//! This crate provides the fundamental types shared across the loanscore
//! service:
//!
//! - [`Column`] and [`FeatureRow`] - The fixed model input schema
//! - [`PredictionResult`] - Per-row scoring output
//! - [`ScoringArtifact`] - The capability every loaded model provides
//! - [`ScoringError`] - Error type for artifact loading and inference
//!
//! # Example
//!
//! ```rust
//! use loanscore_core::{Column, FeatureRow, FeatureValue, PredictionResult};
//!
//! let row = FeatureRow::from_fn(|column| match column.kind() {
//!     loanscore_core::ColumnKind::Numeric => FeatureValue::Number(0.0),
//!     loanscore_core::ColumnKind::Categorical => FeatureValue::category("unknown"),
//! });
//! assert_eq!(row.number(Column::Age), Some(0.0));
//!
//! let result = PredictionResult::from_probability(0.73);
//! assert_eq!(result.pred_default, 1);
//! ```

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Probability at or above which a row is classified as a default.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Errors that can occur while loading or invoking a scoring artifact.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// Artifact file could not be read.
    #[error("Failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact file is not valid JSON or does not match the artifact layout.
    #[error("Failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact parsed but references columns or values the model cannot use.
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// A row cell does not have the type its column requires.
    #[error("Invalid value for column {0}")]
    InvalidRow(String),

    /// Artifact returned a different number of probabilities than rows given.
    #[error("Artifact returned {actual} probabilities for {expected} rows")]
    BatchMismatch { expected: usize, actual: usize },
}

/// Semantic type of a model column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// A model input column.
///
/// Variant order is the column order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Age,
    CreditScore,
    Education,
    MonthsEmployed,
    NumCreditLines,
    DtiRatio,
    InterestRate,
    HasMortgage,
    MaritalStatus,
    LoanPurpose,
    Income,
    LoanTerm,
    EmploymentType,
    HasCoSigner,
    HasDependents,
    LoanAmount,
}

impl Column {
    /// Number of model columns.
    pub const COUNT: usize = 16;

    /// Every column, in model order.
    pub const ALL: [Column; Column::COUNT] = [
        Column::Age,
        Column::CreditScore,
        Column::Education,
        Column::MonthsEmployed,
        Column::NumCreditLines,
        Column::DtiRatio,
        Column::InterestRate,
        Column::HasMortgage,
        Column::MaritalStatus,
        Column::LoanPurpose,
        Column::Income,
        Column::LoanTerm,
        Column::EmploymentType,
        Column::HasCoSigner,
        Column::HasDependents,
        Column::LoanAmount,
    ];

    /// Column name as the model expects it.
    pub fn name(self) -> &'static str {
        match self {
            Column::Age => "Age",
            Column::CreditScore => "CreditScore",
            Column::Education => "Education",
            Column::MonthsEmployed => "MonthsEmployed",
            Column::NumCreditLines => "NumCreditLines",
            Column::DtiRatio => "DTIRatio",
            Column::InterestRate => "InterestRate",
            Column::HasMortgage => "HasMortgage",
            Column::MaritalStatus => "MaritalStatus",
            Column::LoanPurpose => "LoanPurpose",
            Column::Income => "Income",
            Column::LoanTerm => "LoanTerm",
            Column::EmploymentType => "EmploymentType",
            Column::HasCoSigner => "HasCoSigner",
            Column::HasDependents => "HasDependents",
            Column::LoanAmount => "LoanAmount",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Education
            | Column::MaritalStatus
            | Column::LoanPurpose
            | Column::EmploymentType => ColumnKind::Categorical,
            _ => ColumnKind::Numeric,
        }
    }

    /// Position of this column within a [`FeatureRow`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up a column by its model name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell of a feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn category(value: impl Into<String>) -> Self {
        FeatureValue::Category(value.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Category(s) => f.write_str(s),
        }
    }
}

/// One complete model input row.
///
/// Holds exactly one value per [`Column`], stored in [`Column::ALL`] order.
/// A row cannot be constructed with a column missing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: [FeatureValue; Column::COUNT],
}

impl FeatureRow {
    /// Creates a row from values given in [`Column::ALL`] order.
    pub fn new(values: [FeatureValue; Column::COUNT]) -> Self {
        Self { values }
    }

    /// Creates a row by computing each column's value in order.
    pub fn from_fn(mut f: impl FnMut(Column) -> FeatureValue) -> Self {
        Self {
            values: std::array::from_fn(|i| f(Column::ALL[i])),
        }
    }

    pub fn get(&self, column: Column) -> &FeatureValue {
        &self.values[column.index()]
    }

    pub fn number(&self, column: Column) -> Option<f64> {
        self.get(column).as_number()
    }

    pub fn category(&self, column: Column) -> Option<&str> {
        self.get(column).as_category()
    }

    /// Iterates `(column, value)` pairs in model order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &FeatureValue)> {
        Column::ALL.into_iter().zip(self.values.iter())
    }

    /// Column names in model order.
    pub fn columns() -> impl Iterator<Item = &'static str> {
        Column::ALL.into_iter().map(Column::name)
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Column::COUNT))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column.name(), value)?;
        }
        map.end()
    }
}

/// Scoring output for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of default, in `[0, 1]`.
    pub prob_default: f64,
    /// `1` when `prob_default >= 0.5`, else `0`.
    pub pred_default: u8,
}

impl PredictionResult {
    pub fn from_probability(prob_default: f64) -> Self {
        let pred_default = u8::from(prob_default >= DECISION_THRESHOLD);
        Self { prob_default, pred_default }
    }
}

/// A loaded model that scores feature rows.
///
/// Implementations are read-only after construction and shared across
/// concurrent requests.
pub trait ScoringArtifact: Send + Sync {
    /// Returns the positive-class probability for each row, in row order.
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ScoringError>;

    /// Short human-readable summary for startup logs.
    fn describe(&self) -> String {
        "scoring artifact".to_string()
    }
}
