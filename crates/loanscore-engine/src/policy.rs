//! Default policy: how a partial UI payload becomes a complete feature row.
//!
//! Missing, empty or unparsable values never raise; they fall back to the
//! per-column default listed in [`FIELD_RULES`].

use loanscore_core::{Column, FeatureRow, FeatureValue};
use serde_json::{Map, Value};
use tracing::debug;

/// Category used for any purpose outside [`PURPOSE_MAP`].
pub const OTHER_PURPOSE: &str = "Other";

/// UI purpose keys and the `LoanPurpose` category each maps to.
pub const PURPOSE_MAP: [(&str, &str); 7] = [
    ("debt_consolidation", "Debt Consolidation"),
    ("home_improvement", "Home Improvement"),
    ("medical", "Medical"),
    ("major_purchase", "Major Purchase"),
    ("small_business", "Small Business"),
    ("vacation", "Vacation"),
    ("other", OTHER_PURPOSE),
];

/// UI keys the form collects.
pub const UI_KEYS: [&str; 7] = [
    "age",
    "income",
    "debt_ratio",
    "open_credit_lines",
    "past_due_30_59",
    "loan_amount",
    "purpose",
];

/// Where a column's value comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    /// Coerced from a UI key, `default` when absent or unparsable.
    Number { key: &'static str, default: f64 },
    /// Mapped through [`PURPOSE_MAP`], [`OTHER_PURPOSE`] when unrecognized.
    Purpose { key: &'static str },
    /// Numeric constant; the UI never collects this column.
    FixedNumber(f64),
    /// Categorical constant; the UI never collects this column.
    FixedCategory(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub column: Column,
    pub source: Source,
}

const fn rule(column: Column, source: Source) -> FieldRule {
    FieldRule { column, source }
}

/// One rule per model column, in [`Column::ALL`] order.
pub const FIELD_RULES: [FieldRule; Column::COUNT] = [
    rule(Column::Age, Source::Number { key: "age", default: 0.0 }),
    rule(Column::CreditScore, Source::FixedNumber(650.0)),
    rule(Column::Education, Source::FixedCategory("unknown")),
    rule(Column::MonthsEmployed, Source::FixedNumber(24.0)),
    rule(Column::NumCreditLines, Source::Number { key: "open_credit_lines", default: 0.0 }),
    rule(Column::DtiRatio, Source::Number { key: "debt_ratio", default: 0.0 }),
    rule(Column::InterestRate, Source::FixedNumber(12.0)),
    rule(Column::HasMortgage, Source::FixedNumber(0.0)),
    rule(Column::MaritalStatus, Source::FixedCategory("unknown")),
    rule(Column::LoanPurpose, Source::Purpose { key: "purpose" }),
    rule(Column::Income, Source::Number { key: "income", default: 0.0 }),
    rule(Column::LoanTerm, Source::FixedNumber(36.0)),
    rule(Column::EmploymentType, Source::FixedCategory("unknown")),
    rule(Column::HasCoSigner, Source::FixedNumber(0.0)),
    rule(Column::HasDependents, Source::FixedNumber(0.0)),
    rule(Column::LoanAmount, Source::Number { key: "loan_amount", default: 0.0 }),
];

impl FieldRule {
    /// Resolves this column's value from a payload.
    pub fn resolve(&self, payload: &Map<String, Value>) -> FeatureValue {
        match self.source {
            Source::Number { key, default } => {
                FeatureValue::Number(payload.get(key).and_then(to_number).unwrap_or(default))
            }
            Source::Purpose { key } => FeatureValue::category(map_purpose(payload.get(key))),
            Source::FixedNumber(n) => FeatureValue::Number(n),
            Source::FixedCategory(s) => FeatureValue::category(s),
        }
    }
}

/// Coerces a JSON value to a finite number.
///
/// Numbers pass through, strings are trimmed and parsed, booleans become
/// `1.0`/`0.0`. Everything else is absent.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Maps a raw UI purpose to a `LoanPurpose` category.
pub fn map_purpose(raw: Option<&Value>) -> &'static str {
    let Some(raw) = raw.and_then(Value::as_str) else {
        return OTHER_PURPOSE;
    };
    let key = raw.trim().to_lowercase();
    PURPOSE_MAP
        .iter()
        .find(|(ui, _)| *ui == key)
        .map(|(_, category)| *category)
        .unwrap_or(OTHER_PURPOSE)
}

/// Builds one complete model row from a partial, untrusted payload.
pub fn build_feature_row(payload: &Map<String, Value>) -> FeatureRow {
    let row = FeatureRow::from_fn(|column| FIELD_RULES[column.index()].resolve(payload));

    debug!(columns = ?FeatureRow::columns().collect::<Vec<_>>(), "Model input columns");
    debug!(
        row = %serde_json::to_string(&row).unwrap_or_default(),
        "Model input row"
    );
    row
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn all_defaults() -> FeatureRow {
        FeatureRow::new([
            FeatureValue::Number(0.0),
            FeatureValue::Number(650.0),
            FeatureValue::category("unknown"),
            FeatureValue::Number(24.0),
            FeatureValue::Number(0.0),
            FeatureValue::Number(0.0),
            FeatureValue::Number(12.0),
            FeatureValue::Number(0.0),
            FeatureValue::category("unknown"),
            FeatureValue::category("Other"),
            FeatureValue::Number(0.0),
            FeatureValue::Number(36.0),
            FeatureValue::category("unknown"),
            FeatureValue::Number(0.0),
            FeatureValue::Number(0.0),
            FeatureValue::Number(0.0),
        ])
    }

    #[test]
    fn test_rules_follow_column_order() {
        for (rule, column) in FIELD_RULES.iter().zip(Column::ALL) {
            assert_eq!(rule.column, column);
        }
    }

    #[test]
    fn test_rule_kinds_match_columns() {
        for rule in &FIELD_RULES {
            let categorical =
                matches!(rule.source, Source::Purpose { .. } | Source::FixedCategory(_));
            assert_eq!(
                categorical,
                rule.column.kind() == loanscore_core::ColumnKind::Categorical,
                "{}",
                rule.column
            );
        }
    }

    #[test]
    fn test_rule_keys_are_ui_keys() {
        for rule in &FIELD_RULES {
            if let Source::Number { key, .. } | Source::Purpose { key } = rule.source {
                assert!(UI_KEYS.contains(&key), "{}", key);
            }
        }
    }

    #[test]
    fn test_empty_payload_yields_all_defaults() {
        assert_eq!(build_feature_row(&Map::new()), all_defaults());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let row = build_feature_row(&payload(json!({ "CreditScore": 800, "nickname": "x" })));
        assert_eq!(row, all_defaults());
    }

    #[test]
    fn test_example_payload() {
        let row = build_feature_row(&payload(json!({
            "age": 30,
            "income": 4000,
            "purpose": "medical",
            "loan_amount": 10000
        })));

        let defaults = all_defaults();
        let expected = FeatureRow::from_fn(|column| match column {
            Column::Age => FeatureValue::Number(30.0),
            Column::Income => FeatureValue::Number(4000.0),
            Column::LoanPurpose => FeatureValue::category("Medical"),
            Column::LoanAmount => FeatureValue::Number(10000.0),
            other => defaults.get(other).clone(),
        });
        assert_eq!(row, expected);
    }

    #[test]
    fn test_ratio_and_credit_lines() {
        let row = build_feature_row(&payload(json!({
            "debt_ratio": "0.35",
            "open_credit_lines": 4,
            "past_due_30_59": 2
        })));
        assert_eq!(row.number(Column::DtiRatio), Some(0.35));
        assert_eq!(row.number(Column::NumCreditLines), Some(4.0));
    }

    #[test]
    fn test_purpose_mapping() {
        assert_eq!(map_purpose(Some(&json!("debt_consolidation"))), "Debt Consolidation");
        assert_eq!(map_purpose(Some(&json!("  Small_Business "))), "Small Business");
        assert_eq!(map_purpose(Some(&json!("vacation"))), "Vacation");
        assert_eq!(map_purpose(Some(&json!("wedding"))), "Other");
        assert_eq!(map_purpose(Some(&json!(""))), "Other");
        assert_eq!(map_purpose(Some(&json!(3))), "Other");
        assert_eq!(map_purpose(None), "Other");
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(to_number(&json!(42)), Some(42.0));
        assert_eq!(to_number(&json!(1.5)), Some(1.5));
        assert_eq!(to_number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(to_number(&json!("1e3")), Some(1000.0));
        assert_eq!(to_number(&json!(true)), Some(1.0));
        assert_eq!(to_number(&json!(false)), Some(0.0));
        assert_eq!(to_number(&json!("")), None);
        assert_eq!(to_number(&json!("   ")), None);
        assert_eq!(to_number(&json!("forty")), None);
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&Value::Null), None);
        assert_eq!(to_number(&json!([1])), None);
        assert_eq!(to_number(&json!({ "v": 1 })), None);
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let row = build_feature_row(&payload(json!({
            "age": "",
            "income": "lots",
            "loan_amount": null,
            "debt_ratio": [0.2],
            "purpose": { "kind": "medical" }
        })));
        assert_eq!(row, all_defaults());
    }
}
