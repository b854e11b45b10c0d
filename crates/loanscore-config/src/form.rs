use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::warn;

use crate::ConfigError;

pub const SCHEMA_FILE: &str = "schema.json";
pub const SAMPLE_FILE: &str = "sample_request.json";

// ─────────────────────────────────────────────────────────────────────────────
// Asset Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Loads `filename` from the first directory that holds a valid copy.
///
/// Unreadable or malformed files are logged and skipped.
pub fn load_json_anywhere(dirs: &[PathBuf], filename: &str) -> Option<Value> {
    for dir in dirs {
        let path = dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_json(&path) {
            Ok(value) => return Some(value),
            Err(e) => warn!("Could not load {} from {}: {}", filename, path.display(), e),
        }
    }
    None
}

fn read_json(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let content = content.trim_start_matches('\u{feff}');
    Ok(serde_json::from_str(content)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Form Schema
// ─────────────────────────────────────────────────────────────────────────────

/// Rendering hints for one form field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldProperty {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub options: Vec<Value>,
    pub default: Option<Value>,
}

impl FieldProperty {
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            kind: text("type"),
            title: text("title"),
            description: text("description"),
            options: value
                .get("enum")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            default: value.get("default").cloned(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind.as_deref(), Some("number") | Some("integer"))
    }
}

/// Field layout for the HTML form.
///
/// Accepts either a JSON Schema document with a `properties` object or a
/// flat `{field: property}` mapping.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    properties: Map<String, Value>,
}

impl FormSchema {
    pub fn from_value(schema: Option<Value>) -> Self {
        let properties = match schema {
            Some(Value::Object(obj)) => match obj.get("properties") {
                Some(Value::Object(props)) => props.clone(),
                _ => obj,
            },
            _ => Map::new(),
        };
        Self { properties }
    }

    /// Loads `schema.json` from the given directories.
    pub fn load(dirs: &[PathBuf]) -> Self {
        Self::from_value(load_json_anywhere(dirs, SCHEMA_FILE))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Field names in document order.
    pub fn fields(&self) -> Vec<&str> {
        self.properties.keys().map(|k| k.as_str()).collect()
    }

    /// Fields paired with their rendering hints, in document order.
    pub fn properties(&self) -> Vec<(&str, FieldProperty)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), FieldProperty::from_value(value)))
            .collect()
    }
}
