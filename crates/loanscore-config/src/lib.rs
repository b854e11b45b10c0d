//! Runtime configuration for the loanscore server.
//!
//! Settings come from the process environment; the optional form schema and
//! sample payload come from JSON files on disk.

mod form;
mod settings;

pub use form::{load_json_anywhere, FieldProperty, FormSchema, SAMPLE_FILE, SCHEMA_FILE};
pub use settings::{Settings, DEFAULT_HOST, DEFAULT_MODEL_PATH, DEFAULT_PORT};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
