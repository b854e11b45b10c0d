use std::env;
use std::path::PathBuf;

use crate::ConfigError;

pub const DEFAULT_MODEL_PATH: &str = "model.pkl";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Process-level settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Location of the serialized scoring artifact.
    pub model_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Root directory searched for `schema.json` and `sample_request.json`.
    pub assets_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            assets_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Unset and empty variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        Ok(Self {
            model_path: get("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            host: get("HOST").unwrap_or(defaults.host),
            port,
            assets_dir: get("ASSETS_DIR").map(PathBuf::from).unwrap_or(defaults.assets_dir),
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directories checked, in order, for form assets.
    pub fn asset_dirs(&self) -> Vec<PathBuf> {
        vec![self.assets_dir.clone(), self.assets_dir.join("app")]
    }
}
