use std::{
    io,
    path::{Path, PathBuf},
};

use shared::domain::PanelConfig;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read controls file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed controls file '{}': {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Operator-owned controls file. Every `load` reads the file again so edits
/// show up on the next request without a restart.
#[derive(Debug, Clone)]
pub struct ControlStore {
    path: PathBuf,
}

impl ControlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<PanelConfig, ConfigError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;

        let config = parse_config(&raw, ConfigFormat::from_path(&self.path)).map_err(
            |message| ConfigError::Malformed {
                path: self.path.clone(),
                message,
            },
        )?;

        for name in config.duplicate_names() {
            warn!(
                path = %self.path.display(),
                %name,
                "duplicate control name; the first definition wins"
            );
        }
        debug!(
            path = %self.path.display(),
            controls = config.controls.len(),
            "loaded controls"
        );
        Ok(config)
    }
}

pub fn parse_config(raw: &str, format: ConfigFormat) -> Result<PanelConfig, String> {
    match format {
        ConfigFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
