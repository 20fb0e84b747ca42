use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use ::config::{Config, Environment, File, Source};
use serde::Deserialize;

const SETTINGS_FILE: &str = "server";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub controls_path: PathBuf,
    pub static_dir: PathBuf,
    /// HTML page with `{{controls}}` and `{{activate_route}}` slots, read on
    /// every render. The built-in page is used when unset.
    pub page_template: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            controls_path: "config.json".into(),
            static_dir: "static".into(),
            page_template: None,
            http_timeout_secs: dispatch::DEFAULT_TIMEOUT.as_secs(),
            max_body_bytes: 16 * 1024,
        }
    }
}

impl Settings {
    pub fn http_timeout(&self) -> Duration {
        if self.http_timeout_secs == 0 {
            return dispatch::DEFAULT_TIMEOUT;
        }
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Defaults, then `server.toml` if present, then `APP__*` environment variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    settings_from_sources(
        File::with_name(SETTINGS_FILE).required(false),
        env_source(),
    )
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn settings_from_sources<S>(file: S, env: Environment) -> anyhow::Result<Settings>
where
    S: Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(file)
        .add_source(env)
        .build()
        .context("failed to read server settings")?
        .try_deserialize()
        .context("invalid server settings")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
