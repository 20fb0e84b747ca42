use std::collections::HashMap;

use reqwest::Client;
use shared::{domain::Control, protocol::StatusEntry};
use tracing::{debug, warn};

use crate::{DispatchContext, StatusFetchError};

/// Overlays live slider values onto `controls`. Any failure is logged and the
/// controls come back with their defaults.
pub async fn merge_status(
    ctx: &DispatchContext,
    mut controls: Vec<Control>,
    status_url: Option<&str>,
) -> Vec<Control> {
    let Some(url) = status_url.map(str::trim).filter(|url| !url.is_empty()) else {
        return controls;
    };

    match fetch_status(&ctx.http, url).await {
        Ok(values) => apply_status(&mut controls, &values),
        Err(error) => warn!(%url, %error, "status fetch failed; rendering without live values"),
    }
    controls
}

pub async fn fetch_status(
    http: &Client,
    url: &str,
) -> Result<HashMap<String, i64>, StatusFetchError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|source| StatusFetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(StatusFetchError::Rejected {
            url: url.to_string(),
            status,
        });
    }

    let entries: Vec<StatusEntry> = response
        .json()
        .await
        .map_err(|source| StatusFetchError::Decode {
            url: url.to_string(),
            source,
        })?;
    debug!(%url, entries = entries.len(), "fetched status values");

    Ok(entries
        .into_iter()
        .map(|entry| (entry.id, entry.value))
        .collect())
}

/// Sliders take the value reported under their name. Buttons are left alone.
pub fn apply_status(controls: &mut [Control], values: &HashMap<String, i64>) {
    for control in controls.iter_mut().filter(|control| control.is_slider()) {
        if let Some(value) = values.get(&control.name) {
            control.value = *value;
        }
    }
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
