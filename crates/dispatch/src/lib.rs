use std::time::Duration;

use reqwest::Client;

mod activate;
mod error;
mod status;

pub use activate::{activate, build_request, resolve};
pub use error::{DispatchError, StatusFetchError};
pub use status::{apply_status, fetch_status, merge_status};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound HTTP shared by the status merge and the dispatcher.
#[derive(Clone)]
pub struct DispatchContext {
    pub http: Client,
}

impl DispatchContext {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("control-panel/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
