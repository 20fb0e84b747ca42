use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the best-effort status fetch. Never reaches the caller of a
/// render; the merger logs it and carries on with default values.
#[derive(Debug, Error)]
pub enum StatusFetchError {
    #[error("status request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("status endpoint {url} returned {status}")]
    Rejected { url: String, status: StatusCode },
    #[error("invalid status payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown control: {name}")]
    UnknownControl { name: String },
    #[error("request build failed for '{url}': {message}")]
    RequestBuild { url: String, message: String },
    #[error("backend call to {url} failed: {source}")]
    BackendUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned error: {status} - {url}")]
    BackendRejected { status: StatusCode, url: String },
}
