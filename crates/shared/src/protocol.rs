use serde::{Deserialize, Serialize};

/// One row of the status endpoint's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: String,
    pub value: i64,
}

/// Body of `POST /activate`. `value` is forwarded to the backend as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRequest {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl ActivationRequest {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationResult {
    pub ok: bool,
    pub status: String,
}

impl ActivationResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            status: "success".to_string(),
        }
    }
}

pub fn activate_route() -> &'static str {
    "/activate"
}
