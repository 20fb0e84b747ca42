use reqwest::{header::CONTENT_TYPE, Client, Method, Request};
use serde::Serialize;
use shared::{
    domain::{Control, ControlKind},
    protocol::{ActivationRequest, ActivationResult},
};
use tracing::{info, warn};
use url::Url;

use crate::{DispatchContext, DispatchError};

const JSON_CONTENT_TYPE: &str = "application/json";
const BUTTON_BODY: &[u8] = b"{}";

#[derive(Serialize)]
struct SliderPayload<'a> {
    value: &'a str,
}

/// First control named `name`, wherever it sits in the list.
pub fn resolve<'a>(controls: &'a [Control], name: &str) -> Option<&'a Control> {
    controls.iter().find(|control| control.name == name)
}

/// Sliders POST `{"value": ...}`; buttons GET with an empty JSON object.
/// Both carry `Content-Type: application/json` and go to `target_url` as-is.
pub fn build_request(
    http: &Client,
    control: &Control,
    value: &str,
) -> Result<Request, DispatchError> {
    let build_failure = |message: String| DispatchError::RequestBuild {
        url: control.target_url.clone(),
        message,
    };

    let url = Url::parse(&control.target_url).map_err(|e| build_failure(e.to_string()))?;
    let (method, body) = match control.kind {
        ControlKind::Slider => {
            let body = serde_json::to_vec(&SliderPayload { value })
                .map_err(|e| build_failure(e.to_string()))?;
            (Method::POST, body)
        }
        ControlKind::Button => (Method::GET, BUTTON_BODY.to_vec()),
    };

    http.request(method, url)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(body)
        .build()
        .map_err(|e| build_failure(e.to_string()))
}

pub async fn activate(
    ctx: &DispatchContext,
    controls: &[Control],
    request: &ActivationRequest,
) -> Result<ActivationResult, DispatchError> {
    let Some(control) = resolve(controls, &request.name) else {
        warn!(name = %request.name, "unknown control");
        return Err(DispatchError::UnknownControl {
            name: request.name.clone(),
        });
    };
    info!(
        name = %control.name,
        kind = control.kind.as_str(),
        url = %control.target_url,
        "resolved control"
    );

    let outbound = build_request(&ctx.http, control, &request.value)?;
    info!(method = %outbound.method(), url = %outbound.url(), "calling backend");

    let response = ctx
        .http
        .execute(outbound)
        .await
        .map_err(|source| DispatchError::BackendUnreachable {
            url: control.target_url.clone(),
            source,
        })?;

    let status = response.status();
    info!(%status, url = %control.target_url, "backend response");
    if !status.is_success() {
        return Err(DispatchError::BackendRejected {
            status,
            url: control.target_url.clone(),
        });
    }

    Ok(ActivationResult::success())
}

#[cfg(test)]
#[path = "tests/activate_tests.rs"]
mod tests;
