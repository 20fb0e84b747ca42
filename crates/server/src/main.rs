use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use control_store::{ConfigError, ControlStore};
use dispatch::{DispatchContext, DispatchError};
use shared::{
    domain::PanelConfig,
    error::{ApiError, ErrorCode},
    protocol::{activate_route, ActivationRequest, ActivationResult},
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod render;

use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let dispatch =
        DispatchContext::new(settings.http_timeout()).context("failed to build http client")?;
    let state = AppState {
        store: ControlStore::new(&settings.controls_path),
        dispatch,
        static_dir: settings.static_dir.clone(),
        page_template: settings.page_template.clone(),
        max_body_bytes: settings.max_body_bytes,
    };
    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(
        %addr,
        controls = %state.store.path().display(),
        "server listening"
    );
    let app = build_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let body_limit = RequestBodyLimitLayer::new(state.max_body_bytes);
    Router::new()
        .route("/", get(render_panel))
        .route("/healthz", get(healthz))
        .route(activate_route(), post(activate_control).layer(body_limit))
        .nest_service("/static", static_files)
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn render_panel(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let PanelConfig {
        status_url,
        controls,
    } = state.store.load().await.map_err(|e| {
        error!(error = %e, "config load error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("config load error: {e}"),
        )
    })?;

    let controls = dispatch::merge_status(&state.dispatch, controls, status_url.as_deref()).await;

    let Some(template_path) = &state.page_template else {
        return Ok(Html(render::render_page(&controls)));
    };
    let template = tokio::fs::read_to_string(template_path).await.map_err(|e| {
        error!(path = %template_path.display(), error = %e, "page template load error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("page template load error: {e}"),
        )
    })?;
    Ok(Html(render::render_with_template(&template, &controls)))
}

async fn activate_control(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ActivationResult>, (StatusCode, Json<ApiError>)> {
    let config = state.store.load().await.map_err(config_error)?;

    let request: ActivationRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "bad request body");
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                format!("bad request: {e}"),
            )),
        )
    })?;
    info!(name = %request.name, value = %request.value, "activate request");

    let result = dispatch::activate(&state.dispatch, &config.controls, &request)
        .await
        .map_err(dispatch_error)?;
    Ok(Json(result))
}

fn config_error(err: ConfigError) -> (StatusCode, Json<ApiError>) {
    error!(error = %err, "config load error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(
            ErrorCode::ConfigUnavailable,
            format!("config load error: {err}"),
        )),
    )
}

fn dispatch_error(err: DispatchError) -> (StatusCode, Json<ApiError>) {
    let (status, code) = match &err {
        DispatchError::UnknownControl { .. } => (StatusCode::BAD_REQUEST, ErrorCode::UnknownControl),
        DispatchError::RequestBuild { .. }
        | DispatchError::BackendUnreachable { .. }
        | DispatchError::BackendRejected { .. } => (StatusCode::BAD_GATEWAY, ErrorCode::BadGateway),
    };
    if status.is_server_error() {
        error!(error = %err, "activation failed");
    }
    (status, Json(ApiError::new(code, err.to_string())))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
