use axum::http::StatusCode as HttpStatus;

use super::*;
use crate::{
    test_support::{spawn_backend, unreachable_url},
    DEFAULT_TIMEOUT,
};

fn ctx() -> DispatchContext {
    DispatchContext::new(DEFAULT_TIMEOUT).expect("client")
}

fn panel(base: &str) -> Vec<Control> {
    vec![
        Control::button("porch-light", format!("{base}/porch/on")),
        Control::slider("lamp", format!("{base}/lamp"), 0, 100),
        Control::button("garage", format!("{base}/garage/toggle")),
    ]
}

#[test]
fn resolve_finds_control_at_any_position() {
    let controls = panel("http://x");
    for expected in &controls {
        let found = resolve(&controls, &expected.name).expect("resolved");
        assert_eq!(found, expected);
    }
    assert!(resolve(&controls, "missing").is_none());
}

#[test]
fn resolve_prefers_first_duplicate() {
    let controls = vec![
        Control::button("dup", "http://x/first"),
        Control::slider("dup", "http://x/second", 0, 1),
    ];
    assert_eq!(
        resolve(&controls, "dup").expect("resolved").target_url,
        "http://x/first"
    );
}

#[test]
fn slider_request_is_json_post() {
    let control = Control::slider("lamp", "http://x/lamp?room=1", 0, 100);
    let request = build_request(&ctx().http, &control, "42").expect("request");

    assert_eq!(request.method(), Method::POST);
    assert_eq!(request.url().as_str(), "http://x/lamp?room=1");
    assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    let body = request.body().and_then(|body| body.as_bytes()).expect("body");
    assert_eq!(body, br#"{"value":"42"}"#);
}

#[test]
fn button_request_is_get_and_ignores_value() {
    let control = Control::button("porch-light", "http://x/on");
    let request = build_request(&ctx().http, &control, "ignored").expect("request");

    assert_eq!(request.method(), Method::GET);
    assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    let body = request.body().and_then(|body| body.as_bytes()).expect("body");
    assert_eq!(body, b"{}");
}

#[test]
fn unparsable_target_url_is_build_failure() {
    let control = Control::button("broken", "not a url");
    let err = build_request(&ctx().http, &control, "").expect_err("should fail");
    assert!(
        matches!(err, DispatchError::RequestBuild { ref url, .. } if url == "not a url"),
        "unexpected: {err}"
    );
}

#[tokio::test]
async fn porch_light_press_succeeds() {
    let backend = spawn_backend(HttpStatus::OK).await;
    let controls = vec![Control::button("porch-light", format!("{}/on", backend.url))];

    let result = activate(&ctx(), &controls, &ActivationRequest::new("porch-light", ""))
        .await
        .expect("activate");

    assert_eq!(result, ActivationResult::success());
    let calls = backend.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/on");
}

#[tokio::test]
async fn slider_value_reaches_backend_verbatim() {
    let backend = spawn_backend(HttpStatus::NO_CONTENT).await;
    let controls = panel(&backend.url);

    for value in ["0", "73", "warm white", "", "{\"nested\":1}"] {
        activate(&ctx(), &controls, &ActivationRequest::new("lamp", value))
            .await
            .expect("activate");
    }

    let calls = backend.calls().await;
    assert_eq!(calls.len(), 5);
    for (call, value) in calls.iter().zip(["0", "73", "warm white", "", "{\"nested\":1}"]) {
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.path, "/lamp");
        assert_eq!(call.content_type.as_deref(), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&call.body).expect("json body");
        assert_eq!(body, serde_json::json!({ "value": value }));
    }
}

#[tokio::test]
async fn button_is_always_get() {
    let backend = spawn_backend(HttpStatus::OK).await;
    let controls = panel(&backend.url);

    activate(&ctx(), &controls, &ActivationRequest::new("garage", "99"))
        .await
        .expect("activate");

    let calls = backend.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/garage/toggle");
}

#[tokio::test]
async fn unknown_control_issues_no_call() {
    let backend = spawn_backend(HttpStatus::OK).await;
    let controls = panel(&backend.url);

    let err = activate(&ctx(), &controls, &ActivationRequest::new("sprinkler", "1"))
        .await
        .expect_err("should fail");

    assert!(
        matches!(err, DispatchError::UnknownControl { ref name } if name == "sprinkler"),
        "unexpected: {err}"
    );
    assert!(backend.calls().await.is_empty());
}

#[tokio::test]
async fn non_success_status_is_backend_rejected() {
    let backend = spawn_backend(HttpStatus::SERVICE_UNAVAILABLE).await;
    let controls = panel(&backend.url);

    let err = activate(&ctx(), &controls, &ActivationRequest::new("lamp", "5"))
        .await
        .expect_err("should fail");

    let DispatchError::BackendRejected { status, url } = err else {
        panic!("expected backend rejection, got {err}");
    };
    assert_eq!(status.as_u16(), 503);
    assert_eq!(url, format!("{}/lamp", backend.url));
}

#[tokio::test]
async fn redirect_status_without_location_is_rejected() {
    let backend = spawn_backend(HttpStatus::MULTIPLE_CHOICES).await;
    let controls = panel(&backend.url);

    let err = activate(&ctx(), &controls, &ActivationRequest::new("porch-light", ""))
        .await
        .expect_err("should fail");
    assert!(
        matches!(err, DispatchError::BackendRejected { status, .. } if status.as_u16() == 300),
        "unexpected: {err}"
    );
}

#[tokio::test]
async fn refused_connection_is_backend_unreachable() {
    let base = unreachable_url().await;
    let controls = panel(&base);

    let err = activate(&ctx(), &controls, &ActivationRequest::new("porch-light", ""))
        .await
        .expect_err("should fail");
    assert!(
        matches!(err, DispatchError::BackendUnreachable { ref url, .. } if url == &format!("{base}/porch/on")),
        "unexpected: {err}"
    );
}
