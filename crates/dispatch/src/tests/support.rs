use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) content_type: Option<String>,
    pub(crate) body: Vec<u8>,
}

#[derive(Clone)]
struct BackendState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    reply: StatusCode,
}

pub(crate) struct FakeBackend {
    pub(crate) url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeBackend {
    pub(crate) async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

async fn record_call(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    state.calls.lock().await.push(RecordedCall {
        method,
        path: uri.path().to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    });
    state.reply
}

async fn serve(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// Accepts any method on any path, records it, and answers with `reply`.
pub(crate) async fn spawn_backend(reply: StatusCode) -> FakeBackend {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record_call).with_state(BackendState {
        calls: calls.clone(),
        reply,
    });
    FakeBackend {
        url: serve(app).await,
        calls,
    }
}

/// Serves `body` as JSON at `/status` and returns the full status URL.
pub(crate) async fn spawn_status_server(body: &'static str) -> String {
    let app = Router::new().route(
        "/status",
        get(move || async move { ([(header::CONTENT_TYPE, "application/json")], body) }),
    );
    format!("{}/status", serve(app).await)
}

/// Serves `body` as JSON at `/status` under a fixed `status` code.
pub(crate) async fn spawn_status_server_with(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/status",
        get(move || async move {
            (status, [(header::CONTENT_TYPE, "application/json")], body)
        }),
    );
    format!("{}/status", serve(app).await)
}

/// A status endpoint that answers only after `delay`.
pub(crate) async fn spawn_slow_status_server(delay: Duration) -> String {
    let app = Router::new().route(
        "/status",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "[]"
        }),
    );
    format!("{}/status", serve(app).await)
}

/// An address nothing listens on.
pub(crate) async fn unreachable_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}
