//! Local stand-ins for the analysis backend and the relay.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::Value;

use tower_jumps::config::RelayConfig;
use tower_jumps::http::{create_router, AppState};
use tower_jumps::services::HttpBackend;

/// Body the fake backend answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Text(String),
}

/// A running fake analysis backend.
pub struct FakeBackend {
    pub base_url: String,
    /// Bodies received on `POST /process-csv`, in arrival order
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl FakeBackend {
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a backend that answers every analysis request with `status` and `reply`.
pub async fn spawn_fake_backend(status: StatusCode, reply: Reply) -> FakeBackend {
    let received = Arc::new(Mutex::new(Vec::new()));
    let log = received.clone();

    let app = Router::new().route(
        "/process-csv",
        post(move |Json(payload): Json<Value>| {
            let log = log.clone();
            let reply = reply.clone();
            async move {
                log.lock().unwrap().push(payload);
                match reply {
                    Reply::Json(body) => (status, Json(body)).into_response(),
                    Reply::Text(body) => (status, body).into_response(),
                }
            }
        }),
    );

    let addr = serve(app).await;
    FakeBackend {
        base_url: format!("http://{}", addr),
        received,
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Relay state forwarding to `backend_url`.
pub fn relay_state(backend_url: &str) -> AppState {
    let backend = HttpBackend::new(backend_url, None).unwrap();
    let mut config = RelayConfig::default();
    config.backend.url = backend_url.to_string();
    AppState::new(Arc::new(backend), config)
}

/// Start a relay server forwarding to `backend_url`; returns its base URL.
pub async fn spawn_relay(backend_url: &str) -> String {
    let addr = serve(create_router(relay_state(backend_url))).await;
    format!("http://{}", addr)
}
