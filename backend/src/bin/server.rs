//! Tower Jumps relay server.
//!
//! Serves `POST /api/process-csv`, forwarding each request to the analysis
//! backend, and `GET /health`.
//!
//! # Usage
//!
//! ```bash
//! BACKEND_URL=http://localhost:8000 cargo run --bin tower-jumps-relay
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `BACKEND_URL`: Analysis backend base URL
//!   (default: https://tower-jumps-backend-production.up.railway.app)
//! - `BACKEND_TIMEOUT_SECS`: Backend call timeout (default: none)
//! - `RELAY_CONFIG`: Path to a TOML config file (default: search for relay.toml)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tower_jumps::config::RelayConfig;
use tower_jumps::http::{create_router, AppState};
use tower_jumps::services::HttpBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Tower Jumps relay");

    let config = RelayConfig::load()?;
    let backend = HttpBackend::new(&config.backend.url, config.backend_timeout())
        .map_err(|e| anyhow::anyhow!(e))?;
    info!("Forwarding analysis requests to {}", backend.endpoint());

    let addr = config.bind_addr()?;
    let state = AppState::new(Arc::new(backend), config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
