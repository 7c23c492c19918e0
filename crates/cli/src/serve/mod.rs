//! `valruns serve` -- browser dashboard for the split history.
//!
//! Serves the dashboard with `axum` + `tokio`. The document is fetched
//! from the configured provider on every page load and pushed through
//! the pipeline in one pass; any failure yields a single error page
//! instead of a partial table.
//!
//! Endpoints:
//! - GET /        - HTML dashboard
//! - GET /table   - the same dashboard as JSON
//! - GET /health  - server status
//!
//! `/` and `/table` carry an ETag and answer `If-None-Match` with 304.

mod handlers;
mod state;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sha2::{Digest, Sha256};
use tower_http::cors::{Any, CorsLayer};
use valruns_core::Dashboard;
use valruns_provider::DocumentProvider;

use self::handlers::{handle_dashboard, handle_health, handle_not_found, handle_table};
use self::state::AppState;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// SHA-256 etag over the serialized dashboard and notice.
pub(crate) fn compute_etag(dashboard: &Dashboard, notice: Option<&str>) -> String {
    let canonical = serde_json::to_string(&(dashboard, notice)).unwrap_or_default();
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{:x}", hash)
}

fn build_router(state: Arc<AppState>) -> Router {
    // CORS: permissive, the JSON endpoint is read-only.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_dashboard))
        .route("/table", get(handle_table))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state)
}

/// Start the dashboard server on the given port.
pub async fn start_server(
    port: u16,
    provider: Arc<dyn DocumentProvider>,
    notice: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(source = %provider.describe(), "serving splits document");

    let state = Arc::new(AppState { provider, notice });
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("valruns dashboard listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
