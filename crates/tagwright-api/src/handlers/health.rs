//! Liveness and remote connectivity checks.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Liveness only; never touches the remote.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "paperless_connected": false,
        "paperless_version": null,
    }))
}

/// Liveness plus a connection test against the remote.
///
/// Always answers 200; an unreachable remote or a rejected token is
/// reported as `degraded` with the error text.
pub async fn health_check_full(State(state): State<AppState>) -> impl IntoResponse {
    let result = match state.paperless() {
        Ok(client) => client.test_connection().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(info) => Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "paperless_connected": true,
            "paperless_version": info.version,
        })),
        Err(e) => {
            warn!(error = %e, "Paperless connection test failed");
            Json(json!({
                "status": "degraded",
                "version": env!("CARGO_PKG_VERSION"),
                "paperless_connected": false,
                "error": e.to_string(),
            }))
        }
    }
}
