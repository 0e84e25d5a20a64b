//! Health check endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the user directory is reachable.
    pub directory: &'static str,
}

/// Health check handler. Reports degraded when the directory is down;
/// token validation itself needs no backing store.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let directory_ok = state.db.ping().await.is_ok();

    let (status_code, response) = if directory_ok {
        (
            StatusCode::OK,
            HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
                directory: "reachable",
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
                directory: "unreachable",
            },
        )
    };

    (status_code, Json(response))
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
