//! Health/info handler.
//!
//! Returns a static status payload listing the available endpoints. Any
//! HTTP method is tolerated; there are no side effects and no failure
//! modes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::AppState;

/// Human-readable service banner shown in the health payload.
pub const SERVICE_MESSAGE: &str = "育名補習班簽到系統運行中";

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Service banner.
    pub message: &'static str,
    /// Known endpoint paths.
    pub endpoints: [&'static str; 2],
    /// Current time, ISO-8601.
    pub timestamp: String,
}

/// Health check endpoint handler.
#[instrument(name = "health", skip(state))]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = DateTime::<Utc>::from(state.clock.now_system())
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            message: SERVICE_MESSAGE,
            endpoints: ["/api/attend", "/api/webhook"],
            timestamp,
        }),
    )
}
