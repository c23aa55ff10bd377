//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("tuneful-api")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Git hash and build timestamp
    pub build: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /health
///
/// Not subject to content negotiation.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "tuneful-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: format!("{} {}", env!("GIT_HASH"), env!("BUILD_TIMESTAMP")),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
