//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub media: MediaHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct MediaHealthResponse {
    /// Host of the configured media server URL, if it parses
    pub host: Option<String>,
    pub token_ttl_seconds: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let livekit = &state.settings.livekit;
    let host = reqwest::Url::parse(&livekit.url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string));

    let status = if host.is_some() { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        media: MediaHealthResponse {
            host,
            token_ttl_seconds: livekit.token_ttl_seconds,
        },
    })
}
