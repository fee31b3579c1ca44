use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::{health, issue_token, prometheus_metrics};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Room access tokens
        .nest("/api", Router::new().route("/token", post(issue_token)))
}
