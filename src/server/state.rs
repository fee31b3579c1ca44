use std::sync::Arc;
use std::time::Instant;

use crate::auth::AccessTokenIssuer;
use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub token_issuer: Arc<AccessTokenIssuer>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let token_issuer = Arc::new(AccessTokenIssuer::new(&settings.livekit));

        Self {
            settings: Arc::new(settings),
            token_issuer,
            start_time: Instant::now(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    use crate::config::{LiveKitConfig, OtelConfig, ServerConfig, SessionSettings};

    Settings {
        server: ServerConfig::default(),
        livekit: LiveKitConfig {
            url: "wss://media.example.com".to_string(),
            api_key: "APItestkey".to_string(),
            api_secret: "test-secret-key-for-testing".to_string(),
            token_ttl_seconds: 600,
        },
        session: SessionSettings::default(),
        otel: OtelConfig::default(),
    }
}
