use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::session::ReconnectPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub livekit: LiveKitConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Media server connection and token signing credentials
#[derive(Clone, Deserialize)]
pub struct LiveKitConfig {
    /// WebSocket URL handed to clients (`wss://...`)
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
    /// Lifetime of issued access tokens in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl std::fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Reconnect tuning for client sessions
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
    #[serde(default = "default_reconnect_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// 0.0 disables jitter
    #[serde(default)]
    pub jitter_factor: f64,
}

impl SessionSettings {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay_ms: self.reconnect_base_delay_ms,
            max_delay_ms: self.reconnect_max_delay_ms,
            max_attempts: self.max_reconnect_attempts,
            jitter_factor: self.jitter_factor.clamp(0.0, 1.0),
        }
    }
}

impl From<&SessionSettings> for ReconnectPolicy {
    fn from(settings: &SessionSettings) -> Self {
        settings.reconnect_policy()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP gRPC endpoint
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Trace sampling ratio (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_token_ttl() -> u64 {
    600 // 10 minutes
}

fn default_reconnect_base_delay_ms() -> u64 {
    1000
}

fn default_reconnect_max_delay_ms() -> u64 {
    30_000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "wedebate-session".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("livekit.token_ttl_seconds", 600)?
            .set_default("session.reconnect_base_delay_ms", 1000)?
            .set_default("session.reconnect_max_delay_ms", 30_000)?
            .set_default("session.max_reconnect_attempts", 5)?
            .set_default("session.jitter_factor", 0.0)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER__PORT, LIVEKIT__URL, LIVEKIT__API_KEY, SESSION__MAX_RECONNECT_ATTEMPTS, etc.
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            reconnect_max_delay_ms: default_reconnect_max_delay_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            jitter_factor: 0.0,
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3001);
    }

    #[test]
    fn test_session_defaults_match_reconnect_policy() {
        let policy = SessionSettings::default().reconnect_policy();
        assert_eq!(policy, ReconnectPolicy::default());
    }

    #[test]
    fn test_jitter_is_clamped() {
        let settings = SessionSettings {
            jitter_factor: 3.5,
            ..Default::default()
        };
        assert_eq!(ReconnectPolicy::from(&settings).jitter_factor, 1.0);
    }

    #[test]
    fn test_livekit_debug_hides_secret() {
        let config = LiveKitConfig {
            url: "wss://media.example.com".into(),
            api_key: "APIkey".into(),
            api_secret: "super-secret".into(),
            token_ttl_seconds: 600,
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("APIkey"));
    }

    #[test]
    fn test_settings_deserialize_from_sources() {
        let settings: Settings = Config::builder()
            .set_override("livekit.url", "wss://media.example.com")
            .unwrap()
            .set_override("livekit.api_key", "key")
            .unwrap()
            .set_override("livekit.api_secret", "secret")
            .unwrap()
            .set_override("session.max_reconnect_attempts", 3)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.livekit.token_ttl_seconds, 600);
        assert_eq!(settings.session.max_reconnect_attempts, 3);
        assert_eq!(settings.session.reconnect_base_delay_ms, 1000);
        assert!(!settings.otel.enabled);
        assert_eq!(settings.server_addr(), "0.0.0.0:3001");
    }
}
