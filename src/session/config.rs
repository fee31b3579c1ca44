//! Connection configuration and local shape validation

use serde::{Deserialize, Serialize};

use super::SessionError;

/// Role of the local identity inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Moderator,
    #[serde(alias = "debater")]
    Participant,
    Audience,
}

impl Role {
    /// Lenient parse used for incoming token requests.
    ///
    /// `debater` is accepted as a participant; anything unrecognised gets
    /// the least privileged role.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "moderator" => Role::Moderator,
            "participant" | "debater" => Role::Participant,
            _ => Role::Audience,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Moderator => "moderator",
            Role::Participant => "participant",
            Role::Audience => "audience",
        }
    }

    /// Whether this role publishes camera and microphone after joining.
    pub fn publishes_media(&self) -> bool {
        !matches!(self, Role::Audience)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed for one connection attempt. Built by the caller
/// before each `connect` and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub url: String,
    pub token: String,
    pub room_name: String,
    pub participant_name: String,
    pub role: Role,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .field("room_name", &self.room_name)
            .field("participant_name", &self.participant_name)
            .field("role", &self.role)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        room_name: impl Into<String>,
        participant_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            room_name: room_name.into(),
            participant_name: participant_name.into(),
            role,
        }
    }

    /// Check the config shape without touching the network.
    pub fn validate(&self) -> Result<(), SessionError> {
        validate_url(&self.url)?;
        validate_token(&self.token)?;
        if self.room_name.trim().is_empty() {
            return Err(SessionError::InvalidConfig("room name is empty".to_string()));
        }
        Ok(())
    }
}

/// Accepts only `ws://` and `wss://` URLs with a host.
pub fn validate_url(url: &str) -> Result<(), SessionError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| SessionError::InvalidConfig(format!("Invalid WebSocket URL: {}", e)))?;

    if !matches!(parsed.scheme(), "ws" | "wss") {
        return Err(SessionError::InvalidConfig(format!(
            "Invalid WebSocket URL scheme '{}'",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(SessionError::InvalidConfig(
            "Invalid WebSocket URL: missing host".to_string(),
        ));
    }

    Ok(())
}

/// Accepts only three non-empty dot-separated segments (header.claims.signature).
pub fn validate_token(token: &str) -> Result<(), SessionError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(SessionError::InvalidConfig(
            "Invalid JWT token format".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, token: &str) -> ConnectionConfig {
        ConnectionConfig::new(url, token, "debate-1", "alice", Role::Participant)
    }

    #[test]
    fn test_accepts_ws_and_wss() {
        assert!(config("wss://media.example.com", "a.b.c").validate().is_ok());
        assert!(config("ws://localhost:7880", "a.b.c").validate().is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in ["https://media.example.com", "http://localhost", "ftp://x", "", "wss://"] {
            let err = config(url, "a.b.c").validate().unwrap_err();
            assert!(matches!(err, SessionError::InvalidConfig(_)), "url {:?}", url);
        }
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c", ".b.c", "a.b."] {
            let err = config("wss://media.example.com", token).validate().unwrap_err();
            assert!(matches!(err, SessionError::InvalidConfig(_)), "token {:?}", token);
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config("wss://m.example.com", "secret.token.value"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_role_parse_lenient() {
        assert_eq!(Role::parse_lenient("moderator"), Role::Moderator);
        assert_eq!(Role::parse_lenient("Debater"), Role::Participant);
        assert_eq!(Role::parse_lenient("participant"), Role::Participant);
        assert_eq!(Role::parse_lenient("judge"), Role::Audience);
        assert!(!Role::Audience.publishes_media());
        assert!(Role::Moderator.publishes_media());
    }

    #[test]
    fn test_role_deserializes_debater_alias() {
        let role: Role = serde_json::from_str("\"debater\"").unwrap();
        assert_eq!(role, Role::Participant);
    }
}
