use thiserror::Error;

use crate::transport::TransportError;

/// Why a handshake was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeFailure {
    Unauthorized,
    Network,
    Timeout,
    PermissionDenied,
    Other,
}

impl HandshakeFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandshakeFailure::Unauthorized => "unauthorized",
            HandshakeFailure::Network => "network",
            HandshakeFailure::Timeout => "timeout",
            HandshakeFailure::PermissionDenied => "permission_denied",
            HandshakeFailure::Other => "other",
        }
    }
}

impl std::fmt::Display for HandshakeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&TransportError> for HandshakeFailure {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Unauthorized(_) => HandshakeFailure::Unauthorized,
            TransportError::Network(_) => HandshakeFailure::Network,
            TransportError::Timeout(_) => HandshakeFailure::Timeout,
            TransportError::PermissionDenied(_) | TransportError::DeviceUnavailable(_) => {
                HandshakeFailure::PermissionDenied
            }
            TransportError::Other(_) => HandshakeFailure::Other,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid connection config: {0}")]
    InvalidConfig(String),

    #[error("Handshake with room '{room}' failed ({kind}): {detail}")]
    HandshakeFailed {
        room: String,
        kind: HandshakeFailure,
        detail: String,
    },

    #[error("Failed to reconnect to room '{room}' after {attempts} attempts")]
    MaxReconnectAttemptsExceeded { room: String, attempts: u32 },

    #[error("Camera/microphone unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Credential issuance failed: {0}")]
    CredentialIssuanceFailed(String),

    #[error("No connection config available for reconnect")]
    NoActiveConfig,
}

impl SessionError {
    pub fn handshake(room: &str, err: &TransportError) -> Self {
        SessionError::HandshakeFailed {
            room: room.to_string(),
            kind: HandshakeFailure::from(err),
            detail: err.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidConfig(_) => "INVALID_CONFIG",
            SessionError::HandshakeFailed { .. } => "HANDSHAKE_FAILED",
            SessionError::MaxReconnectAttemptsExceeded { .. } => "MAX_RECONNECT_ATTEMPTS_EXCEEDED",
            SessionError::CapabilityUnavailable(_) => "CAPABILITY_UNAVAILABLE",
            SessionError::CredentialIssuanceFailed(_) => "CREDENTIAL_ISSUANCE_FAILED",
            SessionError::NoActiveConfig => "NO_ACTIVE_CONFIG",
        }
    }

    /// Whether recovery needs an explicit user action
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionError::MaxReconnectAttemptsExceeded { .. })
    }

    /// Text suitable for showing next to a retry affordance
    pub fn user_message(&self) -> String {
        match self {
            SessionError::HandshakeFailed { kind, detail, .. } => match kind {
                HandshakeFailure::Unauthorized => "Invalid access token. Please try again.".to_string(),
                HandshakeFailure::Network => {
                    "Network connection failed. Please check your internet connection.".to_string()
                }
                HandshakeFailure::Timeout => "Connection timeout. Please try again.".to_string(),
                HandshakeFailure::PermissionDenied => {
                    "Permission denied. Please allow camera and microphone access.".to_string()
                }
                HandshakeFailure::Other => detail.clone(),
            },
            SessionError::InvalidConfig(_) => "Invalid access token. Please try again.".to_string(),
            SessionError::MaxReconnectAttemptsExceeded { .. } => {
                "Failed to reconnect after maximum attempts".to_string()
            }
            SessionError::CapabilityUnavailable(_) => {
                "Permission denied. Please allow camera and microphone access.".to_string()
            }
            SessionError::CredentialIssuanceFailed(msg) => msg.clone(),
            SessionError::NoActiveConfig => "Connection failed".to_string(),
        }
    }
}
