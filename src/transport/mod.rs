//! Capability interface over the media/session SDK.
//!
//! The manager never talks to an SDK directly. It asks a
//! [`TransportFactory`] for a fresh [`RoomTransport`] per connection and
//! consumes the typed [`TransportEvent`] stream that comes with it.
//!
//! - `loopback`: in-process implementation for tests and local runs

pub mod loopback;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::session::Participant;

pub use loopback::{LoopbackNetwork, LoopbackRoom};

/// Errors reported by a transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Why the transport left the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    ClientInitiated,
    DuplicateIdentity,
    ServerShutdown,
    ParticipantRemoved,
    RoomDeleted,
    StateMismatch,
    JoinFailure,
    Unknown,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisconnectReason::ClientInitiated => "client_initiated",
            DisconnectReason::DuplicateIdentity => "duplicate_identity",
            DisconnectReason::ServerShutdown => "server_shutdown",
            DisconnectReason::ParticipantRemoved => "participant_removed",
            DisconnectReason::RoomDeleted => "room_deleted",
            DisconnectReason::StateMismatch => "state_mismatch",
            DisconnectReason::JoinFailure => "join_failure",
            DisconnectReason::Unknown => "unknown",
        }
    }

    pub fn is_client_initiated(&self) -> bool {
        matches!(self, DisconnectReason::ClientInitiated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionQuality {
    Excellent,
    Good,
    Poor,
    Lost,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Audio,
    Video,
}

/// Events emitted by a transport instance
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connected,
    Disconnected { reason: DisconnectReason },
    /// SDK-level signal resumption started
    Reconnecting,
    /// SDK-level signal resumption succeeded
    Reconnected,
    ParticipantJoined(Participant),
    ParticipantLeft(Participant),
    MediaError { detail: String },
    /// `sid` is `None` for the local participant
    ConnectionQualityChanged {
        sid: Option<String>,
        quality: ConnectionQuality,
    },
    TrackSubscribed { sid: String, kind: TrackKind },
    TrackUnsubscribed { sid: String, kind: TrackKind },
}

impl TransportEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TransportEvent::Connected => "connected",
            TransportEvent::Disconnected { .. } => "disconnected",
            TransportEvent::Reconnecting => "reconnecting",
            TransportEvent::Reconnected => "reconnected",
            TransportEvent::ParticipantJoined(_) => "participant_joined",
            TransportEvent::ParticipantLeft(_) => "participant_left",
            TransportEvent::MediaError { .. } => "media_error",
            TransportEvent::ConnectionQualityChanged { .. } => "connection_quality_changed",
            TransportEvent::TrackSubscribed { .. } => "track_subscribed",
            TransportEvent::TrackUnsubscribed { .. } => "track_unsubscribed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCaptureOptions {
    pub width: u32,
    pub height: u32,
    pub facing_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCaptureOptions {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

/// Options handed to the factory for every new room instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOptions {
    pub adaptive_stream: bool,
    pub dynacast: bool,
    pub video_capture: VideoCaptureOptions,
    pub audio_capture: AudioCaptureOptions,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            adaptive_stream: true,
            dynacast: true,
            video_capture: VideoCaptureOptions {
                width: 1280,
                height: 720,
                facing_mode: "user".to_string(),
            },
            audio_capture: AudioCaptureOptions {
                echo_cancellation: true,
                noise_suppression: true,
                auto_gain_control: true,
            },
        }
    }
}

/// One room connection
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Perform the signalling handshake
    async fn connect(&self, url: &str, token: &str) -> Result<(), TransportError>;

    /// Leave the room. Emits `Disconnected { ClientInitiated }`.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// The local participant, once the handshake has completed
    fn local_participant(&self) -> Option<Participant>;

    /// Authoritative list of remote participants
    fn remote_participants(&self) -> Vec<Participant>;

    /// Acquire and publish camera and microphone
    async fn enable_camera_and_microphone(&self) -> Result<(), TransportError>;
}

/// A fresh transport together with its event stream
pub struct TransportHandle {
    pub room: Arc<dyn RoomTransport>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Builds a new, never reused, transport instance per connection
pub trait TransportFactory: Send + Sync {
    fn create(&self, options: &RoomOptions) -> TransportHandle;
}
