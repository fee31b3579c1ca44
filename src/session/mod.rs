//! Real-time room session management.
//!
//! - `SessionManager`: one live room connection with auto-reconnect
//! - `ConnectionConfig` / `Role`: what a connection attempt needs
//! - `ParticipantRoster`: membership snapshots handed to observers
//! - `ReconnectPolicy`: exponential backoff settings
//! - `credentials`: obtaining a token and URL before connecting

mod backoff;
mod config;
pub mod credentials;
mod error;
mod manager;
mod observer;
mod roster;
mod state;

pub use backoff::{ExponentialBackoff, ReconnectPolicy};
pub use config::{validate_token, validate_url, ConnectionConfig, Role};
pub use credentials::{
    join_room, CredentialProvider, CredentialRequest, HttpCredentialProvider, IssuedCredential,
};
pub use error::{HandshakeFailure, SessionError};
pub use manager::{ScheduledReconnect, SessionManager};
pub use observer::{ObserverList, Subscription};
pub use roster::{Participant, ParticipantRoster};
pub use state::ConnectionState;
