// Client session layer
pub mod session;
pub mod transport;

// Token service
pub mod api;
pub mod auth;
pub mod server;

// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod shutdown;
pub mod telemetry;
