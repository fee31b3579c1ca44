//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    OBSERVER_PANICS_TOTAL, SESSION_HANDSHAKES_TOTAL, SESSION_HANDSHAKE_DURATION,
    SESSION_RECONNECTS_ABANDONED, SESSION_RECONNECTS_SCHEDULED, SESSION_TRANSITIONS_TOTAL,
    TOKENS_ISSUED_TOTAL, TOKENS_REJECTED_TOTAL,
};
use crate::session::{ConnectionState, Role};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording session metrics
pub struct SessionMetrics;

impl SessionMetrics {
    /// Record a state transition
    pub fn record_transition(state: ConnectionState) {
        SESSION_TRANSITIONS_TOTAL
            .with_label_values(&[state.as_str()])
            .inc();
    }

    /// Record a handshake outcome (`kind` is initial or reconnect)
    pub fn record_handshake(kind: &str, outcome: &str) {
        SESSION_HANDSHAKES_TOTAL
            .with_label_values(&[kind, outcome])
            .inc();
    }

    /// Record how long a handshake took
    pub fn record_handshake_duration(kind: &str, elapsed: Duration) {
        SESSION_HANDSHAKE_DURATION
            .with_label_values(&[kind])
            .observe(elapsed.as_secs_f64());
    }

    /// Record a scheduled automatic reconnect
    pub fn record_reconnect_scheduled() {
        SESSION_RECONNECTS_SCHEDULED.inc();
    }

    /// Record a session giving up on reconnecting
    pub fn record_reconnect_abandoned() {
        SESSION_RECONNECTS_ABANDONED.inc();
    }

    /// Record a panicking observer callback
    pub fn record_observer_panic(observer: &str) {
        OBSERVER_PANICS_TOTAL.with_label_values(&[observer]).inc();
    }
}

/// Helper struct for recording token issuance metrics
pub struct TokenMetrics;

impl TokenMetrics {
    /// Record an issued token
    pub fn record_issued(role: Role) {
        TOKENS_ISSUED_TOTAL.with_label_values(&[role.as_str()]).inc();
    }

    /// Record a rejected token request
    pub fn record_rejected(reason: &str) {
        TOKENS_REJECTED_TOTAL.with_label_values(&[reason]).inc();
    }
}
