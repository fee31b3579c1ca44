//! Prometheus metrics for the session manager and token service.
//!
//! - Session metrics (state transitions, handshakes, reconnect scheduling)
//! - Observer metrics (callback panics)
//! - Token metrics (issued, rejected)

mod helpers;

pub use helpers::{encode_metrics, SessionMetrics, TokenMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "wedebate";

lazy_static! {
    // ============================================================================
    // Session Metrics
    // ============================================================================

    /// State transitions by target state
    pub static ref SESSION_TRANSITIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_session_transitions_total", METRIC_PREFIX),
        "Total session state transitions",
        &["state"]
    ).unwrap();

    /// Handshake outcomes by attempt kind
    pub static ref SESSION_HANDSHAKES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_session_handshakes_total", METRIC_PREFIX),
        "Total room handshakes",
        &["kind", "outcome"]
    ).unwrap();

    /// Handshake duration
    pub static ref SESSION_HANDSHAKE_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_session_handshake_duration_seconds", METRIC_PREFIX),
        "Room handshake duration in seconds",
        &["kind"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    /// Automatic reconnects scheduled
    pub static ref SESSION_RECONNECTS_SCHEDULED: IntCounter = register_int_counter!(
        format!("{}_session_reconnects_scheduled_total", METRIC_PREFIX),
        "Total automatic reconnect attempts scheduled"
    ).unwrap();

    /// Sessions that gave up after exhausting the reconnect budget
    pub static ref SESSION_RECONNECTS_ABANDONED: IntCounter = register_int_counter!(
        format!("{}_session_reconnects_abandoned_total", METRIC_PREFIX),
        "Total sessions that exhausted their reconnect attempts"
    ).unwrap();

    // ============================================================================
    // Observer Metrics
    // ============================================================================

    /// Observer callbacks that panicked, by observer kind
    pub static ref OBSERVER_PANICS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_observer_panics_total", METRIC_PREFIX),
        "Total observer callbacks that panicked",
        &["observer"]
    ).unwrap();

    // ============================================================================
    // Token Metrics
    // ============================================================================

    /// Access tokens issued by role
    pub static ref TOKENS_ISSUED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_tokens_issued_total", METRIC_PREFIX),
        "Total room access tokens issued",
        &["role"]
    ).unwrap();

    /// Token requests rejected by reason
    pub static ref TOKENS_REJECTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_tokens_rejected_total", METRIC_PREFIX),
        "Total room access token requests rejected",
        &["reason"]
    ).unwrap();
}
