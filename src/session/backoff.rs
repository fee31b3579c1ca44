//! Exponential backoff for automatic room reconnection

use std::time::Duration;

use rand::Rng;

/// Reconnect policy
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Delay before the first attempt in milliseconds
    pub base_delay_ms: u64,
    /// Upper bound for any single delay in milliseconds
    pub max_delay_ms: u64,
    /// Attempts allowed before automatic recovery is abandoned
    pub max_attempts: u32,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            max_delay_ms: 30_000, // 30 seconds
            max_attempts: 5,
            jitter_factor: 0.0,
        }
    }
}

impl ReconnectPolicy {
    /// `min(base * 2^attempt, max)`, with optional jitter around the result
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let capped_delay = exponential.min(self.max_delay_ms);

        if self.jitter_factor <= 0.0 || capped_delay == 0 {
            return Duration::from_millis(capped_delay);
        }

        let jitter_range = capped_delay as f64 * self.jitter_factor.min(1.0);
        let jitter = rand::rng().random_range(-jitter_range..jitter_range);
        let jittered = (capped_delay as f64 + jitter).max(1.0) as u64;

        Duration::from_millis(jittered.min(self.max_delay_ms))
    }
}

/// Attempt counter paired with its policy
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    policy: ReconnectPolicy,
    attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Delay for the next attempt, or `None` once `max_attempts` is reached.
    /// Consumes one attempt.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        let delay = self.policy.delay_for(self.attempt);
        self.attempt += 1;
        Some(delay)
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.policy.max_attempts
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Attempts consumed since the last reset
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}
