//! Client configuration.

use std::time::Duration;

use crate::core::constants::{
    FAILED_NOTIFICATIONS_CAPACITY, RECONNECT_DELAY, SEND_BUFFER_CAPACITY,
};

/// Reconnect retry behavior.
///
/// The default matches the gateway's expectations for long-lived clients:
/// retry forever with a flat one-second delay.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling on the delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_multiplier: f64,
    /// Connect attempts before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: RECONNECT_DELAY,
            max_delay: RECONNECT_DELAY,
            backoff_multiplier: 1.0,
            max_attempts: None,
        }
    }
}

impl RetryConfig {
    /// Delay to use after a failed attempt at `current` delay.
    pub(crate) fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff_multiplier).min(self.max_delay)
    }
}

/// Configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Reconnect retry behavior.
    pub retry: RetryConfig,
    /// Notifications kept for replay after a gateway error.
    pub buffer_capacity: usize,
    /// Bound of the failed-notifications channel.
    pub failed_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            buffer_capacity: SEND_BUFFER_CAPACITY,
            failed_capacity: FAILED_NOTIFICATIONS_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Set the retry behavior.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the replay buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the failed-notifications channel bound.
    pub fn with_failed_capacity(mut self, capacity: usize) -> Self {
        self.failed_capacity = capacity;
        self
    }
}
