//! Retry policy for gateway requests.
//!
//! Only failures that never produced a response are retried; a response with
//! an error status is handed back to the pipeline as-is.

use std::time::Duration;

use crate::host::Method;

/// How a request failed before any response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// No connection was established, so nothing reached the server.
    Connect,
    /// The request may have reached the server before the deadline passed.
    Timeout,
    /// Anything else (body errors, TLS, decoding).
    Other,
}

impl SendFailure {
    /// Classifies a reqwest error.
    pub fn of(error: &reqwest::Error) -> Self {
        if error.is_connect() {
            Self::Connect
        } else if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Other
        }
    }
}

/// How many times, and how patiently, a request is re-sent.
///
/// Connect failures are retried for every method. Timeouts are retried for
/// `GET` only: a timed-out `POST` or `PUT` may already have been applied
/// (a deleted resume, a consumed upload key), so it is reported instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryStrategy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl RetryStrategy {
    /// Creates a strategy allowing `max_retries` retries after the first attempt.
    pub fn from_max_retries(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }

    /// A single attempt, never retried.
    pub fn no_retry() -> Self {
        Self::from_max_retries(0)
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns true if another attempt may follow attempt number `attempt` (1-based).
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before the retry that follows attempt number `attempt` (1-based).
    ///
    /// Doubles per attempt and is capped at `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Determines if a failed `method` request is worth retrying.
    pub fn should_retry(&self, method: Method, failure: SendFailure) -> bool {
        match failure {
            SendFailure::Connect => true,
            SendFailure::Timeout => method == Method::Get,
            SendFailure::Other => false,
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::no_retry()
    }
}
