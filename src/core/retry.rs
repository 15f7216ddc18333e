//! Retry schedules for secret lookups.
//!
//! A secret referenced by a template is often created by another controller
//! moments later, so not-found lookups are retried on a short exponential
//! schedule before giving up.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_retry::strategy::{jitter, ExponentialBackoff};

/// Bounded exponential backoff.
///
/// Delays follow `factor * base^n` milliseconds (n = 1, 2, ...), the same
/// shape as `tokio_retry::strategy::ExponentialBackoff`. With the defaults
/// the waits between the 4 attempts are 10ms, 50ms and 250ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub attempts: usize,
    /// Growth base of the exponential schedule.
    pub base: u64,
    /// Multiplier applied to every delay, in milliseconds.
    pub factor: u64,
    /// Upper bound for a single delay.
    pub max_delay_ms: Option<u64>,
    /// Add up to 10% random jitter to every delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 4,
            base: 5,
            factor: 2,
            max_delay_ms: None,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries `attempts` times without sleeping.
    pub fn immediate(attempts: usize) -> Self {
        Self {
            attempts,
            base: 0,
            factor: 0,
            max_delay_ms: None,
            jitter: false,
        }
    }

    /// Delays to wait between consecutive attempts.
    ///
    /// Always yields `attempts - 1` values (or none for a single attempt).
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let mut backoff = ExponentialBackoff::from_millis(self.base).factor(self.factor);
        if let Some(max) = self.max_delay_ms {
            backoff = backoff.max_delay(Duration::from_millis(max));
        }
        let with_jitter = self.jitter;
        backoff
            .take(self.attempts.saturating_sub(1))
            .map(move |delay| {
                if with_jitter && !delay.is_zero() {
                    delay + jitter(delay / 10)
                } else {
                    delay
                }
            })
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are exhausted. The last error is returned in the latter case.
    pub fn retry<T, E>(
        &self,
        mut op: impl FnMut() -> std::result::Result<T, E>,
        retryable: impl Fn(&E) -> bool,
    ) -> std::result::Result<T, E> {
        let mut delays = self.delays();
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if retryable(&err) => match delays.next() {
                    Some(delay) => {
                        tracing::trace!(delay_ms = delay.as_millis() as u64, "retrying");
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                    }
                    None => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }
    }
}
