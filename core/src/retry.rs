//! Exponential backoff for timed-out requests.

use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::WalkScoreError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(2);

/// How many times, and how patiently, to resend a timed-out request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Ceiling on time spent across all attempts. `None` means unbounded.
    pub max_elapsed: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_elapsed: None,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy is exhausted. Attempts never overlap.
pub fn run<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, WalkScoreError>
where
    F: FnMut() -> Result<T, WalkScoreError>,
{
    let started = Instant::now();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !err.is_retryable() || attempt >= max_attempts {
            return Err(err);
        }
        let delay = policy.delay_after(attempt);
        if let Some(ceiling) = policy.max_elapsed {
            if started.elapsed() + delay > ceiling {
                return Err(err);
            }
        }
        warn!(attempt, max_attempts, delay_ms = delay.as_millis() as u64, error = %err, "retrying request");
        thread::sleep(delay);
        attempt += 1;
    }
}
