//! Retry logic with exponential backoff
//!
//! Artifact transfers retry transient failures (timeouts, dropped connections,
//! 429 and 5xx responses) with exponential backoff and optional jitter.
//! Gateway calls and polling do not go through here; they surface errors immediately.
//!
//! [`Backoff`] holds the delay schedule; [`retry_transient`] drives an
//! operation through it and consults [`IsRetryable`] after each failure.

use crate::config::RetryConfig;
use crate::error::Error;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (network timeouts, server busy, connection reset) should return `true`.
/// Permanent failures (rejected request, missing resource, full disk) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            Error::Validation { .. }
            | Error::NotFound { .. }
            | Error::AttemptsExceeded { .. }
            | Error::OrderNotReady { .. }
            | Error::PartialDownload { .. }
            | Error::Filesystem { .. }
            | Error::InvalidRequest(_)
            | Error::Config { .. }
            | Error::Serialization(_)
            | Error::Cancelled => false,
        }
    }
}

/// Delay schedule for one retried operation
///
/// Yields `initial_delay`, then grows by `backoff_multiplier` up to `max_delay`,
/// for at most `max_attempts` retries.
#[derive(Clone, Debug)]
pub struct Backoff {
    next: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: bool,
    remaining: u32,
    retries: u32,
}

impl Backoff {
    /// Start a schedule from a retry policy
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            next: config.initial_delay.min(config.max_delay),
            max_delay: config.max_delay,
            multiplier: config.backoff_multiplier,
            jitter: config.jitter,
            remaining: config.max_attempts,
            retries: 0,
        }
    }

    /// Delay before the next retry, or `None` once the budget is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.retries += 1;

        let base = self.next;
        self.next = Duration::try_from_secs_f64(base.as_secs_f64() * self.multiplier.max(1.0))
            .map_or(self.max_delay, |grown| grown.min(self.max_delay));
        Some(if self.jitter { add_jitter(base) } else { base })
    }

    /// Retries handed out so far
    pub fn retries(&self) -> u32 {
        self.retries
    }
}

/// Run `operation`, retrying transient failures on a [`Backoff`] schedule
///
/// Makes at most `config.max_attempts + 1` calls. Non-retryable errors are
/// returned immediately.
pub async fn retry_transient<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut backoff = Backoff::new(config);

    loop {
        let error = match operation().await {
            Ok(value) => {
                if backoff.retries() > 0 {
                    tracing::info!(retries = backoff.retries(), "recovered after retrying");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() => e,
            Err(e) => return Err(e),
        };

        let Some(delay) = backoff.next_delay() else {
            tracing::debug!(error = %error, retries = backoff.retries(), "retry budget spent");
            return Err(error);
        };
        tracing::warn!(
            error = %error,
            retry = backoff.retries(),
            of = config.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "transient failure, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Jitter is uniform in `[delay, 2 * delay]`
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
