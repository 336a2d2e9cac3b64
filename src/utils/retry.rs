use std::time::Duration;
use tokio::time::sleep;

// ============================================================================
// Bounded Exponential Backoff
// ============================================================================
//
// Retry discipline for carrier calls. Only errors classified as
// transient are retried; a permanent failure returns immediately.
//
// Registration (`PlaceShipment`) must never go through this path: the
// carrier does not guarantee idempotence for it, so only read-only
// endpoints are retried.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for the backoff delay.
    pub max_delay: Duration,
    /// Backoff multiplier applied after each failed attempt.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Few attempts, short waits. Used for carrier calls inside a
    /// request/response path where the caller is waiting.
    pub fn conservative() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

/// Classifies errors into retryable and not. Implemented by ApiError.
pub trait IsTransient {
    fn is_transient(&self) -> bool;
}

/// Run `operation` until it succeeds, fails permanently, or exhausts
/// `config.max_attempts`. The closure receives the 1-based attempt
/// number.
pub async fn retry_transient<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display + IsTransient,
{
    let mut delay = config.initial_delay;

    for attempt in 1..=config.max_attempts {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) if !error.is_transient() => {
                tracing::debug!(error = %error, "Permanent failure, not retrying");
                return Err(error);
            }
            Err(error) if attempt == config.max_attempts => {
                tracing::warn!(
                    attempt = attempt,
                    error = %error,
                    "Transient failure, attempts exhausted"
                );
                return Err(error);
            }
            Err(error) => {
                tracing::debug!(
                    attempt = attempt,
                    error = %error,
                    delay_ms = delay.as_millis(),
                    "Transient failure, retrying after delay"
                );
                sleep(delay).await;
                delay = Duration::from_millis(((delay.as_millis() as f64) * config.multiplier) as u64)
                    .min(config.max_delay);
            }
        }
    }

    unreachable!("max_attempts is at least 1")
}
