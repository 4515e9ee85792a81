//! Typed retry policy.
//!
//! Retry is data, not control flow: the policy object carries the attempt
//! budget, the backoff function, and the wall-clock ceiling, and the
//! dispatcher consults it between attempts. The retryable predicate lives
//! on the error kind itself (`RenderErrorKind::is_retryable`).

use fumetti_error::RenderErrorKind;
use std::time::Duration;
use tokio_retry2::strategy::jitter;

/// Retry policy for one render call.
///
/// Backoff is exponential with jitter:
/// `delay = min(base * 2^(attempt-1), cap) + jitter(0.3 * delay)`,
/// with rate-limit failures picking up an extra multiplier before jitter.
///
/// # Examples
///
/// ```
/// use fumetti_dispatch::RetryPolicy;
/// use fumetti_error::RenderErrorKind;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// let kind = RenderErrorKind::Unavailable("503".into());
/// assert!(policy.should_retry(&kind, 1));
///
/// let delay = policy.backoff(2, &kind);
/// assert!(delay >= Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per call, first try included
    pub max_attempts: u32,
    /// Backoff base delay
    pub base_delay: Duration,
    /// Backoff delay ceiling, before jitter
    pub max_delay: Duration,
    /// Extra multiplier for rate-limit backoff
    pub rate_limit_multiplier: f64,
    /// Timeout for a single attempt
    pub per_call_timeout: Duration,
    /// Wall-clock ceiling on the whole call, retries included
    pub total_budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            rate_limit_multiplier: 2.0,
            per_call_timeout: Duration::from_secs(20),
            total_budget: Duration::from_secs(45),
        }
    }
}

impl RetryPolicy {
    /// Whether a failed attempt should be retried.
    ///
    /// `attempt` is one-based: the predicate is false once the attempt
    /// budget is spent, and always false for terminal error kinds.
    pub fn should_retry(&self, kind: &RenderErrorKind, attempt: u32) -> bool {
        kind.is_retryable() && attempt < self.max_attempts
    }

    /// Jittered backoff delay before the next attempt.
    ///
    /// `attempt` is the one-based attempt that just failed.
    pub fn backoff(&self, attempt: u32, kind: &RenderErrorKind) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        let scaled = self.base_delay.saturating_mul(1u32 << exponent);
        let mut delay = scaled.min(self.max_delay);

        if matches!(kind, RenderErrorKind::RateLimited(_)) {
            delay = delay.mul_f64(self.rate_limit_multiplier);
        }

        delay + jitter(delay.mul_f64(0.3))
    }

    /// Whether sleeping `delay` would blow the wall-clock ceiling.
    pub fn budget_exhausted(&self, elapsed: Duration, delay: Duration) -> bool {
        elapsed + delay >= self.total_budget
    }
}
