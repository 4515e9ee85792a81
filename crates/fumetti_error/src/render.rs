//! Render service error types and retry classification.

/// Specific failure conditions for external render calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// Credentials rejected by the render service
    #[display("Render service rejected credentials")]
    Auth,
    /// Request rate limit exceeded
    #[display("Render service rate limit exceeded: {}", _0)]
    RateLimited(String),
    /// Payload rejected by content safety screening
    #[display("Render request rejected by content policy: {}", _0)]
    ContentPolicy(String),
    /// Call exceeded its time budget
    #[display("Render call timed out after {}ms", elapsed_ms)]
    Timeout {
        /// Wall-clock time spent before giving up
        elapsed_ms: u64,
    },
    /// Service reported itself unavailable, or the circuit is open
    #[display("Render service unavailable: {}", _0)]
    Unavailable(String),
    /// Transport-level failure
    #[display("Render network error: {}", _0)]
    Network(String),
}

impl RenderErrorKind {
    /// Check if this error type should be retried.
    ///
    /// Content-policy rejections and auth failures are terminal; everything
    /// else is a transient service condition.
    pub fn is_retryable(&self) -> bool {
        match self {
            RenderErrorKind::Auth | RenderErrorKind::ContentPolicy(_) => false,
            RenderErrorKind::RateLimited(_)
            | RenderErrorKind::Timeout { .. }
            | RenderErrorKind::Unavailable(_)
            | RenderErrorKind::Network(_) => true,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            RenderErrorKind::RateLimited(_) => (5000, 3, 40),
            RenderErrorKind::Unavailable(_) => (2000, 5, 60),
            RenderErrorKind::Timeout { .. } => (2000, 4, 30),
            RenderErrorKind::Network(_) => (1000, 3, 8),
            _ => (2000, 5, 60),
        }
    }

    /// Classify an HTTP-style status code into the render error taxonomy.
    ///
    /// 401/403 map to `Auth`, 429 to `RateLimited`, the remaining 4xx codes
    /// are content-safety rejections, 5xx is `Unavailable`, and anything
    /// unrecognized is a transport failure.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => RenderErrorKind::Auth,
            429 => RenderErrorKind::RateLimited(message),
            408 => RenderErrorKind::Timeout { elapsed_ms: 0 },
            400..=499 => RenderErrorKind::ContentPolicy(message),
            500..=599 => RenderErrorKind::Unavailable(message),
            _ => RenderErrorKind::Network(message),
        }
    }
}

/// Render error with source location tracking.
///
/// # Examples
///
/// ```
/// use fumetti_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::Auth);
/// assert!(format!("{}", err).contains("credentials"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new RenderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Classify an HTTP-style status code into a located error.
    #[track_caller]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(RenderErrorKind::from_status(status, message))
    }
}

/// Trait for errors that support retry logic.
///
/// This trait allows error types to specify whether they should trigger a
/// retry and what retry strategy parameters to use.
///
/// # Examples
///
/// ```
/// use fumetti_error::{RenderError, RenderErrorKind, RetryableError};
///
/// let err = RenderError::new(RenderErrorKind::Unavailable("503".into()));
/// assert!(err.is_retryable());
///
/// let (backoff, retries, max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient conditions like rate limits, timeouts, and service outages
    /// return true. Permanent conditions like rejected credentials or
    /// content-policy refusals return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    /// Default implementation returns standard parameters.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}

impl RetryableError for RenderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
