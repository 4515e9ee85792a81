//! Per-endpoint-kind resilience state.

use crate::{BreakerDecision, CircuitBreaker, DispatchConfig, DispatchMetrics, MetricsSnapshot};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

/// The external endpoint kinds the pipeline talks to.
///
/// Breaker and rate-gate state is scoped per kind, not per job: every job
/// rendering panels shares the `PanelRender` handle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum EndpointKind {
    /// The generative image service
    PanelRender,
    /// The text-beat generator
    BeatGeneration,
    /// The vision/identity extractor
    ReferenceAnalysis,
}

/// Handle to one endpoint kind's shared resilience state.
///
/// Cloning is cheap and shares the underlying breaker, rate gate, and
/// metrics; this is the explicit resource that replaces any global mutable
/// singleton. The breaker is the only state behind a lock; the rate gate
/// and metrics are lock-free.
///
/// # Examples
///
/// ```
/// use fumetti_dispatch::{DispatchConfig, EndpointHandle, EndpointKind};
///
/// let handle = EndpointHandle::new(EndpointKind::PanelRender, &DispatchConfig::default());
/// let for_other_job = handle.clone();
/// assert_eq!(handle.kind(), for_other_job.kind());
/// ```
#[derive(Clone)]
pub struct EndpointHandle {
    kind: EndpointKind,
    breaker: Arc<Mutex<CircuitBreaker>>,
    gate: Arc<DefaultDirectRateLimiter>,
    metrics: Arc<DispatchMetrics>,
}

impl std::fmt::Debug for EndpointHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointHandle")
            .field("kind", &self.kind)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

impl EndpointHandle {
    /// Create a fresh handle for an endpoint kind.
    pub fn new(kind: EndpointKind, config: &DispatchConfig) -> Self {
        let rpm = NonZeroU32::new(*config.requests_per_minute()).unwrap_or(NonZeroU32::MIN);
        Self {
            kind,
            breaker: Arc::new(Mutex::new(CircuitBreaker::with_config(
                config.breaker_config(),
            ))),
            gate: Arc::new(RateLimiter::direct(Quota::per_minute(rpm))),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// The endpoint kind this handle guards.
    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// Wait until the request-rate gate admits one request.
    pub async fn throttle(&self) {
        self.gate.until_ready().await;
    }

    /// Ask the breaker for permission to dial.
    pub fn breaker_try_acquire(&self) -> BreakerDecision {
        self.breaker.lock().unwrap().try_acquire()
    }

    /// Report a successful attempt to the breaker.
    pub fn breaker_on_success(&self) {
        self.breaker.lock().unwrap().on_success();
    }

    /// Report a retryable failure to the breaker.
    pub fn breaker_on_failure(&self) {
        self.breaker.lock().unwrap().on_failure();
    }

    /// Release a probe slot after a terminal failure.
    pub fn breaker_release_probe(&self) {
        self.breaker.lock().unwrap().release_probe();
    }

    /// Record one attempt in the shared metrics.
    pub fn record_attempt(&self, latency: std::time::Duration, success: bool) {
        self.metrics.record_attempt(latency, success);
    }

    /// Snapshot the shared metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
