//! The unit that talks to the render service.

use crate::{BreakerDecision, EndpointHandle, RetryPolicy};
use fumetti_core::{AssetHandle, RenderedAsset, SizeHint};
use fumetti_error::{RenderError, RenderErrorKind};
use fumetti_interface::PanelRenderer;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// A successful render with its cost accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// The rendered image, still transient
    pub asset: RenderedAsset,
    /// Attempts spent, first try included
    pub attempts: u32,
    /// Wall-clock time across all attempts
    pub latency: std::time::Duration,
}

/// Issues one render call per panel with retry, breaker, and rate-gate
/// protection.
///
/// Retryable upstream errors are absorbed here up to the policy budget;
/// once the budget is spent the last error surfaces to the caller.
/// Content-policy and auth rejections surface immediately without
/// consuming retry budget.
pub struct ResilientDispatcher<R: PanelRenderer> {
    renderer: Arc<R>,
    endpoint: EndpointHandle,
    policy: RetryPolicy,
}

impl<R: PanelRenderer> std::fmt::Debug for ResilientDispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientDispatcher")
            .field("endpoint", &self.endpoint)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<R: PanelRenderer> ResilientDispatcher<R> {
    /// Create a dispatcher over a renderer and a shared endpoint handle.
    pub fn new(renderer: Arc<R>, endpoint: EndpointHandle, policy: RetryPolicy) -> Self {
        Self {
            renderer,
            endpoint,
            policy,
        }
    }

    /// The shared endpoint handle this dispatcher reports into.
    pub fn endpoint(&self) -> &EndpointHandle {
        &self.endpoint
    }

    /// Render one panel payload.
    ///
    /// # Errors
    ///
    /// Returns the last [`RenderError`] once the retry budget is spent, a
    /// terminal error immediately, `Unavailable` when the circuit is open,
    /// or `Timeout` when the wall-clock ceiling would be crossed.
    #[instrument(
        name = "dispatch_render",
        skip(self, payload, reference),
        fields(endpoint = %self.endpoint.kind(), payload_len = payload.len())
    )]
    pub async fn render(
        &self,
        payload: &str,
        reference: Option<&AssetHandle>,
        size_hint: SizeHint,
    ) -> Result<Dispatched, RenderError> {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            if let BreakerDecision::Reject { retry_in } = self.endpoint.breaker_try_acquire() {
                warn!(retry_in_ms = retry_in.as_millis() as u64, "circuit open, short-circuiting");
                return Err(RenderError::new(RenderErrorKind::Unavailable(format!(
                    "circuit open, retry in {}ms",
                    retry_in.as_millis()
                ))));
            }

            self.endpoint.throttle().await;

            let attempt_start = Instant::now();
            let outcome = tokio::time::timeout(
                self.policy.per_call_timeout,
                self.renderer.render(payload, reference, size_hint),
            )
            .await
            .unwrap_or_else(|_| {
                Err(RenderError::new(RenderErrorKind::Timeout {
                    elapsed_ms: attempt_start.elapsed().as_millis() as u64,
                }))
            });

            match outcome {
                Ok(asset) => {
                    self.endpoint.record_attempt(attempt_start.elapsed(), true);
                    self.endpoint.breaker_on_success();
                    debug!(attempt, "render succeeded");
                    return Ok(Dispatched {
                        asset,
                        attempts: attempt,
                        latency: started.elapsed(),
                    });
                }
                Err(err) => {
                    self.endpoint.record_attempt(attempt_start.elapsed(), false);
                    if err.kind.is_retryable() {
                        self.endpoint.breaker_on_failure();
                    } else {
                        self.endpoint.breaker_release_probe();
                    }

                    if !self.policy.should_retry(&err.kind, attempt) {
                        warn!(attempt, error = %err, "render failed, not retrying");
                        return Err(err);
                    }

                    let delay = self.policy.backoff(attempt, &err.kind);
                    if self.policy.budget_exhausted(started.elapsed(), delay) {
                        warn!(
                            attempt,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "retry budget exhausted"
                        );
                        return Err(RenderError::new(RenderErrorKind::Timeout {
                            elapsed_ms: started.elapsed().as_millis() as u64,
                        }));
                    }

                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "render failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
