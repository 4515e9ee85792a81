//! Batch scheduling with adaptive pacing.
//!
//! Panel requests run in fixed-width concurrent batches, sequential across
//! batches. The scheduler owns its inter-batch delay: consecutive fast
//! batches shrink it toward a floor, any failure doubles it toward a
//! ceiling. A batch fails atomically; the first failing position aborts
//! the whole job, because a half-rendered comic is not an acceptable
//! output.

use crate::PipelineConfig;
use fumetti_core::{AssetHandle, PanelResult, SizeHint};
use fumetti_dispatch::ResilientDispatcher;
use fumetti_error::{PipelineError, PipelineErrorKind};
use fumetti_interface::{AssetStore, PanelRenderer};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// One compiled panel request, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRequest {
    /// Zero-based panel position
    pub position: usize,
    /// Compiled prompt payload
    pub payload: String,
    /// Reference asset forwarded to the renderer
    pub reference: Option<AssetHandle>,
    /// Aspect selection
    pub size_hint: SizeHint,
}

/// Runs panel requests in adaptive-paced concurrent batches.
///
/// The delay is instance state: concurrent jobs pace independently.
pub struct BatchScheduler<R: PanelRenderer, S: AssetStore + ?Sized> {
    dispatcher: Arc<ResilientDispatcher<R>>,
    store: Arc<S>,
    batch_width: usize,
    delay: Duration,
    delay_floor: Duration,
    delay_ceiling: Duration,
    fast_threshold: Duration,
    fast_needed: u32,
    speedup_factor: f64,
    fast_batches: u32,
}

impl<R: PanelRenderer, S: AssetStore + ?Sized> BatchScheduler<R, S> {
    /// Create a scheduler seeded from the pipeline config.
    pub fn new(
        dispatcher: Arc<ResilientDispatcher<R>>,
        store: Arc<S>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            dispatcher,
            store,
            batch_width: *config.batch_width(),
            delay: config.seed_delay(),
            delay_floor: config.delay_floor(),
            delay_ceiling: config.delay_ceiling(),
            fast_threshold: config.fast_batch_threshold(),
            fast_needed: *config.fast_batches_before_speedup(),
            speedup_factor: *config.speedup_factor(),
            fast_batches: 0,
        }
    }

    /// Current inter-batch delay.
    pub fn current_delay(&self) -> Duration {
        self.delay
    }

    /// Render every request, returning results in input order.
    ///
    /// # Errors
    ///
    /// `BatchAborted` names the first failing position once any batch
    /// member exhausts the dispatch layer's budget; `DeadlineExceeded`
    /// fires at a batch boundary once the job budget is spent. In-flight
    /// calls in a started batch always run to completion.
    #[instrument(name = "schedule_batches", skip(self, requests), fields(panels = requests.len(), width = self.batch_width))]
    pub async fn run(
        &mut self,
        requests: Vec<PanelRequest>,
        deadline: Instant,
    ) -> Result<Vec<PanelResult>, PipelineError> {
        let total = requests.len();
        let mut results: Vec<PanelResult> = Vec::with_capacity(total);
        let batch_count = total.div_ceil(self.batch_width);

        for (batch_index, batch) in requests.chunks(self.batch_width).enumerate() {
            if Instant::now() >= deadline {
                warn!(
                    completed = results.len(),
                    "job deadline exceeded at batch boundary"
                );
                return Err(PipelineError::new(PipelineErrorKind::DeadlineExceeded {
                    completed: results.len(),
                }));
            }

            let batch_start = Instant::now();
            let outcomes = join_all(batch.iter().map(|request| self.render_one(request))).await;
            let batch_elapsed = batch_start.elapsed();

            for outcome in outcomes {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(error) => {
                        self.on_batch_failure();
                        return Err(error);
                    }
                }
            }

            self.on_batch_success(batch_elapsed);
            debug!(
                batch = batch_index,
                elapsed_ms = batch_elapsed.as_millis() as u64,
                next_delay_ms = self.delay.as_millis() as u64,
                "batch complete"
            );

            if batch_index + 1 < batch_count {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(panels = results.len(), "all batches complete");
        Ok(results)
    }

    /// Render and persist one panel.
    async fn render_one(&self, request: &PanelRequest) -> Result<PanelResult, PipelineError> {
        let dispatched = self
            .dispatcher
            .render(
                &request.payload,
                request.reference.as_ref(),
                request.size_hint,
            )
            .await
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::BatchAborted {
                    position: request.position,
                    cause: e.kind,
                })
            })?;

        let asset = self
            .store
            .persist(&dispatched.asset)
            .await
            .map_err(|e| PipelineError::new(PipelineErrorKind::Storage(e.to_string())))?;

        Ok(PanelResult {
            position: request.position,
            asset,
            latency: dispatched.latency,
            attempts: dispatched.attempts,
        })
    }

    fn on_batch_success(&mut self, elapsed: Duration) {
        if elapsed <= self.fast_threshold {
            self.fast_batches = self.fast_batches.saturating_add(1);
            if self.fast_batches >= self.fast_needed {
                self.delay = self
                    .delay
                    .mul_f64(self.speedup_factor)
                    .max(self.delay_floor);
            }
        } else {
            self.fast_batches = 0;
        }
    }

    fn on_batch_failure(&mut self) {
        self.delay = (self.delay * 2).min(self.delay_ceiling);
        self.fast_batches = 0;
    }
}
