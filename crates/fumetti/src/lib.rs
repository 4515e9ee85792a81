//! Fumetti - Consistency-Constrained Comic Generation
//!
//! Fumetti turns a free-text story into a multi-panel illustrated comic:
//! the story is decomposed into ordered visual beats, every panel is
//! rendered under persistent character/setting constraints through an
//! external generative service, and a closing quality pass grades the
//! result.
//!
//! # Features
//!
//! - **Consistency profiles**: one immutable identity/setting constraint
//!   set per job, enforced in every compiled prompt
//! - **Beat repair**: short, malformed, or empty upstream beat arrays are
//!   normalized into a full, valid sequence
//! - **Bounded prompts**: priority-based compression with a guaranteed
//!   identity floor
//! - **Resilient dispatch**: per-endpoint circuit breaker, jittered
//!   exponential backoff, request-rate gating
//! - **Adaptive pacing**: inter-batch delay tuned from observed latency
//! - **Quality scoring**: weighted sub-scores, letter grade, optional
//!   feedback sink
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fumetti::{
//!     AudienceTier, ComicJob, DispatchConfig, EndpointHandle, EndpointKind,
//!     FumettiConfig, JobRequest, ResilientDispatcher,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FumettiConfig::load()?;
//!     let endpoint = EndpointHandle::new(EndpointKind::PanelRender, config.dispatch());
//!     let dispatcher = Arc::new(ResilientDispatcher::new(
//!         renderer,
//!         endpoint,
//!         config.dispatch().retry_policy(),
//!     ));
//!
//!     let job = ComicJob::new(beats, vision, store, dispatcher, config.pipeline().clone());
//!     let request = JobRequest::builder()
//!         .story("A fox finds a door in the forest that was never there before.")
//!         .tier(AudienceTier::Children)
//!         .build()?;
//!
//!     let comic = job.run(&request).await?;
//!     println!("{} pages, grade {}", comic.pages.len(), comic.report.grade);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Fumetti is organized as a workspace with focused crates:
//!
//! - `fumetti_core` - Core data types (beats, profiles, panels, reports)
//! - `fumetti_interface` - Collaborator trait definitions
//! - `fumetti_error` - Error types
//! - `fumetti_dispatch` - Circuit breaker, retry policy, rate gating
//! - `fumetti_pipeline` - Sequencer, prompt compiler, scheduler, assembler,
//!   scorer, and the job runner
//!
//! This crate (`fumetti`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use fumetti_core::{
    AssetHandle, AudienceTier, Beat, BeatParse, Comic, ConsistencyProfile, EnvironmentProfile,
    GenerationMetadata, Grade, IdentityDescriptor, NarrativeFunction, Page, Panel, PanelResult,
    QualityReport, RawBeat, RenderedAsset, SizeHint, SubScores, VisualPriority, init_telemetry,
};
pub use fumetti_dispatch::{
    BreakerConfig, BreakerState, CircuitBreaker, DispatchConfig, Dispatched, DispatchMetrics,
    EndpointHandle, EndpointKind, MetricsSnapshot, ResilientDispatcher, RetryPolicy,
};
pub use fumetti_error::{
    ConfigError, FumettiError, FumettiErrorKind, FumettiResult, PipelineError, PipelineErrorKind,
    RenderError, RenderErrorKind, RetryableError, ScoringError, ScoringErrorKind,
};
pub use fumetti_interface::{
    AssetStore, BeatSource, FeedbackContext, FeedbackSink, PanelRenderer, ReferenceDescriber,
};
pub use fumetti_pipeline::{
    BatchScheduler, BeatSequencer, ComicJob, FumettiConfig, JobRequest, PanelAssembler,
    PanelRequest, PipelineConfig, PromptCompiler, QualityScorer, narration,
};
