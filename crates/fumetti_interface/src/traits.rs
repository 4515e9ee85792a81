//! Trait definitions for the orchestrator's external collaborators.

use async_trait::async_trait;
use fumetti_core::{
    AssetHandle, AudienceTier, BeatParse, IdentityDescriptor, QualityReport, RenderedAsset,
    SizeHint,
};
use fumetti_error::{FumettiResult, RenderError};
use serde::{Deserialize, Serialize};

/// Text-generation collaborator that decomposes a story into beats.
///
/// The orchestrator tolerates short, malformed, or empty output: whatever
/// comes back is funneled through [`BeatParse`] and repaired by the
/// sequencer.
#[async_trait]
pub trait BeatSource: Send + Sync {
    /// Decompose a story into ordered raw beats for the given audience.
    async fn generate_beats(&self, story: &str, tier: AudienceTier) -> FumettiResult<BeatParse>;

    /// Provider name (e.g. "gemini", "anthropic"), used in logs and metrics.
    fn provider_name(&self) -> &'static str;
}

/// Vision collaborator that extracts a persistent identity descriptor from
/// a reference image.
///
/// Called at most once per job; the result feeds consistency profile
/// construction.
#[async_trait]
pub trait ReferenceDescriber: Send + Sync {
    /// Describe the character in a previously stored reference image.
    async fn describe_reference(&self, asset: &AssetHandle)
    -> FumettiResult<IdentityDescriptor>;
}

/// The external generative content service that renders one panel.
///
/// Implementations classify their transport failures into the
/// [`RenderError`] taxonomy; the dispatch layer is agnostic to everything
/// else about the wire protocol.
#[async_trait]
pub trait PanelRenderer: Send + Sync {
    /// Render a compiled prompt payload into an image.
    async fn render(
        &self,
        payload: &str,
        reference: Option<&AssetHandle>,
        size_hint: SizeHint,
    ) -> Result<RenderedAsset, RenderError>;
}

/// Object store that converts transient render output into durable handles.
///
/// Invoked once per successful render.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist raw asset bytes, returning a public handle.
    async fn persist(&self, asset: &RenderedAsset) -> FumettiResult<AssetHandle>;
}

/// Context handed to the feedback sink alongside the quality report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackContext {
    /// Audience tier of the finished job
    pub tier: AudienceTier,
    /// Number of panels rendered
    pub panel_count: usize,
    /// Leading excerpt of the source story
    pub story_excerpt: String,
}

/// Learning sink that records high-scoring generations.
///
/// Fire-and-forget: the job spawns the call and never awaits or inspects
/// the outcome.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Record a generation whose overall score cleared the threshold.
    async fn record_success(&self, context: &FeedbackContext, report: &QualityReport);
}
