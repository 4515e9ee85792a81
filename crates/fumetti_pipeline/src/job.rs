//! End-to-end comic generation job.
//!
//! Owns the full data flow: validate input, construct the consistency
//! profile, sequence beats, compile prompts, schedule batches, assemble
//! pages, score, and optionally notify the feedback sink. Success always
//! returns a complete page set; there is no partial-success state.

use crate::{
    BatchScheduler, BeatSequencer, PanelAssembler, PanelRequest, PipelineConfig, PromptCompiler,
    QualityScorer,
};
use chrono::Utc;
use fumetti_core::{
    AssetHandle, AudienceTier, Comic, ConsistencyProfile, EnvironmentProfile, GenerationMetadata,
    IdentityDescriptor, NarrativeFunction, SizeHint,
};
use fumetti_dispatch::ResilientDispatcher;
use fumetti_error::{FumettiResult, PipelineError, PipelineErrorKind};
use fumetti_interface::{
    AssetStore, BeatSource, FeedbackContext, FeedbackSink, PanelRenderer, ReferenceDescriber,
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Longest story excerpt forwarded to the feedback sink.
const EXCERPT_LEN: usize = 200;

/// One comic generation request.
///
/// # Examples
///
/// ```
/// use fumetti_core::AudienceTier;
/// use fumetti_pipeline::JobRequest;
///
/// let request = JobRequest::builder()
///     .story("A fox finds a door in the forest that was never there before.")
///     .tier(AudienceTier::Children)
///     .build()
///     .unwrap();
/// assert!(request.reference.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder)]
#[builder(setter(into))]
pub struct JobRequest {
    /// Free-text source story
    pub story: String,
    /// Audience tier, fixes the panel count
    pub tier: AudienceTier,
    /// Previously stored reference image, if any
    #[builder(default)]
    pub reference: Option<AssetHandle>,
    /// Caller-supplied identity descriptor, if any
    #[builder(default)]
    pub identity: Option<IdentityDescriptor>,
    /// Setting constraints
    #[builder(default)]
    pub environment: EnvironmentProfile,
}

impl JobRequest {
    /// Start building a request.
    pub fn builder() -> JobRequestBuilder {
        JobRequestBuilder::default()
    }
}

/// The orchestrating job: exclusively owns its consistency profile and
/// panel results; shares only the dispatch layer's endpoint state with
/// other jobs.
pub struct ComicJob<R: PanelRenderer> {
    beat_source: Arc<dyn BeatSource>,
    describer: Arc<dyn ReferenceDescriber>,
    store: Arc<dyn AssetStore>,
    dispatcher: Arc<ResilientDispatcher<R>>,
    feedback: Option<Arc<dyn FeedbackSink>>,
    config: PipelineConfig,
}

impl<R: PanelRenderer> ComicJob<R> {
    /// Wire a job from its collaborators.
    pub fn new(
        beat_source: Arc<dyn BeatSource>,
        describer: Arc<dyn ReferenceDescriber>,
        store: Arc<dyn AssetStore>,
        dispatcher: Arc<ResilientDispatcher<R>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            beat_source,
            describer,
            store,
            dispatcher,
            feedback: None,
            config,
        }
    }

    /// Attach a learning/feedback sink.
    ///
    /// Notified fire-and-forget when the overall score clears the
    /// configured threshold.
    pub fn with_feedback(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = Some(sink);
        self
    }

    /// Generate a complete comic.
    ///
    /// # Errors
    ///
    /// `InputValidation` before any collaborator call for bad input;
    /// `MissingConsistencyProfile` when neither an identity descriptor nor
    /// a reference asset was supplied; `BatchAborted`/`DeadlineExceeded`
    /// from the scheduler; collaborator failures wrapped in their
    /// respective kinds. Scoring errors never propagate.
    #[instrument(
        name = "comic_job",
        skip(self, request),
        fields(tier = %request.tier, story_len = request.story.len())
    )]
    pub async fn run(&self, request: &JobRequest) -> FumettiResult<Comic> {
        let started = Instant::now();
        let deadline = started + self.config.job_deadline();

        self.validate(&request.story)?;

        let profile = self.build_profile(request).await?;
        debug!(
            reference = profile.has_reference(),
            "consistency profile constructed"
        );

        let parse = self
            .beat_source
            .generate_beats(&request.story, request.tier)
            .await
            .map_err(|e| {
                PipelineError::new(PipelineErrorKind::BeatSource(e.to_string()))
            })?;

        let beats = BeatSequencer::new().sequence(parse, request.tier);
        let total = beats.len();

        let compiler = PromptCompiler::new(&self.config);
        let requests: Vec<PanelRequest> = beats
            .iter()
            .enumerate()
            .map(|(position, beat)| PanelRequest {
                position,
                payload: compiler.compile(
                    beat,
                    &profile,
                    position,
                    total,
                    beat.previous_beat_summary.as_deref(),
                ),
                reference: profile.reference_asset().clone(),
                size_hint: size_hint_for(beat.narrative_function),
            })
            .collect();

        let mut scheduler = BatchScheduler::new(
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.store),
            &self.config,
        );
        let results = scheduler.run(requests, deadline).await?;

        let pages = PanelAssembler::new(&self.config).assemble(&beats, &results)?;
        let report = QualityScorer::new().score(&beats, &results, &profile, request.tier);

        self.notify_feedback(request, &report);

        let metadata = GenerationMetadata {
            generated_at: Utc::now(),
            duration: started.elapsed(),
            panel_count: results.len(),
            reference_used: profile.has_reference(),
            identity_enforced: !profile.identity().is_trivial(),
        };

        info!(
            panels = metadata.panel_count,
            duration_ms = metadata.duration.as_millis() as u64,
            grade = %report.grade,
            "comic generated"
        );

        Ok(Comic {
            pages,
            report,
            metadata,
        })
    }

    /// Reject bad input before any external call is made.
    fn validate(&self, story: &str) -> Result<(), PipelineError> {
        let trimmed = story.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::InputValidation(
                "story is empty".to_string(),
            )));
        }
        if trimmed.chars().count() < *self.config.min_story_len() {
            return Err(PipelineError::new(PipelineErrorKind::InputValidation(
                format!(
                    "story too short: {} characters, need at least {}",
                    trimmed.chars().count(),
                    self.config.min_story_len()
                ),
            )));
        }
        Ok(())
    }

    /// Construct the consistency profile, calling the vision collaborator
    /// at most once.
    async fn build_profile(&self, request: &JobRequest) -> FumettiResult<ConsistencyProfile> {
        let identity = match (&request.identity, &request.reference) {
            (Some(identity), _) if !identity.is_trivial() => identity.clone(),
            (_, Some(reference)) => self
                .describer
                .describe_reference(reference)
                .await
                .map_err(|e| {
                    PipelineError::new(PipelineErrorKind::Reference(e.to_string()))
                })?,
            _ => IdentityDescriptor::default(),
        };

        Ok(ConsistencyProfile::new(
            identity,
            request.environment.clone(),
            request.reference.clone(),
        )?)
    }

    /// Fire-and-forget notification when the score clears the threshold.
    fn notify_feedback(&self, request: &JobRequest, report: &fumetti_core::QualityReport) {
        if report.overall < *self.config.feedback_threshold() {
            return;
        }
        let Some(sink) = &self.feedback else {
            return;
        };

        let sink = Arc::clone(sink);
        let report = report.clone();
        let overall = report.overall;
        let context = FeedbackContext {
            tier: request.tier,
            panel_count: request.tier.target_panel_count(),
            story_excerpt: request.story.chars().take(EXCERPT_LEN).collect(),
        };
        tokio::spawn(async move {
            sink.record_success(&context, &report).await;
        });
        debug!(overall, "feedback sink notified");
    }
}

impl<R: PanelRenderer> std::fmt::Debug for ComicJob<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComicJob")
            .field("config", &self.config)
            .field("has_feedback", &self.feedback.is_some())
            .finish_non_exhaustive()
    }
}

/// Aspect selection by narrative function: the climax renders wide.
fn size_hint_for(function: NarrativeFunction) -> SizeHint {
    match function {
        NarrativeFunction::Climax => SizeHint::Wide,
        _ => SizeHint::Square,
    }
}
