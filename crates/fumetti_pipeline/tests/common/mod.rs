//! Shared mock collaborators for pipeline integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fumetti_core::{
    AssetHandle, AudienceTier, BeatParse, IdentityDescriptor, QualityReport, RawBeat,
    RenderedAsset, SizeHint,
};
use fumetti_dispatch::{DispatchConfig, EndpointHandle, EndpointKind, ResilientDispatcher};
use fumetti_error::{FumettiResult, RenderError, RenderErrorKind};
use fumetti_interface::{
    AssetStore, BeatSource, FeedbackContext, FeedbackSink, PanelRenderer, ReferenceDescriber,
};
use fumetti_pipeline::PipelineConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Parse a pipeline config from TOML overrides; omitted keys use defaults.
pub fn pipeline_config(overrides: &str) -> PipelineConfig {
    let config: PipelineConfig = toml::from_str(overrides).expect("valid test config");
    config.validate().expect("valid test config");
    config
}

/// Fast pipeline config for scheduler tests.
pub fn fast_pipeline_config() -> PipelineConfig {
    pipeline_config(
        r#"
        batch_width = 4
        seed_delay_ms = 2000
        delay_floor_ms = 250
        delay_ceiling_ms = 30000
        fast_batch_threshold_ms = 8000
        "#,
    )
}

/// Parse a dispatch config from TOML overrides.
pub fn dispatch_config(overrides: &str) -> DispatchConfig {
    let config: DispatchConfig = toml::from_str(overrides).expect("valid test config");
    config.validate().expect("valid test config");
    config
}

/// Dispatcher with fast retries and a wide-open rate gate.
pub fn dispatcher<R: PanelRenderer>(renderer: Arc<R>) -> Arc<ResilientDispatcher<R>> {
    let config = dispatch_config(
        r#"
        base_backoff_ms = 5
        max_backoff_ms = 20
        requests_per_minute = 100000
        failure_threshold = 1000
        "#,
    );
    let endpoint = EndpointHandle::new(EndpointKind::PanelRender, &config);
    Arc::new(ResilientDispatcher::new(
        renderer,
        endpoint,
        config.retry_policy(),
    ))
}

/// Renderer that always succeeds immediately.
#[derive(Default)]
pub struct CountingRenderer {
    calls: AtomicU32,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PanelRenderer for CountingRenderer {
    async fn render(
        &self,
        _payload: &str,
        _reference: Option<&AssetHandle>,
        _size_hint: SizeHint,
    ) -> Result<RenderedAsset, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RenderedAsset::new(vec![1u8; 8], "image/png"))
    }
}

/// Renderer for scheduler tests: the payload is the panel position, and
/// each position sleeps its scripted latency before succeeding.
pub struct PositionRenderer {
    latencies: Vec<Duration>,
    fail_position: std::sync::Mutex<Option<(usize, RenderErrorKind)>>,
    calls: AtomicU32,
}

impl PositionRenderer {
    pub fn new(latencies: Vec<Duration>) -> Self {
        Self {
            latencies,
            fail_position: std::sync::Mutex::new(None),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_failure(self, position: usize, kind: RenderErrorKind) -> Self {
        self.set_failure(Some((position, kind)));
        self
    }

    /// Arm or disarm the scripted failure on a live renderer.
    pub fn set_failure(&self, failure: Option<(usize, RenderErrorKind)>) {
        *self.fail_position.lock().unwrap() = failure;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PanelRenderer for PositionRenderer {
    async fn render(
        &self,
        payload: &str,
        _reference: Option<&AssetHandle>,
        _size_hint: SizeHint,
    ) -> Result<RenderedAsset, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let position: usize = payload.trim().parse().expect("payload is a position");
        if let Some(latency) = self.latencies.get(position) {
            tokio::time::sleep(*latency).await;
        }
        let failure = self.fail_position.lock().unwrap().clone();
        if let Some((fail_at, kind)) = failure {
            if position == fail_at {
                return Err(RenderError::new(kind));
            }
        }
        Ok(RenderedAsset::new(
            position.to_le_bytes().to_vec(),
            "image/png",
        ))
    }
}

/// Renderer that fails whenever the payload contains a needle.
///
/// Compiled payloads carry "Panel N of M", so a needle like "Panel 6 of"
/// pins the failure to one position.
pub struct FailOnPanelRenderer {
    needle: String,
    kind: RenderErrorKind,
    calls: AtomicU32,
}

impl FailOnPanelRenderer {
    pub fn new(needle: impl Into<String>, kind: RenderErrorKind) -> Self {
        Self {
            needle: needle.into(),
            kind,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PanelRenderer for FailOnPanelRenderer {
    async fn render(
        &self,
        payload: &str,
        _reference: Option<&AssetHandle>,
        _size_hint: SizeHint,
    ) -> Result<RenderedAsset, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if payload.contains(&self.needle) {
            return Err(RenderError::new(self.kind.clone()));
        }
        Ok(RenderedAsset::new(vec![1u8; 8], "image/png"))
    }
}

/// In-memory object store minting sequential handles.
#[derive(Default)]
pub struct MemoryStore {
    persisted: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persisted(&self) -> u32 {
        self.persisted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn persist(&self, _asset: &RenderedAsset) -> FumettiResult<AssetHandle> {
        let n = self.persisted.fetch_add(1, Ordering::SeqCst);
        Ok(AssetHandle::new(format!("asset-{n}")))
    }
}

/// Beat source replaying a fixed raw beat list.
pub struct StaticBeatSource {
    beats: Vec<RawBeat>,
    calls: AtomicU32,
}

impl StaticBeatSource {
    pub fn new(beats: Vec<RawBeat>) -> Self {
        Self {
            beats,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BeatSource for StaticBeatSource {
    async fn generate_beats(&self, _story: &str, _tier: AudienceTier) -> FumettiResult<BeatParse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BeatParse::Beats(self.beats.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}

/// Vision collaborator returning a fixed descriptor.
#[derive(Default)]
pub struct StaticDescriber {
    calls: AtomicU32,
}

impl StaticDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceDescriber for StaticDescriber {
    async fn describe_reference(
        &self,
        _asset: &AssetHandle,
    ) -> FumettiResult<IdentityDescriptor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(IdentityDescriptor {
            features: vec!["red cloak".into(), "torn left ear".into()],
            palette: vec!["rust orange".into(), "cream".into()],
            distinctive_marks: vec!["white tail tip".into()],
            summary: "a small fox in a red cloak".into(),
        })
    }
}

/// Feedback sink counting notifications.
#[derive(Default)]
pub struct CountingSink {
    calls: AtomicU32,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackSink for CountingSink {
    async fn record_success(&self, _context: &FeedbackContext, _report: &QualityReport) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fully populated raw beat for tests that want real content.
pub fn sample_raw_beat(summary: &str) -> RawBeat {
    RawBeat {
        summary: Some(summary.to_string()),
        emotion: Some("curious".to_string()),
        character_action: Some("pads through the underbrush".to_string()),
        environment: Some("a mossy forest clearing".to_string()),
        ..Default::default()
    }
}
