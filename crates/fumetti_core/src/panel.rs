//! Rendered panel results and page grouping.

use crate::AssetHandle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of rendering one panel position.
///
/// Produced exactly once per requested position. The assembler requires a
/// result for every position before it will emit pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelResult {
    /// Zero-based panel position, identical to the source beat index
    pub position: usize,
    /// Durable handle to the persisted render
    pub asset: AssetHandle,
    /// Wall-clock time the render call took, including retries
    pub latency: Duration,
    /// Number of attempts the dispatch layer spent
    pub attempts: u32,
}

/// One finished panel: image plus derived narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Deterministic narration sentence derived from the beat
    pub narration: String,
    /// Durable handle to the rendered image
    pub asset: AssetHandle,
    /// Dominant character emotion, carried from the beat
    pub emotion: String,
    /// Whether the panel carries a speech bubble
    pub has_speech_bubble: bool,
    /// Spoken line, when the beat has one
    pub dialogue: Option<String>,
}

/// A fixed-size group of consecutive panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// One-based page number
    pub number: usize,
    /// Panels in reading order
    pub panels: Vec<Panel>,
}
