//! Job-level output contract.

use crate::{Page, QualityReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation metadata attached to a finished comic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// When generation finished
    pub generated_at: DateTime<Utc>,
    /// End-to-end wall-clock time
    pub duration: Duration,
    /// Number of panels rendered
    pub panel_count: usize,
    /// Whether a reference asset anchored the character identity
    pub reference_used: bool,
    /// Whether a textual identity descriptor constrained every prompt
    pub identity_enforced: bool,
}

/// The finished product: ordered pages plus assessment and metadata.
///
/// There is no partial-success variant. A `Comic` always carries every
/// requested panel; a job that cannot deliver that fails instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comic {
    /// Pages in reading order
    pub pages: Vec<Page>,
    /// Post-hoc quality assessment
    pub report: QualityReport,
    /// Generation metadata
    pub metadata: GenerationMetadata,
}

impl Comic {
    /// Total panel count across all pages.
    pub fn panel_count(&self) -> usize {
        self.pages.iter().map(|p| p.panels.len()).sum()
    }
}
