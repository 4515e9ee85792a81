//! Panel assembly and narration derivation.
//!
//! Pure aggregation: zips panel results with their source beats in index
//! order, derives a deterministic narration sentence per panel, and groups
//! consecutive panels into fixed-size pages.

use crate::PipelineConfig;
use fumetti_core::{Beat, NarrativeFunction, Page, Panel, PanelResult, VisualPriority};
use fumetti_error::{PipelineError, PipelineErrorKind};

/// Narrations shorter than this pick up a descriptive filler clause.
const MIN_NARRATION_WORDS: usize = 15;

/// Groups rendered panels into pages with derived narration.
#[derive(Debug, Clone)]
pub struct PanelAssembler {
    page_size: usize,
}

impl PanelAssembler {
    /// Create an assembler from the pipeline config.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            page_size: *config.page_size(),
        }
    }

    /// Zip beats and results into pages.
    ///
    /// # Errors
    ///
    /// A length mismatch between beats and results is a programmer error
    /// and returns `PanelCountMismatch`; it is never recoverable.
    pub fn assemble(
        &self,
        beats: &[Beat],
        results: &[PanelResult],
    ) -> Result<Vec<Page>, PipelineError> {
        if beats.len() != results.len() {
            return Err(PipelineError::new(PipelineErrorKind::PanelCountMismatch {
                expected: beats.len(),
                actual: results.len(),
            }));
        }

        let total = beats.len();
        let panels: Vec<Panel> = beats
            .iter()
            .zip(results.iter())
            .enumerate()
            .map(|(position, (beat, result))| Panel {
                narration: narration(beat, position, total),
                asset: result.asset.clone(),
                emotion: beat.emotion.clone(),
                has_speech_bubble: beat.has_speech_bubble,
                dialogue: beat.dialogue.clone(),
            })
            .collect();

        Ok(panels
            .chunks(self.page_size)
            .enumerate()
            .map(|(index, chunk)| Page {
                number: index + 1,
                panels: chunk.to_vec(),
            })
            .collect())
    }
}

/// Derive the narration sentence for one panel.
///
/// Deterministic, no external calls: summary plus action, emotion, and
/// environment clauses, framed by position, with a filler clause appended
/// when the result runs under the minimum word count.
pub fn narration(beat: &Beat, position: usize, total: usize) -> String {
    let base = format!(
        "{}. The hero {}, {} written across their face, amid {}",
        beat.summary.trim_end_matches('.'),
        beat.character_action,
        beat.emotion,
        beat.environment
    );

    let mut sentence = if position == 0 {
        format!("Our story opens: {}.", base)
    } else if position + 1 == total {
        format!("And so it ends: {}.", base)
    } else if beat.narrative_function == NarrativeFunction::Climax {
        format!("Suddenly: {}!", base)
    } else {
        format!("{}.", base)
    };

    if sentence.split_whitespace().count() < MIN_NARRATION_WORDS {
        sentence.push(' ');
        sentence.push_str(filler_clause(beat.visual_priority));
    }

    sentence
}

fn filler_clause(priority: VisualPriority) -> &'static str {
    match priority {
        VisualPriority::Character => "Every detail of the hero stands out in this moment.",
        VisualPriority::Action => "The movement carries the eye straight through the frame.",
        VisualPriority::Environment => "The setting sprawls wide around the action.",
        VisualPriority::Emotion => "The feeling is plain on the hero's face.",
    }
}
