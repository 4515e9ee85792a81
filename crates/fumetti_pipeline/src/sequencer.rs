//! Beat sequencing and repair.
//!
//! The text-beat collaborator returns loosely shaped, often incomplete
//! output. The sequencer turns whatever arrived into exactly the target
//! panel count of fully-populated beats: coercing missing fields to safe
//! defaults, synthesizing filler beats when the array runs short, and
//! truncating when it runs long. It never fails; downstream stages assume
//! completeness.

use fumetti_core::{
    AudienceTier, Beat, BeatParse, NarrativeFunction, RawBeat, VisualPriority,
};
use tracing::{debug, warn};

/// Fixed emotion progression across the arc, interpolated by position.
const EMOTION_CURVE: [&str; 8] = [
    "curious",
    "hopeful",
    "determined",
    "uneasy",
    "tense",
    "resolute",
    "triumphant",
    "content",
];

/// Longest spoken line carried into a panel.
const DIALOGUE_MAX_LEN: usize = 120;

/// Normalizes raw beats into a fixed-length, strictly ordered sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeatSequencer;

impl BeatSequencer {
    /// Create a sequencer.
    pub fn new() -> Self {
        Self
    }

    /// Produce exactly the tier's target panel count of valid beats.
    ///
    /// Index 0 is always the establishing beat and the last index always
    /// resolves, regardless of what the collaborator claimed.
    pub fn sequence(&self, parse: BeatParse, tier: AudienceTier) -> Vec<Beat> {
        let target = tier.target_panel_count();

        if let BeatParse::Malformed { reason } = &parse {
            warn!(%reason, "beat payload malformed, synthesizing full sequence");
        }
        let mut raw = parse.into_beats();
        if raw.len() > target {
            debug!(
                received = raw.len(),
                target, "truncating surplus beats"
            );
            raw.truncate(target);
        }

        let mut beats: Vec<Beat> = (0..target)
            .map(|index| {
                let source = raw.get(index).cloned().unwrap_or_default();
                self.repair(source, index, target)
            })
            .collect();

        for index in 1..beats.len() {
            let previous = beats[index - 1].summary.clone();
            beats[index].previous_beat_summary = Some(previous);
        }

        beats
    }

    /// Coerce one raw beat into a fully populated beat.
    fn repair(&self, raw: RawBeat, index: usize, total: usize) -> Beat {
        let function = self.function_for(raw.narrative_function, index, total);

        let summary = non_empty(raw.summary).unwrap_or_else(|| default_summary(function));
        let emotion =
            non_empty(raw.emotion).unwrap_or_else(|| emotion_for_position(index, total));
        let character_action =
            non_empty(raw.character_action).unwrap_or_else(|| default_action(function));
        let environment = non_empty(raw.environment)
            .unwrap_or_else(|| "the established setting".to_string());
        let visual_priority = raw
            .visual_priority
            .unwrap_or_else(|| default_priority(function));

        let dialogue = non_empty(raw.dialogue).map(|line| cap_chars(&line, DIALOGUE_MAX_LEN));
        // A bubble with nothing in it is never drawn.
        let has_speech_bubble =
            dialogue.is_some() && raw.has_speech_bubble.unwrap_or(true);

        Beat {
            summary,
            emotion,
            character_action,
            environment,
            visual_priority,
            narrative_function: function,
            dialogue,
            has_speech_bubble,
            previous_beat_summary: None,
        }
    }

    /// Pick the beat's narrative function, pinning the endpoints.
    fn function_for(
        &self,
        claimed: Option<NarrativeFunction>,
        index: usize,
        total: usize,
    ) -> NarrativeFunction {
        if index == 0 {
            NarrativeFunction::Establish
        } else if index + 1 == total {
            NarrativeFunction::Resolve
        } else {
            claimed.unwrap_or_else(|| NarrativeFunction::for_position(index, total))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn cap_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn emotion_for_position(index: usize, total: usize) -> String {
    let slot = if total <= 1 {
        0
    } else {
        index * (EMOTION_CURVE.len() - 1) / (total - 1)
    };
    EMOTION_CURVE[slot.min(EMOTION_CURVE.len() - 1)].to_string()
}

fn default_summary(function: NarrativeFunction) -> String {
    match function {
        NarrativeFunction::Establish => "The scene opens on the hero".to_string(),
        NarrativeFunction::Develop => "The story pushes forward".to_string(),
        NarrativeFunction::Climax => "Everything comes to a head".to_string(),
        NarrativeFunction::Resolve => "The dust settles".to_string(),
    }
}

fn default_action(function: NarrativeFunction) -> String {
    match function {
        NarrativeFunction::Establish => "takes in the surroundings".to_string(),
        NarrativeFunction::Develop => "presses on with the plan".to_string(),
        NarrativeFunction::Climax => "faces the moment head-on".to_string(),
        NarrativeFunction::Resolve => "lets out a long breath".to_string(),
    }
}

fn default_priority(function: NarrativeFunction) -> VisualPriority {
    match function {
        NarrativeFunction::Establish => VisualPriority::Environment,
        NarrativeFunction::Climax => VisualPriority::Action,
        NarrativeFunction::Develop | NarrativeFunction::Resolve => VisualPriority::Character,
    }
}
