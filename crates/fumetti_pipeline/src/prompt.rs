//! Prompt compilation.
//!
//! Pure function from (beat, profile, position) to a bounded instruction
//! payload. When the naive payload exceeds the ceiling, sections are
//! dropped lowest-priority-first and the remainder is truncated; the
//! identity section is never cut below its guaranteed floor. No clocks, no
//! randomness: identical inputs yield byte-identical payloads.

use crate::PipelineConfig;
use fumetti_core::{Beat, ConsistencyProfile, NarrativeFunction};

/// Separator between payload sections.
const SECTION_SEP: &str = "\n\n";

/// Fixed style guidance, the first thing compression drops after dialogue.
const STYLE_BOILERPLATE: &str = "Style: comic panel illustration, clean line art, \
consistent character design across panels, flat vibrant colors, strong silhouette, \
no text or lettering artifacts.";

/// Compiles beats into bounded render payloads.
#[derive(Debug, Clone)]
pub struct PromptCompiler {
    max_payload_len: usize,
    identity_floor: usize,
}

impl PromptCompiler {
    /// Create a compiler from the pipeline config.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            max_payload_len: *config.max_payload_len(),
            identity_floor: *config.identity_floor(),
        }
    }

    /// Compile one beat into a payload of at most the configured length.
    pub fn compile(
        &self,
        beat: &Beat,
        profile: &ConsistencyProfile,
        position: usize,
        total: usize,
        prior_summary: Option<&str>,
    ) -> String {
        let identity = self.identity_section(profile);
        let scene = self.scene_section(beat, position, total, prior_summary);
        let environment = self.environment_section(beat, profile);
        let dialogue = self.dialogue_section(beat);

        // Display order is fixed; priority decides what survives
        // compression: identity > scene > environment > style > dialogue.
        let mut sections: Vec<Option<String>> = vec![
            Some(identity),
            Some(scene),
            Some(environment),
            Some(STYLE_BOILERPLATE.to_string()),
            dialogue,
        ];

        if self.assembled_len(&sections) <= self.max_payload_len {
            return self.assemble(&sections);
        }

        // Drop sections lowest-priority-first, never identity or scene.
        for drop_index in [4usize, 3, 2] {
            sections[drop_index] = None;
            if self.assembled_len(&sections) <= self.max_payload_len {
                return self.assemble(&sections);
            }
        }

        // Identity plus scene still overflow: shrink the scene around a
        // full-length identity section, then cut identity only as far as
        // its floor allows.
        let identity = sections[0].take().unwrap_or_default();
        let scene = sections[1].take().unwrap_or_default();

        let identity_budget = identity.chars().count().min(self.max_payload_len);
        let identity_keep = identity_budget.max(self.identity_floor.min(self.max_payload_len));
        let identity = truncate_chars(&identity, identity_keep);

        let used = identity.chars().count();
        let remaining = self
            .max_payload_len
            .saturating_sub(used + SECTION_SEP.len());
        if remaining == 0 {
            return truncate_chars(&identity, self.max_payload_len);
        }
        let scene = truncate_chars(&scene, remaining);
        if scene.is_empty() {
            return identity;
        }
        format!("{identity}{SECTION_SEP}{scene}")
    }

    fn assemble(&self, sections: &[Option<String>]) -> String {
        sections
            .iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(SECTION_SEP)
    }

    fn assembled_len(&self, sections: &[Option<String>]) -> usize {
        let parts: Vec<&String> = sections.iter().flatten().collect();
        let content: usize = parts.iter().map(|s| s.chars().count()).sum();
        content + SECTION_SEP.len() * parts.len().saturating_sub(1)
    }

    fn identity_section(&self, profile: &ConsistencyProfile) -> String {
        let identity = profile.identity();
        let mut lines = vec![format!(
            "Recurring character (identical in every panel): {}.",
            identity.summary.trim()
        )];
        if !identity.features.is_empty() {
            lines.push(format!("Features: {}.", identity.features.join(", ")));
        }
        if !identity.palette.is_empty() {
            lines.push(format!("Character palette: {}.", identity.palette.join(", ")));
        }
        if !identity.distinctive_marks.is_empty() {
            lines.push(format!(
                "Distinctive marks: {}.",
                identity.distinctive_marks.join(", ")
            ));
        }
        if let Some(reference) = profile.reference_asset() {
            lines.push(format!(
                "Match the character in reference image {}.",
                reference.as_str()
            ));
        }
        lines.join(" ")
    }

    fn scene_section(
        &self,
        beat: &Beat,
        position: usize,
        total: usize,
        prior_summary: Option<&str>,
    ) -> String {
        let framing = match beat.narrative_function {
            NarrativeFunction::Establish => "an establishing shot",
            NarrativeFunction::Develop => "a story beat",
            NarrativeFunction::Climax => "the dramatic peak",
            NarrativeFunction::Resolve => "a resolving moment",
        };
        let mut scene = format!(
            "Panel {} of {}, {}: {}. The character {}, expression {}.",
            position + 1,
            total,
            framing,
            beat.summary,
            beat.character_action,
            beat.emotion
        );
        if let Some(prior) = prior_summary.filter(|p| !p.trim().is_empty()) {
            scene.push_str(&format!(" Continues directly from: {}.", prior.trim()));
        }
        scene
    }

    fn environment_section(&self, beat: &Beat, profile: &ConsistencyProfile) -> String {
        let env = profile.environment();
        let mut parts = vec![format!("Setting: {}", beat.environment)];
        if !env.location.trim().is_empty() {
            parts.push(format!("location {}", env.location));
        }
        if !env.key_features.is_empty() {
            parts.push(format!("with {}", env.key_features.join(", ")));
        }
        if !env.lighting.trim().is_empty() {
            parts.push(format!("{} lighting", env.lighting));
        }
        if !env.time_of_day.trim().is_empty() {
            parts.push(env.time_of_day.clone());
        }
        if !env.palette.is_empty() {
            parts.push(format!("palette of {}", env.palette.join(", ")));
        }
        if !env.recurring_objects.is_empty() {
            parts.push(format!("always showing {}", env.recurring_objects.join(", ")));
        }
        let mut section = parts.join("; ");
        section.push('.');
        section
    }

    fn dialogue_section(&self, beat: &Beat) -> Option<String> {
        if !beat.has_speech_bubble {
            return None;
        }
        beat.dialogue
            .as_ref()
            .map(|line| format!("Speech bubble reading: \"{}\".", line))
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
