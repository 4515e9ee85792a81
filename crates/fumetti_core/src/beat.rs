//! Story beats: the raw upstream shape and the repaired panel-ready form.

use serde::{Deserialize, Serialize};

/// Narrative role a beat plays in the arc.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NarrativeFunction {
    /// Opens the story, introduces character and setting
    Establish,
    /// Advances the plot
    Develop,
    /// Peak tension
    Climax,
    /// Winds the story down
    Resolve,
}

impl NarrativeFunction {
    /// Interpolate the narrative function from a panel's position.
    ///
    /// The arc is split by position fraction: the first 15% establishes,
    /// the next 55% develops, the next 15% is the climax, and the
    /// remainder resolves.
    pub fn for_position(index: usize, total: usize) -> Self {
        if total <= 1 {
            return NarrativeFunction::Establish;
        }
        let fraction = index as f64 / (total - 1) as f64;
        if fraction < 0.15 {
            NarrativeFunction::Establish
        } else if fraction < 0.70 {
            NarrativeFunction::Develop
        } else if fraction < 0.85 {
            NarrativeFunction::Climax
        } else {
            NarrativeFunction::Resolve
        }
    }
}

/// What the panel's composition should emphasize.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisualPriority {
    /// Close framing on the recurring character
    #[default]
    Character,
    /// Movement and gesture dominate the frame
    Action,
    /// Wide framing on the setting
    Environment,
    /// Facial expression carries the panel
    Emotion,
}

/// A beat as the text-generation collaborator returns it.
///
/// Every field is optional: upstream output is duck-shaped and frequently
/// incomplete. The sequencer owns all repair; nothing downstream consumes a
/// `RawBeat` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawBeat {
    /// One-sentence description of the moment
    #[serde(default)]
    pub summary: Option<String>,
    /// Dominant character emotion
    #[serde(default)]
    pub emotion: Option<String>,
    /// What the character is doing
    #[serde(default)]
    pub character_action: Option<String>,
    /// Where the moment takes place
    #[serde(default)]
    pub environment: Option<String>,
    /// Compositional emphasis
    #[serde(default)]
    pub visual_priority: Option<VisualPriority>,
    /// Arc role, if the model supplied one
    #[serde(default)]
    pub narrative_function: Option<NarrativeFunction>,
    /// Spoken line, if any
    #[serde(default)]
    pub dialogue: Option<String>,
    /// Whether the panel should carry a speech bubble
    #[serde(default)]
    pub has_speech_bubble: Option<bool>,
}

/// Parse result for the text-beat collaborator's output.
///
/// Upstream responses are loosely shaped JSON; instead of trusting them we
/// parse into a tagged variant that the sequencer's repair logic consumes.
/// A malformed payload is not an error: the sequencer synthesizes a full
/// sequence from whatever survived.
///
/// # Examples
///
/// ```
/// use fumetti_core::BeatParse;
///
/// let parsed = BeatParse::from_json(r#"[{"summary": "A knock at the door"}]"#);
/// assert!(matches!(parsed, BeatParse::Beats(ref beats) if beats.len() == 1));
///
/// let broken = BeatParse::from_json("not json at all");
/// assert!(matches!(broken, BeatParse::Malformed { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BeatParse {
    /// Parsed beat array, possibly short or field-incomplete
    Beats(Vec<RawBeat>),
    /// Payload could not be interpreted as a beat array
    Malformed {
        /// Why parsing failed
        reason: String,
    },
}

impl BeatParse {
    /// Parse a JSON payload into raw beats.
    ///
    /// Accepts either a bare array or an object with a `beats` array field,
    /// the two shapes observed from text models.
    pub fn from_json(payload: &str) -> Self {
        #[derive(Deserialize)]
        struct Wrapped {
            beats: Vec<RawBeat>,
        }

        if let Ok(beats) = serde_json::from_str::<Vec<RawBeat>>(payload) {
            return BeatParse::Beats(beats);
        }
        match serde_json::from_str::<Wrapped>(payload) {
            Ok(wrapped) => BeatParse::Beats(wrapped.beats),
            Err(e) => BeatParse::Malformed {
                reason: e.to_string(),
            },
        }
    }

    /// The raw beats, or an empty slate for malformed payloads.
    pub fn into_beats(self) -> Vec<RawBeat> {
        match self {
            BeatParse::Beats(beats) => beats,
            BeatParse::Malformed { .. } => Vec::new(),
        }
    }
}

/// A repaired, panel-ready beat.
///
/// Every non-optional field is guaranteed populated: the sequencer coerces
/// missing or empty upstream values to safe defaults at construction time.
/// An empty `summary` or `emotion` reaching a downstream consumer is a
/// programmer error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Beat {
    /// One-sentence description of the moment
    pub summary: String,
    /// Dominant character emotion
    pub emotion: String,
    /// What the character is doing
    pub character_action: String,
    /// Where the moment takes place
    pub environment: String,
    /// Compositional emphasis
    #[builder(default)]
    pub visual_priority: VisualPriority,
    /// Arc role of this panel
    pub narrative_function: NarrativeFunction,
    /// Spoken line, if any
    #[builder(default)]
    pub dialogue: Option<String>,
    /// Whether the panel carries a speech bubble
    #[builder(default)]
    pub has_speech_bubble: bool,
    /// Summary of the beat at index - 1, stamped by the sequencer
    #[builder(default)]
    pub previous_beat_summary: Option<String>,
}

impl Beat {
    /// Start building a beat.
    pub fn builder() -> BeatBuilder {
        BeatBuilder::default()
    }
}
