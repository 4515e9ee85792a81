//! Audience tiers and their panel targets.

use serde::{Deserialize, Serialize};

/// Audience tier for a comic job.
///
/// The tier fixes the target panel count the sequencer must produce,
/// regardless of how many raw beats the text model returned.
///
/// # Examples
///
/// ```
/// use fumetti_core::AudienceTier;
/// use std::str::FromStr;
///
/// let tier = AudienceTier::from_str("children").unwrap();
/// assert_eq!(tier.target_panel_count(), 10);
/// ```
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
pub enum AudienceTier {
    /// Ages 5-8: short arcs, ten panels
    Children,
    /// Ages 9-12: twelve panels
    MiddleGrade,
    /// Ages 13-17: fourteen panels
    Teen,
    /// Adult readers: sixteen panels
    Adult,
}

impl AudienceTier {
    /// Number of panels a finished comic for this tier contains.
    pub fn target_panel_count(&self) -> usize {
        match self {
            AudienceTier::Children => 10,
            AudienceTier::MiddleGrade => 12,
            AudienceTier::Teen => 14,
            AudienceTier::Adult => 16,
        }
    }
}
