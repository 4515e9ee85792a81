//! Quality report types.

use serde::{Deserialize, Serialize};

/// Letter grade mapped from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Grade {
    /// Overall score ≥ 95
    #[display("A+")]
    APlus,
    /// Overall score ≥ 90
    #[display("A")]
    A,
    /// Overall score ≥ 85
    #[display("A-")]
    AMinus,
    /// Overall score ≥ 80
    #[display("B+")]
    BPlus,
    /// Overall score ≥ 75
    #[display("B")]
    B,
    /// Overall score ≥ 70
    #[display("B-")]
    BMinus,
    /// Everything below 70
    #[display("C+")]
    CPlus,
}

impl Grade {
    /// Map an overall score onto the fixed grade thresholds.
    ///
    /// # Examples
    ///
    /// ```
    /// use fumetti_core::Grade;
    ///
    /// assert_eq!(Grade::from_score(96.0), Grade::APlus);
    /// assert_eq!(Grade::from_score(82.5), Grade::BPlus);
    /// assert_eq!(Grade::from_score(12.0), Grade::CPlus);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            Grade::APlus
        } else if score >= 90.0 {
            Grade::A
        } else if score >= 85.0 {
            Grade::AMinus
        } else if score >= 80.0 {
            Grade::BPlus
        } else if score >= 75.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::BMinus
        } else {
            Grade::CPlus
        }
    }
}

/// Named sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    /// How faithfully the recurring character was held across panels
    pub character_consistency: f64,
    /// How coherent the setting stayed across panels
    pub environment_coherence: f64,
    /// Whether the arc lands (establish → develop → climax → resolve)
    pub narrative_coherence: f64,
    /// Render quality proxy
    pub visual_quality: f64,
    /// First-attempt success and latency discipline
    pub technical_execution: f64,
    /// Whether the output matches the audience tier's expectations
    pub audience_alignment: f64,
    /// Dialogue and speech-bubble hygiene
    pub dialogue_effectiveness: f64,
}

/// Post-hoc quality assessment for a finished job.
///
/// Computed once per job and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Named sub-scores
    pub scores: SubScores,
    /// Weighted overall score in [0, 100]
    pub overall: f64,
    /// Letter grade from the fixed thresholds
    pub grade: Grade,
}
