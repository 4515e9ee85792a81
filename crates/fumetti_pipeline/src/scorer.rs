//! Post-hoc quality scoring.
//!
//! Non-blocking assessment of a finished job. Scoring never fails the job:
//! any internal error degrades to a documented default report. The numeric
//! weights are fixed product policy and sum to 1.0.

use fumetti_core::{
    AudienceTier, Beat, ConsistencyProfile, Grade, NarrativeFunction, PanelResult, QualityReport,
    SubScores,
};
use fumetti_error::{ScoringError, ScoringErrorKind};
use std::time::Duration;
use tracing::warn;

/// Sub-score weights. Must sum to 1.0.
const WEIGHT_CHARACTER: f64 = 0.25;
const WEIGHT_ENVIRONMENT: f64 = 0.15;
const WEIGHT_NARRATIVE: f64 = 0.20;
const WEIGHT_VISUAL: f64 = 0.15;
const WEIGHT_TECHNICAL: f64 = 0.10;
const WEIGHT_AUDIENCE: f64 = 0.10;
const WEIGHT_DIALOGUE: f64 = 0.05;

/// Score every sub-dimension falls back to when scoring itself fails.
const DEFAULT_SCORE: f64 = 70.0;

/// Computes the weighted quality report for a finished job.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    /// Create a scorer.
    pub fn new() -> Self {
        Self
    }

    /// Score a finished job.
    ///
    /// Never fails: errors degrade to the default report (every sub-score
    /// at 70, grade B-).
    pub fn score(
        &self,
        beats: &[Beat],
        results: &[PanelResult],
        profile: &ConsistencyProfile,
        tier: AudienceTier,
    ) -> QualityReport {
        match self.compute(beats, results, profile, tier) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "scoring failed, using default report");
                self.default_report()
            }
        }
    }

    /// The documented degraded report.
    pub fn default_report(&self) -> QualityReport {
        let scores = SubScores {
            character_consistency: DEFAULT_SCORE,
            environment_coherence: DEFAULT_SCORE,
            narrative_coherence: DEFAULT_SCORE,
            visual_quality: DEFAULT_SCORE,
            technical_execution: DEFAULT_SCORE,
            audience_alignment: DEFAULT_SCORE,
            dialogue_effectiveness: DEFAULT_SCORE,
        };
        QualityReport {
            scores,
            overall: DEFAULT_SCORE,
            grade: Grade::from_score(DEFAULT_SCORE),
        }
    }

    fn compute(
        &self,
        beats: &[Beat],
        results: &[PanelResult],
        profile: &ConsistencyProfile,
        tier: AudienceTier,
    ) -> Result<QualityReport, ScoringError> {
        if results.is_empty() || beats.is_empty() {
            return Err(ScoringError::new(ScoringErrorKind::EmptyResults));
        }

        let weight_sum = WEIGHT_CHARACTER
            + WEIGHT_ENVIRONMENT
            + WEIGHT_NARRATIVE
            + WEIGHT_VISUAL
            + WEIGHT_TECHNICAL
            + WEIGHT_AUDIENCE
            + WEIGHT_DIALOGUE;
        if (weight_sum - 1.0).abs() > 1e-9 {
            return Err(ScoringError::new(ScoringErrorKind::InvalidWeights(
                weight_sum.to_string(),
            )));
        }

        let scores = SubScores {
            character_consistency: self.character_consistency(results, profile),
            environment_coherence: self.environment_coherence(beats, profile),
            narrative_coherence: self.narrative_coherence(beats),
            visual_quality: self.visual_quality(results),
            technical_execution: self.technical_execution(results),
            audience_alignment: self.audience_alignment(results, tier),
            dialogue_effectiveness: self.dialogue_effectiveness(beats),
        };

        let overall = scores.character_consistency * WEIGHT_CHARACTER
            + scores.environment_coherence * WEIGHT_ENVIRONMENT
            + scores.narrative_coherence * WEIGHT_NARRATIVE
            + scores.visual_quality * WEIGHT_VISUAL
            + scores.technical_execution * WEIGHT_TECHNICAL
            + scores.audience_alignment * WEIGHT_AUDIENCE
            + scores.dialogue_effectiveness * WEIGHT_DIALOGUE;
        let overall = overall.clamp(0.0, 100.0);

        Ok(QualityReport {
            scores,
            overall,
            grade: Grade::from_score(overall),
        })
    }

    /// Identity richness plus reference anchoring, penalized by retries.
    fn character_consistency(&self, results: &[PanelResult], profile: &ConsistencyProfile) -> f64 {
        let identity = profile.identity();
        let richness = (identity.features.len()
            + identity.distinctive_marks.len()
            + identity.palette.len())
        .min(10) as f64;
        let reference_bonus = if profile.has_reference() { 10.0 } else { 0.0 };
        let retried = results.iter().filter(|r| r.attempts > 1).count() as f64;
        let retry_penalty = (retried / results.len() as f64) * 15.0;
        (68.0 + richness * 2.0 + reference_bonus - retry_penalty).clamp(0.0, 100.0)
    }

    /// Setting completeness and per-beat environment coverage.
    fn environment_coherence(&self, beats: &[Beat], profile: &ConsistencyProfile) -> f64 {
        let env = profile.environment();
        let mut score = 60.0;
        if !env.location.trim().is_empty() {
            score += 8.0;
        }
        if !env.lighting.trim().is_empty() {
            score += 7.0;
        }
        if !env.time_of_day.trim().is_empty() {
            score += 5.0;
        }
        score += (env.key_features.len().min(4) as f64) * 2.5;
        let described = beats
            .iter()
            .filter(|b| b.environment != "the established setting")
            .count() as f64;
        score += (described / beats.len() as f64) * 10.0;
        score.clamp(0.0, 100.0)
    }

    /// Does the arc land: open on establish, close on resolve, peak once.
    fn narrative_coherence(&self, beats: &[Beat]) -> f64 {
        let mut score: f64 = 60.0;
        if beats
            .first()
            .is_some_and(|b| b.narrative_function == NarrativeFunction::Establish)
        {
            score += 15.0;
        }
        if beats
            .last()
            .is_some_and(|b| b.narrative_function == NarrativeFunction::Resolve)
        {
            score += 15.0;
        }
        if beats
            .iter()
            .any(|b| b.narrative_function == NarrativeFunction::Climax)
        {
            score += 10.0;
        }
        score.clamp(0.0, 100.0)
    }

    /// Latency is the only render-quality proxy available post hoc.
    fn visual_quality(&self, results: &[PanelResult]) -> f64 {
        let total: Duration = results.iter().map(|r| r.latency).sum();
        let mean_secs = total.as_secs_f64() / results.len() as f64;
        (95.0 - mean_secs * 2.0).clamp(60.0, 95.0)
    }

    /// First-attempt success rate.
    fn technical_execution(&self, results: &[PanelResult]) -> f64 {
        let clean = results.iter().filter(|r| r.attempts == 1).count() as f64;
        60.0 + (clean / results.len() as f64) * 40.0
    }

    /// Did the output land on the tier's expected panel count.
    fn audience_alignment(&self, results: &[PanelResult], tier: AudienceTier) -> f64 {
        if results.len() == tier.target_panel_count() {
            90.0
        } else {
            65.0
        }
    }

    /// Speech-bubble hygiene: every bubble carries a line.
    fn dialogue_effectiveness(&self, beats: &[Beat]) -> f64 {
        let bubbles: Vec<&Beat> = beats.iter().filter(|b| b.has_speech_bubble).collect();
        if bubbles.is_empty() {
            return 75.0;
        }
        let spoken = bubbles
            .iter()
            .filter(|b| b.dialogue.as_deref().is_some_and(|d| !d.trim().is_empty()))
            .count() as f64;
        60.0 + (spoken / bubbles.len() as f64) * 40.0
    }
}
