//! Pipeline configuration.
//!
//! Loaded from TOML with a precedence system: bundled defaults
//! (`include_str!` from fumetti.toml) merged with an optional user override
//! (`./fumetti.toml`), user values taking precedence.

use config::{Config, File, FileFormat};
use fumetti_dispatch::DispatchConfig;
use fumetti_error::{ConfigError, FumettiResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Bundled defaults, compiled into the binary.
const DEFAULT_CONFIG: &str = include_str!("../fumetti.toml");

fn default_batch_width() -> usize {
    4
}
fn default_page_size() -> usize {
    4
}
fn default_seed_delay_ms() -> u64 {
    2_000
}
fn default_delay_floor_ms() -> u64 {
    250
}
fn default_delay_ceiling_ms() -> u64 {
    30_000
}
fn default_fast_batch_threshold_ms() -> u64 {
    8_000
}
fn default_fast_batches_before_speedup() -> u32 {
    2
}
fn default_speedup_factor() -> f64 {
    0.75
}
fn default_max_payload_len() -> usize {
    2_000
}
fn default_identity_floor() -> usize {
    200
}
fn default_min_story_len() -> usize {
    20
}
fn default_job_deadline_ms() -> u64 {
    300_000
}
fn default_feedback_threshold() -> f64 {
    85.0
}

/// Tunables for the generation pipeline.
///
/// # Examples
///
/// ```
/// use fumetti_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(*config.batch_width(), 4);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Concurrent render calls per batch.
    #[serde(default = "default_batch_width")]
    batch_width: usize,

    /// Panels per page.
    #[serde(default = "default_page_size")]
    page_size: usize,

    /// Initial inter-batch delay in milliseconds.
    #[serde(default = "default_seed_delay_ms")]
    seed_delay_ms: u64,

    /// Floor the adaptive delay never drops below, in milliseconds.
    #[serde(default = "default_delay_floor_ms")]
    delay_floor_ms: u64,

    /// Ceiling the adaptive delay never exceeds, in milliseconds.
    #[serde(default = "default_delay_ceiling_ms")]
    delay_ceiling_ms: u64,

    /// A batch under this wall-clock time counts as fast, in milliseconds.
    #[serde(default = "default_fast_batch_threshold_ms")]
    fast_batch_threshold_ms: u64,

    /// Consecutive fast batches required before the delay shrinks.
    #[serde(default = "default_fast_batches_before_speedup")]
    fast_batches_before_speedup: u32,

    /// Multiplier applied to the delay on speedup, in (0, 1).
    #[serde(default = "default_speedup_factor")]
    speedup_factor: f64,

    /// Hard ceiling on compiled prompt payload length, in characters.
    #[serde(default = "default_max_payload_len")]
    max_payload_len: usize,

    /// Guaranteed minimum for the identity section, in characters.
    #[serde(default = "default_identity_floor")]
    identity_floor: usize,

    /// Minimum story length after trimming, in characters.
    #[serde(default = "default_min_story_len")]
    min_story_len: usize,

    /// Whole-job wall-clock budget in milliseconds.
    #[serde(default = "default_job_deadline_ms")]
    job_deadline_ms: u64,

    /// Overall score at or above which the feedback sink is notified.
    #[serde(default = "default_feedback_threshold")]
    feedback_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_width: default_batch_width(),
            page_size: default_page_size(),
            seed_delay_ms: default_seed_delay_ms(),
            delay_floor_ms: default_delay_floor_ms(),
            delay_ceiling_ms: default_delay_ceiling_ms(),
            fast_batch_threshold_ms: default_fast_batch_threshold_ms(),
            fast_batches_before_speedup: default_fast_batches_before_speedup(),
            speedup_factor: default_speedup_factor(),
            max_payload_len: default_max_payload_len(),
            identity_floor: default_identity_floor(),
            min_story_len: default_min_story_len(),
            job_deadline_ms: default_job_deadline_ms(),
            feedback_threshold: default_feedback_threshold(),
        }
    }
}

impl PipelineConfig {
    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error for zero widths, an inverted delay band, a speedup
    /// factor outside (0, 1), an identity floor at or above the payload
    /// ceiling, or a feedback threshold outside [0, 100].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_width == 0 {
            return Err(ConfigError::new("batch_width must be nonzero"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::new("page_size must be nonzero"));
        }
        if self.delay_floor_ms > self.seed_delay_ms || self.seed_delay_ms > self.delay_ceiling_ms
        {
            return Err(ConfigError::new(format!(
                "delay band must satisfy floor <= seed <= ceiling, got {} <= {} <= {}",
                self.delay_floor_ms, self.seed_delay_ms, self.delay_ceiling_ms
            )));
        }
        if self.speedup_factor <= 0.0 || self.speedup_factor >= 1.0 {
            return Err(ConfigError::new(format!(
                "speedup_factor must be in (0, 1), got {}",
                self.speedup_factor
            )));
        }
        if self.identity_floor >= self.max_payload_len {
            return Err(ConfigError::new(format!(
                "identity_floor {} must stay below max_payload_len {}",
                self.identity_floor, self.max_payload_len
            )));
        }
        if !(0.0..=100.0).contains(&self.feedback_threshold) {
            return Err(ConfigError::new(format!(
                "feedback_threshold must be in [0, 100], got {}",
                self.feedback_threshold
            )));
        }
        Ok(())
    }

    /// Initial inter-batch delay.
    pub fn seed_delay(&self) -> Duration {
        Duration::from_millis(self.seed_delay_ms)
    }

    /// Adaptive delay floor.
    pub fn delay_floor(&self) -> Duration {
        Duration::from_millis(self.delay_floor_ms)
    }

    /// Adaptive delay ceiling.
    pub fn delay_ceiling(&self) -> Duration {
        Duration::from_millis(self.delay_ceiling_ms)
    }

    /// Fast-batch latency threshold.
    pub fn fast_batch_threshold(&self) -> Duration {
        Duration::from_millis(self.fast_batch_threshold_ms)
    }

    /// Whole-job wall-clock budget.
    pub fn job_deadline(&self) -> Duration {
        Duration::from_millis(self.job_deadline_ms)
    }
}

/// Top-level Fumetti configuration: pipeline plus dispatch tables.
///
/// # Example
///
/// ```no_run
/// use fumetti_pipeline::FumettiConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FumettiConfig::load()?;
/// println!("batch width: {}", config.pipeline().batch_width());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_getters::Getters)]
pub struct FumettiConfig {
    /// Pipeline tunables
    #[serde(default)]
    pipeline: PipelineConfig,
    /// Dispatch layer tunables
    #[serde(default)]
    dispatch: DispatchConfig,
}

impl FumettiConfig {
    /// Load configuration: bundled defaults merged with an optional
    /// `./fumetti.toml` override.
    ///
    /// # Errors
    ///
    /// Returns an error when the merged configuration fails to parse or
    /// validate.
    pub fn load() -> FumettiResult<Self> {
        let merged = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name("fumetti").required(false))
            .build()
            .map_err(|e| ConfigError::new(format!("failed to read configuration: {}", e)))?;

        let loaded: FumettiConfig = merged
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("failed to parse configuration: {}", e)))?;

        loaded.pipeline.validate()?;
        loaded.dispatch.validate()?;
        debug!(batch_width = loaded.pipeline.batch_width, "configuration loaded");
        Ok(loaded)
    }

    /// Assemble a config from already-built parts.
    pub fn from_parts(pipeline: PipelineConfig, dispatch: DispatchConfig) -> Self {
        Self { pipeline, dispatch }
    }
}
