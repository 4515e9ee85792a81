//! Dispatch layer configuration.

use crate::{BreakerConfig, RetryPolicy};
use fumetti_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_failure_threshold() -> u32 {
    5
}
fn default_success_threshold() -> u32 {
    2
}
fn default_cooldown_ms() -> u64 {
    30_000
}
fn default_cooldown_cap_ms() -> u64 {
    240_000
}
fn default_requests_per_minute() -> u32 {
    60
}
fn default_max_attempts() -> u32 {
    4
}
fn default_base_backoff_ms() -> u64 {
    500
}
fn default_max_backoff_ms() -> u64 {
    8_000
}
fn default_rate_limit_multiplier() -> f64 {
    2.0
}
fn default_per_call_timeout_ms() -> u64 {
    20_000
}
fn default_total_retry_budget_ms() -> u64 {
    45_000
}

/// Tunables for the resilient dispatch layer.
///
/// Loaded from the `[dispatch]` table of `fumetti.toml`; every field has a
/// bundled default so a missing table still yields a working layer.
///
/// # Examples
///
/// ```
/// use fumetti_dispatch::DispatchConfig;
///
/// let config = DispatchConfig::default();
/// assert_eq!(*config.max_attempts(), 4);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Consecutive retryable failures that trip the circuit.
    #[serde(default = "default_failure_threshold")]
    failure_threshold: u32,

    /// Consecutive half-open successes that close the circuit.
    #[serde(default = "default_success_threshold")]
    success_threshold: u32,

    /// Initial open-state cool-down in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    cooldown_ms: u64,

    /// Ceiling for the doubling cool-down in milliseconds.
    #[serde(default = "default_cooldown_cap_ms")]
    cooldown_cap_ms: u64,

    /// Request-rate gate, requests per minute.
    #[serde(default = "default_requests_per_minute")]
    requests_per_minute: u32,

    /// Attempts per render call, first try included.
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Backoff base delay in milliseconds.
    #[serde(default = "default_base_backoff_ms")]
    base_backoff_ms: u64,

    /// Backoff delay ceiling in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    max_backoff_ms: u64,

    /// Extra multiplier applied to rate-limit backoff.
    #[serde(default = "default_rate_limit_multiplier")]
    rate_limit_multiplier: f64,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_per_call_timeout_ms")]
    per_call_timeout_ms: u64,

    /// Wall-clock ceiling on one call's total retry time, in milliseconds.
    #[serde(default = "default_total_retry_budget_ms")]
    total_retry_budget_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: default_success_threshold(),
            cooldown_ms: default_cooldown_ms(),
            cooldown_cap_ms: default_cooldown_cap_ms(),
            requests_per_minute: default_requests_per_minute(),
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit_multiplier: default_rate_limit_multiplier(),
            per_call_timeout_ms: default_per_call_timeout_ms(),
            total_retry_budget_ms: default_total_retry_budget_ms(),
        }
    }
}

impl DispatchConfig {
    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error when a threshold is zero, the multiplier is below
    /// 1.0, or the backoff ceiling undercuts the base.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::new("failure_threshold must be nonzero"));
        }
        if self.success_threshold == 0 {
            return Err(ConfigError::new("success_threshold must be nonzero"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::new("max_attempts must be nonzero"));
        }
        if self.requests_per_minute == 0 {
            return Err(ConfigError::new("requests_per_minute must be nonzero"));
        }
        if self.rate_limit_multiplier < 1.0 {
            return Err(ConfigError::new(format!(
                "rate_limit_multiplier must be >= 1.0, got {}",
                self.rate_limit_multiplier
            )));
        }
        if self.max_backoff_ms < self.base_backoff_ms {
            return Err(ConfigError::new(format!(
                "max_backoff_ms {} undercuts base_backoff_ms {}",
                self.max_backoff_ms, self.base_backoff_ms
            )));
        }
        Ok(())
    }

    /// Derive the breaker configuration.
    pub fn breaker_config(&self) -> BreakerConfig {
        BreakerConfig {
            failure_threshold: self.failure_threshold,
            success_threshold: self.success_threshold,
            cooldown: Duration::from_millis(self.cooldown_ms),
            cooldown_cap: Duration::from_millis(self.cooldown_cap_ms),
        }
    }

    /// Derive the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_backoff_ms),
            max_delay: Duration::from_millis(self.max_backoff_ms),
            rate_limit_multiplier: self.rate_limit_multiplier,
            per_call_timeout: Duration::from_millis(self.per_call_timeout_ms),
            total_budget: Duration::from_millis(self.total_retry_budget_ms),
        }
    }
}
