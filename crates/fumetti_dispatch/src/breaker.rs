//! Circuit breaker for the render endpoint.
//!
//! Three states:
//! - Closed: normal operation, consecutive retryable failures are counted
//! - Open: requests short-circuit until the cool-down elapses
//! - Half-Open: a single trial request probes for recovery
//!
//! Each failed probe reopens the circuit with a doubled cool-down, up to a
//! cap. Terminal failures (auth, content policy) say nothing about service
//! health and do not move the state machine.

use std::time::{Duration, Instant};

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Circuit is closed - requests pass through
    Closed,
    /// Circuit is open - requests are rejected
    Open,
    /// Circuit is half-open - probing for recovery
    HalfOpen,
}

/// Default breaker configuration.
const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
const DEFAULT_SUCCESS_THRESHOLD: u32 = 2;
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);
const DEFAULT_COOLDOWN_CAP: Duration = Duration::from_secs(240);

/// Circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerConfig {
    /// Consecutive retryable failures that trip the circuit
    pub failure_threshold: u32,
    /// Consecutive half-open successes that close the circuit
    pub success_threshold: u32,
    /// Initial open-state cool-down
    pub cooldown: Duration,
    /// Ceiling for the doubling cool-down
    pub cooldown_cap: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
            cooldown_cap: DEFAULT_COOLDOWN_CAP,
        }
    }
}

impl BreakerConfig {
    /// Create a config with the given trip threshold and cool-down.
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold,
            cooldown,
            ..Default::default()
        }
    }

    /// Set the half-open success threshold.
    pub fn with_success_threshold(mut self, threshold: u32) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Set the cool-down ceiling.
    pub fn with_cooldown_cap(mut self, cap: Duration) -> Self {
        self.cooldown_cap = cap;
        self
    }
}

/// Outcome of asking the breaker for permission to dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerDecision {
    /// Request may proceed
    Allow,
    /// Request is rejected; the circuit reopens no sooner than `retry_in`
    Reject {
        /// Remaining cool-down at the time of the ask
        retry_in: Duration,
    },
}

/// Three-state circuit breaker with doubling cool-down.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: BreakerState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    current_cooldown: Duration,
    probe_in_flight: bool,
}

impl CircuitBreaker {
    /// Create a breaker with default config.
    pub fn new() -> Self {
        Self::with_config(BreakerConfig::default())
    }

    /// Create a breaker with custom config.
    pub fn with_config(config: BreakerConfig) -> Self {
        let current_cooldown = config.cooldown;
        Self {
            config,
            state: BreakerState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            opened_at: None,
            current_cooldown,
            probe_in_flight: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> BreakerState {
        self.state
    }

    /// Consecutive retryable failures observed in the closed state.
    pub fn failure_count(&self) -> u32 {
        self.consecutive_failures
    }

    /// Ask permission to issue a request.
    ///
    /// In the open state this transitions to half-open once the cool-down
    /// has elapsed and admits exactly one probe; further requests are
    /// rejected until the probe reports back.
    pub fn try_acquire(&mut self) -> BreakerDecision {
        match self.state {
            BreakerState::Closed => BreakerDecision::Allow,
            BreakerState::Open => {
                let elapsed = self
                    .opened_at
                    .map(|at| at.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.current_cooldown {
                    self.transition_to_half_open();
                    self.probe_in_flight = true;
                    BreakerDecision::Allow
                } else {
                    BreakerDecision::Reject {
                        retry_in: self.current_cooldown - elapsed,
                    }
                }
            }
            BreakerState::HalfOpen => {
                if self.probe_in_flight {
                    BreakerDecision::Reject {
                        retry_in: Duration::ZERO,
                    }
                } else {
                    self.probe_in_flight = true;
                    BreakerDecision::Allow
                }
            }
        }
    }

    /// Record a successful request.
    pub fn on_success(&mut self) {
        match self.state {
            BreakerState::Closed => {
                self.consecutive_failures = 0;
            }
            BreakerState::HalfOpen => {
                self.probe_in_flight = false;
                self.consecutive_successes = self.consecutive_successes.saturating_add(1);
                if self.consecutive_successes >= self.config.success_threshold {
                    self.transition_to_closed();
                }
            }
            BreakerState::Open => {}
        }
    }

    /// Record a retryable (service-health) failure.
    pub fn on_failure(&mut self) {
        match self.state {
            BreakerState::Closed => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures >= self.config.failure_threshold {
                    self.transition_to_open();
                }
            }
            BreakerState::HalfOpen => {
                self.probe_in_flight = false;
                self.current_cooldown =
                    (self.current_cooldown * 2).min(self.config.cooldown_cap);
                self.transition_to_open();
            }
            BreakerState::Open => {}
        }
    }

    /// Release an in-flight probe after a terminal failure.
    ///
    /// Auth and content-policy rejections are not health signals; the probe
    /// slot frees up without moving the state machine.
    pub fn release_probe(&mut self) {
        self.probe_in_flight = false;
    }

    fn transition_to_open(&mut self) {
        self.state = BreakerState::Open;
        self.opened_at = Some(Instant::now());
        self.consecutive_successes = 0;
        self.probe_in_flight = false;
    }

    fn transition_to_half_open(&mut self) {
        self.state = BreakerState::HalfOpen;
        self.consecutive_successes = 0;
        self.probe_in_flight = false;
    }

    fn transition_to_closed(&mut self) {
        self.state = BreakerState::Closed;
        self.opened_at = None;
        self.consecutive_failures = 0;
        self.consecutive_successes = 0;
        self.current_cooldown = self.config.cooldown;
        self.probe_in_flight = false;
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> BreakerConfig {
        BreakerConfig::new(3, Duration::from_millis(50))
            .with_cooldown_cap(Duration::from_millis(400))
    }

    #[test]
    fn starts_closed() {
        let breaker = CircuitBreaker::new();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn opens_after_threshold_consecutive_failures() {
        let mut breaker = CircuitBreaker::with_config(fast_config());

        breaker.on_failure();
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Closed);

        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Open);
    }

    #[test]
    fn success_resets_the_failure_streak() {
        let mut breaker = CircuitBreaker::with_config(fast_config());

        breaker.on_failure();
        breaker.on_failure();
        breaker.on_success();
        breaker.on_failure();
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn rejects_before_cooldown_elapses() {
        let mut breaker = CircuitBreaker::with_config(fast_config());
        for _ in 0..3 {
            breaker.on_failure();
        }

        match breaker.try_acquire() {
            BreakerDecision::Reject { retry_in } => {
                assert!(retry_in <= Duration::from_millis(50));
            }
            BreakerDecision::Allow => panic!("open breaker allowed a request"),
        }
    }

    #[test]
    fn admits_exactly_one_probe_after_cooldown() {
        let mut breaker = CircuitBreaker::with_config(fast_config());
        for _ in 0..3 {
            breaker.on_failure();
        }

        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        assert_eq!(breaker.state(), BreakerState::HalfOpen);
        assert!(matches!(
            breaker.try_acquire(),
            BreakerDecision::Reject { .. }
        ));
    }

    #[test]
    fn closes_after_enough_probe_successes() {
        let mut breaker = CircuitBreaker::with_config(fast_config());
        for _ in 0..3 {
            breaker.on_failure();
        }
        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_success();
        assert_eq!(breaker.state(), BreakerState::HalfOpen);

        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_success();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn probe_failure_doubles_the_cooldown() {
        let mut breaker = CircuitBreaker::with_config(fast_config());
        for _ in 0..3 {
            breaker.on_failure();
        }
        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        // Old cool-down has passed, doubled one has not.
        std::thread::sleep(Duration::from_millis(60));
        assert!(matches!(
            breaker.try_acquire(),
            BreakerDecision::Reject { .. }
        ));

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
    }

    #[test]
    fn cooldown_doubling_respects_the_cap() {
        let config = BreakerConfig::new(1, Duration::from_millis(300))
            .with_cooldown_cap(Duration::from_millis(400));
        let mut breaker = CircuitBreaker::with_config(config);

        breaker.on_failure();
        std::thread::sleep(Duration::from_millis(310));
        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_failure();

        match breaker.try_acquire() {
            BreakerDecision::Reject { retry_in } => {
                assert!(retry_in <= Duration::from_millis(400));
            }
            BreakerDecision::Allow => panic!("reopened breaker allowed a request"),
        }
    }

    #[test]
    fn terminal_failures_do_not_trip_the_breaker() {
        let mut breaker = CircuitBreaker::with_config(fast_config());
        for _ in 0..10 {
            breaker.release_probe();
        }
        assert_eq!(breaker.state(), BreakerState::Closed);
        assert_eq!(breaker.failure_count(), 0);
    }

    #[test]
    fn recovery_resets_the_cooldown() {
        let mut breaker = CircuitBreaker::with_config(fast_config());
        for _ in 0..3 {
            breaker.on_failure();
        }
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_failure(); // cooldown now 100ms

        std::thread::sleep(Duration::from_millis(110));
        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_success();
        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
        breaker.on_success();
        assert_eq!(breaker.state(), BreakerState::Closed);

        // Tripping again starts from the base cool-down.
        for _ in 0..3 {
            breaker.on_failure();
        }
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(breaker.try_acquire(), BreakerDecision::Allow);
    }
}
