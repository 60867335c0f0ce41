//! Simulation configuration: the validated record a CLI or library caller
//! hands to `Simulation::new`. Validation happens once, at construction, so
//! the simulation core itself never has to handle an invalid input.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MAX_TIME: f64 = 200.0;
pub const DEFAULT_TEST_PERIOD: f64 = 10.0;
pub const DEFAULT_SEED: u64 = 0xABCD_0000_0000_0000;

/// Configuration for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated processes (`N`). Must be at least 2.
    pub process_count: usize,
    /// Probability, in `[0.0, 1.0]`, that a test of a live process is
    /// misreported as `FALSE_NEGATIVE`.
    pub false_negative_probability: f64,
    /// Virtual-clock deadline at which the simulation stops.
    pub max_time: f64,
    /// Delay between a process's consecutive test rounds.
    pub test_period: f64,
    /// Seed for the deterministic RNG, needed to make a run reproducible:
    /// two `Simulation`s built from configs that differ only in `seed` are
    /// not expected to agree.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            process_count: 4,
            false_negative_probability: 0.0,
            max_time: DEFAULT_MAX_TIME,
            test_period: DEFAULT_TEST_PERIOD,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    pub fn new(process_count: usize, false_negative_probability: f64) -> Self {
        SimulationConfig {
            process_count,
            false_negative_probability,
            ..Default::default()
        }
    }

    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn with_test_period(mut self, test_period: f64) -> Self {
        self.test_period = test_period;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration, returning the first violated
    /// constraint. Called before any simulation state is allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_count < 2 {
            return Err(ConfigError::InvalidProcessCount(self.process_count));
        }
        if !(0.0..=1.0).contains(&self.false_negative_probability) {
            return Err(ConfigError::InvalidProbability(
                self.false_negative_probability,
            ));
        }
        if !(self.max_time > 0.0) {
            return Err(ConfigError::InvalidMaxTime(self.max_time));
        }
        if !(self.test_period > 0.0) {
            return Err(ConfigError::InvalidTestPeriod(self.test_period));
        }
        Ok(())
    }
}

/// Configuration errors, surfaced at the boundary before any simulation
/// state is allocated. The process exits non-zero on any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidProcessCount(usize),
    InvalidProbability(f64),
    InvalidMaxTime(f64),
    InvalidTestPeriod(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidProcessCount(n) => {
                write!(f, "process_count must be >= 2, got {n}")
            }
            ConfigError::InvalidProbability(p) => {
                write!(f, "false_negative_probability must be in [0, 1], got {p}")
            }
            ConfigError::InvalidMaxTime(t) => write!(f, "max_time must be > 0, got {t}"),
            ConfigError::InvalidTestPeriod(t) => write!(f, "test_period must be > 0, got {t}"),
        }
    }
}

impl std::error::Error for ConfigError {}
