//! Error types
//!
//! Configuration problems are rejected up front; invariant errors only surface
//! from explicit checks (tests, debug assertions).

use std::fmt;

/// A configuration value the engine refuses to run with.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Population must hold at least one agent.
    EmptyPopulation,
    /// A distance was negative or not finite.
    InvalidDistance { field: &'static str, value: f64 },
    /// A percentage was outside `[0, 100]` or not finite.
    InvalidRate { field: &'static str, value: f64 },
    /// Recovery bracket lies below the mortality bracket, so recovery can never fire.
    RecoveryBelowMortality { recovery: f64, mortality: f64 },
    /// Damping must lie in `[0, 1]`.
    InvalidDamping(f64),
    /// Speed cap must be positive.
    InvalidSpeed(f64),
    /// History buffers need room for at least one sample.
    EmptyHistory,
    /// Sample interval must be positive.
    InvalidSampleInterval(f64),
    /// Config text could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPopulation => write!(f, "population must be at least 1"),
            ConfigError::InvalidDistance { field, value } => {
                write!(f, "{} must be a finite, non-negative distance (got {})", field, value)
            }
            ConfigError::InvalidRate { field, value } => {
                write!(f, "{} must be a percentage in [0, 100] (got {})", field, value)
            }
            ConfigError::RecoveryBelowMortality { recovery, mortality } => write!(
                f,
                "recovery_rate ({}) is below mortality_rate ({}); recovery would be unreachable",
                recovery, mortality
            ),
            ConfigError::InvalidDamping(v) => write!(f, "damping must be in [0, 1] (got {})", v),
            ConfigError::InvalidSpeed(v) => write!(f, "max_speed must be positive (got {})", v),
            ConfigError::EmptyHistory => write!(f, "history_capacity must be at least 1"),
            ConfigError::InvalidSampleInterval(v) => {
                write!(f, "sample_interval_ms must be positive (got {})", v)
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// A broken simulation invariant. Always a bug, never user error.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantError {
    /// Population size drifted from the configured `N`.
    PopulationDrift { expected: usize, actual: usize },
    /// Absolute counters no longer sum to `N`.
    CounterMismatch { expected: usize, actual: usize },
    /// Counters disagree with a rescan of the population.
    CounterDrift { state: &'static str, counted: usize, tracked: usize },
    /// An agent sits outside the simulation area.
    OutOfBounds { index: usize, x: f64, y: f64 },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::PopulationDrift { expected, actual } => {
                write!(f, "population size is {} but should be {}", actual, expected)
            }
            InvariantError::CounterMismatch { expected, actual } => {
                write!(f, "health counters sum to {} but population is {}", actual, expected)
            }
            InvariantError::CounterDrift { state, counted, tracked } => write!(
                f,
                "{} counter is {} but {} agents are {}",
                state, tracked, counted, state
            ),
            InvariantError::OutOfBounds { index, x, y } => {
                write!(f, "agent {} escaped the simulation area at ({}, {})", index, x, y)
            }
        }
    }
}

impl std::error::Error for InvariantError {}
