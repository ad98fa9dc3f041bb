//! Contagion - An interactive 2D epidemic simulation
//!
//! Core modules:
//! - `sim`: Simulation (agents, contact scans, health transitions, statistics)
//! - `engine`: Tick driver owning the simulation context and history sampler
//! - `renderer`: Surface abstraction, agent/overlay drawing, vertex batching
//! - `config`: Tunables, presets and control commands

pub mod config;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{Command, Controls, SimConfig, Variant};
pub use engine::{Engine, SampleClock};
pub use error::{ConfigError, InvariantError};

use glam::DVec2;

/// Simulation defaults
pub mod consts {
    /// Population size
    pub const POPULATION: usize = 1500;

    /// Contact distance for transmission (surface units)
    pub const INFECTION_RADIUS: f64 = 25.0;
    /// Distance under which social distancing pushes agents apart
    pub const MINIMAL_DISTANCE: f64 = 35.0;
    /// Scale of the distancing push per neighbour
    pub const REPULSION_FACTOR: f64 = 0.02;

    /// Death chance per infected tick (percent)
    pub const MORTALITY_RATE: f64 = 0.5;
    /// Recovery threshold per infected tick (percent, includes mortality bracket)
    pub const RECOVERY_RATE_CLASSIC: f64 = 1.0;
    pub const RECOVERY_RATE_OUTBREAK: f64 = 5.0;
    /// Chronic-case cutoff (ticks)
    pub const MAX_SICK_CYCLES_CLASSIC: u32 = 2000;
    pub const MAX_SICK_CYCLES_OUTBREAK: u32 = 3000;
    /// Transmission chance per contact (percent)
    pub const CHANCE_OF_INFECTION_CLASSIC: f64 = 100.0;
    pub const CHANCE_OF_INFECTION_OUTBREAK: f64 = 25.0;

    /// Acceleration damping applied before each velocity update
    pub const DAMPING: f64 = 0.75;
    /// Per-axis speed cap (units per tick)
    pub const MAX_SPEED: f64 = 0.125;
    /// Spawn acceleration range is [-x, x] per axis
    pub const INITIAL_ACCELERATION: f64 = 0.25;

    /// Click pick radius for manual infection
    pub const CLICK_THRESHOLD: f64 = 10.0;
    /// Drawn agent radius
    pub const AGENT_RADIUS: f64 = 1.0;

    /// Samples kept per history series
    pub const HISTORY_CAPACITY: usize = 480;
    /// Wall-clock interval between history samples (ms)
    pub const SAMPLE_INTERVAL_MS: f64 = 500.0;

    /// Overlay panel geometry
    pub const OVERLAY_WIDTH: f64 = 500.0;
    pub const OVERLAY_HEIGHT: f64 = 200.0;
    pub const OVERLAY_GAP: f64 = 10.0;
}

/// Simulation area, `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Bounds matching a surface of integer pixel size
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Clamp `value` to `[-threshold, threshold]`
#[inline]
pub fn limit(value: f64, threshold: f64) -> f64 {
    let threshold = threshold.abs();
    value.clamp(-threshold, threshold)
}
