//! Agents: kinematic and health state
//!
//! Motion is a damped, speed-capped Euler step with reflective walls.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{Bounds, limit};

/// Health state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HealthState {
    #[default]
    Uninfected,
    Infected,
    Recovered,
    Deceased,
}

impl HealthState {
    pub const ALL: [HealthState; 4] = [
        HealthState::Uninfected,
        HealthState::Infected,
        HealthState::Recovered,
        HealthState::Deceased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Uninfected => "uninfected",
            HealthState::Infected => "infected",
            HealthState::Recovered => "recovered",
            HealthState::Deceased => "deceased",
        }
    }

    /// Recovered and Deceased never change again
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, HealthState::Recovered | HealthState::Deceased)
    }
}

/// Motion parameters shared by every agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Acceleration multiplier applied before it is added to velocity
    pub damping: f64,
    /// Per-axis speed cap
    pub max_speed: f64,
}

/// A simulated individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub pos: DVec2,
    pub vel: DVec2,
    pub acc: DVec2,
    pub health: HealthState,
    /// Ticks spent Infected (frozen once terminal)
    pub sick_cycles: u32,
    /// Tick the current infection is attributed to
    pub onset_tick: u64,
}

impl Agent {
    pub fn new(pos: DVec2, acc: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            acc,
            health: HealthState::Uninfected,
            sick_cycles: 0,
            onset_tick: 0,
        }
    }

    #[inline]
    pub fn is(&self, state: HealthState) -> bool {
        self.health == state
    }

    /// Advance one tick and leave acceleration zeroed for the next one
    pub fn integrate(&mut self, motion: &Motion, bounds: Bounds) {
        self.acc *= motion.damping;
        self.vel += self.acc;
        self.vel.x = limit(self.vel.x, motion.max_speed);
        self.vel.y = limit(self.vel.y, motion.max_speed);
        self.pos += self.vel;

        self.reflect(bounds);
        self.acc = DVec2::ZERO;
    }

    /// Clamp into the area, bouncing the offending axis
    pub fn reflect(&mut self, bounds: Bounds) {
        if self.pos.x < 0.0 || self.pos.x > bounds.width {
            self.pos.x = self.pos.x.clamp(0.0, bounds.width.max(0.0));
            self.vel.x = -self.vel.x;
            self.acc.x = -self.acc.x;
        }
        if self.pos.y < 0.0 || self.pos.y > bounds.height {
            self.pos.y = self.pos.y.clamp(0.0, bounds.height.max(0.0));
            self.vel.y = -self.vel.y;
            self.acc.y = -self.acc.y;
        }
    }
}
