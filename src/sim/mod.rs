//! Simulation module
//!
//! All epidemic logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Stable iteration order (population order)
//! - No rendering or platform dependencies

pub mod agent;
pub mod contact;
pub mod health;
pub mod state;
pub mod stats;
pub mod tick;

pub use agent::{Agent, HealthState, Motion};
pub use contact::{Contagion, Repulsion, distancing_pass, first_within, infect_nearest, infection_pass};
pub use health::{Illness, Outcome, TransitionSummary, transition_pass};
pub use state::{SimulationContext, spawn_population};
pub use stats::{AggregateStats, History, HistoryBuffer, Percentages};
pub use tick::{TickInput, TickReport, tick};
