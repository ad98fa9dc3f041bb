//! One simulation tick
//!
//! Order: clicks, repulsion, infection, health transitions, statistics,
//! integration. The scans read last tick's positions; transitions and
//! statistics see this tick's new infections.

use glam::DVec2;

use super::agent::Motion;
use super::contact::{Contagion, Repulsion, distancing_pass, infect_nearest, infection_pass};
use super::health::{Illness, TransitionSummary, transition_pass};
use super::state::SimulationContext;
use crate::Bounds;
use crate::config::SimConfig;

/// External input for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Current surface size
    pub bounds: Bounds,
    /// Click positions since the previous tick (surface space)
    pub clicks: Vec<DVec2>,
}

impl TickInput {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            clicks: Vec::new(),
        }
    }
}

/// What one tick changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub clicked: usize,
    pub infected: usize,
    pub transitions: TransitionSummary,
}

/// Advance the simulation by one tick
pub fn tick(ctx: &mut SimulationContext, config: &SimConfig, input: &TickInput) -> TickReport {
    ctx.time_ticks += 1;
    let now = ctx.time_ticks;
    let mut report = TickReport::default();

    for &click in &input.clicks {
        if infect_nearest(ctx, click, config.click_threshold, now).is_some() {
            report.clicked += 1;
        }
    }

    if ctx.controls.social_distancing {
        let repulsion = Repulsion {
            minimal_distance: config.minimal_distance,
            factor: config.repulsion_factor,
        };
        distancing_pass(ctx, &repulsion);
    }

    let contagion = Contagion {
        radius: config.infection_radius,
        chance: config.chance_of_infection,
    };
    report.infected = infection_pass(ctx, &contagion, now);

    let illness = Illness {
        mortality_rate: config.mortality_rate,
        recovery_rate: config.recovery_rate,
        max_sick_cycles: config.max_sick_cycles,
    };
    report.transitions = transition_pass(ctx, &illness, now);

    ctx.stats.gather();
    debug_assert_eq!(ctx.agents.len(), config.population, "population drifted");
    debug_assert_eq!(ctx.stats.total(), config.population, "counters drifted");

    let motion = Motion {
        damping: config.damping,
        max_speed: config.max_speed,
    };
    for agent in ctx.agents.iter_mut() {
        agent.integrate(&motion, input.bounds);
        debug_assert!(input.bounds.contains(agent.pos), "agent escaped bounds");
    }

    report
}
