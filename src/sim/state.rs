//! Simulation context: everything one run owns
//!
//! Population, counters, history and the RNG live together so a reset can
//! swap them out in one step between ticks.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::agent::{Agent, HealthState};
use super::stats::{AggregateStats, History};
use crate::Bounds;
use crate::config::{Controls, SimConfig};
use crate::error::InvariantError;

/// Uniform sample in `[min, max)`
#[inline]
pub fn random_between(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    rng.random::<f64>() * (max - min) + min
}

/// Build a fresh population: uninfected, at rest, with a small random push
pub fn spawn_population(config: &SimConfig, bounds: Bounds, rng: &mut Pcg32) -> Vec<Agent> {
    let a = config.initial_acceleration;
    (0..config.population)
        .map(|_| {
            let pos = DVec2::new(
                random_between(rng, 0.0, bounds.width),
                random_between(rng, 0.0, bounds.height),
            );
            let acc = DVec2::new(random_between(rng, -a, a), random_between(rng, -a, a));
            Agent::new(pos, acc)
        })
        .collect()
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct SimulationContext {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Fixed-size population, stable order
    pub agents: Vec<Agent>,
    pub stats: AggregateStats,
    pub history: History,
    /// Survive resets
    pub controls: Controls,
    /// Completed simulation ticks since the last reset
    pub time_ticks: u64,
    /// Number of resets performed
    pub generation: u32,
}

impl SimulationContext {
    pub fn new(config: &SimConfig, bounds: Bounds, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let agents = spawn_population(config, bounds, &mut rng);
        Self {
            seed,
            rng,
            agents,
            stats: AggregateStats::new(config.population),
            history: History::new(config.history_capacity),
            controls: Controls::default(),
            time_ticks: 0,
            generation: 0,
        }
    }

    /// Replace population, statistics and history. Controls and RNG carry over.
    pub fn reset(&mut self, config: &SimConfig, bounds: Bounds) {
        self.agents = spawn_population(config, bounds, &mut self.rng);
        self.stats = AggregateStats::new(config.population);
        self.history = History::new(config.history_capacity);
        self.time_ticks = 0;
        self.generation += 1;
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// Mark an uninfected agent infected as of `onset`. Returns false otherwise.
    pub fn infect(&mut self, index: usize, onset: u64) -> bool {
        let Some(agent) = self.agents.get_mut(index) else {
            return false;
        };
        if agent.health != HealthState::Uninfected {
            return false;
        }
        agent.health = HealthState::Infected;
        agent.sick_cycles = 0;
        agent.onset_tick = onset;
        self.stats
            .record_transition(HealthState::Uninfected, HealthState::Infected);
        true
    }

    /// Count agents per state by scanning (for checks only)
    pub fn rescan(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for agent in &self.agents {
            let slot = HealthState::ALL
                .iter()
                .position(|s| *s == agent.health)
                .unwrap_or(0);
            counts[slot] += 1;
        }
        counts
    }

    /// Verify population size, counter conservation and containment
    pub fn check_invariants(&self, expected: usize, bounds: Bounds) -> Result<(), InvariantError> {
        if self.agents.len() != expected {
            return Err(InvariantError::PopulationDrift {
                expected,
                actual: self.agents.len(),
            });
        }

        let total = self.stats.total();
        if total != expected {
            return Err(InvariantError::CounterMismatch {
                expected,
                actual: total,
            });
        }

        let tally = self.rescan();
        for (state, counted) in HealthState::ALL.iter().zip(tally) {
            let tracked = self.stats.count(*state);
            if tracked != counted {
                return Err(InvariantError::CounterDrift {
                    state: state.as_str(),
                    counted,
                    tracked,
                });
            }
        }

        if let Some((index, agent)) = self
            .agents
            .iter()
            .enumerate()
            .find(|(_, a)| !bounds.contains(a.pos))
        {
            return Err(InvariantError::OutOfBounds {
                index,
                x: agent.pos.x,
                y: agent.pos.y,
            });
        }

        Ok(())
    }
}
