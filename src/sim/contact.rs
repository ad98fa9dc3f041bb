//! Pairwise proximity scans
//!
//! Every scan is a plain O(N²) sweep over the population. Positions are never
//! modified here, so every pass reads the positions left by the previous
//! tick's integration.

use glam::DVec2;
use rand::Rng;

use super::agent::HealthState;
use super::state::SimulationContext;

/// Contact parameters for the infection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contagion {
    pub radius: f64,
    /// Percent chance a qualifying contact transmits
    pub chance: f64,
}

/// Parameters for the social distancing pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    pub minimal_distance: f64,
    pub factor: f64,
}

/// Spread infection between agents in contact
///
/// Only agents infected when the pass starts transmit, and each unordered pair
/// is visited once, so the result does not depend on which of the two agents
/// comes first. Returns the number of new infections.
pub fn infection_pass(ctx: &mut SimulationContext, contagion: &Contagion, onset: u64) -> usize {
    let spreaders: Vec<bool> = ctx
        .agents
        .iter()
        .map(|a| a.is(HealthState::Infected))
        .collect();

    let mut new_cases = Vec::new();
    let mut caught = vec![false; ctx.agents.len()];
    let n = ctx.agents.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let target = match (spreaders[i], spreaders[j]) {
                (true, false) => j,
                (false, true) => i,
                _ => continue,
            };
            if caught[target] || !ctx.agents[target].is(HealthState::Uninfected) {
                continue;
            }
            if ctx.agents[i].pos.distance(ctx.agents[j].pos) > contagion.radius {
                continue;
            }
            if transmits(&mut ctx.rng, contagion.chance) {
                caught[target] = true;
                new_cases.push(target);
            }
        }
    }

    for &index in &new_cases {
        ctx.infect(index, onset);
    }
    new_cases.len()
}

/// Bernoulli draw against a percentage; 100 always passes without drawing
#[inline]
fn transmits(rng: &mut impl Rng, chance: f64) -> bool {
    if chance >= 100.0 {
        return true;
    }
    if chance <= 0.0 {
        return false;
    }
    rng.random::<f64>() * 100.0 < chance
}

/// Push living agents apart when they get too close
///
/// For each ordered pair `(i, j)` within range, only `i` is pushed, by
/// `factor * (pos[i] - pos[j])`. The reverse pair pushes `j`.
pub fn distancing_pass(ctx: &mut SimulationContext, repulsion: &Repulsion) {
    let n = ctx.agents.len();
    let mut pushes = vec![DVec2::ZERO; n];

    for i in 0..n {
        let a = &ctx.agents[i];
        if a.is(HealthState::Deceased) {
            continue;
        }
        for j in 0..n {
            if i == j {
                continue;
            }
            let b = &ctx.agents[j];
            if b.is(HealthState::Deceased) {
                continue;
            }
            if a.pos.distance(b.pos) <= repulsion.minimal_distance {
                pushes[i] += repulsion.factor * (a.pos - b.pos);
            }
        }
    }

    for (agent, push) in ctx.agents.iter_mut().zip(pushes) {
        agent.acc += push;
    }
}

/// Index of the first agent (population order) within `threshold` of `pos`
pub fn first_within(ctx: &SimulationContext, pos: DVec2, threshold: f64) -> Option<usize> {
    ctx.agents
        .iter()
        .position(|a| a.pos.distance(pos) <= threshold)
}

/// Click-to-infect: the first agent in range is infected if it is uninfected
///
/// Returns the index that was picked, whether or not its state changed.
pub fn infect_nearest(
    ctx: &mut SimulationContext,
    pos: DVec2,
    threshold: f64,
    onset: u64,
) -> Option<usize> {
    let index = first_within(ctx, pos, threshold)?;
    if !ctx.infect(index, onset) {
        log::debug!(
            "Agent {} picked at ({:.1}, {:.1}) is already {}",
            index,
            pos.x,
            pos.y,
            ctx.agents[index].health.as_str()
        );
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;
    use crate::config::SimConfig;

    const CERTAIN: Contagion = Contagion {
        radius: 25.0,
        chance: 100.0,
    };

    fn context(positions: &[(f64, f64)]) -> SimulationContext {
        let config = SimConfig {
            population: positions.len(),
            ..Default::default()
        };
        let mut ctx = SimulationContext::new(&config, Bounds::new(1000.0, 1000.0), 3);
        for (agent, &(x, y)) in ctx.agents.iter_mut().zip(positions) {
            agent.pos = DVec2::new(x, y);
            agent.acc = DVec2::ZERO;
        }
        ctx
    }

    #[test]
    fn test_infection_symmetric_in_pair_order() {
        // Infected agent first
        let mut ctx = context(&[(100.0, 100.0), (110.0, 100.0)]);
        ctx.infect(0, 0);
        assert_eq!(infection_pass(&mut ctx, &CERTAIN, 1), 1);
        assert!(ctx.agents[1].is(HealthState::Infected));

        // Infected agent second
        let mut ctx = context(&[(100.0, 100.0), (110.0, 100.0)]);
        ctx.infect(1, 0);
        assert_eq!(infection_pass(&mut ctx, &CERTAIN, 1), 1);
        assert!(ctx.agents[0].is(HealthState::Infected));
    }

    #[test]
    fn test_infection_respects_radius() {
        let mut ctx = context(&[(100.0, 100.0), (125.0, 100.0), (126.0, 100.0)]);
        ctx.infect(0, 0);
        infection_pass(&mut ctx, &CERTAIN, 1);
        assert!(ctx.agents[1].is(HealthState::Infected)); // exactly on radius
        assert!(ctx.agents[2].is(HealthState::Uninfected));
    }

    #[test]
    fn test_new_cases_do_not_transmit_in_same_pass() {
        // 0 -> 1 in range, 1 -> 2 in range, 0 -> 2 out of range
        let mut ctx = context(&[(100.0, 100.0), (120.0, 100.0), (140.0, 100.0)]);
        ctx.infect(0, 0);
        infection_pass(&mut ctx, &CERTAIN, 1);
        assert!(ctx.agents[1].is(HealthState::Infected));
        assert!(ctx.agents[2].is(HealthState::Uninfected));

        infection_pass(&mut ctx, &CERTAIN, 2);
        assert!(ctx.agents[2].is(HealthState::Infected));
        assert_eq!(ctx.agents[1].onset_tick, 1);
        assert_eq!(ctx.agents[2].onset_tick, 2);
    }

    #[test]
    fn test_terminal_agents_neither_catch_nor_spread() {
        let mut ctx = context(&[(100.0, 100.0), (105.0, 100.0), (110.0, 100.0)]);
        ctx.infect(0, 0);
        ctx.agents[1].health = HealthState::Recovered;
        ctx.stats
            .record_transition(HealthState::Uninfected, HealthState::Recovered);
        infection_pass(&mut ctx, &CERTAIN, 1);
        assert!(ctx.agents[1].is(HealthState::Recovered));
        assert!(ctx.agents[2].is(HealthState::Infected));
        assert_eq!(ctx.stats.total(), 3);
    }

    #[test]
    fn test_zero_chance_never_transmits() {
        let mut ctx = context(&[(100.0, 100.0), (101.0, 100.0)]);
        ctx.infect(0, 0);
        let never = Contagion {
            radius: 25.0,
            chance: 0.0,
        };
        assert_eq!(infection_pass(&mut ctx, &never, 1), 0);
    }

    #[test]
    fn test_partial_chance_is_deterministic_per_seed() {
        let positions: Vec<(f64, f64)> = (0..40).map(|i| (100.0 + i as f64, 100.0)).collect();
        let run = || {
            let mut ctx = context(&positions);
            ctx.infect(0, 0);
            let quarter = Contagion {
                radius: 1000.0,
                chance: 25.0,
            };
            infection_pass(&mut ctx, &quarter, 1);
            ctx.agents.iter().map(|a| a.health).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_distancing_pushes_both_apart() {
        let mut ctx = context(&[(100.0, 100.0), (110.0, 100.0)]);
        let repulsion = Repulsion {
            minimal_distance: 35.0,
            factor: 0.02,
        };
        distancing_pass(&mut ctx, &repulsion);
        assert!((ctx.agents[0].acc.x + 0.2).abs() < 1e-12);
        assert!((ctx.agents[1].acc.x - 0.2).abs() < 1e-12);
        assert_eq!(ctx.agents[0].acc.y, 0.0);
    }

    #[test]
    fn test_distancing_ignores_deceased() {
        let mut ctx = context(&[(100.0, 100.0), (110.0, 100.0)]);
        ctx.agents[1].health = HealthState::Deceased;
        let repulsion = Repulsion {
            minimal_distance: 35.0,
            factor: 0.02,
        };
        distancing_pass(&mut ctx, &repulsion);
        assert_eq!(ctx.agents[0].acc, DVec2::ZERO);
        assert_eq!(ctx.agents[1].acc, DVec2::ZERO);
    }

    #[test]
    fn test_distancing_out_of_range() {
        let mut ctx = context(&[(100.0, 100.0), (136.0, 100.0)]);
        let repulsion = Repulsion {
            minimal_distance: 35.0,
            factor: 0.02,
        };
        distancing_pass(&mut ctx, &repulsion);
        assert_eq!(ctx.agents[0].acc, DVec2::ZERO);
    }

    #[test]
    fn test_infect_nearest_takes_first_in_order() {
        // Agent 1 is closer to the click but agent 0 comes first
        let mut ctx = context(&[(108.0, 100.0), (101.0, 100.0)]);
        let picked = infect_nearest(&mut ctx, DVec2::new(100.0, 100.0), 10.0, 1);
        assert_eq!(picked, Some(0));
        assert!(ctx.agents[0].is(HealthState::Infected));
        assert!(ctx.agents[1].is(HealthState::Uninfected));
    }

    #[test]
    fn test_infect_nearest_miss_is_noop() {
        let mut ctx = context(&[(100.0, 100.0)]);
        assert_eq!(
            infect_nearest(&mut ctx, DVec2::new(500.0, 500.0), 10.0, 1),
            None
        );
        assert_eq!(ctx.stats.infected, 0);
    }

    #[test]
    fn test_infect_nearest_leaves_terminal_agent() {
        let mut ctx = context(&[(100.0, 100.0)]);
        ctx.agents[0].health = HealthState::Deceased;
        ctx.stats
            .record_transition(HealthState::Uninfected, HealthState::Deceased);
        assert_eq!(
            infect_nearest(&mut ctx, DVec2::new(100.0, 100.0), 10.0, 1),
            Some(0)
        );
        assert!(ctx.agents[0].is(HealthState::Deceased));
        assert_eq!(ctx.stats.deceased, 1);
    }
}
