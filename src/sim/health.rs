//! Health transitions for infected agents
//!
//! Each tick is an independent trial: one uniform draw in `[0, 100)` decides
//! death (`<= mortality`), recovery (`<= recovery`), or neither, after which
//! the chronic cutoff applies.

use rand::Rng;

use super::agent::HealthState;
use super::state::SimulationContext;

/// Illness parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illness {
    /// Percent
    pub mortality_rate: f64,
    /// Percent; the bracket above `mortality_rate`
    pub recovery_rate: f64,
    pub max_sick_cycles: u32,
}

/// What happened to one agent on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Died,
    Recovered,
    /// Exceeded the chronic cutoff
    Expired,
    StillSick,
}

impl Outcome {
    pub fn next_state(&self) -> HealthState {
        match self {
            Outcome::Died | Outcome::Expired => HealthState::Deceased,
            Outcome::Recovered => HealthState::Recovered,
            Outcome::StillSick => HealthState::Infected,
        }
    }
}

/// Decide one tick's outcome for an agent that has been sick `sick_cycles` ticks
pub fn roll(rng: &mut impl Rng, illness: &Illness, sick_cycles: u32) -> Outcome {
    let chance = rng.random::<f64>() * 100.0;
    if chance <= illness.mortality_rate {
        Outcome::Died
    } else if chance <= illness.recovery_rate {
        Outcome::Recovered
    } else if sick_cycles > illness.max_sick_cycles {
        Outcome::Expired
    } else {
        Outcome::StillSick
    }
}

/// Counts of transitions made by one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionSummary {
    pub died: usize,
    pub recovered: usize,
    pub expired: usize,
}

/// Advance every infected agent whose infection began before tick `now`
pub fn transition_pass(ctx: &mut SimulationContext, illness: &Illness, now: u64) -> TransitionSummary {
    let mut summary = TransitionSummary::default();

    for agent in ctx.agents.iter_mut() {
        if agent.health != HealthState::Infected || agent.onset_tick >= now {
            continue;
        }

        agent.sick_cycles = agent.sick_cycles.saturating_add(1);
        let outcome = roll(&mut ctx.rng, illness, agent.sick_cycles);
        match outcome {
            Outcome::Died => summary.died += 1,
            Outcome::Recovered => summary.recovered += 1,
            Outcome::Expired => summary.expired += 1,
            Outcome::StillSick => continue,
        }

        let next = outcome.next_state();
        agent.health = next;
        ctx.stats.record_transition(HealthState::Infected, next);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;
    use crate::config::SimConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn context(n: usize) -> SimulationContext {
        let config = SimConfig {
            population: n,
            ..Default::default()
        };
        SimulationContext::new(&config, Bounds::new(500.0, 500.0), 11)
    }

    #[test]
    fn test_certain_death() {
        let illness = Illness {
            mortality_rate: 100.0,
            recovery_rate: 100.0,
            max_sick_cycles: 2000,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(roll(&mut rng, &illness, 1), Outcome::Died);
        }
    }

    #[test]
    fn test_certain_recovery_when_not_dead() {
        let illness = Illness {
            mortality_rate: 0.0,
            recovery_rate: 100.0,
            max_sick_cycles: 2000,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            let outcome = roll(&mut rng, &illness, 1);
            assert!(outcome == Outcome::Recovered || outcome == Outcome::Died);
        }
    }

    #[test]
    fn test_chronic_cutoff() {
        let illness = Illness {
            mortality_rate: 0.0,
            recovery_rate: 0.0,
            max_sick_cycles: 10,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(roll(&mut rng, &illness, 10), Outcome::StillSick);
        assert_eq!(roll(&mut rng, &illness, 11), Outcome::Expired);
    }

    #[test]
    fn test_onset_tick_is_skipped() {
        let mut ctx = context(2);
        ctx.infect(0, 5);
        let illness = Illness {
            mortality_rate: 100.0,
            recovery_rate: 100.0,
            max_sick_cycles: 0,
        };

        transition_pass(&mut ctx, &illness, 5);
        assert!(ctx.agents[0].is(HealthState::Infected));
        assert_eq!(ctx.agents[0].sick_cycles, 0);

        let summary = transition_pass(&mut ctx, &illness, 6);
        assert_eq!(summary.died, 1);
        assert!(ctx.agents[0].is(HealthState::Deceased));
        assert_eq!(ctx.agents[0].sick_cycles, 1);
        assert_eq!(ctx.stats.deceased, 1);
        assert_eq!(ctx.stats.infected, 0);
    }

    #[test]
    fn test_terminal_agents_are_frozen() {
        let mut ctx = context(2);
        ctx.infect(0, 0);
        ctx.infect(1, 0);
        let kill = Illness {
            mortality_rate: 100.0,
            recovery_rate: 100.0,
            max_sick_cycles: 0,
        };
        transition_pass(&mut ctx, &kill, 1);
        let frozen: Vec<_> = ctx.agents.iter().map(|a| (a.health, a.sick_cycles)).collect();

        for now in 2..20 {
            transition_pass(&mut ctx, &kill, now);
        }
        let after: Vec<_> = ctx.agents.iter().map(|a| (a.health, a.sick_cycles)).collect();
        assert_eq!(frozen, after);
        assert_eq!(ctx.stats.total(), 2);
    }

    #[test]
    fn test_uninfected_agents_untouched() {
        let mut ctx = context(3);
        let illness = Illness {
            mortality_rate: 100.0,
            recovery_rate: 100.0,
            max_sick_cycles: 0,
        };
        assert_eq!(transition_pass(&mut ctx, &illness, 1), TransitionSummary::default());
        assert_eq!(ctx.stats.uninfected, 3);
    }

    #[test]
    fn test_sick_cycles_saturate_without_cutoff() {
        let mut ctx = context(1);
        ctx.infect(0, 0);
        ctx.agents[0].sick_cycles = u32::MAX - 1;
        let endless = Illness {
            mortality_rate: 0.0,
            recovery_rate: 0.0,
            max_sick_cycles: u32::MAX,
        };

        for now in 1..4 {
            transition_pass(&mut ctx, &endless, now);
        }
        assert_eq!(ctx.agents[0].sick_cycles, u32::MAX);
        assert_eq!(ctx.stats.infected, 1);
    }
}
