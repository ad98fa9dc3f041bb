//! Aggregate health statistics and the sampled history behind the overlay graph
//!
//! Counters are incremental: they move exactly when an agent changes state and
//! are never rebuilt by rescanning the population.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::agent::HealthState;

/// Share of the population in each state (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Percentages {
    pub uninfected: f64,
    pub infected: f64,
    pub recovered: f64,
    pub deceased: f64,
}

/// Running per-state counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub population: usize,
    pub uninfected: usize,
    pub infected: usize,
    pub recovered: usize,
    pub deceased: usize,
    /// Derived by `gather`
    pub percent: Percentages,
}

impl AggregateStats {
    /// Everyone starts uninfected
    pub fn new(population: usize) -> Self {
        let mut stats = Self {
            population,
            uninfected: population,
            infected: 0,
            recovered: 0,
            deceased: 0,
            percent: Percentages::default(),
        };
        stats.gather();
        stats
    }

    pub fn count(&self, state: HealthState) -> usize {
        match state {
            HealthState::Uninfected => self.uninfected,
            HealthState::Infected => self.infected,
            HealthState::Recovered => self.recovered,
            HealthState::Deceased => self.deceased,
        }
    }

    fn count_mut(&mut self, state: HealthState) -> &mut usize {
        match state {
            HealthState::Uninfected => &mut self.uninfected,
            HealthState::Infected => &mut self.infected,
            HealthState::Recovered => &mut self.recovered,
            HealthState::Deceased => &mut self.deceased,
        }
    }

    /// Move one agent between counters
    pub fn record_transition(&mut self, from: HealthState, to: HealthState) {
        if from == to {
            return;
        }
        let source = self.count_mut(from);
        debug_assert!(*source > 0, "no {} agent to move", from.as_str());
        *source = source.saturating_sub(1);
        *self.count_mut(to) += 1;
    }

    pub fn total(&self) -> usize {
        self.uninfected + self.infected + self.recovered + self.deceased
    }

    /// Recompute percentages from the counters
    pub fn gather(&mut self) {
        let n = self.population.max(1) as f64;
        self.percent = Percentages {
            uninfected: self.uninfected as f64 / n * 100.0,
            infected: self.infected as f64 / n * 100.0,
            recovered: self.recovered as f64 / n * 100.0,
            deceased: self.deceased as f64 / n * 100.0,
        };
    }
}

/// Fixed-capacity sliding window of samples (oldest first)
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append, evicting the single oldest sample when full
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }
}

/// The three graphed series
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    pub infected: HistoryBuffer,
    pub recovered: HistoryBuffer,
    pub deceased: HistoryBuffer,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            infected: HistoryBuffer::new(capacity),
            recovered: HistoryBuffer::new(capacity),
            deceased: HistoryBuffer::new(capacity),
        }
    }

    pub fn record(&mut self, percent: &Percentages) {
        self.infected.push(percent.infected);
        self.recovered.push(percent.recovered);
        self.deceased.push(percent.deceased);
    }

    pub fn len(&self) -> usize {
        self.infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infected.is_empty() && self.recovered.is_empty() && self.deceased.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.infected.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_stats_all_uninfected() {
        let stats = AggregateStats::new(200);
        assert_eq!(stats.uninfected, 200);
        assert_eq!(stats.total(), 200);
        assert_eq!(stats.percent.uninfected, 100.0);
        assert_eq!(stats.percent.infected, 0.0);
    }

    #[test]
    fn test_transition_conserves_total() {
        let mut stats = AggregateStats::new(10);
        stats.record_transition(HealthState::Uninfected, HealthState::Infected);
        stats.record_transition(HealthState::Uninfected, HealthState::Infected);
        stats.record_transition(HealthState::Infected, HealthState::Recovered);
        stats.record_transition(HealthState::Infected, HealthState::Deceased);
        assert_eq!(stats.total(), 10);
        assert_eq!(stats.uninfected, 8);
        assert_eq!(stats.infected, 0);
        assert_eq!(stats.recovered, 1);
        assert_eq!(stats.deceased, 1);
    }

    #[test]
    fn test_gather_percentages() {
        let mut stats = AggregateStats::new(4);
        stats.record_transition(HealthState::Uninfected, HealthState::Infected);
        stats.gather();
        assert_eq!(stats.percent.infected, 25.0);
        assert_eq!(stats.percent.uninfected, 75.0);
    }

    #[test]
    fn test_history_slides_instead_of_clearing() {
        let mut buffer = HistoryBuffer::new(3);
        for v in 0..5 {
            buffer.push(v as f64);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest(), Some(4.0));
    }

    #[test]
    fn test_history_records_all_series() {
        let mut history = History::new(2);
        let percent = Percentages {
            uninfected: 70.0,
            infected: 20.0,
            recovered: 6.0,
            deceased: 4.0,
        };
        history.record(&percent);
        assert_eq!(history.infected.latest(), Some(20.0));
        assert_eq!(history.recovered.latest(), Some(6.0));
        assert_eq!(history.deceased.latest(), Some(4.0));
    }

    proptest! {
        #[test]
        fn prop_history_keeps_last_capacity_samples(
            capacity in 1usize..64,
            samples in prop::collection::vec(0.0f64..100.0, 0..200),
        ) {
            let mut buffer = HistoryBuffer::new(capacity);
            for &s in &samples {
                buffer.push(s);
                prop_assert!(buffer.len() <= capacity);
            }
            let expected: Vec<f64> = samples
                .iter()
                .copied()
                .skip(samples.len().saturating_sub(capacity))
                .collect();
            prop_assert_eq!(buffer.iter().collect::<Vec<_>>(), expected);
        }
    }
}
