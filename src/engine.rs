//! Tick driver
//!
//! The host calls `Engine::frame` once per display refresh. Each frame runs
//! one simulation tick, feeds elapsed wall-clock time to the history sampler,
//! and draws. Clicks and commands arrive between frames.

use glam::DVec2;

use crate::Bounds;
use crate::config::{Command, SimConfig};
use crate::error::{ConfigError, InvariantError};
use crate::renderer::{self, Surface};
use crate::sim::{SimulationContext, TickInput, TickReport, contact, tick};

/// Periodic timer for history sampling, driven by elapsed time
#[derive(Debug, Clone, PartialEq)]
pub struct SampleClock {
    interval_ms: f64,
    elapsed_ms: f64,
    running: bool,
}

impl SampleClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
            running: true,
        }
    }

    /// Add elapsed time; returns how many samples fell due
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.running || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let due = (self.elapsed_ms / self.interval_ms).floor();
        self.elapsed_ms -= due * self.interval_ms;
        due as u32
    }

    /// Stop sampling and drop any partial interval
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }

    /// Start a fresh interval
    pub fn restart(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
    }
}

/// Owns the simulation context and everything that schedules it
#[derive(Debug, Clone)]
pub struct Engine {
    config: SimConfig,
    ctx: SimulationContext,
    clock: SampleClock,
    /// Size used for the last tick (reset spawns into it)
    bounds: Bounds,
    pending_clicks: Vec<DVec2>,
}

impl Engine {
    /// Create an engine; rejects invalid configs
    pub fn new(config: SimConfig, bounds: Bounds, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or(seed);
        let ctx = SimulationContext::new(&config, bounds, seed);
        log::info!(
            "Simulation started: {} agents, {} preset, seed {}",
            config.population,
            config.variant.as_str(),
            seed
        );
        Ok(Self {
            clock: SampleClock::new(config.sample_interval_ms),
            config,
            ctx,
            bounds,
            pending_clicks: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Dispatch a control panel command
    pub fn apply(&mut self, command: Command) {
        log::debug!("Command: {:?}", command);
        if !self.ctx.controls.apply(command) {
            self.reset();
        }
    }

    /// Swap in a fresh population, statistics and history
    pub fn reset(&mut self) {
        self.clock.stop();
        self.pending_clicks.clear();
        self.ctx.reset(&self.config, self.bounds);
        self.clock.restart();
        log::info!(
            "Simulation reset (generation {}, {} agents)",
            self.ctx.generation,
            self.ctx.population()
        );
    }

    /// Replace the config and reset. An invalid config leaves the engine unchanged.
    pub fn reconfigure(&mut self, config: SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.clock = SampleClock::new(config.sample_interval_ms);
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Infect the first agent within the click threshold, right now
    pub fn infect_nearest(&mut self, pos: DVec2) -> Option<usize> {
        let onset = self.ctx.time_ticks + 1;
        contact::infect_nearest(&mut self.ctx, pos, self.config.click_threshold, onset)
    }

    /// Queue a click for the next tick
    pub fn click(&mut self, pos: DVec2) {
        self.pending_clicks.push(pos);
    }

    /// Run one simulation tick against the given area
    pub fn step(&mut self, bounds: Bounds) -> TickReport {
        self.bounds = bounds;
        let input = TickInput {
            bounds,
            clicks: std::mem::take(&mut self.pending_clicks),
        };
        tick(&mut self.ctx, &self.config, &input)
    }

    /// Record history samples for `dt_ms` of elapsed wall-clock time
    pub fn advance_clock(&mut self, dt_ms: f64) -> u32 {
        let due = self
            .clock
            .advance(dt_ms)
            .min(self.ctx.history.capacity() as u32);
        for _ in 0..due {
            self.ctx.history.record(&self.ctx.stats.percent);
        }
        if due > 0 {
            let p = &self.ctx.stats.percent;
            log::debug!(
                "Sample @ tick {}: infected {:.1}% recovered {:.1}% deceased {:.1}%",
                self.ctx.time_ticks,
                p.infected,
                p.recovered,
                p.deceased
            );
        }
        due
    }

    /// One display frame: tick, sample, draw
    pub fn frame<S: Surface + ?Sized>(&mut self, dt_ms: f64, surface: &mut S) -> TickReport {
        let report = self.step(surface.bounds());
        self.advance_clock(dt_ms);
        renderer::draw_frame(surface, &self.ctx);
        report
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.ctx.check_invariants(self.config.population, self.bounds)
    }
}
