//! Simulation tunables, presets and control commands
//!
//! Persisted in LocalStorage on web; read from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Every contact transmits; short illness
    #[default]
    Classic,
    /// Contacts transmit one time in four; faster recovery, longer chronic cutoff
    Outbreak,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Outbreak => "Outbreak",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "outbreak" | "probabilistic" => Some(Variant::Outbreak),
            _ => None,
        }
    }

    /// Transmission chance per contact (percent)
    pub fn chance_of_infection(&self) -> f64 {
        match self {
            Variant::Classic => CHANCE_OF_INFECTION_CLASSIC,
            Variant::Outbreak => CHANCE_OF_INFECTION_OUTBREAK,
        }
    }

    /// Recovery threshold (percent)
    pub fn recovery_rate(&self) -> f64 {
        match self {
            Variant::Classic => RECOVERY_RATE_CLASSIC,
            Variant::Outbreak => RECOVERY_RATE_OUTBREAK,
        }
    }

    pub fn max_sick_cycles(&self) -> u32 {
        match self {
            Variant::Classic => MAX_SICK_CYCLES_CLASSIC,
            Variant::Outbreak => MAX_SICK_CYCLES_OUTBREAK,
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct SimConfig {
    /// Preset the epidemic rates were taken from
    pub variant: Variant,

    // === Population ===
    pub population: usize,
    /// Fixed RNG seed (None = seed from clock)
    pub seed: Option<u64>,

    // === Contact ===
    pub infection_radius: f64,
    /// Transmission chance per qualifying contact (percent)
    pub chance_of_infection: f64,
    pub minimal_distance: f64,
    pub repulsion_factor: f64,

    // === Illness (percent per tick) ===
    pub mortality_rate: f64,
    pub recovery_rate: f64,
    pub max_sick_cycles: u32,

    // === Motion ===
    pub damping: f64,
    pub max_speed: f64,
    pub initial_acceleration: f64,

    // === Input / overlay ===
    pub click_threshold: f64,
    pub history_capacity: usize,
    pub sample_interval_ms: f64,
}

/// On-disk form of `SimConfig`: every field optional, rates default to the preset
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    variant: Variant,
    population: Option<usize>,
    seed: Option<u64>,
    infection_radius: Option<f64>,
    chance_of_infection: Option<f64>,
    minimal_distance: Option<f64>,
    repulsion_factor: Option<f64>,
    mortality_rate: Option<f64>,
    recovery_rate: Option<f64>,
    max_sick_cycles: Option<u32>,
    damping: Option<f64>,
    max_speed: Option<f64>,
    initial_acceleration: Option<f64>,
    click_threshold: Option<f64>,
    history_capacity: Option<usize>,
    sample_interval_ms: Option<f64>,
}

impl From<ConfigFile> for SimConfig {
    fn from(file: ConfigFile) -> Self {
        let preset = SimConfig::from_variant(file.variant);
        Self {
            variant: file.variant,
            population: file.population.unwrap_or(preset.population),
            seed: file.seed,
            infection_radius: file.infection_radius.unwrap_or(preset.infection_radius),
            chance_of_infection: file
                .chance_of_infection
                .unwrap_or(preset.chance_of_infection),
            minimal_distance: file.minimal_distance.unwrap_or(preset.minimal_distance),
            repulsion_factor: file.repulsion_factor.unwrap_or(preset.repulsion_factor),
            mortality_rate: file.mortality_rate.unwrap_or(preset.mortality_rate),
            recovery_rate: file.recovery_rate.unwrap_or(preset.recovery_rate),
            max_sick_cycles: file.max_sick_cycles.unwrap_or(preset.max_sick_cycles),
            damping: file.damping.unwrap_or(preset.damping),
            max_speed: file.max_speed.unwrap_or(preset.max_speed),
            initial_acceleration: file
                .initial_acceleration
                .unwrap_or(preset.initial_acceleration),
            click_threshold: file.click_threshold.unwrap_or(preset.click_threshold),
            history_capacity: file.history_capacity.unwrap_or(preset.history_capacity),
            sample_interval_ms: file.sample_interval_ms.unwrap_or(preset.sample_interval_ms),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_variant(Variant::Classic)
    }
}

impl SimConfig {
    /// Create a config with a preset's epidemic rates
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,

            population: POPULATION,
            seed: None,

            infection_radius: INFECTION_RADIUS,
            chance_of_infection: variant.chance_of_infection(),
            minimal_distance: MINIMAL_DISTANCE,
            repulsion_factor: REPULSION_FACTOR,

            mortality_rate: MORTALITY_RATE,
            recovery_rate: variant.recovery_rate(),
            max_sick_cycles: variant.max_sick_cycles(),

            damping: DAMPING,
            max_speed: MAX_SPEED,
            initial_acceleration: INITIAL_ACCELERATION,

            click_threshold: CLICK_THRESHOLD,
            history_capacity: HISTORY_CAPACITY,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
        }
    }

    /// Apply a preset (overwrites the rates it controls)
    pub fn apply_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.chance_of_infection = variant.chance_of_infection();
        self.recovery_rate = variant.recovery_rate();
        self.max_sick_cycles = variant.max_sick_cycles();
    }

    /// Reject configurations the engine cannot run meaningfully
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        for (field, value) in [
            ("infection_radius", self.infection_radius),
            ("minimal_distance", self.minimal_distance),
            ("repulsion_factor", self.repulsion_factor),
            ("initial_acceleration", self.initial_acceleration),
            ("click_threshold", self.click_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistance { field, value });
            }
        }

        for (field, value) in [
            ("chance_of_infection", self.chance_of_infection),
            ("mortality_rate", self.mortality_rate),
            ("recovery_rate", self.recovery_rate),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::InvalidRate { field, value });
            }
        }

        if self.recovery_rate < self.mortality_rate {
            return Err(ConfigError::RecoveryBelowMortality {
                recovery: self.recovery_rate,
                mortality: self.mortality_rate,
            });
        }

        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::InvalidDamping(self.damping));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.max_speed));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        if !self.sample_interval_ms.is_finite() || self.sample_interval_ms <= 0.0 {
            return Err(ConfigError::InvalidSampleInterval(self.sample_interval_ms));
        }

        Ok(())
    }

    /// Parse and validate a JSON config (missing fields come from its preset)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "contagion_config";

    /// Environment variable naming a JSON config file (native)
    pub const CONFIG_ENV: &'static str = "CONTAGION_CONFIG";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Load config from the file named by `CONTAGION_CONFIG`, else defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::CONFIG_ENV) else {
            log::info!("Using default config");
            return Self::default();
        };

        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // Native config is read-only
    }
}

/// User-facing toggles bound to the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Run the repulsion pass
    pub social_distancing: bool,
    /// Draw the history graph
    pub show_overlay: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            social_distancing: false,
            show_overlay: true,
        }
    }
}

/// Actions the control panel can dispatch to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetSocialDistancing(bool),
    ToggleSocialDistancing,
    SetOverlay(bool),
    ToggleOverlay,
    /// Rebuild population, statistics and history
    ResetSimulation,
}

impl Controls {
    /// Apply a toggle command. Returns false for commands that are not toggles.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::SetSocialDistancing(on) => self.social_distancing = on,
            Command::ToggleSocialDistancing => self.social_distancing = !self.social_distancing,
            Command::SetOverlay(on) => self.show_overlay = on,
            Command::ToggleOverlay => self.show_overlay = !self.show_overlay,
            Command::ResetSimulation => return false,
        }
        true
    }
}
