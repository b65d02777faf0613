use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Controller config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Reproduce the historical flag-set side effect (hover bits pick up the
    /// behavior group, LIMIT_ROLL_ONLY cannot be raised).
    pub legacy_flag_merge: bool,
    /// Ticks between `trace!` summaries.
    pub trace_interval: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            legacy_flag_merge: false,
            trace_interval: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub dt: f64,              // s
    pub max_time: f64,        // s
    pub gravity: Vector3<f64>, // m/s^2
    pub water_level: f64,     // m
    pub terrain_height: f64,  // m
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,          // 10 Hz, typical region heartbeat
            max_time: 30.0,
            gravity: Vector3::new(0.0, 0.0, -9.8),
            water_level: 20.0,
            terrain_height: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// File config
// ---------------------------------------------------------------------------

/// Top-level TOML document: `[controller]` and `[sim]` tables, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub controller: ControllerConfig,
    pub sim: SimConfig,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sim.dt.is_finite() && self.sim.dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sim.dt must be a positive number, got {}",
                self.sim.dt
            )));
        }
        if !(self.sim.max_time.is_finite() && self.sim.max_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sim.max_time must be a positive number, got {}",
                self.sim.max_time
            )));
        }
        if self.controller.trace_interval == 0 {
            return Err(ConfigError::Invalid(
                "controller.trace_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
