//! Configuration validation.
//!
//! Checks that every required `[simulation]` key is present and parses
//! before a run starts. Fractions are not range checked.

use crate::domain::config::{DEFAULT_MAX_ITERATIONS, SimulationConfig};
use crate::domain::error::SimError;
use crate::ports::config_port::ConfigPort;

pub const SECTION: &str = "simulation";

pub fn load_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, SimError> {
    let stop_loss = require_fraction(config, "stop_loss")?;
    let take_profit = require_fraction(config, "take_profit")?;
    let fee = require_fraction(config, "fee")?;
    let delay = require_fraction(config, "delay")?;
    let minimum_trades = require_count(config, "minimum_trades")?;
    let max_iterations = match uint(config, "max_iterations")? {
        Some(0) => {
            return Err(invalid("max_iterations", "max_iterations must be at least 1"));
        }
        Some(n) => n,
        None => DEFAULT_MAX_ITERATIONS,
    };

    Ok(SimulationConfig {
        stop_loss,
        take_profit,
        fee,
        minimum_trades,
        delay,
        max_iterations,
    })
}

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    load_simulation_config(config).map(|_| ())
}

fn require_fraction(config: &dyn ConfigPort, key: &str) -> Result<f64, SimError> {
    match config.get_float(SECTION, key) {
        Ok(Some(value)) if value.is_finite() => Ok(value),
        Ok(Some(_)) => Err(invalid(key, &format!("{key} must be a finite number"))),
        Ok(None) => Err(missing(key)),
        Err(reason) => Err(invalid(key, &reason)),
    }
}

fn require_count(config: &dyn ConfigPort, key: &str) -> Result<usize, SimError> {
    uint(config, key)?.ok_or_else(|| missing(key))
}

fn uint(config: &dyn ConfigPort, key: &str) -> Result<Option<usize>, SimError> {
    match config.get_uint(SECTION, key) {
        Ok(value) => value
            .map(|v| usize::try_from(v).map_err(|e| invalid(key, &e.to_string())))
            .transpose(),
        Err(reason) => Err(invalid(key, &reason)),
    }
}

fn missing(key: &str) -> SimError {
    SimError::ConfigMissing {
        section: SECTION.to_string(),
        key: key.to_string(),
    }
}

fn invalid(key: &str, reason: &str) -> SimError {
    SimError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
