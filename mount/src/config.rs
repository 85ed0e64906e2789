//! Simulator configuration

use crate::error::{MountError, MountResult};
use scopesim_alignment::ApproximateAlignment;
use scopesim_astro::GeographicLocation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the simulated mount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Microsteps in one full axis revolution
    pub microsteps_per_revolution: i64,
    /// Goto and manual slew rate in degrees per second
    pub slew_rate_degrees_per_sec: f64,
    /// Lower altitude limit in degrees
    pub altitude_min_degrees: f64,
    /// Upper altitude limit in degrees
    pub altitude_max_degrees: f64,
    /// Simulation tick period
    pub tick_period: Duration,
    /// Mount orientation assumed before any sync points exist
    pub alignment: ApproximateAlignment,
    /// Initial observer location
    pub location: GeographicLocation,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            microsteps_per_revolution: 1_000_000,
            slew_rate_degrees_per_sec: 2.0,
            altitude_min_degrees: -90.0,
            altitude_max_degrees: 90.0,
            tick_period: Duration::from_secs(1),
            alignment: ApproximateAlignment::default(),
            location: GeographicLocation::default(),
        }
    }
}

impl MountConfig {
    /// Microsteps per degree of axis rotation
    pub fn microsteps_per_degree(&self) -> f64 {
        self.microsteps_per_revolution as f64 / 360.0
    }

    /// Slew rate in microsteps per second
    pub fn slew_rate_microsteps(&self) -> f64 {
        self.slew_rate_degrees_per_sec * self.microsteps_per_degree()
    }

    /// Lower altitude limit in microsteps
    pub fn altitude_min_steps(&self) -> i64 {
        (self.altitude_min_degrees * self.microsteps_per_degree()) as i64
    }

    /// Upper altitude limit in microsteps
    pub fn altitude_max_steps(&self) -> i64 {
        (self.altitude_max_degrees * self.microsteps_per_degree()) as i64
    }

    /// Tick period in seconds
    pub fn tick_period_secs(&self) -> f64 {
        self.tick_period.as_secs_f64()
    }

    /// Check for values the simulation cannot run with
    pub fn validate(&self) -> MountResult<()> {
        if self.microsteps_per_revolution <= 0 {
            return Err(MountError::invalid_config(
                "microsteps_per_revolution must be positive",
            ));
        }
        if !self.slew_rate_degrees_per_sec.is_finite() || self.slew_rate_degrees_per_sec <= 0.0 {
            return Err(MountError::invalid_config(
                "slew_rate_degrees_per_sec must be positive",
            ));
        }
        if self.altitude_min_degrees >= self.altitude_max_degrees {
            return Err(MountError::invalid_config(
                "altitude_min_degrees must be below altitude_max_degrees",
            ));
        }
        if self.altitude_min_degrees < -90.0 || self.altitude_max_degrees > 90.0 {
            return Err(MountError::invalid_config(
                "altitude limits must stay within [-90, 90] degrees",
            ));
        }
        if self.tick_period.is_zero() {
            return Err(MountError::invalid_config("tick_period must be positive"));
        }
        Ok(())
    }
}
