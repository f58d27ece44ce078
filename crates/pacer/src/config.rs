//! # Configuration
//!
//! Every tunable lives in one TOML document, loaded once at startup:
//!
//! ```toml
//! [driver]
//! target_fps = 60
//! catch_up_factor = 5
//! # max_update_delta_ms = 83.3
//! debug = false
//!
//! [host]
//! refresh_hz = 60
//!
//! [simulation]
//! entity_count = 50
//! seed = 42
//! ```
//!
//! Missing keys fall back to their defaults; unknown keys are rejected.

use std::path::Path;
use std::time::Duration;

use pacer_sim::SimConfig;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Simulation rate used when none is configured.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Catch-up budget per tick, in multiples of the step length.
pub const DEFAULT_CATCH_UP_FACTOR: u32 = 5;

/// Display refresh rate used when none is configured.
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Resolved timing parameters the [`Driver`](crate::Driver) runs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Fixed simulation step.
    pub update_duration: Duration,
    /// Largest wall-clock delta one simulation tick may consume.
    pub max_update_delta: Duration,
    /// Log every snapshot at `debug` level.
    pub debug: bool,
}

impl DriverConfig {
    /// Timing for a fixed step of `update_duration`, with the default
    /// catch-up budget.
    #[must_use]
    pub fn new(update_duration: Duration) -> Self {
        Self {
            update_duration,
            max_update_delta: update_duration.saturating_mul(DEFAULT_CATCH_UP_FACTOR),
            debug: false,
        }
    }

    /// Timing for `fps` steps per second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `fps` is zero.
    pub fn from_fps(fps: u32) -> ConfigResult<Self> {
        if fps == 0 {
            return Err(invalid("driver.target_fps", "must be at least 1"));
        }
        Ok(Self::new(Duration::from_secs(1) / fps))
    }

    /// Overrides the catch-up budget.
    #[must_use]
    pub const fn with_max_update_delta(mut self, max_update_delta: Duration) -> Self {
        self.max_update_delta = max_update_delta;
        self
    }

    /// Enables or disables per-frame snapshot logging.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Checks the timing parameters can drive a simulation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero step or a catch-up
    /// budget shorter than one step.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.update_duration.is_zero() {
            return Err(invalid("driver.update_duration", "must be non-zero"));
        }
        if self.max_update_delta < self.update_duration {
            return Err(invalid(
                "driver.max_update_delta",
                format!(
                    "{:?} is shorter than one step ({:?})",
                    self.max_update_delta, self.update_duration
                ),
            ));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1) / DEFAULT_TARGET_FPS)
    }
}

/// The `[driver]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverSettings {
    /// Simulation steps per second.
    pub target_fps: u32,
    /// `max_update_delta` as a multiple of the step.
    pub catch_up_factor: u32,
    /// Explicit `max_update_delta` in milliseconds; wins over the factor.
    pub max_update_delta_ms: Option<f64>,
    /// Log every snapshot at `debug` level.
    pub debug: bool,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            catch_up_factor: DEFAULT_CATCH_UP_FACTOR,
            max_update_delta_ms: None,
            debug: false,
        }
    }
}

impl DriverSettings {
    /// Resolves the table into driver timing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any value is out of range.
    pub fn resolve(&self) -> ConfigResult<DriverConfig> {
        if self.catch_up_factor == 0 {
            return Err(invalid("driver.catch_up_factor", "must be at least 1"));
        }
        let base = DriverConfig::from_fps(self.target_fps)?;

        let max_update_delta = match self.max_update_delta_ms {
            Some(ms) => millis_to_duration(ms)
                .ok_or_else(|| invalid("driver.max_update_delta_ms", format!("{ms} is not a duration")))?,
            None => base.update_duration.saturating_mul(self.catch_up_factor),
        };

        let config = base
            .with_max_update_delta(max_update_delta)
            .with_debug(self.debug);
        config.validate()?;
        Ok(config)
    }
}

/// The `[host]` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Display refresh callbacks per second.
    pub refresh_hz: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            refresh_hz: DEFAULT_REFRESH_HZ,
        }
    }
}

impl HostConfig {
    /// Time between display refresh callbacks.
    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_hz.max(1)
    }

    /// Checks the refresh rate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `refresh_hz` is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.refresh_hz == 0 {
            return Err(invalid("host.refresh_hz", "must be at least 1"));
        }
        Ok(())
    }
}

/// The whole configuration document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacerConfig {
    /// Driver timing.
    pub driver: DriverSettings,
    /// Native host settings.
    pub host: HostConfig,
    /// Bundled simulation settings.
    pub simulation: SimConfig,
}

impl PacerConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the errors of [`PacerConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        self.driver.resolve()?;
        self.host.validate()?;

        let sim = &self.simulation;
        for (field, value) in [
            ("simulation.arena_width", sim.arena_width),
            ("simulation.arena_height", sim.arena_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("{value} must be a positive size")));
            }
        }
        if !(sim.spawn_extent.is_finite() && sim.spawn_extent >= 0.0) {
            return Err(invalid(
                "simulation.spawn_extent",
                format!("{} must be a finite, non-negative size", sim.spawn_extent),
            ));
        }
        for (field, value) in [
            ("simulation.min_speed", sim.min_speed),
            ("simulation.max_speed", sim.max_speed),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} must be finite")));
            }
        }
        if sim.min_speed > sim.max_speed {
            return Err(invalid(
                "simulation.min_speed",
                format!("{} exceeds max_speed {}", sim.min_speed, sim.max_speed),
            ));
        }
        Ok(())
    }

    /// Resolved driver timing.
    ///
    /// # Errors
    ///
    /// See [`DriverSettings::resolve`].
    pub fn driver_config(&self) -> ConfigResult<DriverConfig> {
        self.driver.resolve()
    }
}

/// Rounds fractional milliseconds to whole nanoseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis_to_duration(ms: f64) -> Option<Duration> {
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    Some(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
