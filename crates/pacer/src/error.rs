//! # Driver Error Types
//!
//! All errors that can surface from the driver, its hosts and its config.

use std::path::PathBuf;

use pacer_core::{LifecycleSignal, SimulationError, SnapshotError};
use thiserror::Error;

/// Errors raised by a presentation layer.
#[derive(Error, Debug)]
pub enum PresentError {
    /// The presenter could not draw the frame.
    #[error("draw failed: {0}")]
    Draw(String),

    /// Any other presenter-specific failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by the driver and its hosts.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The simulation reported a fault while handling a signal.
    ///
    /// Lifecycle flags were already updated when this was raised.
    #[error("simulation fault on `{signal}`")]
    Simulation {
        /// The signal being delivered.
        signal: LifecycleSignal,
        /// The fault the simulation reported.
        #[source]
        source: SimulationError,
    },

    /// The snapshot could not be read; nothing was drawn.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The presentation layer failed to draw.
    #[error(transparent)]
    Present(#[from] PresentError),

    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session a handle refers to has exited.
    #[error("session is no longer running")]
    SessionClosed,
}

impl DriverError {
    /// Wraps a simulation fault raised by `signal`.
    #[must_use]
    pub fn simulation(signal: LifecycleSignal, source: SimulationError) -> Self {
        Self::Simulation { signal, source }
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
