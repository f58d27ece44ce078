//! # PACER
//!
//! A frame pacing driver: steps a [`Simulation`] at a fixed rate and
//! presents it at whatever rate the display refreshes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  set_timeout / request_frame  ┌──────────────────────┐
//! │   Driver    │ ────────────────────────────> │ Host                 │
//! │             │ <──────────────────────────── │  ManualHost | Session│
//! │ accumulator │   simulation / presentation   └──────────────────────┘
//! │ lifecycle   │   ticks
//! └──┬───────┬──┘
//!    │       │ Snapshot::read (borrowed, zero-copy)
//!    │       └──────────────────────────> Presenter::draw
//!    │ update(dt) / pause / resume / stop
//!    └─────────────────────────────────> Simulation
//! ```
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use pacer::{Driver, DriverConfig, LogPresenter, ManualHost};
//! use pacer_sim::{BouncerWorld, SimConfig};
//!
//! let world = BouncerWorld::from_config(&SimConfig::default());
//! let mut driver = Driver::new(world, DriverConfig::default())?;
//! let mut host = ManualHost::new();
//! let mut presenter = LogPresenter::default();
//!
//! driver.start(&mut host);
//! host.run_for(Duration::from_secs(1), Duration::from_millis(16), &mut driver, &mut presenter)?;
//! assert!(driver.stats().simulation_steps >= 59);
//! # Ok::<(), pacer::DriverError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod presenter;
pub mod session;
pub mod stats;

pub use config::{DriverConfig, DriverSettings, HostConfig, PacerConfig};
pub use driver::{Driver, LifecycleState};
pub use error::{ConfigError, ConfigResult, DriverError, DriverResult, PresentError};
pub use host::{Host, ManualHost};
pub use presenter::{LogPresenter, Presenter};
pub use session::{Command, Session, SessionHandle, SessionReport};
pub use stats::DriverStats;

pub use pacer_core::{Simulation, Snapshot, SnapshotError, SnapshotSource};
