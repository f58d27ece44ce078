//! # Frame Pacing Driver
//!
//! Two independently scheduled chains share one lifecycle:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ SIMULATION TICK (every update_duration)                          │
//! │  1. delta = min(now - last_update_time, max_update_delta)        │
//! │  2. unless paused: accumulator += delta                          │
//! │     while accumulator >= update_duration:                        │
//! │         simulation.update(update_duration)                       │
//! │         accumulator -= update_duration                           │
//! │  3. if running: set_timeout(update_duration)                     │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ PRESENTATION TICK (every display refresh)                        │
//! │  1. delta = timestamp - last_presentation_time (0 on first)      │
//! │  2. unless paused: presenter.draw(Snapshot::read(sim), delta)    │
//! │  3. if running: request_frame()                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stopping only clears `is_running`. A tick the host has already
//! scheduled still runs once in full, it just does not re-arm.

use std::fmt;
use std::time::Duration;

use pacer_core::{LifecycleSignal, Simulation, Snapshot};

use crate::config::DriverConfig;
use crate::error::{DriverError, DriverResult};
use crate::host::Host;
use crate::presenter::Presenter;
use crate::stats::DriverStats;

/// Observable lifecycle of a [`Driver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Not running. Initial and terminal.
    Stopped,
    /// Running and stepping the simulation.
    Running,
    /// Running, but neither stepping nor drawing.
    RunningPaused,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::RunningPaused => "running (paused)",
        };
        f.write_str(name)
    }
}

/// Paces a [`Simulation`] at a fixed step and presents it at the
/// display's rate.
///
/// One driver per session. The driver owns the simulation; hosts and
/// presenters are borrowed per tick.
pub struct Driver<S> {
    simulation: S,
    config: DriverConfig,
    is_running: bool,
    /// Independent of `is_running`; a stopped driver may be paused.
    is_paused: bool,
    /// Unconsumed wall-clock time; below `update_duration` whenever a
    /// tick has finished draining.
    accumulator: Duration,
    last_update_time: Duration,
    last_presentation_time: Option<Duration>,
    stats: DriverStats,
}

impl<S: Simulation> Driver<S> {
    /// Creates a stopped driver.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Config`] if `config` fails validation.
    pub fn new(simulation: S, config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;
        Ok(Self {
            simulation,
            config,
            is_running: false,
            is_paused: false,
            accumulator: Duration::ZERO,
            last_update_time: Duration::ZERO,
            last_presentation_time: None,
            stats: DriverStats::default(),
        })
    }

    /// Starts both chains. Does nothing if already running.
    ///
    /// Arms the first simulation tick one step from now and requests the
    /// first display refresh. The simulation is not signalled.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.is_running {
            tracing::debug!("start ignored: already running");
            return;
        }

        self.is_running = true;
        self.last_update_time = host.now();
        self.last_presentation_time = None;

        host.set_timeout(self.config.update_duration);
        host.request_frame();

        tracing::info!(
            update_duration = ?self.config.update_duration,
            max_update_delta = ?self.config.max_update_delta,
            paused = self.is_paused,
            "driver started"
        );
    }

    /// Stops rescheduling and signals the simulation.
    ///
    /// Ticks the host has already scheduled still run once.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Simulation`] if the simulation rejects
    /// `stop`. The driver is stopped either way.
    pub fn stop(&mut self) -> DriverResult<()> {
        self.is_running = false;
        tracing::info!(stats = %self.stats, "driver stopped");

        self.simulation
            .stop()
            .map_err(|e| DriverError::simulation(LifecycleSignal::Stop, e))
    }

    /// Pauses stepping and drawing. Idempotent.
    ///
    /// Both chains keep firing; paused ticks consume no time and draw
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Simulation`] if the simulation rejects
    /// `pause`. The driver is paused either way.
    pub fn pause(&mut self) -> DriverResult<()> {
        if self.is_paused {
            tracing::debug!("pause ignored: already paused");
            return Ok(());
        }

        self.is_paused = true;
        tracing::info!(accumulator = ?self.accumulator, "driver paused");

        self.simulation
            .pause()
            .map_err(|e| DriverError::simulation(LifecycleSignal::Pause, e))
    }

    /// Resumes stepping and drawing. Idempotent.
    ///
    /// Time spent paused is never credited to the accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Simulation`] if the simulation rejects
    /// `resume`. The driver is resumed either way.
    pub fn resume(&mut self) -> DriverResult<()> {
        if !self.is_paused {
            tracing::debug!("resume ignored: not paused");
            return Ok(());
        }

        self.is_paused = false;
        tracing::info!(accumulator = ?self.accumulator, "driver resumed");

        self.simulation
            .resume()
            .map_err(|e| DriverError::simulation(LifecycleSignal::Resume, e))
    }

    /// Runs one simulation tick. Called by the host when the timer armed
    /// through [`Host::set_timeout`] expires.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Simulation`] if an `update` fails. The
    /// remaining whole steps of this tick are dropped and the next tick is
    /// still armed while running.
    pub fn simulation_tick<H: Host + ?Sized>(&mut self, host: &mut H) -> DriverResult<()> {
        let now = host.now();
        let elapsed = match now.checked_sub(self.last_update_time) {
            Some(elapsed) => elapsed,
            None => {
                self.stats.timing_anomalies += 1;
                tracing::warn!(?now, last = ?self.last_update_time, "host clock went backwards");
                Duration::ZERO
            }
        };

        let clamped = elapsed > self.config.max_update_delta;
        if clamped {
            tracing::warn!(
                ?elapsed,
                max = ?self.config.max_update_delta,
                "simulation fell behind; dropping excess time"
            );
        }
        let time_delta = elapsed.min(self.config.max_update_delta);
        self.last_update_time = now;

        let mut steps = 0;
        let result = if self.is_paused {
            Ok(())
        } else {
            self.accumulator += time_delta;
            self.drain(&mut steps)
        };
        self.stats.record_simulation_tick(steps, clamped);

        if self.is_running {
            host.set_timeout(self.config.update_duration);
        }
        result
    }

    /// Runs one presentation tick for the display refresh at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Snapshot`] if the simulation's columns are
    /// inconsistent (nothing is drawn) or [`DriverError::Present`] if the
    /// presenter fails. The next refresh is still requested while running.
    pub fn presentation_tick<H, P>(
        &mut self,
        timestamp: Duration,
        host: &mut H,
        presenter: &mut P,
    ) -> DriverResult<()>
    where
        H: Host + ?Sized,
        P: Presenter + ?Sized,
    {
        self.stats.presentation_ticks += 1;

        let last = *self.last_presentation_time.get_or_insert(timestamp);
        let time_delta = if let Some(delta) = timestamp.checked_sub(last) {
            delta
        } else {
            self.stats.timing_anomalies += 1;
            tracing::warn!(?timestamp, ?last, "presentation timestamp went backwards");
            Duration::ZERO
        };
        self.last_presentation_time = Some(timestamp);

        let result = if self.is_paused {
            Ok(())
        } else {
            self.draw(time_delta, presenter)
        };

        if self.is_running {
            host.request_frame();
        }
        result
    }

    fn drain(&mut self, steps: &mut u32) -> DriverResult<()> {
        let dt = self.config.update_duration;

        while self.accumulator >= dt {
            if let Err(e) = self.simulation.update(dt) {
                while self.accumulator >= dt {
                    self.accumulator -= dt;
                }
                return Err(DriverError::simulation(LifecycleSignal::Update, e));
            }
            self.accumulator -= dt;
            *steps += 1;
            tracing::trace!(step = *steps, ?dt, "simulation step");
        }
        Ok(())
    }

    fn draw<P: Presenter + ?Sized>(&mut self, time_delta: Duration, presenter: &mut P) -> DriverResult<()> {
        let snapshot = Snapshot::read(&self.simulation).map_err(|e| {
            tracing::warn!(error = %e, "snapshot rejected; frame skipped");
            e
        })?;

        if self.config.debug {
            tracing::debug!(
                size = snapshot.size(),
                pos_x = ?snapshot.pos_x(),
                pos_y = ?snapshot.pos_y(),
                orientation = ?snapshot.orientation(),
                asset_ids = ?snapshot.asset_ids(),
                "snapshot"
            );
        }

        presenter.draw(&snapshot, time_delta)?;
        self.stats.frames_drawn += 1;
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        match (self.is_running, self.is_paused) {
            (false, _) => LifecycleState::Stopped,
            (true, false) => LifecycleState::Running,
            (true, true) => LifecycleState::RunningPaused,
        }
    }

    /// True between `start` and `stop`.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// True between `pause` and `resume`.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Unconsumed wall-clock time.
    #[must_use]
    pub const fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// The fixed simulation step.
    #[must_use]
    pub const fn update_duration(&self) -> Duration {
        self.config.update_duration
    }

    /// The per-tick catch-up budget.
    #[must_use]
    pub const fn max_update_delta(&self) -> Duration {
        self.config.max_update_delta
    }

    /// Host time of the last simulation tick (or of `start`).
    #[must_use]
    pub const fn last_update_time(&self) -> Duration {
        self.last_update_time
    }

    /// Timestamp of the last presentation tick since `start`.
    #[must_use]
    pub const fn last_presentation_time(&self) -> Option<Duration> {
        self.last_presentation_time
    }

    /// Timing parameters.
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Tick and frame counters.
    #[must_use]
    pub const fn stats(&self) -> &DriverStats {
        &self.stats
    }

    /// The driven simulation.
    #[must_use]
    pub const fn simulation(&self) -> &S {
        &self.simulation
    }

    /// Mutable access to the driven simulation.
    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    /// Consumes the driver, returning the simulation.
    pub fn into_simulation(self) -> S {
        self.simulation
    }
}

impl<S> fmt::Debug for Driver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("is_running", &self.is_running)
            .field("is_paused", &self.is_paused)
            .field("accumulator", &self.accumulator)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
