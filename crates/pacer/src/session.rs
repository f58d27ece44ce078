//! # Native Session
//!
//! Runs a [`Driver`] on a tokio event loop:
//!
//! ```text
//!   SessionHandle ── Command ──> mpsc ─┐
//!                                      │   biased select, one task
//!   sleep_until(earliest timer) ───────┼──> Driver::simulation_tick
//!   interval(refresh_hz) ──────────────┘──> Driver::presentation_tick
//! ```
//!
//! Every callback runs on the session task, so the driver needs no locks.
//! The session exits once the driver is stopped and both chains have
//! drained.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use pacer_core::Simulation;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::HostConfig;
use crate::driver::Driver;
use crate::error::{DriverError, DriverResult};
use crate::host::Host;
use crate::presenter::Presenter;
use crate::stats::DriverStats;

/// A lifecycle request sent to a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// [`Driver::pause`].
    Pause,
    /// [`Driver::resume`].
    Resume,
    /// [`Driver::stop`].
    Stop,
}

/// Controls a [`Session`] from outside its task.
///
/// Dropping every handle stops the session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Asks the session to pause.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SessionClosed`] if the session has exited.
    pub fn pause(&self) -> DriverResult<()> {
        self.send(Command::Pause)
    }

    /// Asks the session to resume.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SessionClosed`] if the session has exited.
    pub fn resume(&self) -> DriverResult<()> {
        self.send(Command::Resume)
    }

    /// Asks the session to stop.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SessionClosed`] if the session has exited.
    pub fn stop(&self) -> DriverResult<()> {
        self.send(Command::Stop)
    }

    /// Sends a raw command.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SessionClosed`] if the session has exited.
    pub fn send(&self, command: Command) -> DriverResult<()> {
        self.commands
            .send(command)
            .map_err(|_| DriverError::SessionClosed)
    }
}

/// What a finished session hands back.
#[derive(Debug)]
pub struct SessionReport<S> {
    /// Final driver counters.
    pub stats: DriverStats,
    /// Wall-clock time between start and exit.
    pub elapsed: Duration,
    /// The simulation, for inspection or reuse.
    pub simulation: S,
}

/// Owns a driver and its presenter for one run.
pub struct Session<S, P> {
    driver: Driver<S>,
    presenter: P,
    config: HostConfig,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl<S: Simulation, P: Presenter> Session<S, P> {
    /// Creates a session and the handle that controls it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Config`] if `config` fails validation.
    pub fn new(driver: Driver<S>, presenter: P, config: HostConfig) -> DriverResult<(Self, SessionHandle)> {
        config.validate()?;
        let (tx, rx) = mpsc::unbounded_channel();

        let session = Self {
            driver,
            presenter,
            config,
            commands: rx,
        };
        Ok((session, SessionHandle { commands: tx }))
    }

    /// Starts the driver and dispatches its ticks until it stops.
    ///
    /// Must run inside a tokio runtime with the time driver enabled.
    ///
    /// # Errors
    ///
    /// Returns the first tick or command error. The driver is stopped
    /// before returning.
    #[tracing::instrument(name = "session", skip_all)]
    pub async fn run(self) -> DriverResult<SessionReport<S>> {
        let Self {
            mut driver,
            mut presenter,
            config,
            mut commands,
        } = self;

        let mut host = TokioHost::new();
        let mut refresh = time::interval(config.refresh_period());
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut commands_open = true;

        driver.start(&mut host);

        let outcome = loop {
            if !driver.is_running() && host.is_idle() {
                break Ok(());
            }

            let deadline = host.next_deadline();
            let step = tokio::select! {
                biased;

                command = commands.recv(), if commands_open => match command {
                    Some(command) => apply(&mut driver, command),
                    None => {
                        commands_open = false;
                        tracing::debug!("all session handles dropped");
                        if driver.is_running() { driver.stop() } else { Ok(()) }
                    }
                },

                () = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    host.timers.pop();
                    driver.simulation_tick(&mut host)
                }

                instant = refresh.tick(), if host.frame_requested => {
                    host.frame_requested = false;
                    let timestamp = instant.saturating_duration_since(host.origin);
                    driver.presentation_tick(timestamp, &mut host, &mut presenter)
                }

                else => break Ok(()),
            };

            if let Err(e) = step {
                break Err(e);
            }
        };

        if let Err(e) = outcome {
            tracing::error!(error = %e, "session aborted");
            if driver.is_running() {
                if let Err(stop_err) = driver.stop() {
                    tracing::warn!(error = %stop_err, "stop failed while aborting");
                }
            }
            return Err(e);
        }

        let elapsed = host.origin.elapsed();
        tracing::info!(?elapsed, stats = %driver.stats(), "session finished");

        Ok(SessionReport {
            stats: *driver.stats(),
            elapsed,
            simulation: driver.into_simulation(),
        })
    }
}

fn apply<S: Simulation>(driver: &mut Driver<S>, command: Command) -> DriverResult<()> {
    tracing::debug!(?command, "session command");
    match command {
        Command::Pause => driver.pause(),
        Command::Resume => driver.resume(),
        Command::Stop => driver.stop(),
    }
}

/// Host backed by tokio's clock.
struct TokioHost {
    origin: Instant,
    timers: BinaryHeap<Reverse<Instant>>,
    frame_requested: bool,
}

impl TokioHost {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: BinaryHeap::new(),
            frame_requested: false,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.timers.peek().map(|Reverse(deadline)| *deadline)
    }

    fn is_idle(&self) -> bool {
        self.timers.is_empty() && !self.frame_requested
    }
}

impl Host for TokioHost {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn set_timeout(&mut self, delay: Duration) {
        self.timers.push(Reverse(Instant::now() + delay));
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}
