//! # Simulation Interface
//!
//! The collaborator the frame driver steps at a fixed cadence.
//!
//! The driver never looks inside a simulation. It only:
//! - calls [`Simulation::update`] with an identical `dt` every step
//! - forwards lifecycle signals (`pause`, `resume`, `stop`)
//! - reads render state through the [`SnapshotSource`] supertrait

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::snapshot::SnapshotSource;

/// A lifecycle call the driver forwards to its simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleSignal {
    /// A fixed-size simulation step.
    Update,
    /// The driver entered the paused state.
    Pause,
    /// The driver left the paused state.
    Resume,
    /// The driver stopped.
    Stop,
}

impl fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Update => "update",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// Faults a simulation may report back to the driver.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The simulation refused to advance by the given step.
    #[error("step of {dt:?} rejected: {reason}")]
    StepRejected {
        /// The step size that was refused.
        dt: Duration,
        /// Why the step was refused.
        reason: String,
    },

    /// The simulation refused a lifecycle signal.
    #[error("`{signal}` rejected: {reason}")]
    SignalRejected {
        /// The refused signal.
        signal: LifecycleSignal,
        /// Why the signal was refused.
        reason: String,
    },

    /// Any other engine-specific failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for simulation calls.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// A simulation engine driven by the frame driver.
///
/// Implementors own all entity state and the memory behind their
/// snapshot columns.
///
/// # Contract
///
/// - `update` must be safe to call repeatedly with the same constant `dt`.
/// - Lifecycle signals are fire-and-forget. The driver may still deliver
///   one trailing `update` after `stop`, so implementors must tolerate it.
pub trait Simulation: SnapshotSource {
    /// Advances the simulation by exactly `dt`.
    fn update(&mut self, dt: Duration) -> SimulationResult<()>;

    /// The driver paused; no `update` calls follow until `resume`.
    fn pause(&mut self) -> SimulationResult<()> {
        Ok(())
    }

    /// The driver resumed stepping.
    fn resume(&mut self) -> SimulationResult<()> {
        Ok(())
    }

    /// The driver stopped.
    fn stop(&mut self) -> SimulationResult<()> {
        Ok(())
    }
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn update(&mut self, dt: Duration) -> SimulationResult<()> {
        (**self).update(dt)
    }

    fn pause(&mut self) -> SimulationResult<()> {
        (**self).pause()
    }

    fn resume(&mut self) -> SimulationResult<()> {
        (**self).resume()
    }

    fn stop(&mut self) -> SimulationResult<()> {
        (**self).stop()
    }
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn entity_count(&self) -> usize {
        (**self).entity_count()
    }

    fn pos_x(&self) -> &[f32] {
        (**self).pos_x()
    }

    fn pos_y(&self) -> &[f32] {
        (**self).pos_y()
    }

    fn orientation(&self) -> &[f32] {
        (**self).orientation()
    }

    fn asset_ids(&self) -> &[u8] {
        (**self).asset_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_frame::RenderFrame;
    use crate::snapshot::Snapshot;

    struct Counter {
        frame: RenderFrame,
        steps: u32,
    }

    impl SnapshotSource for Counter {
        fn entity_count(&self) -> usize {
            self.frame.entity_count()
        }
        fn pos_x(&self) -> &[f32] {
            self.frame.pos_x()
        }
        fn pos_y(&self) -> &[f32] {
            self.frame.pos_y()
        }
        fn orientation(&self) -> &[f32] {
            self.frame.orientation()
        }
        fn asset_ids(&self) -> &[u8] {
            self.frame.asset_ids()
        }
    }

    impl Simulation for Counter {
        fn update(&mut self, _dt: Duration) -> SimulationResult<()> {
            self.steps += 1;
            self.frame.clear();
            self.frame.push(self.steps as f32, 0.0, 0.0, 0);
            Ok(())
        }
    }

    #[test]
    fn test_boxed_simulation_forwards() {
        let mut sim: Box<dyn Simulation> = Box::new(Counter {
            frame: RenderFrame::new(1),
            steps: 0,
        });

        sim.update(Duration::from_millis(16)).unwrap();
        sim.update(Duration::from_millis(16)).unwrap();
        sim.pause().unwrap();
        sim.resume().unwrap();
        sim.stop().unwrap();

        let snapshot = Snapshot::read(&sim).unwrap();
        assert_eq!(snapshot.pos_x(), &[2.0]);
    }

    #[test]
    fn test_error_messages_name_the_signal() {
        let err = SimulationError::SignalRejected {
            signal: LifecycleSignal::Pause,
            reason: "already halted".to_owned(),
        };
        assert_eq!(err.to_string(), "`pause` rejected: already halted");
    }
}
