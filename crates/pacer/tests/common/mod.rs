//! Shared fixtures for the driver integration tests.

#![allow(dead_code)]

use std::time::Duration;

use pacer::{Driver, DriverConfig, PresentError, Presenter, Snapshot};
use pacer_core::{
    EntityView, LifecycleSignal, RenderFrame, Simulation, SimulationError, SimulationResult,
    SnapshotSource,
};

/// 16.667 ms step.
pub const STEP: Duration = Duration::from_micros(16_667);

/// 83.3 ms catch-up budget.
pub const MAX_DELTA: Duration = Duration::from_micros(83_300);

/// Simulation that records every call it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub updates: Vec<Duration>,
    pub signals: Vec<LifecycleSignal>,
    pub frame: RenderFrame,
    /// Reported entity count, when it should disagree with the columns.
    pub count_override: Option<usize>,
    /// Reject the update after this many successful ones.
    pub fail_after_updates: Option<usize>,
    /// Reject this lifecycle signal.
    pub fail_signal: Option<LifecycleSignal>,
}

impl Recorder {
    pub fn with_entities(n: usize) -> Self {
        let mut recorder = Self::default();
        recorder.frame.refill((0..n).map(|i| EntityView {
            x: i as f32,
            y: i as f32 * 2.0,
            orientation: 0.5,
            asset_id: 1,
        }));
        recorder
    }

    fn signal(&mut self, signal: LifecycleSignal) -> SimulationResult<()> {
        self.signals.push(signal);
        if self.fail_signal == Some(signal) {
            return Err(SimulationError::SignalRejected {
                signal,
                reason: "refused by test".to_owned(),
            });
        }
        Ok(())
    }
}

impl SnapshotSource for Recorder {
    fn entity_count(&self) -> usize {
        self.count_override.unwrap_or_else(|| self.frame.size())
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

impl Simulation for Recorder {
    fn update(&mut self, dt: Duration) -> SimulationResult<()> {
        if self.fail_after_updates == Some(self.updates.len()) {
            return Err(SimulationError::StepRejected {
                dt,
                reason: "refused by test".to_owned(),
            });
        }
        self.updates.push(dt);
        Ok(())
    }

    fn pause(&mut self) -> SimulationResult<()> {
        self.signal(LifecycleSignal::Pause)
    }

    fn resume(&mut self) -> SimulationResult<()> {
        self.signal(LifecycleSignal::Resume)
    }

    fn stop(&mut self) -> SimulationResult<()> {
        self.signal(LifecycleSignal::Stop)
    }
}

/// One recorded `draw` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawn {
    pub size: usize,
    pub time_delta: Duration,
    pub first: Option<EntityView>,
}

/// Presenter that records every frame it is handed.
#[derive(Default)]
pub struct RecordingPresenter {
    pub frames: Vec<Drawn>,
}

impl Presenter for RecordingPresenter {
    fn draw(&mut self, snapshot: &Snapshot<'_>, time_delta: Duration) -> Result<(), PresentError> {
        assert_eq!(snapshot.pos_x().len(), snapshot.size());
        assert_eq!(snapshot.asset_ids().len(), snapshot.size());
        self.frames.push(Drawn {
            size: snapshot.size(),
            time_delta,
            first: snapshot.get(0),
        });
        Ok(())
    }
}

/// Driver over `recorder` with the 16.667 ms / 83.3 ms timing.
pub fn driver_with(recorder: Recorder) -> Driver<Recorder> {
    let config = DriverConfig::new(STEP).with_max_update_delta(MAX_DELTA);
    Driver::new(recorder, config).unwrap()
}

pub fn driver() -> Driver<Recorder> {
    driver_with(Recorder::default())
}
