//! The tokio session, run against tokio's paused test clock.

mod common;

use std::time::Duration;

use common::{driver_with, Recorder, RecordingPresenter};
use pacer::{Driver, DriverConfig, DriverError, HostConfig, LogPresenter, Session};
use pacer_core::LifecycleSignal;
use pacer_sim::{BouncerWorld, SimConfig, SimPhase};
use tokio::time::sleep;

fn world_driver() -> Driver<BouncerWorld> {
    let world = BouncerWorld::from_config(&SimConfig {
        entity_count: 10,
        ..SimConfig::default()
    });
    Driver::new(world, DriverConfig::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_session_runs_until_stopped() {
    let (session, handle) =
        Session::new(world_driver(), LogPresenter::new(0), HostConfig::default()).unwrap();

    let control = async {
        sleep(Duration::from_secs(1)).await;
        handle.stop().unwrap();
    };
    let (report, ()) = tokio::join!(session.run(), control);
    let report = report.unwrap();

    // Roughly one step per 16.7 ms for one second.
    let steps = report.stats.simulation_steps;
    assert!((50..=62).contains(&steps), "steps: {steps}");
    assert!(report.stats.frames_drawn > 30);
    assert_eq!(report.simulation.steps(), steps);
    assert_eq!(report.simulation.phase(), SimPhase::Stopped);
    assert_eq!(report.simulation.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_session_pause_halts_stepping_and_drawing() {
    let (session, handle) = Session::new(
        driver_with(Recorder::with_entities(2)),
        RecordingPresenter::default(),
        HostConfig::default(),
    )
    .unwrap();

    let control = async {
        sleep(Duration::from_millis(200)).await;
        handle.pause().unwrap();
        handle.pause().unwrap();
        sleep(Duration::from_millis(500)).await;
        handle.resume().unwrap();
        sleep(Duration::from_millis(300)).await;
        handle.stop().unwrap();
    };
    let (report, ()) = tokio::join!(session.run(), control);
    let report = report.unwrap();

    // About 500 ms of unpaused time.
    let steps = report.stats.simulation_steps;
    assert!((24..=36).contains(&steps), "steps: {steps}");
    assert!(report.stats.frames_drawn < report.stats.presentation_ticks);
    assert_eq!(
        report.simulation.signals,
        vec![LifecycleSignal::Pause, LifecycleSignal::Resume, LifecycleSignal::Stop]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handles_stops_session() {
    let (session, handle) =
        Session::new(world_driver(), LogPresenter::new(0), HostConfig::default()).unwrap();
    drop(handle);

    let report = session.run().await.unwrap();

    assert_eq!(report.simulation.phase(), SimPhase::Stopped);
    assert!(report.stats.simulation_ticks <= 1);
}

#[tokio::test(start_paused = true)]
async fn test_simulation_fault_aborts_session() {
    let mut recorder = Recorder::default();
    recorder.fail_after_updates = Some(3);
    let (session, handle) = Session::new(
        driver_with(recorder),
        RecordingPresenter::default(),
        HostConfig::default(),
    )
    .unwrap();

    let err = session.run().await.unwrap_err();

    assert!(matches!(
        err,
        DriverError::Simulation {
            signal: LifecycleSignal::Update,
            ..
        }
    ));
    assert!(matches!(handle.stop(), Err(DriverError::SessionClosed)));
}

#[test]
fn test_session_rejects_zero_refresh() {
    let result = Session::new(
        world_driver(),
        LogPresenter::new(0),
        HostConfig { refresh_hz: 0 },
    );
    assert!(matches!(result, Err(DriverError::Config(_))));
}
