//! # PACER Demo
//!
//! Runs the bundled bouncer simulation headless under the native session,
//! pausing it for a while in the middle, then prints the driver stats.
//!
//! ```bash
//! # defaults, 3 seconds
//! pacer
//!
//! # config file, 10 seconds, JSON logs
//! LOG_FORMAT=json RUST_LOG=pacer=debug pacer config/pacer.toml 10
//! ```

use std::process::ExitCode;
use std::time::Duration;

use pacer::{Driver, DriverError, LogPresenter, PacerConfig, Session, SessionHandle};
use pacer_sim::BouncerWorld;

const DEFAULT_RUN_SECS: f64 = 3.0;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Pause for the middle fifth of the run, then stop.
async fn script(handle: SessionHandle, run_for: Duration) -> Result<(), DriverError> {
    let fifth = run_for / 5;

    tokio::time::sleep(fifth * 2).await;
    handle.pause()?;
    tokio::time::sleep(fifth).await;
    handle.resume()?;
    tokio::time::sleep(run_for.saturating_sub(fifth * 3)).await;
    handle.stop()
}

async fn run(config: PacerConfig, run_for: Duration) -> Result<(), DriverError> {
    let world = BouncerWorld::from_config(&config.simulation);
    let driver = Driver::new(world, config.driver_config()?)?;
    let presenter = LogPresenter::new(u64::from(config.host.refresh_hz));
    let (session, handle) = Session::new(driver, presenter, config.host)?;

    let (report, scripted) = tokio::join!(session.run(), script(handle, run_for));
    let report = report?;
    scripted?;

    println!("ran {:.2?} | {} entities | {}", report.elapsed, report.simulation.len(), report.stats);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PacerConfig::load(path),
        None => Ok(PacerConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "bad config");
            return ExitCode::FAILURE;
        }
    };

    let run_for = match args.next() {
        None => Duration::from_secs_f64(DEFAULT_RUN_SECS),
        Some(arg) => match arg.parse::<f64>().ok().and_then(|s| Duration::try_from_secs_f64(s).ok()) {
            Some(run_for) if !run_for.is_zero() => run_for,
            _ => {
                tracing::error!(%arg, "run time must be a positive number of seconds");
                return ExitCode::FAILURE;
            }
        },
    };

    match run(config, run_for).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}
