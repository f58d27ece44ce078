//! Deterministic host driven by a virtual clock.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use pacer_core::Simulation;

use crate::driver::Driver;
use crate::error::DriverResult;
use crate::host::Host;
use crate::presenter::Presenter;

/// A host whose clock only moves when told to.
///
/// Timers and frame requests queue up until fired explicitly, so tests
/// can interleave the two chains in any order, including the ones a real
/// event loop makes hard to reproduce.
#[derive(Clone, Debug, Default)]
pub struct ManualHost {
    now: Duration,
    /// Absolute deadlines of armed timers, earliest first.
    timers: BinaryHeap<Reverse<Duration>>,
    frame_requested: bool,
}

impl ManualHost {
    /// Creates a host at time zero with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward without firing anything.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deadline of the earliest armed timer.
    #[must_use]
    pub fn next_timer(&self) -> Option<Duration> {
        self.timers.peek().map(|Reverse(deadline)| *deadline)
    }

    /// True if the driver is waiting for a display refresh.
    #[must_use]
    pub const fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Fires the earliest armed timer, first moving the clock to its
    /// deadline if that lies ahead.
    ///
    /// Returns `false` if no timer was armed.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`Driver::simulation_tick`].
    pub fn fire_timer<S: Simulation>(&mut self, driver: &mut Driver<S>) -> DriverResult<bool> {
        let Some(Reverse(deadline)) = self.timers.pop() else {
            return Ok(false);
        };
        self.now = self.now.max(deadline);
        driver.simulation_tick(self)?;
        Ok(true)
    }

    /// Delivers the requested display refresh stamped with the current
    /// time.
    ///
    /// Returns `false` if no frame was requested.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`Driver::presentation_tick`].
    pub fn fire_frame<S, P>(&mut self, driver: &mut Driver<S>, presenter: &mut P) -> DriverResult<bool>
    where
        S: Simulation,
        P: Presenter + ?Sized,
    {
        let now = self.now;
        self.fire_frame_at(now, driver, presenter)
    }

    /// Delivers the requested display refresh with an arbitrary
    /// `timestamp`. The clock is not moved.
    ///
    /// Returns `false` if no frame was requested.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`Driver::presentation_tick`].
    pub fn fire_frame_at<S, P>(
        &mut self,
        timestamp: Duration,
        driver: &mut Driver<S>,
        presenter: &mut P,
    ) -> DriverResult<bool>
    where
        S: Simulation,
        P: Presenter + ?Sized,
    {
        if !std::mem::take(&mut self.frame_requested) {
            return Ok(false);
        }
        driver.presentation_tick(timestamp, self, presenter)?;
        Ok(true)
    }

    /// Runs both chains for `duration` of virtual time.
    ///
    /// Display refreshes land on a fixed grid of `refresh_period` starting
    /// now. Events are dispatched in time order; a timer and a refresh due
    /// at the same instant run timer first. The clock ends at
    /// `now + duration`.
    ///
    /// # Errors
    ///
    /// Stops at the first tick error and returns it, leaving the clock at
    /// that tick.
    pub fn run_for<S, P>(
        &mut self,
        duration: Duration,
        refresh_period: Duration,
        driver: &mut Driver<S>,
        presenter: &mut P,
    ) -> DriverResult<()>
    where
        S: Simulation,
        P: Presenter + ?Sized,
    {
        let end = self.now + duration;
        let period = refresh_period.max(Duration::from_nanos(1));
        let mut next_refresh = self.now;

        loop {
            while next_refresh < self.now {
                next_refresh += period;
            }

            let timer = self.next_timer().filter(|&t| t <= end);
            let refresh = Some(next_refresh).filter(|&t| self.frame_requested && t <= end);

            match (timer, refresh) {
                (Some(t), Some(r)) if t <= r => {
                    self.fire_timer(driver)?;
                }
                (Some(_), None) => {
                    self.fire_timer(driver)?;
                }
                (_, Some(r)) => {
                    self.now = self.now.max(r);
                    self.fire_frame(driver, presenter)?;
                    next_refresh = r + period;
                }
                (None, None) => break,
            }
        }

        self.now = end;
        Ok(())
    }
}

impl Host for ManualHost {
    fn now(&self) -> Duration {
        self.now
    }

    fn set_timeout(&mut self, delay: Duration) {
        self.timers.push(Reverse(self.now + delay));
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}
