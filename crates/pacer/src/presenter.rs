//! # Presenter
//!
//! The presentation layer the driver hands each snapshot to.

use std::time::Duration;

use pacer_core::Snapshot;

use crate::error::PresentError;

/// Draws one frame from a snapshot.
///
/// Called at most once per presentation tick. The snapshot borrows
/// simulation memory and is only valid for the duration of the call.
pub trait Presenter {
    /// Draws `snapshot`; `time_delta` is the time since the previous
    /// presentation tick (zero on the first).
    ///
    /// # Errors
    ///
    /// Returns a [`PresentError`] if the frame could not be drawn.
    fn draw(&mut self, snapshot: &Snapshot<'_>, time_delta: Duration) -> Result<(), PresentError>;
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn draw(&mut self, snapshot: &Snapshot<'_>, time_delta: Duration) -> Result<(), PresentError> {
        (**self).draw(snapshot, time_delta)
    }
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn draw(&mut self, snapshot: &Snapshot<'_>, time_delta: Duration) -> Result<(), PresentError> {
        (**self).draw(snapshot, time_delta)
    }
}

/// Headless presenter that reports each frame through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter {
    frames: u64,
    /// Log every n-th frame at `info`; others go to `trace`.
    every: u64,
}

impl LogPresenter {
    /// Creates a presenter that logs every `every`-th frame at `info`.
    #[must_use]
    pub const fn new(every: u64) -> Self {
        Self { frames: 0, every }
    }

    /// Frames drawn so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    fn draw(&mut self, snapshot: &Snapshot<'_>, time_delta: Duration) -> Result<(), PresentError> {
        self.frames += 1;
        let first = snapshot.get(0);

        if self.every != 0 && self.frames % self.every == 0 {
            tracing::info!(
                frame = self.frames,
                entities = snapshot.size(),
                ?time_delta,
                ?first,
                "frame"
            );
        } else {
            tracing::trace!(frame = self.frames, entities = snapshot.size(), ?time_delta);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_presenter_counts_frames() {
        let mut presenter = LogPresenter::new(2);
        for _ in 0..3 {
            presenter.draw(&Snapshot::empty(), Duration::ZERO).unwrap();
        }
        assert_eq!(presenter.frames(), 3);
    }

    #[test]
    fn test_presenter_through_mut_ref() {
        fn draw_once<P: Presenter>(mut presenter: P) {
            presenter.draw(&Snapshot::empty(), Duration::from_millis(16)).unwrap();
        }

        let mut inner = LogPresenter::new(0);
        draw_once(&mut inner);
        assert_eq!(inner.frames(), 1);
    }
}
