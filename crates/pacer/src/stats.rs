//! # Driver Statistics
//!
//! Counters the driver updates on every tick. Cheap to copy; read them
//! from [`Driver::stats`](crate::Driver::stats) or a session report.

use std::fmt;

/// Tick and frame counters for one driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Simulation ticks dispatched by the host.
    pub simulation_ticks: u64,
    /// Fixed-size `update` calls delivered to the simulation.
    pub simulation_steps: u64,
    /// Most steps drained by a single tick.
    pub max_steps_in_tick: u32,
    /// Ticks whose wall-clock delta exceeded `max_update_delta`.
    pub clamped_ticks: u64,
    /// Presentation ticks dispatched by the host.
    pub presentation_ticks: u64,
    /// Frames handed to the presenter.
    pub frames_drawn: u64,
    /// Backwards clock readings on either chain.
    pub timing_anomalies: u64,
}

impl DriverStats {
    /// Records one simulation tick that drained `steps` steps.
    pub(crate) fn record_simulation_tick(&mut self, steps: u32, clamped: bool) {
        self.simulation_ticks += 1;
        self.simulation_steps += u64::from(steps);
        self.max_steps_in_tick = self.max_steps_in_tick.max(steps);
        if clamped {
            self.clamped_ticks += 1;
        }
    }

    /// Fraction of presentation ticks that produced a frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn draw_ratio(&self) -> f64 {
        if self.presentation_ticks == 0 {
            return 0.0;
        }
        self.frames_drawn as f64 / self.presentation_ticks as f64
    }
}

impl fmt::Display for DriverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sim ticks {} | steps {} (max {}/tick) | clamped {} | frames {}/{} | anomalies {}",
            self.simulation_ticks,
            self.simulation_steps,
            self.max_steps_in_tick,
            self.clamped_ticks,
            self.frames_drawn,
            self.presentation_ticks,
            self.timing_anomalies,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_simulation_tick() {
        let mut stats = DriverStats::default();
        stats.record_simulation_tick(2, false);
        stats.record_simulation_tick(4, true);
        stats.record_simulation_tick(0, false);

        assert_eq!(stats.simulation_ticks, 3);
        assert_eq!(stats.simulation_steps, 6);
        assert_eq!(stats.max_steps_in_tick, 4);
        assert_eq!(stats.clamped_ticks, 1);
    }

    #[test]
    fn test_draw_ratio() {
        let mut stats = DriverStats::default();
        assert!(stats.draw_ratio().abs() < f64::EPSILON);

        stats.presentation_ticks = 4;
        stats.frames_drawn = 3;
        assert!((stats.draw_ratio() - 0.75).abs() < f64::EPSILON);
    }
}
