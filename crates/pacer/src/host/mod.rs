//! # Hosts
//!
//! The driver never sleeps, spawns or reads a clock on its own. A host
//! supplies the three primitives it needs and dispatches the ticks the
//! driver asks for:
//!
//! ```text
//!            set_timeout(update_duration)            request_frame()
//! Driver ───────────────────────────────> Host <───────────────────── Driver
//!   ^                                      │                            ^
//!   └──── simulation_tick(host) ───────────┴── presentation_tick(ts) ───┘
//! ```
//!
//! - [`ManualHost`]: virtual clock, stepped explicitly; tests and replay
//! - [`Session`](crate::Session): tokio timers and a refresh interval

mod manual;

use std::time::Duration;

pub use manual::ManualHost;

/// Scheduling primitives a host event loop provides to the driver.
///
/// All callbacks run on the host's single event loop; a host must never
/// dispatch two ticks concurrently.
pub trait Host {
    /// Monotonic time since the host's origin.
    fn now(&self) -> Duration;

    /// Arms a one-shot timer; when it expires the host calls
    /// [`Driver::simulation_tick`](crate::Driver::simulation_tick).
    fn set_timeout(&mut self, delay: Duration);

    /// Asks for one display refresh; on the next refresh the host calls
    /// [`Driver::presentation_tick`](crate::Driver::presentation_tick).
    fn request_frame(&mut self);
}
