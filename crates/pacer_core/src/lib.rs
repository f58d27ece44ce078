//! # PACER Core
//!
//! The contract between the frame-pacing driver and a simulation engine.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────────┐  update(dt)   ┌──────────────────────────────┐
//! │  Frame Driver    │──────────────>│  Simulation (engine-owned)   │
//! │  (crate `pacer`) │               │                              │
//! │                  │  Snapshot::   │  pos_x   [f32; n]            │
//! │                  │<──── read ────│  pos_y   [f32; n]            │
//! └──────────────────┘   (borrow)    │  orient  [f32; n]            │
//!                                    │  assets  [u8;  n]            │
//!                                    └──────────────────────────────┘
//! ```
//!
//! ## Architecture Rules
//!
//! 1. **The simulation owns entity memory** - the driver never writes it
//! 2. **Snapshots are borrows** - a [`Snapshot`] cannot outlive the tick that read it
//! 3. **Index alignment** - entry `i` of every column describes the same entity
//!
//! ## Example
//!
//! ```rust
//! use pacer_core::{RenderFrame, Snapshot};
//!
//! let mut frame = RenderFrame::new(4);
//! frame.push(10.0, 20.0, 0.5, 1);
//!
//! let snapshot = Snapshot::read(&frame).unwrap();
//! assert_eq!(snapshot.size(), 1);
//! assert_eq!(snapshot.pos_x(), &[10.0]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod render_frame;
pub mod simulation;
pub mod snapshot;

pub use render_frame::RenderFrame;
pub use simulation::{LifecycleSignal, Simulation, SimulationError, SimulationResult};
pub use snapshot::{EntityView, Snapshot, SnapshotError, SnapshotField, SnapshotResult, SnapshotSource};
