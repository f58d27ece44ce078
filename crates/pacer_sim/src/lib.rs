//! # PACER Sim
//!
//! A small, deterministic simulation engine for the frame driver: a
//! population of sprites that drift, spin and bounce inside an arena.
//!
//! ## Architecture
//!
//! ```text
//! update(dt) ─┬─> update_motion    position += velocity · dt
//!             │                    orientation += rotation · dt (wrapped)
//!             ├─> update_bouncers  reflect velocity at the arena edges
//!             └─> RenderFrame      refill the SoA columns for the next read
//! ```
//!
//! ## Modules
//!
//! - `components`: Plain-data per-entity state
//! - `sprite`: Visual asset identifiers
//! - `systems`: Motion and bouncer systems
//! - `world`: `BouncerWorld`, the `Simulation` implementation

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod components;
pub mod sprite;
pub mod systems;
pub mod world;

pub use components::{Bounds, DeltaTime, Orientation, Position, Rotation, Velocity};
pub use sprite::{AssetId, Sprite};
pub use world::{BouncerWorld, BouncingEntity, SimConfig, SimPhase};
