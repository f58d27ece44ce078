//! # Components
//!
//! Components are pure data containers with no behavior.
//! They are `Copy` and `Pod` so columns can be copied and compared cheaply.

use std::f32::consts::TAU;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};

/// Simulation step length in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct DeltaTime(pub f32);

impl From<Duration> for DeltaTime {
    fn from(dt: Duration) -> Self {
        Self(dt.as_secs_f32())
    }
}

/// Position in arena space (pixels, +y down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Linear velocity in pixels per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// X velocity component.
    pub x: f32,
    /// Y velocity component.
    pub y: f32,
}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Facing angle in radians, kept within `[0, 2π]`.
///
/// `0` faces towards −y; positive angles turn clockwise on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
pub struct Orientation(pub f32);

impl Orientation {
    /// Advances the angle by `delta`, wrapping back into `[0, 2π]`.
    #[inline]
    pub fn turn(&mut self, delta: f32) {
        self.0 += delta;
        if self.0 < 0.0 {
            self.0 += TAU;
        }
        if self.0 > TAU {
            self.0 -= TAU;
        }
    }
}

/// Angular velocity in radians per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rotation(pub f32);

/// Axis-aligned box an entity bounces inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Position,
    /// Bottom-right corner.
    pub max: Position,
}

impl Bounds {
    /// Creates bounds from two corners.
    #[inline]
    #[must_use]
    pub const fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// Returns true if `pos` lies strictly inside the box.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x > self.min.x && pos.x < self.max.x && pos.y > self.min.y && pos.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_wraps_forward() {
        let mut o = Orientation(TAU - 0.1);
        o.turn(0.3);
        assert!((o.0 - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_orientation_wraps_backward() {
        let mut o = Orientation(0.1);
        o.turn(-0.3);
        assert!((o.0 - (TAU - 0.2)).abs() < 1e-5);
    }

    #[test]
    fn test_delta_time_from_duration() {
        let dt = DeltaTime::from(Duration::from_millis(250));
        assert!((dt.0 - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::new(Position::new(0.0, 0.0), Position::new(10.0, 10.0));
        assert!(b.contains(Position::new(5.0, 5.0)));
        assert!(!b.contains(Position::new(0.0, 5.0)));
        assert!(!b.contains(Position::new(5.0, 11.0)));
    }
}
