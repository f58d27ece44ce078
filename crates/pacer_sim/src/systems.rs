//! # Systems
//!
//! Column-wise update passes. Each system takes only the columns it reads
//! or writes, so a step never touches more memory than it needs.

use crate::components::{Bounds, DeltaTime, Orientation, Position, Rotation, Velocity};

/// Integrates linear and angular motion over one step.
pub fn update_motion(
    positions: &mut [Position],
    velocities: &[Velocity],
    orientations: &mut [Orientation],
    rotations: &[Rotation],
    dt: DeltaTime,
) {
    for (pos, vel) in positions.iter_mut().zip(velocities) {
        pos.x += vel.x * dt.0;
        pos.y += vel.y * dt.0;
    }
    for (ori, rot) in orientations.iter_mut().zip(rotations) {
        ori.turn(rot.0 * dt.0);
    }
}

/// Reflects velocity components that point out of an entity's bounds.
///
/// An entity on or past an edge always leaves with its velocity pointing
/// back inside, so it cannot get stuck flipping outside the box.
pub fn update_bouncers(positions: &[Position], velocities: &mut [Velocity], bounds: &[Bounds]) {
    for ((pos, vel), bounds) in positions.iter().zip(velocities.iter_mut()).zip(bounds) {
        if pos.x <= bounds.min.x {
            vel.x = vel.x.abs();
        } else if pos.x >= bounds.max.x {
            vel.x = -vel.x.abs();
        }
        if pos.y <= bounds.min.y {
            vel.y = vel.y.abs();
        } else if pos.y >= bounds.max.y {
            vel.y = -vel.y.abs();
        }
    }
}
