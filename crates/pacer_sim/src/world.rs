//! # Bouncer World
//!
//! Structure-of-arrays entity storage plus the render frame the driver
//! reads from.
//!
//! ```text
//! positions    [Position;    n]   ─┐
//! velocities   [Velocity;    n]    │  simulation columns
//! orientations [Orientation; n]    │  (index i = entity i)
//! rotations    [Rotation;    n]    │
//! bounds       [Bounds;      n]    │
//! sprites      [Sprite;      n]   ─┘
//!                 │
//!                 ▼ refill after every update
//! frame        RenderFrame        ── SnapshotSource for the driver
//! ```

use std::f32::consts::TAU;
use std::time::Duration;

use pacer_core::{EntityView, RenderFrame, Simulation, SimulationResult, SnapshotSource};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::components::{Bounds, DeltaTime, Orientation, Position, Rotation, Velocity};
use crate::sprite::{AssetId, Sprite};
use crate::systems::{update_bouncers, update_motion};

/// Configuration for spawning a world.
///
/// Mirrors the `[simulation]` table of the TOML config.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Entities spawned at start.
    pub entity_count: usize,
    /// RNG seed; the same seed always spawns the same population.
    pub seed: u64,
    /// Arena width in pixels.
    pub arena_width: f32,
    /// Arena height in pixels.
    pub arena_height: f32,
    /// Upper bound of the spawn square (pixels from the origin).
    pub spawn_extent: f32,
    /// Minimum speed along each axis (pixels per second).
    pub min_speed: f32,
    /// Maximum speed along each axis (pixels per second).
    pub max_speed: f32,
    /// Asset every spawned entity is drawn with.
    pub asset: AssetId,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            entity_count: 50,
            seed: 42,
            arena_width: 600.0,
            arena_height: 600.0,
            spawn_extent: 400.0,
            min_speed: 100.0,
            max_speed: 500.0,
            asset: AssetId::Missile,
        }
    }
}

/// Lifecycle phase, as signalled by the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimPhase {
    /// Accepting steps.
    #[default]
    Running,
    /// The driver paused.
    Paused,
    /// The driver stopped.
    Stopped,
}

/// Every component of one bouncing entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BouncingEntity {
    /// Initial position.
    pub position: Position,
    /// Linear velocity.
    pub velocity: Velocity,
    /// Initial facing.
    pub orientation: Orientation,
    /// Angular velocity.
    pub rotation: Rotation,
    /// Box to bounce inside.
    pub bounds: Bounds,
    /// Visual asset.
    pub sprite: Sprite,
}

impl BouncingEntity {
    /// Rolls a random entity inside the configured spawn square.
    ///
    /// Equal `min_speed` and `max_speed` give every entity that speed.
    ///
    /// # Panics
    ///
    /// Panics if `spawn_extent`, `min_speed` or `max_speed` is not finite.
    pub fn random<R: Rng>(rng: &mut R, config: &SimConfig) -> Self {
        let extent = config.spawn_extent.max(0.0);
        let lo = config.min_speed.min(config.max_speed);
        let hi = config.min_speed.max(config.max_speed);

        Self {
            position: Position::new(rng.gen_range(0.0..=extent), rng.gen_range(0.0..=extent)),
            velocity: Velocity::new(rng.gen_range(lo..=hi), rng.gen_range(lo..=hi)),
            orientation: Orientation(0.0),
            rotation: Rotation(rng.gen_range(-TAU..TAU)),
            bounds: Bounds::new(
                Position::new(0.0, 0.0),
                Position::new(config.arena_width, config.arena_height),
            ),
            sprite: Sprite::new(config.asset),
        }
    }
}

/// The simulation the frame driver steps.
///
/// Entities live in parallel columns; the render frame is refreshed after
/// every step so a snapshot always reflects the latest completed step.
#[derive(Clone, Debug)]
pub struct BouncerWorld {
    positions: Vec<Position>,
    velocities: Vec<Velocity>,
    orientations: Vec<Orientation>,
    rotations: Vec<Rotation>,
    bounds: Vec<Bounds>,
    sprites: Vec<Sprite>,
    /// Render columns exposed to the driver.
    frame: RenderFrame,
    phase: SimPhase,
    /// Completed steps.
    steps: u64,
    /// Simulated time.
    elapsed: Duration,
}

impl BouncerWorld {
    /// Creates an empty world with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            orientations: Vec::with_capacity(capacity),
            rotations: Vec::with_capacity(capacity),
            bounds: Vec::with_capacity(capacity),
            sprites: Vec::with_capacity(capacity),
            frame: RenderFrame::new(capacity),
            phase: SimPhase::Running,
            steps: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Spawns `config.entity_count` random entities from `config.seed`.
    #[must_use]
    pub fn from_config(config: &SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = Self::with_capacity(config.entity_count);
        for _ in 0..config.entity_count {
            world.push_entity(BouncingEntity::random(&mut rng, config));
        }
        world.refresh_frame();

        tracing::debug!(
            entities = world.len(),
            seed = config.seed,
            "bouncer world spawned"
        );
        world
    }

    /// Adds an entity and returns its index.
    pub fn spawn(&mut self, entity: BouncingEntity) -> usize {
        let index = self.push_entity(entity);
        self.refresh_frame();
        index
    }

    /// Removes the entity at `index`, moving the last entity into its slot.
    ///
    /// Returns the removed entity, or `None` if `index` is out of range.
    pub fn despawn(&mut self, index: usize) -> Option<BouncingEntity> {
        if index >= self.len() {
            return None;
        }
        let entity = BouncingEntity {
            position: self.positions.swap_remove(index),
            velocity: self.velocities.swap_remove(index),
            orientation: self.orientations.swap_remove(index),
            rotation: self.rotations.swap_remove(index),
            bounds: self.bounds.swap_remove(index),
            sprite: self.sprites.swap_remove(index),
        };
        self.refresh_frame();
        Some(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the world has no entities.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Completed steps since creation.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Total simulated time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Position column.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Velocity column.
    #[must_use]
    pub fn velocities(&self) -> &[Velocity] {
        &self.velocities
    }

    /// Advances every entity by `dt` and refreshes the render frame.
    pub fn step(&mut self, dt: Duration) {
        let delta = DeltaTime::from(dt);

        update_motion(
            &mut self.positions,
            &self.velocities,
            &mut self.orientations,
            &self.rotations,
            delta,
        );
        update_bouncers(&self.positions, &mut self.velocities, &self.bounds);

        self.steps += 1;
        self.elapsed += dt;
        self.refresh_frame();
    }

    fn push_entity(&mut self, entity: BouncingEntity) -> usize {
        let index = self.len();
        self.positions.push(entity.position);
        self.velocities.push(entity.velocity);
        self.orientations.push(entity.orientation);
        self.rotations.push(entity.rotation);
        self.bounds.push(entity.bounds);
        self.sprites.push(entity.sprite);
        index
    }

    fn refresh_frame(&mut self) {
        let views = self
            .positions
            .iter()
            .zip(&self.orientations)
            .zip(&self.sprites)
            .map(|((pos, ori), sprite)| EntityView {
                x: pos.x,
                y: pos.y,
                orientation: ori.0,
                asset_id: sprite.asset_id.as_u8(),
            });
        self.frame.refill(views);
    }
}

impl Default for BouncerWorld {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl SnapshotSource for BouncerWorld {
    fn entity_count(&self) -> usize {
        self.frame.entity_count()
    }

    fn pos_x(&self) -> &[f32] {
        self.frame.pos_x()
    }

    fn pos_y(&self) -> &[f32] {
        self.frame.pos_y()
    }

    fn orientation(&self) -> &[f32] {
        self.frame.orientation()
    }

    fn asset_ids(&self) -> &[u8] {
        self.frame.asset_ids()
    }
}

impl Simulation for BouncerWorld {
    fn update(&mut self, dt: Duration) -> SimulationResult<()> {
        if self.phase == SimPhase::Stopped {
            tracing::trace!(?dt, "trailing step after stop");
        }
        self.step(dt);
        Ok(())
    }

    fn pause(&mut self) -> SimulationResult<()> {
        self.phase = SimPhase::Paused;
        tracing::debug!(steps = self.steps, "simulation paused");
        Ok(())
    }

    fn resume(&mut self) -> SimulationResult<()> {
        self.phase = SimPhase::Running;
        tracing::debug!(steps = self.steps, "simulation resumed");
        Ok(())
    }

    fn stop(&mut self) -> SimulationResult<()> {
        self.phase = SimPhase::Stopped;
        tracing::debug!(steps = self.steps, elapsed = ?self.elapsed, "simulation stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_core::Snapshot;

    #[test]
    fn test_world_from_config_spawns_population() {
        let world = BouncerWorld::from_config(&SimConfig::default());
        assert_eq!(world.len(), 50);

        let snapshot = Snapshot::read(&world).unwrap();
        assert_eq!(snapshot.size(), 50);
        assert!(snapshot.asset_ids().iter().all(|&id| id == AssetId::Missile.as_u8()));
        assert!(snapshot
            .iter()
            .all(|e| (0.0..=400.0).contains(&e.x) && (0.0..=400.0).contains(&e.y)));
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = SimConfig {
            entity_count: 10,
            seed: 7,
            ..SimConfig::default()
        };
        let a = BouncerWorld::from_config(&config);
        let b = BouncerWorld::from_config(&config);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.velocities(), b.velocities());
    }

    #[test]
    fn test_equal_speed_bounds_spawn_fixed_speed() {
        let config = SimConfig {
            entity_count: 8,
            min_speed: 100.0,
            max_speed: 100.0,
            spawn_extent: 0.0,
            ..SimConfig::default()
        };
        let world = BouncerWorld::from_config(&config);

        assert_eq!(world.len(), 8);
        assert!(world
            .velocities()
            .iter()
            .all(|v| v.x == 100.0 && v.y == 100.0));
        assert!(world.positions().iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }

    #[test]
    fn test_update_moves_entities_and_refreshes_frame() {
        let mut world = BouncerWorld::with_capacity(1);
        world.spawn(BouncingEntity {
            position: Position::new(100.0, 100.0),
            velocity: Velocity::new(60.0, 0.0),
            bounds: Bounds::new(Position::new(0.0, 0.0), Position::new(600.0, 600.0)),
            ..BouncingEntity::default()
        });

        world.update(Duration::from_millis(500)).unwrap();

        let snapshot = Snapshot::read(&world).unwrap();
        assert_eq!(snapshot.pos_x(), &[130.0]);
        assert_eq!(world.steps(), 1);
        assert_eq!(world.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_entities_stay_near_arena() {
        let mut world = BouncerWorld::from_config(&SimConfig::default());
        let dt = Duration::from_micros(16_667);
        for _ in 0..600 {
            world.step(dt);
        }
        // One step at max speed can overshoot an edge by at most ~8.4 px.
        let slack = 500.0 * dt.as_secs_f32() + 1.0;
        for pos in world.positions() {
            assert!(pos.x >= -slack && pos.x <= 600.0 + slack, "x escaped: {}", pos.x);
            assert!(pos.y >= -slack && pos.y <= 600.0 + slack, "y escaped: {}", pos.y);
        }
    }

    #[test]
    fn test_despawn_swaps_last_into_slot() {
        let mut world = BouncerWorld::with_capacity(3);
        for x in [1.0, 2.0, 3.0] {
            world.spawn(BouncingEntity {
                position: Position::new(x, 0.0),
                ..BouncingEntity::default()
            });
        }

        let removed = world.despawn(0).unwrap();
        assert_eq!(removed.position.x, 1.0);
        assert_eq!(world.despawn(5), None);

        let snapshot = Snapshot::read(&world).unwrap();
        assert_eq!(snapshot.pos_x(), &[3.0, 2.0]);
    }

    #[test]
    fn test_lifecycle_signals_track_phase() {
        let mut world = BouncerWorld::with_capacity(0);
        assert_eq!(world.phase(), SimPhase::Running);
        world.pause().unwrap();
        assert_eq!(world.phase(), SimPhase::Paused);
        world.resume().unwrap();
        assert_eq!(world.phase(), SimPhase::Running);
        world.stop().unwrap();
        assert_eq!(world.phase(), SimPhase::Stopped);

        // A trailing step after stop is accepted.
        world.update(Duration::from_millis(16)).unwrap();
        assert_eq!(world.steps(), 1);
    }

    #[test]
    fn test_sim_config_from_toml() {
        let config: SimConfig = toml::from_str(
            r#"
            entity_count = 3
            seed = 9
            asset = "tower"
            "#,
        )
        .unwrap();
        assert_eq!(config.entity_count, 3);
        assert_eq!(config.asset, AssetId::Tower);
        assert!((config.arena_width - 600.0).abs() < f32::EPSILON);
    }
}
