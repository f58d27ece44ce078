//! # Render Frame
//!
//! Owned structure-of-arrays buffers a simulation fills once per step and
//! exposes through [`SnapshotSource`].
//!
//! The frame keeps its columns allocated between steps:
//! - `clear()` drops the contents, never the capacity
//! - capacity only grows, doubling the required size when exceeded
//! - iteration over any column is cache-friendly (contiguous memory)

use crate::snapshot::{EntityView, SnapshotSource};

/// Pre-allocated render columns for every live entity.
///
/// # Example
///
/// ```rust
/// use pacer_core::{RenderFrame, SnapshotSource};
///
/// let mut frame = RenderFrame::new(8);
/// frame.push(1.0, 2.0, 0.0, 3);
/// assert_eq!(frame.entity_count(), 1);
/// assert_eq!(frame.asset_ids(), &[3]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RenderFrame {
    /// Reserved slots per column.
    capacity: usize,
    asset_ids: Vec<u8>,
    pos_x: Vec<f32>,
    pos_y: Vec<f32>,
    orientation: Vec<f32>,
}

impl RenderFrame {
    /// Creates an empty frame with room for `capacity` entities.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            asset_ids: Vec::with_capacity(capacity),
            pos_x: Vec::with_capacity(capacity),
            pos_y: Vec::with_capacity(capacity),
            orientation: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of reserved slots per column.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entities currently in the frame.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns true if the frame holds no entities.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    /// Ensures room for at least `needed` entities.
    ///
    /// Grows to twice the requirement so a slowly growing population does
    /// not reallocate every step. Never shrinks.
    pub fn ensure_capacity(&mut self, needed: usize) {
        if needed <= self.capacity {
            return;
        }
        let target = needed.saturating_mul(2);
        let additional = target - self.size();
        self.asset_ids.reserve(additional);
        self.pos_x.reserve(additional);
        self.pos_y.reserve(additional);
        self.orientation.reserve(additional);
        self.capacity = target;
    }

    /// Removes every entity, keeping the allocation.
    pub fn clear(&mut self) {
        self.asset_ids.clear();
        self.pos_x.clear();
        self.pos_y.clear();
        self.orientation.clear();
    }

    /// Appends one entity to every column.
    #[inline]
    pub fn push(&mut self, x: f32, y: f32, orientation: f32, asset_id: u8) {
        if self.size() == self.capacity {
            self.ensure_capacity(self.capacity + 1);
        }
        self.pos_x.push(x);
        self.pos_y.push(y);
        self.orientation.push(orientation);
        self.asset_ids.push(asset_id);
    }

    /// Appends one gathered entity to every column.
    #[inline]
    pub fn push_view(&mut self, entity: EntityView) {
        self.push(entity.x, entity.y, entity.orientation, entity.asset_id);
    }

    /// Replaces the contents with `entities`.
    ///
    /// Capacity is grown once up front when the iterator reports its size.
    pub fn refill<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = EntityView>,
    {
        let entities = entities.into_iter();
        self.clear();
        self.ensure_capacity(entities.size_hint().0);
        for entity in entities {
            self.push_view(entity);
        }
    }
}

impl SnapshotSource for RenderFrame {
    #[inline]
    fn entity_count(&self) -> usize {
        self.size()
    }

    #[inline]
    fn pos_x(&self) -> &[f32] {
        &self.pos_x
    }

    #[inline]
    fn pos_y(&self) -> &[f32] {
        &self.pos_y
    }

    #[inline]
    fn orientation(&self) -> &[f32] {
        &self.orientation
    }

    #[inline]
    fn asset_ids(&self) -> &[u8] {
        &self.asset_ids
    }
}
