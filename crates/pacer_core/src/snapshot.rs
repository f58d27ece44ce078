//! # Snapshot Reader
//!
//! Zero-copy, structure-of-arrays view into simulation-owned render state.
//!
//! The simulation exposes one column per attribute through
//! [`SnapshotSource`]. [`Snapshot::read`] binds the four columns into a
//! single view scoped to the live entity count at the moment of the read.
//!
//! ## Memory Layout
//!
//! ```text
//! index:        0      1      2    ...   n-1
//! pos_x:     [ f32 ][ f32 ][ f32 ] ... [ f32 ]
//! pos_y:     [ f32 ][ f32 ][ f32 ] ... [ f32 ]
//! orient:    [ f32 ][ f32 ][ f32 ] ... [ f32 ]
//! asset_id:  [ u8  ][ u8  ][ u8  ] ... [ u8  ]
//! ```
//!
//! The view borrows the source, so the simulation cannot resize or
//! relocate its columns while a snapshot is alive. Re-read every tick.

use std::fmt;

use thiserror::Error;

/// Read-only access to the render columns a simulation owns.
///
/// Every column must hold exactly [`entity_count`](Self::entity_count)
/// elements when read. Columns may be reallocated between reads.
pub trait SnapshotSource {
    /// Number of live entities.
    fn entity_count(&self) -> usize;

    /// Horizontal positions, one per entity.
    fn pos_x(&self) -> &[f32];

    /// Vertical positions, one per entity.
    fn pos_y(&self) -> &[f32];

    /// Orientation angles in radians, one per entity.
    fn orientation(&self) -> &[f32];

    /// Visual asset identifiers, one per entity.
    ///
    /// Meaningful only to the presentation layer's asset table.
    fn asset_ids(&self) -> &[u8];
}

/// One of the four snapshot columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotField {
    /// Horizontal position column.
    PosX,
    /// Vertical position column.
    PosY,
    /// Orientation column.
    Orientation,
    /// Asset identifier column.
    AssetId,
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PosX => "pos_x",
            Self::PosY => "pos_y",
            Self::Orientation => "orientation",
            Self::AssetId => "asset_id",
        };
        f.write_str(name)
    }
}

/// Errors raised while binding a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// A column length disagrees with the reported entity count.
    #[error("snapshot inconsistency: `{field}` has {actual} elements but entity count is {expected}")]
    Inconsistent {
        /// The offending column.
        field: SnapshotField,
        /// Entity count reported by the source.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },
}

/// Result type for snapshot reads.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Render attributes of a single entity, gathered across the columns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntityView {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Orientation in radians.
    pub orientation: f32,
    /// Visual asset identifier.
    pub asset_id: u8,
}

/// Borrowed, index-aligned view of every live entity's render state.
///
/// Valid only for the lifetime of the borrow it was read from. Produced
/// fresh on every presentation tick and never mutated.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    size: usize,
    pos_x: &'a [f32],
    pos_y: &'a [f32],
    orientation: &'a [f32],
    asset_ids: &'a [u8],
}

impl<'a> Snapshot<'a> {
    /// Binds a snapshot over the columns of `source`.
    ///
    /// No entity data is copied. The entity count is sampled once and
    /// every column is checked against it.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Inconsistent`] for the first column whose
    /// length differs from `source.entity_count()`.
    pub fn read<S>(source: &'a S) -> SnapshotResult<Self>
    where
        S: SnapshotSource + ?Sized,
    {
        let size = source.entity_count();

        let pos_x = bind(SnapshotField::PosX, source.pos_x(), size)?;
        let pos_y = bind(SnapshotField::PosY, source.pos_y(), size)?;
        let orientation = bind(SnapshotField::Orientation, source.orientation(), size)?;
        let asset_ids = bind(SnapshotField::AssetId, source.asset_ids(), size)?;

        Ok(Self {
            size,
            pos_x,
            pos_y,
            orientation,
            asset_ids,
        })
    }

    /// A snapshot with no entities.
    #[must_use]
    pub const fn empty() -> Snapshot<'static> {
        Snapshot {
            size: 0,
            pos_x: &[],
            pos_y: &[],
            orientation: &[],
            asset_ids: &[],
        }
    }

    /// Number of entities in the snapshot.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the snapshot holds no entities.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Horizontal position column.
    #[inline]
    #[must_use]
    pub const fn pos_x(&self) -> &'a [f32] {
        self.pos_x
    }

    /// Vertical position column.
    #[inline]
    #[must_use]
    pub const fn pos_y(&self) -> &'a [f32] {
        self.pos_y
    }

    /// Orientation column (radians).
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> &'a [f32] {
        self.orientation
    }

    /// Asset identifier column.
    #[inline]
    #[must_use]
    pub const fn asset_ids(&self) -> &'a [u8] {
        self.asset_ids
    }

    /// Gathers the attributes of entity `index`.
    ///
    /// Returns `None` if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<EntityView> {
        Some(EntityView {
            x: *self.pos_x.get(index)?,
            y: *self.pos_y.get(index)?,
            orientation: *self.orientation.get(index)?,
            asset_id: *self.asset_ids.get(index)?,
        })
    }

    /// Iterates over every entity in index order.
    pub fn iter(&self) -> impl Iterator<Item = EntityView> + 'a {
        let Self {
            pos_x,
            pos_y,
            orientation,
            asset_ids,
            ..
        } = *self;

        pos_x
            .iter()
            .zip(pos_y)
            .zip(orientation)
            .zip(asset_ids)
            .map(|(((&x, &y), &orientation), &asset_id)| EntityView {
                x,
                y,
                orientation,
                asset_id,
            })
    }
}

fn bind<T>(field: SnapshotField, column: &[T], expected: usize) -> SnapshotResult<&[T]> {
    if column.len() == expected {
        Ok(column)
    } else {
        Err(SnapshotError::Inconsistent {
            field,
            expected,
            actual: column.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built source whose columns can disagree.
    struct Columns {
        count: usize,
        pos_x: Vec<f32>,
        pos_y: Vec<f32>,
        orientation: Vec<f32>,
        asset_ids: Vec<u8>,
    }

    impl Columns {
        fn aligned(n: usize) -> Self {
            Self {
                count: n,
                pos_x: (0..n).map(|i| i as f32).collect(),
                pos_y: (0..n).map(|i| i as f32 * 10.0).collect(),
                orientation: (0..n).map(|i| i as f32 * 0.1).collect(),
                asset_ids: (0..n).map(|i| (i % 5) as u8).collect(),
            }
        }
    }

    impl SnapshotSource for Columns {
        fn entity_count(&self) -> usize {
            self.count
        }
        fn pos_x(&self) -> &[f32] {
            &self.pos_x
        }
        fn pos_y(&self) -> &[f32] {
            &self.pos_y
        }
        fn orientation(&self) -> &[f32] {
            &self.orientation
        }
        fn asset_ids(&self) -> &[u8] {
            &self.asset_ids
        }
    }

    #[test]
    fn test_read_binds_exact_length() {
        for n in [0, 1, 7, 50] {
            let columns = Columns::aligned(n);
            let snapshot = Snapshot::read(&columns).unwrap();

            assert_eq!(snapshot.size(), n);
            assert_eq!(snapshot.pos_x().len(), n);
            assert_eq!(snapshot.pos_y().len(), n);
            assert_eq!(snapshot.orientation().len(), n);
            assert_eq!(snapshot.asset_ids().len(), n);
        }
    }

    #[test]
    fn test_columns_are_index_aligned() {
        let columns = Columns::aligned(6);
        let snapshot = Snapshot::read(&columns).unwrap();

        for (i, entity) in snapshot.iter().enumerate() {
            assert_eq!(entity.x, i as f32);
            assert_eq!(entity.y, i as f32 * 10.0);
            assert_eq!(entity.asset_id, (i % 5) as u8);
            assert_eq!(snapshot.get(i), Some(entity));
        }
        assert_eq!(snapshot.get(6), None);
    }

    #[test]
    fn test_read_is_zero_copy() {
        let columns = Columns::aligned(3);
        let snapshot = Snapshot::read(&columns).unwrap();
        assert!(std::ptr::eq(snapshot.pos_x().as_ptr(), columns.pos_x.as_ptr()));
        assert!(std::ptr::eq(snapshot.asset_ids().as_ptr(), columns.asset_ids.as_ptr()));
    }

    #[test]
    fn test_short_column_is_inconsistent() {
        let mut columns = Columns::aligned(4);
        columns.orientation.pop();

        let err = Snapshot::read(&columns).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::Inconsistent {
                field: SnapshotField::Orientation,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_count_larger_than_columns_is_inconsistent() {
        let mut columns = Columns::aligned(2);
        columns.count = 3;

        let err = Snapshot::read(&columns).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Inconsistent {
                field: SnapshotField::PosX,
                expected: 3,
                actual: 2,
            }
        ));
        assert!(err.to_string().contains("pos_x"));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.iter().count(), 0);
    }
}
