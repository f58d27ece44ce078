//! # Sprites
//!
//! Asset identifiers travel through the snapshot as a single byte; the
//! presentation layer maps them onto its own asset table.

use serde::{Deserialize, Serialize};

/// Visual asset an entity is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AssetId {
    /// Ground unit.
    Grunt = 0,
    /// Standard missile.
    #[default]
    Missile = 1,
    /// Small missile.
    SmallMissile = 2,
    /// Defensive tower.
    Tower = 3,
    /// Explosion effect.
    Explosion = 4,
}

impl AssetId {
    /// Every asset, in identifier order.
    pub const ALL: [Self; 5] = [
        Self::Grunt,
        Self::Missile,
        Self::SmallMissile,
        Self::Tower,
        Self::Explosion,
    ];

    /// Returns the wire identifier.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a wire identifier.
    ///
    /// Returns `None` for identifiers outside the asset table.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Grunt),
            1 => Some(Self::Missile),
            2 => Some(Self::SmallMissile),
            3 => Some(Self::Tower),
            4 => Some(Self::Explosion),
            _ => None,
        }
    }
}

/// Sprite component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    /// Asset to draw.
    pub asset_id: AssetId,
}

impl Sprite {
    /// Creates a sprite for `asset_id`.
    #[must_use]
    pub const fn new(asset_id: AssetId) -> Self {
        Self { asset_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ids_are_stable() {
        for (i, asset) in AssetId::ALL.iter().enumerate() {
            assert_eq!(usize::from(asset.as_u8()), i);
            assert_eq!(AssetId::from_u8(asset.as_u8()), Some(*asset));
        }
        assert_eq!(AssetId::from_u8(5), None);
    }
}
