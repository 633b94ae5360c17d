#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use bevy_math::{uvec2, UVec2};
use std::ops::Deref;

/// A grid cell position, packed as `row * 64 + col`.
///
/// Rows and columns occupy six bits each regardless of the actual grid
/// width, so a packed value can be unpacked by shift and mask alone.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos(u16);

impl CellPos {
    pub const COL_MASK: u16 = 0b11_1111;
    pub const ROW_SHIFT: u16 = 6;

    /// Pack a row and column into a [CellPos].
    ///
    /// Both components must be less than 64.
    #[inline]
    #[must_use]
    pub fn pack(row: u32, col: u32) -> CellPos {
        debug_assert!(row < 64);
        debug_assert!(col < 64);
        CellPos(((row as u16) << Self::ROW_SHIFT) | (col as u16 & Self::COL_MASK))
    }

    /// Get the row component.
    #[inline]
    #[must_use]
    pub fn row(&self) -> u32 {
        (self.0 >> Self::ROW_SHIFT) as u32
    }

    /// Get the column component.
    #[inline]
    #[must_use]
    pub fn col(&self) -> u32 {
        (self.0 & Self::COL_MASK) as u32
    }

    /// The packed value as an index into a flat `rows * 64` array.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The single-bit column mask of this cell within its row.
    #[inline]
    #[must_use]
    pub fn bit(&self) -> u64 {
        1 << self.col()
    }

    /// Convert to a point where `x` is the column and `y` is the row.
    #[inline]
    #[must_use]
    pub fn as_uvec2(&self) -> UVec2 {
        uvec2(self.col(), self.row())
    }
}

impl From<UVec2> for CellPos {
    /// Interprets `x` as the column and `y` as the row.
    #[inline]
    fn from(point: UVec2) -> Self {
        Self::pack(point.y, point.x)
    }
}

impl From<CellPos> for UVec2 {
    #[inline]
    fn from(pos: CellPos) -> Self {
        pos.as_uvec2()
    }
}

impl Deref for CellPos {
    type Target = u16;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
