//! ToggleMaze
//! ==========
//!
//! A shortest-path planner for rectangular grids where color-grouped
//! toggleable walls block movement and pressing a colored button flips
//! the active state of every wall sharing that color.
//!
//! The search runs on two levels: an A* over `(toggle state, position)`
//! pairs whose edges are bit-parallel flood-fill sweeps over 64-bit row
//! masks, and a per-segment BFS that stitches the chosen button presses
//! back into a concrete cell-by-cell path. Grids up to 64x64 cells and
//! 8 colors are supported.

mod cell;
mod flood;
mod grid;
mod heuristic;
mod solver;
mod toggle;
mod visited;

pub use self::{cell::*, flood::*, grid::*, solver::*, toggle::*, visited::*};

/// The crate name and version, e.g. `"toggle_maze v0.2.0"`.
#[inline]
#[must_use]
pub fn version() -> &'static str {
    concat!("toggle_maze v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod test {
    #[test]
    fn test_version() {
        assert!(super::version().starts_with("toggle_maze v0."));
    }
}
