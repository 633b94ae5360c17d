use crate::{heuristic, CellPos, ToggleState};
use bevy_math::UVec2;
use num_traits::NumCast;
use std::fmt::{Debug, Formatter};

/// Maximum number of rows in a grid.
pub const MAX_ROWS: usize = 64;
/// Maximum number of columns in a grid.
pub const MAX_COLS: usize = 64;
/// Flat cell count of the position space, `MAX_ROWS * 64`.
pub const GRID_AREA: usize = MAX_ROWS * MAX_COLS;
/// Maximum number of wall/button color groups.
pub const MAX_COLORS: usize = 8;
/// Sentinel color for a cell that carries no button.
pub const NO_COLOR: u8 = u8::MAX;
/// The conventional color id of walls that no button toggles.
pub const PERMANENT_COLOR: u8 = 1;
/// Cost value meaning "unreachable".
pub const INF_COST: u16 = u16::MAX;

/// The five parallel cell layers a [Grid] is built from, each a row-major
/// slice of `rows * cols` elements.
///
/// Element types are generic so callers can hand over whatever integer
/// buffers they already hold; values are normalized through
/// [num_traits::cast]. The `walls`, `active` and `buttons` layers are
/// flags where any non-zero value counts as set. Color layers identify a
/// group when the value falls in `[0, 8)` (see [MAX_COLORS]); anything
/// else (including negative values) means "no color" for that cell.
#[derive(Debug, Clone, Copy)]
pub struct GridLayers<'a, M, C> {
    pub walls: &'a [M],
    pub active: &'a [M],
    pub buttons: &'a [M],
    pub wall_colors: &'a [C],
    pub button_colors: &'a [C],
    pub rows: u32,
    pub cols: u32,
}

/// The bitboard model of a puzzle grid: per-row 64-bit masks for walls,
/// color groups and buttons, plus the precomputed heuristic distances to
/// the target. Immutable after construction.
///
/// Points use `x` for the column and `y` for the row.
#[derive(Clone)]
pub struct Grid {
    initial_active: [u64; MAX_ROWS],
    color_masks: [[u64; MAX_COLORS]; MAX_ROWS],
    button_masks: [u64; MAX_ROWS],
    cell_color: [u8; GRID_AREA],
    h_map: [u16; GRID_AREA],
    oob_mask: u64,
    target: CellPos,
    rows: u32,
    cols: u32,
}

impl Grid {
    /// Build a grid from its cell layers.
    ///
    /// Walls whose color equals `permanent_color` are treated as never
    /// toggleable when precomputing the heuristic distance map;
    /// [PERMANENT_COLOR] is the conventional choice. A button whose color
    /// falls outside `[0, 8)` is treated as no button at all.
    ///
    /// # Parameters
    ///
    /// - `layers`: The five parallel cell layers and the grid dimensions.
    /// - `target`: The cell every solve navigates to, as `(col, row)`.
    /// - `permanent_color`: The color id of walls no button ever toggles.
    ///
    /// # Panics
    ///
    /// If `rows` or `cols` fall outside `[1, 64]`, if any layer's length
    /// is not `rows * cols`, or if `target` is out of bounds.
    #[must_use]
    pub fn new<M, C>(layers: &GridLayers<M, C>, target: UVec2, permanent_color: u8) -> Self
    where
        M: NumCast + Copy,
        C: NumCast + Copy,
    {
        let rows = layers.rows;
        let cols = layers.cols;
        assert!(rows >= 1 && rows as usize <= MAX_ROWS);
        assert!(cols >= 1 && cols as usize <= MAX_COLS);

        let area = (rows * cols) as usize;
        assert_eq!(layers.walls.len(), area);
        assert_eq!(layers.active.len(), area);
        assert_eq!(layers.buttons.len(), area);
        assert_eq!(layers.wall_colors.len(), area);
        assert_eq!(layers.button_colors.len(), area);

        assert!(target.x < cols && target.y < rows, "target out of bounds");
        let target = CellPos::from(target);

        let mut initial_active = [0u64; MAX_ROWS];
        let mut color_masks = [[0u64; MAX_COLORS]; MAX_ROWS];
        let mut button_masks = [0u64; MAX_ROWS];
        let mut cell_color = [NO_COLOR; GRID_AREA];
        let mut permanent = [0u64; MAX_ROWS];

        for row in 0..rows as usize {
            for col in 0..cols as usize {
                let flat_i = row * cols as usize + col;
                let bit = 1u64 << col;

                let is_wall = flag(layers.walls[flat_i]);
                let is_active = flag(layers.active[flat_i]);
                let is_button = flag(layers.buttons[flat_i]);
                let wall_color = color(layers.wall_colors[flat_i]);
                let button_color = color(layers.button_colors[flat_i]);

                if is_wall {
                    if let Some(wall_color) = wall_color {
                        color_masks[row][wall_color as usize] |= bit;
                        if wall_color == permanent_color {
                            permanent[row] |= bit;
                        }
                    }
                    if is_active {
                        initial_active[row] |= bit;
                    }
                }

                if is_button {
                    if let Some(button_color) = button_color {
                        button_masks[row] |= bit;
                        cell_color[CellPos::pack(row as u32, col as u32).index()] = button_color;
                    }
                }
            }
        }

        let mut h_map = [INF_COST; GRID_AREA];
        heuristic::fill_h_map(&mut h_map, &permanent, target, rows, cols);

        Self {
            initial_active,
            color_masks,
            button_masks,
            cell_color,
            h_map,
            oob_mask: col_range_mask(cols),
            target,
            rows,
            cols,
        }
    }

    /// The number of rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// The number of columns.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// The target cell, as `(col, row)`.
    #[inline]
    #[must_use]
    pub fn target(&self) -> CellPos {
        self.target
    }

    /// Determine if the given `(col, row)` point lies within the grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: UVec2) -> bool {
        point.x < self.cols && point.y < self.rows
    }

    /// Mask of valid columns, used to clip east/west bit-shifts.
    #[inline]
    #[must_use]
    pub fn oob_mask(&self) -> u64 {
        self.oob_mask
    }

    /// Mask of valid row indices.
    #[inline]
    #[must_use]
    pub(crate) fn row_range_mask(&self) -> u64 {
        col_range_mask(self.rows)
    }

    /// The mask of columns blocked in `row` under the given toggle state:
    /// the initial active mask with every toggled color's mask XORed in.
    #[inline]
    #[must_use]
    pub fn blocked_row(&self, state: ToggleState, row: usize) -> u64 {
        let mut blocked = self.initial_active[row];
        for color in state.colors() {
            blocked ^= self.color_masks[row][color as usize];
        }
        blocked
    }

    /// Mask of button cells in `row`.
    #[inline]
    #[must_use]
    pub(crate) fn button_row(&self, row: usize) -> u64 {
        self.button_masks[row]
    }

    /// Determine if the given cell carries a button.
    #[inline]
    #[must_use]
    pub fn is_button(&self, pos: CellPos) -> bool {
        self.button_masks[pos.row() as usize] & pos.bit() != 0
    }

    /// The color toggled by the button at the given cell, if any.
    #[inline]
    #[must_use]
    pub fn button_color(&self, pos: CellPos) -> Option<u8> {
        match self.cell_color[pos.index()] {
            NO_COLOR => None,
            color => Some(color),
        }
    }

    /// The precomputed lower-bound step distance from the given cell to
    /// the target, or [INF_COST] when no permanent-wall-free path exists.
    #[inline]
    #[must_use]
    pub fn h_cost(&self, pos: CellPos) -> u16 {
        self.h_map[pos.index()]
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[inline]
fn flag<M: NumCast + Copy>(value: M) -> bool {
    num_traits::cast::cast::<M, i64>(value).map_or(false, |v| v != 0)
}

#[inline]
fn color<C: NumCast + Copy>(value: C) -> Option<u8> {
    match num_traits::cast::cast::<C, i64>(value) {
        Some(v) if (0..MAX_COLORS as i64).contains(&v) => Some(v as u8),
        _ => None,
    }
}

#[inline]
fn col_range_mask(count: u32) -> u64 {
    if count as usize == 64 {
        u64::MAX
    } else {
        (1u64 << count) - 1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bevy_math::uvec2;

    fn corridor_layers() -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<i32>, Vec<i32>) {
        // 1x6: color-0 wall (active) at col 2, color-3 wall (inactive) at
        // col 4, button of color 0 at col 1.
        let walls = vec![0, 0, 1, 0, 1, 0];
        let active = vec![0, 0, 1, 0, 0, 0];
        let buttons = vec![0, 1, 0, 0, 0, 0];
        let wall_colors = vec![-1, -1, 0, -1, 3, -1];
        let button_colors = vec![-1, 0, -1, -1, -1, -1];
        (walls, active, buttons, wall_colors, button_colors)
    }

    fn corridor_grid() -> Grid {
        let (walls, active, buttons, wall_colors, button_colors) = corridor_layers();
        Grid::new(
            &GridLayers {
                walls: &walls,
                active: &active,
                buttons: &buttons,
                wall_colors: &wall_colors,
                button_colors: &button_colors,
                rows: 1,
                cols: 6,
            },
            uvec2(5, 0),
            PERMANENT_COLOR,
        )
    }

    #[test]
    fn test_blocked_row() {
        let grid = corridor_grid();

        assert_eq!(grid.blocked_row(ToggleState::CLEAR, 0), 0b000100);

        // Toggling color 0 opens col 2; toggling color 3 closes col 4.
        let state = ToggleState::CLEAR.flip(0);
        assert_eq!(grid.blocked_row(state, 0), 0b000000);

        let state = state.flip(3);
        assert_eq!(grid.blocked_row(state, 0), 0b010000);

        // Toggling a color twice restores the row.
        let state = state.flip(3).flip(0);
        assert_eq!(grid.blocked_row(state, 0), 0b000100);
    }

    #[test]
    fn test_buttons() {
        let grid = corridor_grid();
        assert!(grid.is_button(CellPos::pack(0, 1)));
        assert!(!grid.is_button(CellPos::pack(0, 2)));
        assert_eq!(grid.button_color(CellPos::pack(0, 1)), Some(0));
        assert_eq!(grid.button_color(CellPos::pack(0, 0)), None);
    }

    #[test]
    fn test_out_of_range_button_color_means_no_button() {
        let walls = vec![0u8, 0, 0];
        let active = vec![0u8, 0, 0];
        let buttons = vec![0u8, 1, 0];
        let wall_colors = vec![-1, -1, -1];
        let button_colors = vec![-1, 9, -1];
        let grid = Grid::new(
            &GridLayers {
                walls: &walls,
                active: &active,
                buttons: &buttons,
                wall_colors: &wall_colors,
                button_colors: &button_colors,
                rows: 1,
                cols: 3,
            },
            uvec2(2, 0),
            PERMANENT_COLOR,
        );
        assert!(!grid.is_button(CellPos::pack(0, 1)));
        assert_eq!(grid.button_color(CellPos::pack(0, 1)), None);
    }

    #[test]
    fn test_uncolored_wall_is_never_toggled() {
        let walls = vec![0u8, 1, 0];
        let active = vec![0u8, 1, 0];
        let buttons = vec![0u8, 0, 0];
        let wall_colors = vec![-1, -1, -1];
        let button_colors = vec![-1, -1, -1];
        let grid = Grid::new(
            &GridLayers {
                walls: &walls,
                active: &active,
                buttons: &buttons,
                wall_colors: &wall_colors,
                button_colors: &button_colors,
                rows: 1,
                cols: 3,
            },
            uvec2(2, 0),
            PERMANENT_COLOR,
        );
        for color in 0..MAX_COLORS as u8 {
            assert_eq!(grid.blocked_row(ToggleState::CLEAR.flip(color), 0), 0b010);
        }
    }

    #[test]
    fn test_oob_mask() {
        let grid = corridor_grid();
        assert_eq!(grid.oob_mask(), 0b111111);
        assert_eq!(grid.row_range_mask(), 0b1);
    }

    #[test]
    fn test_h_map_open_corridor() {
        let grid = corridor_grid();
        // Neither wall in the corridor is permanent, so the heuristic
        // sees a clear line to the target at col 5.
        for col in 0..6 {
            assert_eq!(grid.h_cost(CellPos::pack(0, col)), (5 - col) as u16);
        }
    }

    #[test]
    fn test_h_map_permanent_split() {
        let walls = vec![0u8, 1, 0];
        let active = vec![0u8, 1, 0];
        let buttons = vec![0u8, 0, 0];
        let wall_colors = vec![-1, 1, -1];
        let button_colors = vec![-1, -1, -1];
        let grid = Grid::new(
            &GridLayers {
                walls: &walls,
                active: &active,
                buttons: &buttons,
                wall_colors: &wall_colors,
                button_colors: &button_colors,
                rows: 1,
                cols: 3,
            },
            uvec2(2, 0),
            PERMANENT_COLOR,
        );
        assert_eq!(grid.h_cost(CellPos::pack(0, 2)), 0);
        assert_eq!(grid.h_cost(CellPos::pack(0, 1)), INF_COST);
        assert_eq!(grid.h_cost(CellPos::pack(0, 0)), INF_COST);
    }

    #[test]
    #[should_panic]
    fn test_rejects_oversize_dims() {
        let cells = vec![0u8; 65];
        let colors = vec![-1; 65];
        Grid::new(
            &GridLayers {
                walls: &cells,
                active: &cells,
                buttons: &cells,
                wall_colors: &colors,
                button_colors: &colors,
                rows: 1,
                cols: 65,
            },
            uvec2(0, 0),
            PERMANENT_COLOR,
        );
    }

    #[test]
    #[should_panic(expected = "target out of bounds")]
    fn test_rejects_oob_target() {
        let cells = vec![0u8; 4];
        let colors = vec![-1; 4];
        Grid::new(
            &GridLayers {
                walls: &cells,
                active: &cells,
                buttons: &cells,
                wall_colors: &colors,
                button_colors: &colors,
                rows: 2,
                cols: 2,
            },
            uvec2(2, 0),
            PERMANENT_COLOR,
        );
    }
}
