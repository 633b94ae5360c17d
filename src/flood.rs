use crate::{CellPos, Grid, ToggleState, MAX_ROWS};

/// Results from [flood_fill]: every button reachable from the start cell
/// under one toggle state, plus whether the target was reached.
///
/// Buttons are emitted in breadth-first depth order; the order of buttons
/// sharing a depth is unspecified. The buffer is designed for reuse
/// across calls via [FloodResult::clear].
#[derive(Debug, Clone)]
pub struct FloodResult {
    /// Reachable buttons as `(position, step cost)` pairs.
    pub buttons: Vec<(CellPos, u16)>,

    /// Step cost of the target when `target_reached` is true.
    pub target_cost: u16,

    /// True if the target cell was reached. Only set when the target is
    /// not itself a button; a button target shows up in `buttons` instead.
    pub target_reached: bool,
}

impl FloodResult {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            buttons: Vec::with_capacity(16),
            target_cost: 0,
            target_reached: false,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.target_cost = 0;
        self.target_reached = false;
    }
}

impl Default for FloodResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Breadth-first expansion from `start` over the cells passable under
/// `state`, one bit-parallel step at a time.
///
/// Rows are 64-bit masks, so each step expands a whole frontier row with
/// two shifts and the vertical neighbour rows. Newly reached button cells
/// are recorded with the current step and act as sinks: the frontier does
/// not propagate through them. The start cell is pre-visited and never
/// emitted, even when it carries a button. Expansion stops when the
/// frontier dies or the target is reached.
pub fn flood_fill(grid: &Grid, state: ToggleState, start: CellPos, result: &mut FloodResult) {
    result.clear();

    let rows = grid.rows() as usize;
    let oob_mask = grid.oob_mask();

    let start_row = start.row() as usize;
    let target = grid.target();
    let target_row = target.row() as usize;
    let target_bit = target.bit();

    let mut visited = [0u64; MAX_ROWS];
    visited[start_row] = start.bit();

    let mut blocked = [0u64; MAX_ROWS];
    for (row, mask) in blocked.iter_mut().enumerate().take(rows) {
        *mask = grid.blocked_row(state, row);
    }

    let mut curr = [0u64; MAX_ROWS];
    let mut next = [0u64; MAX_ROWS];
    curr[start_row] = start.bit();

    let mut active_rows = 1u64 << start_row;
    let mut curr_written = active_rows;
    let row_mask = grid.row_range_mask();

    // Safety cap: no shortest path exceeds the position-space size.
    for step in 1..=(rows as u16 * 64) {
        let mut next_active_rows = 0u64;
        let mut next_written = 0u64;

        let mut work = (active_rows | (active_rows << 1) | (active_rows >> 1)) & row_mask;
        while work != 0 {
            let row = work.trailing_zeros() as usize;
            work &= work - 1;

            let cur = curr[row];
            let mut spread = ((cur << 1) | (cur >> 1)) & oob_mask;
            if row > 0 {
                spread |= curr[row - 1];
            }
            if row + 1 < rows {
                spread |= curr[row + 1];
            }

            let new_bits = spread & !blocked[row] & !visited[row];
            if new_bits == 0 {
                continue;
            }
            visited[row] |= new_bits;

            let mut button_hits = new_bits & grid.button_row(row);
            while button_hits != 0 {
                let col = button_hits.trailing_zeros();
                button_hits &= button_hits - 1;
                result.buttons.push((CellPos::pack(row as u32, col), step));
            }

            let non_button = new_bits & !grid.button_row(row);
            if non_button != 0 {
                next[row] |= non_button;
                next_active_rows |= 1u64 << row;
                next_written |= 1u64 << row;
            }

            if row == target_row && non_button & target_bit != 0 {
                result.target_reached = true;
                result.target_cost = step;
            }
        }

        if next_active_rows == 0 || result.target_reached {
            break;
        }

        std::mem::swap(&mut curr, &mut next);

        let mut to_clear = curr_written;
        while to_clear != 0 {
            let row = to_clear.trailing_zeros() as usize;
            next[row] = 0;
            to_clear &= to_clear - 1;
        }

        active_rows = next_active_rows;
        curr_written = next_written;
    }
}
