use crate::{CellPos, GRID_AREA, INF_COST, MAX_ROWS};
use std::collections::VecDeque;

/// Fill `h_map` with the 4-neighbour BFS distance from every cell to
/// `target`, treating only the cells set in `permanent` as blocked.
/// Unreachable cells retain [INF_COST].
///
/// Every toggle state unblocks at least as many cells as the
/// permanent-walls-only configuration, so the resulting distances are a
/// lower bound on the true path cost from any state.
pub(crate) fn fill_h_map(
    h_map: &mut [u16; GRID_AREA],
    permanent: &[u64; MAX_ROWS],
    target: CellPos,
    rows: u32,
    cols: u32,
) {
    h_map.fill(INF_COST);

    let mut queue = VecDeque::with_capacity(256);
    h_map[target.index()] = 0;
    queue.push_back(target);

    while let Some(pos) = queue.pop_front() {
        let row = pos.row();
        let col = pos.col();
        let next_dist = h_map[pos.index()] + 1;

        let neighbors = [
            (row.wrapping_sub(1), col),
            (row + 1, col),
            (row, col.wrapping_sub(1)),
            (row, col + 1),
        ];
        for (nbr_row, nbr_col) in neighbors {
            if nbr_row >= rows || nbr_col >= cols {
                continue;
            }
            if permanent[nbr_row as usize] & (1u64 << nbr_col) != 0 {
                continue;
            }
            let nbr = CellPos::pack(nbr_row, nbr_col);
            if h_map[nbr.index()] != INF_COST {
                continue;
            }
            h_map[nbr.index()] = next_dist;
            queue.push_back(nbr);
        }
    }
}
