#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::{
    flood_fill, CellPos, FloodResult, Grid, ToggleState, VisitedTable, DEFAULT_VISITED_CAPACITY,
    GRID_AREA, MAX_ROWS,
};
use bevy_math::UVec2;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::{Debug, Formatter};

const NO_PARENT: u32 = u32::MAX;

/// An abstract waypoint discovered by the search: the toggle state after
/// pressing the button at `pos`, the cumulative step cost of getting
/// there, and the pool index of the node it was expanded from. Nodes are
/// never mutated after insertion.
#[derive(Debug, Clone, Copy)]
struct Node {
    state: ToggleState,
    parent: u32,
    pos: CellPos,
    g_cost: u16,
}

#[derive(Debug, Clone, Copy, Default)]
struct ParentEntry {
    pos: CellPos,
    gen: u16,
}

/// Results from [Solver::solve].
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Cells from the start to the target inclusive, each one grid step
    /// apart, as `(col, row)` points. Never empty.
    pub path: Vec<UVec2>,

    /// The step cost of the path, `path.len() - 1`.
    pub cost: u32,

    /// The number of abstract nodes expanded to find the path.
    pub considered_nodes: u32,
}

/// A shortest-path planner over one [Grid].
///
/// The search runs on two levels. An A* over `(toggle state, position)`
/// pairs picks which buttons to press and in what order, using
/// [flood_fill] to find every button reachable from a node in one
/// bit-parallel sweep. The chosen waypoint chain is then stitched back
/// into a cell-by-cell path with a per-segment BFS that respects the wall
/// state as it evolves.
///
/// All scratch buffers (node pool, open heap, visited table, segment
/// parent table) are owned by the solver and reused across calls, so
/// [Solver::solve] takes `&mut self`. Separate instances are independent.
pub struct Solver {
    grid: Grid,
    pool: Vec<Node>,
    open: BinaryHeap<Reverse<u64>>,
    visited: VisitedTable,
    flood: FloodResult,
    seg_parent: Vec<ParentEntry>,
    seg_queue: Vec<CellPos>,
    seg_gen: u16,
    seg_blocked: [u64; MAX_ROWS],
}

impl Solver {
    #[inline]
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self::with_visited_capacity(grid, DEFAULT_VISITED_CAPACITY)
    }

    /// Create a solver with a specific initial visited-table capacity.
    /// The table grows on demand either way; sizing it up front avoids
    /// rehashing on grids known to produce large searches.
    ///
    /// # Panics
    ///
    /// If `capacity` is not a power of two.
    #[must_use]
    pub fn with_visited_capacity(grid: Grid, capacity: usize) -> Self {
        Self {
            grid,
            pool: Vec::new(),
            open: BinaryHeap::with_capacity(256),
            visited: VisitedTable::with_capacity(capacity),
            flood: FloodResult::new(),
            seg_parent: vec![ParentEntry::default(); GRID_AREA],
            seg_queue: Vec::with_capacity(256),
            seg_gen: 1,
            seg_blocked: [0; MAX_ROWS],
        }
    }

    /// The grid this solver plans over.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Find a shortest path from `start` to the grid's target, pressing
    /// whatever buttons the plan requires.
    ///
    /// # Parameters
    ///
    /// - `start`: The starting cell, as `(col, row)`.
    ///
    /// # Returns
    ///
    /// `None` when no sequence of button presses makes the target
    /// reachable. Otherwise `Some` of a [SolveResult] whose path begins
    /// with `start` and ends with the target.
    ///
    /// # Panics
    ///
    /// If `start` is out of bounds.
    pub fn solve(&mut self, start: UVec2) -> Option<SolveResult> {
        assert!(self.grid.contains(start), "start out of bounds");
        let start_pos = CellPos::from(start);
        let target_pos = self.grid.target();

        if start_pos == target_pos {
            return Some(SolveResult {
                path: vec![start],
                cost: 0,
                considered_nodes: 0,
            });
        }

        self.pool.clear();
        self.pool.reserve(256);
        self.open.clear();
        self.visited.begin_search();

        let start_h = self.grid.h_cost(start_pos);

        self.pool.push(Node {
            state: ToggleState::CLEAR,
            parent: NO_PARENT,
            pos: start_pos,
            g_cost: 0,
        });
        self.open.push(Reverse(pack_key(u32::from(start_h), 0)));
        self.visited
            .insert_or_update(ToggleState::CLEAR, start_pos, 0);

        let mut best_node = NO_PARENT;
        let mut best_total = u32::MAX;
        let mut considered = 0u32;

        while let Some(Reverse(packed)) = self.open.pop() {
            let f_cost = (packed >> 32) as u32;
            if f_cost >= best_total {
                break;
            }

            let node_i = packed as u32;
            let node = self.pool[node_i as usize];

            if self.visited.get(node.state, node.pos) < node.g_cost {
                continue;
            }

            flood_fill(&self.grid, node.state, node.pos, &mut self.flood);
            considered += 1;

            if self.flood.target_reached {
                let total = u32::from(node.g_cost) + u32::from(self.flood.target_cost);
                if total < best_total {
                    best_total = total;
                    best_node = node_i;
                }
            }

            for button_i in 0..self.flood.buttons.len() {
                let (btn_pos, step_cost) = self.flood.buttons[button_i];
                let color = match self.grid.button_color(btn_pos) {
                    Some(color) => color,
                    None => continue,
                };

                let new_state = node.state.flip(color);
                let nbr_g = node.g_cost.saturating_add(step_cost);

                if btn_pos == target_pos {
                    // Arriving on a button that is the target ends the
                    // plan; the press itself no longer matters.
                    if u32::from(nbr_g) < best_total {
                        best_total = u32::from(nbr_g);
                        best_node = self.pool.len() as u32;
                        self.pool.push(Node {
                            state: new_state,
                            parent: node_i,
                            pos: btn_pos,
                            g_cost: nbr_g,
                        });
                    }
                    continue;
                }

                let nbr_h = self.grid.h_cost(btn_pos);
                let nbr_f = u32::from(nbr_g) + u32::from(nbr_h);
                if nbr_f >= best_total {
                    continue;
                }
                if !self.visited.insert_or_update(new_state, btn_pos, nbr_g) {
                    continue;
                }

                let new_i = self.pool.len() as u32;
                self.pool.push(Node {
                    state: new_state,
                    parent: node_i,
                    pos: btn_pos,
                    g_cost: nbr_g,
                });
                self.open.push(Reverse(pack_key(nbr_f, new_i)));
            }
        }

        if best_node == NO_PARENT {
            return None;
        }

        let waypoints = self.backtrack(best_node);

        let mut path: Vec<UVec2> = Vec::with_capacity(1024);
        let mut seg_state = ToggleState::CLEAR;
        let mut prev_pos = start_pos;

        self.compute_blocked(seg_state);

        for waypoint in waypoints {
            let segment = self.path_segment(prev_pos, waypoint);
            append_segment(&mut path, segment);
            if let Some(color) = self.grid.button_color(waypoint) {
                seg_state = seg_state.flip(color);
                self.compute_blocked(seg_state);
            }
            prev_pos = waypoint;
        }

        let segment = self.path_segment(prev_pos, target_pos);
        append_segment(&mut path, segment);

        Some(SolveResult {
            path,
            cost: best_total,
            considered_nodes: considered,
        })
    }

    /// Walk the parent chain from the goal node to the root and return
    /// the pressed-button positions in press order, root excluded.
    fn backtrack(&self, goal_i: u32) -> Vec<CellPos> {
        let mut chain = Vec::new();
        let mut node_i = goal_i;
        while node_i != NO_PARENT {
            let node = &self.pool[node_i as usize];
            chain.push(node.pos);
            node_i = node.parent;
        }
        chain.pop();
        chain.reverse();
        chain
    }

    fn compute_blocked(&mut self, state: ToggleState) {
        for row in 0..self.grid.rows() as usize {
            self.seg_blocked[row] = self.grid.blocked_row(state, row);
        }
    }

    /// BFS from `from_pos` to `to_pos` under the current segment blocked
    /// masks. Button cells other than the destination are impassable;
    /// the abstract search chose a specific next press, so intermediate
    /// buttons must not be touched. Returns both endpoints inclusive, or
    /// an empty path when the destination cannot be reached.
    fn path_segment(&mut self, from_pos: CellPos, to_pos: CellPos) -> Vec<UVec2> {
        if from_pos == to_pos {
            return vec![from_pos.as_uvec2()];
        }

        let rows = self.grid.rows();
        let cols = self.grid.cols();

        self.seg_gen = match self.seg_gen.checked_add(1) {
            Some(gen) => gen,
            None => {
                self.seg_parent.fill(ParentEntry::default());
                1
            }
        };
        let gen = self.seg_gen;

        self.seg_queue.clear();
        self.seg_parent[from_pos.index()] = ParentEntry { pos: from_pos, gen };
        self.seg_queue.push(from_pos);

        let mut head = 0;
        let mut found = false;

        'bfs: while head < self.seg_queue.len() {
            let cur_pos = self.seg_queue[head];
            head += 1;
            let row = cur_pos.row();
            let col = cur_pos.col();

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
                if self.seg_blocked[nbr_row as usize] & (1u64 << nbr_col) != 0 {
                    continue;
                }
                let nbr_pos = CellPos::pack(nbr_row, nbr_col);
                if self.seg_parent[nbr_pos.index()].gen == gen {
                    continue;
                }
                let is_dest = nbr_pos == to_pos;
                if !is_dest && self.grid.is_button(nbr_pos) {
                    continue;
                }
                self.seg_parent[nbr_pos.index()] = ParentEntry { pos: cur_pos, gen };
                if is_dest {
                    found = true;
                    break 'bfs;
                }
                self.seg_queue.push(nbr_pos);
            }
        }

        if !found {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut cur_pos = to_pos;
        while cur_pos != from_pos {
            path.push(cur_pos.as_uvec2());
            cur_pos = self.seg_parent[cur_pos.index()].pos;
        }
        path.push(from_pos.as_uvec2());
        path.reverse();
        path
    }
}

impl Debug for Solver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

#[inline]
fn pack_key(f_cost: u32, node_i: u32) -> u64 {
    (u64::from(f_cost) << 32) | u64::from(node_i)
}

/// Both segment endpoints are inclusive; drop the first cell of the new
/// segment when it duplicates the last cell already in the path.
fn append_segment(path: &mut Vec<UVec2>, segment: Vec<UVec2>) {
    let skip = usize::from(path.last() == segment.first() && !segment.is_empty());
    path.extend(segment.into_iter().skip(skip));
}
