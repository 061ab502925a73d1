//! Perfect maze generators.
//!
//! Every generator carves a spanning tree into a fresh grid, so exactly one route joins any two
//! cells. They share the same shape: `(width, height, seed) -> Result<Grid>`. A missing seed is
//! drawn from entropy and logged, so any maze can be regenerated.

use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use error_chain::bail;
use log::{debug, trace};

use crate::cells::{self, Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;
use crate::rng::Lcg;
use crate::units::{Height, Width};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MazeAlgorithm {
    Dfs,
    Prims,
    Wilson,
}

pub const ALL_ALGORITHMS: [MazeAlgorithm; 3] = [MazeAlgorithm::Dfs,
                                                MazeAlgorithm::Prims,
                                                MazeAlgorithm::Wilson];

impl MazeAlgorithm {
    pub fn generate(self, width: Width, height: Height, seed: Option<u64>) -> Result<Grid> {
        match self {
            MazeAlgorithm::Dfs => recursive_backtracker(width, height, seed),
            MazeAlgorithm::Prims => prims(width, height, seed),
            MazeAlgorithm::Wilson => wilson(width, height, seed),
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            MazeAlgorithm::Dfs => "dfs",
            MazeAlgorithm::Prims => "prim",
            MazeAlgorithm::Wilson => "wilson",
        };
        f.write_str(name)
    }
}

impl FromStr for MazeAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<MazeAlgorithm> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" | "backtracker" | "recursive-backtracker" => Ok(MazeAlgorithm::Dfs),
            "prim" | "prims" => Ok(MazeAlgorithm::Prims),
            "wilson" => Ok(MazeAlgorithm::Wilson),
            other => bail!("unknown maze algorithm '{}'", other),
        }
    }
}

fn start_generation(name: &str, width: Width, height: Height, seed: Option<u64>) -> Result<(Grid, Lcg)> {
    let grid = Grid::new(width, height)?;
    let rng = Lcg::new(seed);
    debug!("generating {}x{} maze with {} (seed {})", width.0, height.0, name, rng.seed());
    Ok((grid, rng))
}

/// Depth first search maze generation with an explicit stack, the recursive backtracker.
///
/// Starting from a random cell, keep walking to a random unvisited neighbour of the cell on top of
/// the stack, carving as we go. A cell with no unvisited neighbours is popped, backtracking to the
/// most recent cell that still has somewhere new to go. Produces long winding corridors with few
/// dead ends.
pub fn recursive_backtracker(width: Width, height: Height, seed: Option<u64>) -> Result<Grid> {
    let (mut grid, mut rng) = start_generation("recursive backtracker", width, height, seed)?;

    let mut visited = BitSet::with_capacity(grid.size());
    let mut stack: Vec<Cartesian2DCoordinate> = Vec::with_capacity(grid.size());

    let start = grid.random_cell(&mut rng);
    visited.insert(index_of(&grid, start));
    stack.push(start);

    while let Some(&current) = stack.last() {
        let unvisited_neighbours = grid.neighbours(current)
            .into_iter()
            .filter(|&(coord, _)| !visited.contains(index_of(&grid, coord)))
            .collect::<cells::NeighbourSmallVec>();

        if let Some(&(next, dir)) = rng.choose(&unvisited_neighbours) {
            grid.carve(current, dir)?;
            visited.insert(index_of(&grid, next));
            stack.push(next);
        } else {
            stack.pop();
        }
    }

    debug!("recursive backtracker carved {} links", grid.links_count());
    Ok(grid)
}

/// A frontier candidate: a cell already in the maze, an adjacent cell and the direction between them.
type FrontierEdge = (Cartesian2DCoordinate, Cartesian2DCoordinate, CompassPrimary);

/// Randomized Prim's algorithm.
///
/// Grows the maze outwards from one random cell by repeatedly carving a random edge from the
/// frontier of edges leaving the maze. A candidate cell can sit on the frontier more than once,
/// once per maze cell that borders it; entries are picked uniformly, not weighted by cell.
/// Corridors come out short and bushy compared to the backtracker.
pub fn prims(width: Width, height: Height, seed: Option<u64>) -> Result<Grid> {
    let (mut grid, mut rng) = start_generation("randomized prim's", width, height, seed)?;

    let mut in_maze = BitSet::with_capacity(grid.size());
    let mut frontier: Vec<FrontierEdge> = Vec::new();

    let start = grid.random_cell(&mut rng);
    in_maze.insert(index_of(&grid, start));
    frontier.extend(grid.neighbours(start)
                        .into_iter()
                        .map(|(neighbour, dir)| (start, neighbour, dir)));

    while !frontier.is_empty() {
        let pick = rng.gen_index(frontier.len());
        let (from, candidate, dir) = frontier.swap_remove(pick);

        // `insert` is false when the candidate already joined the maze through another edge.
        if in_maze.insert(index_of(&grid, candidate)) {
            grid.carve(from, dir)?;
            frontier.extend(grid.neighbours(candidate)
                                .into_iter()
                                .filter(|&(neighbour, _)| !in_maze.contains(index_of(&grid, neighbour)))
                                .map(|(neighbour, next_dir)| (candidate, neighbour, next_dir)));
        }
    }

    debug!("prim's carved {} links", grid.links_count());
    Ok(grid)
}

/// Wilson's algorithm, loop erased random walks.
///
/// The maze starts as one random cell. From a random cell outside the maze take a random walk until
/// it hits the maze, erasing any loop the moment the walk crosses its own path, then carve the
/// remaining walk into the maze. Repeat until every cell is in the maze.
///
/// Unlike the other generators the result is drawn uniformly from all spanning trees of the grid,
/// so it has no texture bias. Early walks are slow as they wander until they find the single seed
/// cell.
pub fn wilson(width: Width, height: Height, seed: Option<u64>) -> Result<Grid> {
    let (mut grid, mut rng) = start_generation("wilson's", width, height, seed)?;
    let cells_count = grid.size();

    let mut in_maze = BitSet::with_capacity(cells_count);
    let mut remaining = RemainingCells::all(cells_count);
    let first = index_of(&grid, grid.random_cell(&mut rng));
    in_maze.insert(first);
    remaining.remove(first);

    let mut walk_positions: Vec<Option<usize>> = vec![None; cells_count];
    while !remaining.is_empty() {
        let walk_start = grid.index_to_grid_coordinate(remaining.nth(rng.gen_index(remaining.len())));
        let (walk, exits) = loop_erased_walk(&grid, &in_maze, walk_start, &mut rng, &mut walk_positions);
        trace!("wilson walk from {} carves {} links", walk_start, exits.len());

        for (&coord, &dir) in walk.iter().zip(exits.iter()) {
            grid.carve(coord, dir)?;
            let index = index_of(&grid, coord);
            if in_maze.insert(index) {
                remaining.remove(index);
            }
        }
    }

    debug!("wilson's carved {} links", grid.links_count());
    Ok(grid)
}

/// Walk randomly from `start` until reaching a cell in the maze.
///
/// Returns the loop free walk (ending on the maze cell) and the direction taken out of every cell
/// of the walk except the last, so `exits.len() == walk.len() - 1`.
///
/// `walk_positions` is indexed by cell and must be all `None` on entry. It is left that way.
fn loop_erased_walk(grid: &Grid,
                    in_maze: &BitSet,
                    start: Cartesian2DCoordinate,
                    rng: &mut Lcg,
                    walk_positions: &mut [Option<usize>])
                    -> (Vec<Cartesian2DCoordinate>, Vec<CompassPrimary>) {
    let mut walk = vec![start];
    let mut exits: Vec<CompassPrimary> = Vec::new();
    walk_positions[index_of(grid, start)] = Some(0);

    let mut current = start;
    while !in_maze.contains(index_of(grid, current)) {
        let neighbours = grid.neighbours(current);
        let &(next, dir) = match rng.choose(&neighbours) {
            Some(step) => step,
            // Only a 1x1 grid has no neighbours, and its single cell is always in the maze.
            None => break,
        };

        let next_index = index_of(grid, next);
        if let Some(loop_start) = walk_positions[next_index] {
            for erased in walk.drain(loop_start + 1..) {
                walk_positions[index_of(grid, erased)] = None;
            }
            exits.truncate(loop_start);
        } else {
            exits.push(dir);
            walk.push(next);
            walk_positions[next_index] = Some(walk.len() - 1);
        }
        current = next;
    }

    for &coord in &walk {
        walk_positions[index_of(grid, coord)] = None;
    }
    (walk, exits)
}

/// Cell indices not yet in the maze, in row-major order.
///
/// A Fenwick tree of 0/1 counts, so removing a cell and finding the nth remaining cell are both
/// O(log n).
struct RemainingCells {
    // 1-based; tree[i] counts the cells in (i - lowbit(i), i].
    tree: Vec<usize>,
    len: usize,
}

impl RemainingCells {
    fn all(count: usize) -> RemainingCells {
        let tree = (0..count + 1).map(|i| i & i.wrapping_neg()).collect();
        RemainingCells { tree, len: count }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Must only be called for a cell that is still remaining.
    fn remove(&mut self, index: usize) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] -= 1;
            i += i & i.wrapping_neg();
        }
        self.len -= 1;
    }

    /// The remaining cell at `rank`, counting from zero in row-major order.
    fn nth(&self, rank: usize) -> usize {
        debug_assert!(rank < self.len);
        let mut position = 0;
        let mut rank_left = rank;
        let mut step = self.tree.len().next_power_of_two();
        while step > 0 {
            let next = position + step;
            if next < self.tree.len() && self.tree[next] <= rank_left {
                position = next;
                rank_left -= self.tree[next];
            }
            step >>= 1;
        }
        position
    }
}

#[inline]
fn index_of(grid: &Grid, coord: Cartesian2DCoordinate) -> usize {
    coord.row_major_index(grid.width())
}
