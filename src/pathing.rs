// Dijkstra's Algorithm over the maze passages.
//
// Every passage has the same length so the first time a cell is popped off the heap its distance
// is final. Cells are tracked by row-major index rather than by coordinate, so the per-cell
// bookkeeping is plain vectors sized to the grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use bit_set::BitSet;
use log::warn;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, ALL_DIRECTIONS};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// A cell reached during a solve.
///
/// `cost` is the distance from the start for Dijkstra and the number of steps walked so far for
/// the wall follower.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub coord: Cartesian2DCoordinate,
    pub cost: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unreached {
    /// No open route joins start and end.
    Disconnected,
    /// The walker stood on a cell with no open passage.
    Stuck,
    /// The walker gave up after this many steps.
    StepLimitExceeded { steps: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Found { distance: usize },
    NotReached(Unreached),
}

/// What a solver returns: the route it took, the cells it visited and whether it got there.
///
/// A `Found` solution's path runs from start to end and `distance == path.len() - 1`. Anything
/// else is a partial result; Dijkstra leaves the path empty, the wall follower keeps the walk so
/// far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: Vec<Cartesian2DCoordinate>,
    pub visits: Vec<VisitRecord>,
    pub outcome: SolveOutcome,
}

impl Solution {
    #[inline]
    pub fn is_found(&self) -> bool {
        self.distance().is_some()
    }

    #[inline]
    pub fn distance(&self) -> Option<usize> {
        match self.outcome {
            SolveOutcome::Found { distance } => Some(distance),
            SolveOutcome::NotReached(_) => None,
        }
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SolveOutcome::Found { distance } => write!(f, "reached the end in {} steps", distance),
            SolveOutcome::NotReached(Unreached::Disconnected) => write!(f, "end is unreachable"),
            SolveOutcome::NotReached(Unreached::Stuck) => write!(f, "stuck with no open passage"),
            SolveOutcome::NotReached(Unreached::StepLimitExceeded { steps }) => {
                write!(f, "gave up after {} steps", steps)
            }
        }
    }
}

/// Shortest distances from one start cell, shaped like the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    start_coordinate: Cartesian2DCoordinate,
    width: Width,
    height: Height,
    distances: Vec<Option<usize>>,
    max_distance: usize,
}

impl DistanceMap {
    fn unreached(grid: &Grid, start_coordinate: Cartesian2DCoordinate) -> DistanceMap {
        DistanceMap {
            start_coordinate,
            width: grid.width(),
            height: grid.height(),
            distances: vec![None; grid.size()],
            max_distance: 0,
        }
    }

    /// Flood fill the distance from `start_coordinate` to every cell it can reach.
    pub fn for_grid(grid: &Grid, start_coordinate: Cartesian2DCoordinate) -> Result<DistanceMap> {
        let start_index = checked_index(grid, start_coordinate)?;
        let mut distances = DistanceMap::unreached(grid, start_coordinate);
        distances.record(start_index, 0);

        // Breadth first: every cell on the frontier is the same distance from the start, and a
        // cell that already has a distance has its shortest one.
        let mut frontier = vec![start_index];
        let mut distance = 0;
        while !frontier.is_empty() {
            distance += 1;
            let mut new_frontier = vec![];
            for &cell_index in &frontier {
                for link_index in open_neighbour_indices(grid, cell_index) {
                    if distances.distances[link_index].is_none() {
                        distances.record(link_index, distance);
                        new_frontier.push(link_index);
                    }
                }
            }
            frontier = new_frontier;
        }

        Ok(distances)
    }

    #[inline]
    fn record(&mut self, index: usize, distance: usize) {
        self.distances[index] = Some(distance);
        self.max_distance = self.max_distance.max(distance);
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    /// The largest distance recorded.
    #[inline(always)]
    pub fn max(&self) -> usize {
        self.max_distance
    }

    #[inline]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0 {
            self.distances[coord.row_major_index(self.width)]
        } else {
            None
        }
    }

    /// How many cells have a distance.
    pub fn reached_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    /// Cells at the maximum distance, in row-major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .enumerate()
            .filter(|&(_, distance)| *distance == Some(furthest_distance))
            .map(|(index, _)| Cartesian2DCoordinate::from_row_major_index(index, self.width))
            .collect()
    }
}

/// The result of a wavefront solve: the solution plus every finalized distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wavefront {
    pub solution: Solution,
    pub distances: DistanceMap,
}

/// Shortest path from `start` to `end` with Dijkstra's algorithm.
///
/// The visit trace lists each finalized cell with its distance, in the order cells were popped.
/// The search stops as soon as `end` is finalized.
pub fn dijkstra(grid: &Grid,
                start: Cartesian2DCoordinate,
                end: Cartesian2DCoordinate)
                -> Result<Solution> {
    dijkstra_search(grid, start, end).map(|wavefront| wavefront.solution)
}

/// Dijkstra's algorithm, also keeping the distance of every cell finalized before the end was
/// reached, for wavefront visualisation.
///
/// Shares its search with `dijkstra`, so path and distance are always the same as `dijkstra`'s.
pub fn dijkstra_wavefront(grid: &Grid,
                          start: Cartesian2DCoordinate,
                          end: Cartesian2DCoordinate)
                          -> Result<Wavefront> {
    dijkstra_search(grid, start, end)
}

fn dijkstra_search(grid: &Grid,
                   start: Cartesian2DCoordinate,
                   end: Cartesian2DCoordinate)
                   -> Result<Wavefront> {
    let start_index = checked_index(grid, start)?;
    let end_index = checked_index(grid, end)?;
    let cells_count = grid.size();

    // Best known tentative distance. A cell is only pushed again when it strictly improves, and a
    // cell is never finalized twice.
    let mut best: Vec<Option<usize>> = vec![None; cells_count];
    let mut predecessors: Vec<Option<usize>> = vec![None; cells_count];
    let mut finalized = BitSet::with_capacity(cells_count);
    let mut distances = DistanceMap::unreached(grid, start);
    let mut visits = Vec::new();

    // Ties on distance are broken by the lower cell index.
    let mut heap = BinaryHeap::new();
    best[start_index] = Some(0);
    heap.push(Reverse((0usize, start_index)));

    while let Some(Reverse((distance, index))) = heap.pop() {
        if !finalized.insert(index) {
            continue;
        }
        distances.record(index, distance);
        visits.push(VisitRecord {
            coord: grid.index_to_grid_coordinate(index),
            cost: distance,
        });
        if index == end_index {
            break;
        }

        let candidate = distance + 1;
        for link_index in open_neighbour_indices(grid, index) {
            if best[link_index].map_or(true, |known| candidate < known) {
                best[link_index] = Some(candidate);
                predecessors[link_index] = Some(index);
                heap.push(Reverse((candidate, link_index)));
            }
        }
    }

    let solution = if finalized.contains(end_index) {
        let path = reconstruct_path(grid, &predecessors, end_index);
        Solution {
            outcome: SolveOutcome::Found { distance: path.len() - 1 },
            path,
            visits,
        }
    } else {
        warn!("no route from {} to {} after visiting {} cells", start, end, visits.len());
        Solution {
            path: Vec::new(),
            visits,
            outcome: SolveOutcome::NotReached(Unreached::Disconnected),
        }
    };

    Ok(Wavefront { solution, distances })
}

/// Follow predecessors back from the end, only called once the end is known to be reached.
fn reconstruct_path(grid: &Grid,
                    predecessors: &[Option<usize>],
                    end_index: usize)
                    -> Vec<Cartesian2DCoordinate> {
    let mut path = vec![grid.index_to_grid_coordinate(end_index)];
    let mut current = end_index;
    while let Some(previous) = predecessors[current] {
        path.push(grid.index_to_grid_coordinate(previous));
        current = previous;
    }
    path.reverse();
    path
}

/// Works only as long as we are looking at a perfect maze, otherwise you get some arbitrary long
/// path back: flood from the top left cell, the furthest cell found is one end of the longest path,
/// flood again from there to find the other end.
pub fn longest_path(grid: &Grid) -> Result<Vec<Cartesian2DCoordinate>> {
    let origin = Cartesian2DCoordinate::new(0, 0);
    let first_distances = DistanceMap::for_grid(grid, origin)?;
    let long_path_start = first_distances.furthest_points_on_grid()[0];

    let distances_from_start = DistanceMap::for_grid(grid, long_path_start)?;
    let long_path_end = distances_from_start.furthest_points_on_grid()[0];

    Ok(dijkstra(grid, long_path_start, long_path_end)?.path)
}

/// Does every step of the path move between two cells linked from both sides?
pub fn is_connected_path(grid: &Grid, path: &[Cartesian2DCoordinate]) -> bool {
    path.iter().all(|&coord| grid.is_valid_coordinate(coord)) &&
    path.windows(2).all(|pair| grid.is_linked(pair[0], pair[1]))
}

fn open_neighbour_indices(grid: &Grid, index: usize) -> SmallVec<[usize; 4]> {
    let coord = grid.index_to_grid_coordinate(index);
    ALL_DIRECTIONS.iter()
        .filter_map(|&dir| grid.neighbour_if_open(coord, dir))
        .filter_map(|neighbour| grid.grid_coordinate_to_index(neighbour))
        .collect()
}

pub(crate) fn checked_index(grid: &Grid, coord: Cartesian2DCoordinate) -> Result<usize> {
    grid.grid_coordinate_to_index(coord)
        .ok_or_else(|| ErrorKind::InvalidCoordinate(coord.x, coord.y).into())
}
