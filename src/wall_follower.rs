//! Solve a maze by keeping one hand on the wall.
//!
//! On a perfect maze every wall is connected to the outer boundary, so a walker that never lets go
//! of the wall tours the whole tree and must pass the end. The walk can revisit cells; the path
//! keeps every step while the visit trace keeps each cell once.

use log::warn;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::{self, Solution, SolveOutcome, Unreached, VisitRecord};
use crate::utils;

/// Which hand stays on the wall.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// Initial facing is the first open passage in this order.
const INITIAL_FACING_ORDER: [CompassPrimary; 4] = [CompassPrimary::East,
                                                   CompassPrimary::South,
                                                   CompassPrimary::West,
                                                   CompassPrimary::North];

impl Hand {
    /// Directions to try from a cell, most preferred first: towards the hand, straight on, away
    /// from the hand, then back the way we came.
    fn preferences(self, facing: CompassPrimary) -> [CompassPrimary; 4] {
        match self {
            Hand::Left => [facing.turn_left(), facing, facing.turn_right(), facing.opposite()],
            Hand::Right => [facing.turn_right(), facing, facing.turn_left(), facing.opposite()],
        }
    }
}

/// Walk from `start` to `end` following the wall on one `hand`.
///
/// Gives up after 4 * width * height steps. Getting stuck or giving up is not an error: the walk
/// so far is returned with a `NotReached` outcome.
pub fn wall_follower(grid: &Grid,
                     start: Cartesian2DCoordinate,
                     end: Cartesian2DCoordinate,
                     hand: Hand)
                     -> Result<Solution> {
    pathing::checked_index(grid, start)?;
    pathing::checked_index(grid, end)?;

    let step_cap = 4 * grid.size();
    let mut path = vec![start];
    let mut visits = vec![VisitRecord { coord: start, cost: 0 }];
    let mut seen = utils::coordinate_set(grid.size());
    seen.insert(start);

    let finish = |path: Vec<Cartesian2DCoordinate>, visits, outcome| {
        Ok(Solution { path, visits, outcome })
    };

    if start == end {
        return finish(path, visits, SolveOutcome::Found { distance: 0 });
    }

    let mut facing = match INITIAL_FACING_ORDER.iter()
        .cloned()
        .find(|&dir| grid.neighbour_if_open(start, dir).is_some()) {
        Some(dir) => dir,
        None => {
            warn!("{:?} hand walker is stuck at {}, it has no open passage", hand, start);
            return finish(path, visits, SolveOutcome::NotReached(Unreached::Stuck));
        }
    };

    let mut current = start;
    let mut steps = 0;
    while current != end {
        if steps >= step_cap {
            warn!("{:?} hand walker gave up after {} steps without reaching {}", hand, steps, end);
            return finish(path,
                          visits,
                          SolveOutcome::NotReached(Unreached::StepLimitExceeded { steps }));
        }

        let next_move = hand.preferences(facing)
            .iter()
            .filter_map(|&dir| grid.neighbour_if_open(current, dir).map(|next| (next, dir)))
            .next();
        let (next, dir) = match next_move {
            Some(step) => step,
            None => {
                warn!("{:?} hand walker is stuck at {} after {} steps", hand, current, steps);
                return finish(path, visits, SolveOutcome::NotReached(Unreached::Stuck));
            }
        };

        steps += 1;
        facing = dir;
        current = next;
        path.push(current);
        if seen.insert(current) {
            visits.push(VisitRecord { coord: current, cost: steps });
        }
    }

    finish(path, visits, SolveOutcome::Found { distance: steps })
}
