use fnv::FnvHasher;
use std::{collections::HashSet, hash::BuildHasherDefault};

use crate::cells::Cartesian2DCoordinate;

/// Set of grid cells keyed by their `(x, y)` coordinate, hashed with FNV.
pub type CoordinateSet = HashSet<Cartesian2DCoordinate, BuildHasherDefault<FnvHasher>>;

/// An empty `CoordinateSet` with room for `capacity` cells without rehashing. Callers size it by
/// the most cells they can insert: the grid size for a walker, the path length for an overlay.
pub fn coordinate_set(capacity: usize) -> CoordinateSet {
    CoordinateSet::with_capacity_and_hasher(capacity, BuildHasherDefault::default())
}
