use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

use crate::units::{ColumnIndex, Height, RowIndex, Width};

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> Cartesian2DCoordinate {
        let Width(w) = width;
        Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)
    }

    #[inline]
    pub fn row_major_index(&self, width: Width) -> usize {
        self.y as usize * width.0 + self.x as usize
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    /// The coordinate one step away in `dir`, if that step stays inside a `width` * `height` grid.
    pub fn offset(&self, dir: CompassPrimary, width: Width, height: Height) -> Option<Self> {
        let (dx, dy) = dir.offset();
        let nx = i64::from(self.x) + i64::from(dx);
        let ny = i64::from(self.y) + i64::from(dy);
        if nx >= 0 && ny >= 0 && (nx as usize) < width.0 && (ny as usize) < height.0 {
            Some(Cartesian2DCoordinate::new(nx as u32, ny as u32))
        } else {
            None
        }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four passages out of a square cell.
///
/// Each direction owns a distinct bit so a cell can store any subset of open passages in a `u8`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub const ALL_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                 CompassPrimary::South,
                                                 CompassPrimary::West,
                                                 CompassPrimary::East];

/// Every bit a cell may legitimately carry.
pub const ALL_DIRECTION_BITS: u8 = 0b1111;

pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;
pub type NeighbourSmallVec = SmallVec<[(Cartesian2DCoordinate, CompassPrimary); 4]>;

impl CompassPrimary {
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            CompassPrimary::North => 1,
            CompassPrimary::South => 2,
            CompassPrimary::West => 4,
            CompassPrimary::East => 8,
        }
    }

    pub fn from_bit(bit: u8) -> Option<CompassPrimary> {
        ALL_DIRECTIONS.iter().cloned().find(|dir| dir.bit() == bit)
    }

    /// Unit (dx, dy) step. y grows southwards.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::South => (0, 1),
            CompassPrimary::West => (-1, 0),
            CompassPrimary::East => (1, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
            CompassPrimary::East => CompassPrimary::West,
        }
    }

    /// The direction on the left hand side when facing `self`.
    #[inline]
    pub fn turn_left(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::East,
            CompassPrimary::East => CompassPrimary::North,
        }
    }

    #[inline]
    pub fn turn_right(self) -> CompassPrimary {
        self.turn_left().opposite()
    }

    /// Directions whose bits are set in `mask`, in `ALL_DIRECTIONS` order.
    pub fn directions_in(mask: u8) -> DirectionSmallVec {
        ALL_DIRECTIONS.iter()
            .cloned()
            .filter(|dir| mask & dir.bit() != 0)
            .collect()
    }
}

impl fmt::Display for CompassPrimary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            CompassPrimary::North => "N",
            CompassPrimary::South => "S",
            CompassPrimary::West => "W",
            CompassPrimary::East => "E",
        };
        f.write_str(name)
    }
}

/// In bounds geometric neighbours of `coord`, paired with the direction that reaches them.
/// Neighbours are not necessarily linked by a passage.
pub fn neighbours(coord: Cartesian2DCoordinate, width: Width, height: Height) -> NeighbourSmallVec {
    ALL_DIRECTIONS.iter()
        .filter_map(|&dir| coord.offset(dir, width, height).map(|adjacent| (adjacent, dir)))
        .collect()
}


#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;

    #[test]
    fn opposites_are_involutions() {
        for dir in &ALL_DIRECTIONS {
            assert_eq!(dir.opposite().opposite(), *dir);
            assert_ne!(dir.opposite(), *dir);
            let (dx, dy) = dir.offset();
            let (odx, ody) = dir.opposite().offset();
            assert_eq!((dx + odx, dy + ody), (0, 0));
        }
    }

    #[test]
    fn direction_bits_are_exclusive() {
        let combined = ALL_DIRECTIONS.iter().fold(0u8, |acc, dir| {
            assert_eq!(acc & dir.bit(), 0);
            acc | dir.bit()
        });
        assert_eq!(combined, ALL_DIRECTION_BITS);
        for dir in &ALL_DIRECTIONS {
            assert_eq!(CompassPrimary::from_bit(dir.bit()), Some(*dir));
        }
        assert_eq!(CompassPrimary::from_bit(3), None);
    }

    #[test]
    fn turning() {
        assert_eq!(CompassPrimary::North.turn_left(), CompassPrimary::West);
        assert_eq!(CompassPrimary::North.turn_right(), CompassPrimary::East);
        assert_eq!(CompassPrimary::East.turn_right(), CompassPrimary::South);
        for dir in &ALL_DIRECTIONS {
            assert_eq!(dir.turn_left().turn_right(), *dir);
            assert_eq!(dir.turn_left().turn_left(), dir.opposite());
        }
    }

    #[test]
    fn directions_in_mask() {
        let mask = CompassPrimary::East.bit() | CompassPrimary::North.bit();
        assert_eq!(&*CompassPrimary::directions_in(mask),
                   &[CompassPrimary::North, CompassPrimary::East]);
        assert!(CompassPrimary::directions_in(0).is_empty());
    }

    #[test]
    fn neighbour_cells() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let (w, h) = (Width(10), Height(10));

        let check_expected_neighbours = |coord, expected: &[Cartesian2DCoordinate]| {
            let found = neighbours(coord, w, h).iter().map(|&(c, _)| c).sorted().collect::<Vec<_>>();
            let expected = expected.iter().cloned().sorted().collect::<Vec<_>>();
            assert_eq!(found, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // sides
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // inside
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbour_directions_match_offsets() {
        let origin = Cartesian2DCoordinate::new(1, 1);
        for (coord, dir) in neighbours(origin, Width(3), Height(3)) {
            assert_eq!(origin.offset(dir, Width(3), Height(3)), Some(coord));
        }
        assert!(neighbours(Cartesian2DCoordinate::new(0, 0), Width(1), Height(1)).is_empty());
    }
}
