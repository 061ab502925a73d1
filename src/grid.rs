use std::error;
use std::fmt;

use error_chain::bail;
use smallvec::SmallVec;

use crate::cells::{self, Cartesian2DCoordinate, CompassPrimary, NeighbourSmallVec, ALL_DIRECTION_BITS};
use crate::errors::*;
use crate::grid_iterators::{BatchIter, BatchIterType, CellIter};
use crate::rng::Lcg;
use crate::units::{EdgesCount, Height, NodesCount, Width};

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

/// A rectangular grid of cells, each cell a bitmask of its open passages.
///
/// Openness is expected to be symmetric: when a cell is open towards a direction the neighbour
/// that way is open in the opposite direction. `carve` keeps this true, deserialized grids are
/// trusted as they are.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<u8>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    /// The passage would lead off the edge of the grid.
    OutOfBoundsDirection,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellLinkError::InvalidGridCoordinate => write!(f, "cell coordinate is not on the grid"),
            CellLinkError::OutOfBoundsDirection => write!(f, "passage leads off the grid"),
        }
    }
}

impl error::Error for CellLinkError {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, links: {:?}",
               self.width.0, self.height.0, self.links_count())
    }
}

impl Grid {
    /// A grid with every passage closed.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let cells_count = w.checked_mul(h)
                           .filter(|_| w > 0 && h > 0 && w <= u32::MAX as usize && h <= u32::MAX as usize)
                           .ok_or_else(|| Error::from(ErrorKind::InvalidGridDimensions(w, h)))?;
        Ok(Grid {
            width,
            height,
            cells: vec![0; cells_count],
        })
    }

    /// Build a grid from row-major bitmask rows, top row first.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Grid> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            bail!(ErrorKind::MalformedGrid(String::from("grid has no cells")));
        }
        if let Some(y) = rows.iter().position(|row| row.len() != width) {
            bail!(ErrorKind::MalformedGrid(format!("row {} has {} cells, expected {}",
                                                    y, rows[y].len(), width)));
        }

        let mut grid = Grid::new(Width(width), Height(height))?;
        for (index, mask) in rows.into_iter().flatten().enumerate() {
            if mask & !ALL_DIRECTION_BITS != 0 {
                let coord = Cartesian2DCoordinate::from_row_major_index(index, grid.width);
                bail!(ErrorKind::MalformedGrid(format!("cell {} has invalid bitmask {}", coord, mask)));
            }
            grid.cells[index] = mask;
        }
        Ok(grid)
    }

    /// The bitmask rows, top row first.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.width.0).map(|row| row.to_vec()).collect()
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Capacity hints for a graph view of this grid.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (NodesCount(cells_count), EdgesCount(cells_count.saturating_sub(1)))
    }

    pub fn random_cell(&self, rng: &mut Lcg) -> Cartesian2DCoordinate {
        let x = rng.gen_index(self.width.0);
        let y = rng.gen_index(self.height.0);
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    /// The open passage bitmask of a cell, None if the coordinate is off the grid.
    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<u8> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    /// Open the passage from `coord` towards `dir`, setting the bit in both cells.
    pub fn carve(&mut self,
                 coord: Cartesian2DCoordinate,
                 dir: CompassPrimary)
                 -> ::std::result::Result<Cartesian2DCoordinate, CellLinkError> {
        let index = self.grid_coordinate_to_index(coord)
                        .ok_or(CellLinkError::InvalidGridCoordinate)?;
        let neighbour = self.neighbour_at_direction(coord, dir)
                            .ok_or(CellLinkError::OutOfBoundsDirection)?;
        let neighbour_index = self.coordinate_index_unchecked(neighbour);

        self.cells[index] |= dir.bit();
        self.cells[neighbour_index] |= dir.opposite().bit();
        Ok(neighbour)
    }

    /// Does the cell's own bitmask have `dir` open? The neighbour is not consulted.
    #[inline]
    pub fn is_open(&self, coord: Cartesian2DCoordinate, dir: CompassPrimary) -> bool {
        self.cell(coord).map_or(false, |mask| mask & dir.bit() != 0)
    }

    /// The neighbour through the passage towards `dir`, if that passage is open and on the grid.
    pub fn neighbour_if_open(&self,
                             coord: Cartesian2DCoordinate,
                             dir: CompassPrimary)
                             -> Option<Cartesian2DCoordinate> {
        if self.is_open(coord, dir) {
            self.neighbour_at_direction(coord, dir)
        } else {
            None
        }
    }

    /// Cells that are linked to a particular cell by an open passage on the cell's side.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|mask| {
            CompassPrimary::directions_in(mask)
                .iter()
                .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
                .collect()
        })
    }

    /// Cells to the North, South, West or East of a cell, not necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        if self.is_valid_coordinate(coord) {
            cells::neighbours(coord, self.width, self.height)
        } else {
            NeighbourSmallVec::new()
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if self.is_valid_coordinate(coord) {
            coord.offset(direction, self.width, self.height)
        } else {
            None
        }
    }

    /// Are two adjacent cells linked from both sides?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        self.neighbours(a)
            .iter()
            .find(|&&(neighbour, _)| neighbour == b)
            .map_or(false, |&(_, dir)| self.is_open(a, dir) && self.is_open(b, dir.opposite()))
    }

    /// Number of open passage pairs, counting only passages that are open from both sides.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Every cell's open bits are matched by its neighbours and no passage leads off the grid.
    pub fn is_symmetric(&self) -> bool {
        self.iter().all(|coord| {
            let mask = self.cells[self.coordinate_index_unchecked(coord)];
            CompassPrimary::directions_in(mask).iter().all(|&dir| {
                self.neighbour_at_direction(coord, dir)
                    .map_or(false, |neighbour| self.is_open(neighbour, dir.opposite()))
            })
        })
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(self.coordinate_index_unchecked(coord))
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::from_row_major_index(index, self.width)
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::new(BatchIterType::Row, self.width, self.height)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::new(BatchIterType::Column, self.width, self.height)
    }

    /// Open passage pairs, each once as (north or west cell, south or east cell).
    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            grid: self,
            cells: self.iter(),
            pending: None,
        }
    }

    #[inline]
    fn coordinate_index_unchecked(&self, coord: Cartesian2DCoordinate) -> usize {
        coord.row_major_index(self.width)
    }
}

pub struct LinksIter<'a> {
    grid: &'a Grid,
    cells: CellIter,
    pending: Option<(Cartesian2DCoordinate, Cartesian2DCoordinate)>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(link) = self.pending.take() {
            return Some(link);
        }

        let grid = self.grid;
        let linked_towards = |coord, dir| {
            grid.neighbour_if_open(coord, dir)
                .filter(|&neighbour| grid.is_open(neighbour, CompassPrimary::opposite(dir)))
                .map(|neighbour| (coord, neighbour))
        };

        for coord in &mut self.cells {
            let south = linked_towards(coord, CompassPrimary::South);
            let east = linked_towards(coord, CompassPrimary::East);
            match (south, east) {
                (Some(s), Some(e)) => {
                    self.pending = Some(e);
                    return Some(s);
                }
                (Some(link), None) | (None, Some(link)) => return Some(link),
                (None, None) => {}
            }
        }
        None
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cells iter : {:?}", self.cells)
    }
}
