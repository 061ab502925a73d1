use crate::cells::Cartesian2DCoordinate;
use crate::units::{ColumnIndex, Height, RowIndex, Width};

/// Row-major iteration over every coordinate of a rectangular grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    width: Width,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            width,
            current_cell_number: 0,
            cells_count: width.0 * height.0,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    self.width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchIterType {
    Row,
    Column,
}

/// Iteration over whole rows (top to bottom) or whole columns (left to right).
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    width: Width,
    height: Height,
}

impl BatchIter {
    pub fn new(iter_type: BatchIterType, width: Width, height: Height) -> BatchIter {
        BatchIter {
            iter_type,
            current_index: 0,
            width,
            height,
        }
    }

    fn batches_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.height.0,
            BatchIterType::Column => self.width.0,
        }
    }
}

impl ExactSizeIterator for BatchIter {}
impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }

        let index = self.current_index;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..self.width.0)
                    .map(|x| Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(x), RowIndex(index)))
                    .collect()
            }
            BatchIterType::Column => {
                (0..self.height.0)
                    .map(|y| Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(index), RowIndex(y)))
                    .collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batches_count() - self.current_index;
        (remaining, Some(remaining))
    }
}
