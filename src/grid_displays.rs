use std::fmt;

use itertools::Itertools;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::Grid;
use crate::pathing::DistanceMap;
use crate::utils::{self, CoordinateSet};

/// Overlay drawn in place of a cell's floor when a grid is rendered as text.
pub trait GridDisplay {
    /// The character to draw for the cell at `coord`, or `None` to keep the plain floor.
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> Option<char>;
}

impl GridDisplay for DistanceMap {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> Option<char> {
        // Only a single character fits, so show the last base 36 digit.
        self.distance_from_start_to(coord)
            .and_then(|d| std::char::from_digit((d % 36) as u32, 36))
    }
}


#[derive(Debug)]
pub struct PathDisplay {
    start: Option<Cartesian2DCoordinate>,
    end: Option<Cartesian2DCoordinate>,
    on_path_coordinates: CoordinateSet,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        let mut on_path_coordinates = utils::coordinate_set(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay {
            start: path.first().cloned(),
            end: path.last().cloned(),
            on_path_coordinates,
        }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> Option<char> {
        if self.start == Some(coord) {
            Some('S')
        } else if self.end == Some(coord) {
            Some('E')
        } else if self.on_path_coordinates.contains(&coord) {
            Some('.')
        } else {
            None
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: Cartesian2DCoordinate,
    end: Cartesian2DCoordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: Cartesian2DCoordinate, end: Cartesian2DCoordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> Option<char> {
        if coord == self.start {
            Some('S')
        } else if coord == self.end {
            Some('E')
        } else {
            None
        }
    }
}


/// Draw `grid` as text, one line for the northern boundary then one line per row.
///
/// Each cell is a floor character followed by its eastern wall. A floor is drawn as a wall unless
/// the passage south is open from both sides.
pub fn render(grid: &Grid, display: Option<&dyn GridDisplay>) -> String {
    let columns_count = grid.width().0;
    let top_boundary = format!(" {}", "_".repeat(2 * columns_count - 1));

    let rows = grid.iter_row().map(|row| {
        let mut line = String::with_capacity(2 * columns_count + 1);
        line.push('|');
        for coord in row {
            let below_open = grid.neighbour_at_direction(coord, CompassPrimary::South)
                .map_or(true, |below| grid.is_open(below, CompassPrimary::North));
            let south_open = grid.is_open(coord, CompassPrimary::South) && below_open;
            let floor = if south_open { ' ' } else { '_' };
            let east_wall = if grid.is_open(coord, CompassPrimary::East) { ' ' } else { '|' };

            line.push(display.and_then(|d| d.render_cell_body(coord)).unwrap_or(floor));
            line.push(east_wall);
        }
        line
    });

    std::iter::once(top_boundary).chain(rows).join("\n")
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&render(self, None))
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::MazeAlgorithm;
    use crate::pathing;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    // (0,0)-(1,0) joined east, (1,0)-(1,1) joined south, (0,1) hangs off (0,0).
    fn small_maze() -> Grid {
        let mut g = Grid::new(Width(2), Height(2)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g.carve(gc(1, 0), CompassPrimary::South).unwrap();
        g.carve(gc(0, 0), CompassPrimary::South).unwrap();
        g
    }

    #[test]
    fn render_closed_cell() {
        let g = Grid::new(Width(1), Height(1)).unwrap();
        assert_eq!(g.to_string(), " _\n|_|");
    }

    #[test]
    fn render_plain_maze() {
        let g = small_maze();
        assert_eq!(render(&g, None), " ___\n|   |\n|_|_|");
        assert_eq!(g.to_string(), render(&g, None));
    }

    #[test]
    fn one_sided_south_passage_draws_a_floor() {
        // South is open from (0, 0) but (0, 1) does not open north.
        let g = Grid::from_rows(vec![vec![CompassPrimary::South.bit()], vec![0]]).unwrap();
        assert_eq!(g.to_string(), " _\n|_|\n|_|");
    }

    #[test]
    fn render_start_and_end() {
        let g = small_maze();
        let display = StartEndPointsDisplay::new(gc(0, 0), gc(1, 1));
        assert_eq!(render(&g, Some(&display)), " ___\n|S  |\n|_|E|");
    }

    #[test]
    fn render_path() {
        let g = small_maze();
        let path = pathing::dijkstra(&g, gc(0, 1), gc(1, 1)).unwrap().path;
        assert_eq!(path, vec![gc(0, 1), gc(0, 0), gc(1, 0), gc(1, 1)]);
        let display = PathDisplay::new(&path);
        assert_eq!(render(&g, Some(&display)), " ___\n|. .|\n|S|E|");
    }

    #[test]
    fn render_distances() {
        let g = small_maze();
        let distances = DistanceMap::for_grid(&g, gc(0, 1)).unwrap();
        assert_eq!(render(&g, Some(&distances)), " ___\n|1 2|\n|0|3|");
    }

    #[test]
    fn distance_digits_wrap_at_36() {
        let g = MazeAlgorithm::Dfs.generate(Width(40), Height(1), Some(7)).unwrap();
        let distances = DistanceMap::for_grid(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.render_cell_body(gc(10, 0)), Some('a'));
        assert_eq!(distances.render_cell_body(gc(35, 0)), Some('z'));
        assert_eq!(distances.render_cell_body(gc(36, 0)), Some('0'));
    }

    #[test]
    fn rendered_shape() {
        let g = MazeAlgorithm::Wilson.generate(Width(7), Height(4), Some(3)).unwrap();
        let text = g.to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        assert!(!text.ends_with('\n'));
        assert_eq!(lines[0].len(), 14);
        assert!(lines[1..].iter().all(|l| l.len() == 15 && l.starts_with('|') && l.ends_with('|')));
    }
}
