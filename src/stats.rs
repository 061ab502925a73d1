use std::fmt;

use crate::pathing::Solution;

/// How much of the maze a solver looked at compared to the route it returned.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathStats {
    /// Cells on the path, counting both ends.
    pub path_length: usize,
    pub cells_explored: usize,
    /// Path length as a percentage of the cells explored.
    pub efficiency: f64,
}

impl PathStats {
    pub fn from_solution(solution: &Solution) -> PathStats {
        let path_length = solution.path.len();
        let cells_explored = solution.visits.len();
        let efficiency = if cells_explored == 0 {
            0.0
        } else {
            path_length as f64 / cells_explored as f64 * 100.0
        };
        PathStats { path_length, cells_explored, efficiency }
    }
}

impl fmt::Display for PathStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "path length: {}, cells explored: {}, efficiency: {:.2}%",
               self.path_length,
               self.cells_explored,
               self.efficiency)
    }
}
