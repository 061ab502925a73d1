//! Structural checks over a grid's passages.

use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::units::{EdgesCount, NodesCount};

/// The grid as an undirected graph, one node per cell (node index == row-major cell index) and one
/// edge per passage that is open from both sides.
pub fn to_graph(grid: &Grid) -> UnGraph<Cartesian2DCoordinate, ()> {
    let (NodesCount(nodes), EdgesCount(edges)) = grid.graph_size();
    let mut graph = UnGraph::with_capacity(nodes, edges);
    for coord in grid.iter() {
        let _ = graph.add_node(coord);
    }
    for (a, b) in grid.iter_links() {
        let a_index = node_index(grid, a);
        let b_index = node_index(grid, b);
        let _ = graph.add_edge(a_index, b_index, ());
    }
    graph
}

/// Is the grid a spanning tree: symmetric passages, W*H-1 links, connected and acyclic.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    if !grid.is_symmetric() || grid.links_count() != grid.size() - 1 {
        return false;
    }
    let graph = to_graph(grid);
    connected_components(&graph) == 1 && !is_cyclic_undirected(&graph)
}

/// Plain text edge list: the first line is `vertices edges`, then one line per link with 1-based
/// vertex indices.
pub fn edges_listing(grid: &Grid) -> String {
    let mut graph_data = format!("{} {}\n", grid.size(), grid.links_count());
    for (src, dst) in grid.iter_links() {
        let src_as_1_based_index = node_index(grid, src).index() + 1;
        let dst_as_1_based_index = node_index(grid, dst).index() + 1;
        graph_data.push_str(&format!("{} {}\n", src_as_1_based_index, dst_as_1_based_index));
    }
    graph_data
}

fn node_index(grid: &Grid, coord: Cartesian2DCoordinate) -> NodeIndex {
    NodeIndex::new(coord.row_major_index(grid.width()))
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::CompassPrimary;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn closed_grid_is_not_perfect() {
        let g = Grid::new(Width(2), Height(2)).unwrap();
        assert!(!is_perfect_maze(&g));
        assert!(is_perfect_maze(&Grid::new(Width(1), Height(1)).unwrap()));
    }

    #[test]
    fn cycle_is_not_perfect() {
        let mut g = Grid::new(Width(2), Height(2)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g.carve(gc(0, 0), CompassPrimary::South).unwrap();
        g.carve(gc(1, 0), CompassPrimary::South).unwrap();
        assert!(is_perfect_maze(&g));

        g.carve(gc(0, 1), CompassPrimary::East).unwrap();
        assert!(!is_perfect_maze(&g));
        assert!(is_cyclic_undirected(&to_graph(&g)));
    }

    #[test]
    fn disconnected_with_right_edge_count_is_not_perfect() {
        // A 4 cell loop plus one spur leaves (2, 1) isolated with W*H-1 links.
        let mut g = Grid::new(Width(3), Height(2)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g.carve(gc(0, 0), CompassPrimary::South).unwrap();
        g.carve(gc(1, 0), CompassPrimary::South).unwrap();
        g.carve(gc(0, 1), CompassPrimary::East).unwrap();
        g.carve(gc(1, 0), CompassPrimary::East).unwrap();
        assert_eq!(g.links_count(), 5);
        assert_eq!(connected_components(&to_graph(&g)), 2);
        assert!(!is_perfect_maze(&g));
    }

    #[test]
    fn graph_view_matches_links() {
        let mut g = Grid::new(Width(3), Height(1)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        let graph = to_graph(&g);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph[NodeIndex::new(2)], gc(2, 0));
    }

    #[test]
    fn edge_listing_uses_one_based_indices() {
        let mut g = Grid::new(Width(2), Height(2)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g.carve(gc(1, 0), CompassPrimary::South).unwrap();
        g.carve(gc(0, 1), CompassPrimary::East).unwrap();
        assert_eq!(edges_listing(&g), "4 3\n1 2\n2 4\n3 4\n");
    }
}
