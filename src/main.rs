use docopt::Docopt;
use error_chain::bail;
use log::info;
use serde_derive::Deserialize;
use perfect_mazes::{
    analysis,
    cells::Cartesian2DCoordinate,
    generators::{MazeAlgorithm, ALL_ALGORITHMS},
    grid::Grid,
    grid_displays::{self, GridDisplay, PathDisplay, StartEndPointsDisplay},
    grid_serde,
    pathing::{self, DistanceMap, Solution},
    renderers::{self, RenderOptionsBuilder},
    stats::PathStats,
    units::{Height, Width},
    wall_follower::{self, Hand},
};
use std::{
    fmt,
    fs::File,
    io::prelude::*,
};

const USAGE: &str = "Perfect mazes

Usage:
    maze_driver -h | --help
    maze_driver generate (dfs|prim|wilson) [--width=<w>] [--height=<h>] [--seed=<s>] [--out=<path>] [--text-out=<path>] [--save-edges=<path>] [--image-out=<path>] [--cell-pixels=<n>]
    maze_driver solve (dijkstra|wavefront|left-hand|right-hand) --maze=<path> [--start-x=<x> --start-y=<y>] [--end-x=<x> --end-y=<y>] [--longest-path] [--show-distances] [--text-out=<path>] [--image-out=<path> [--colour-distances] [--mark-start-end]] [--gif-out=<path>] [--cell-pixels=<n>]
    maze_driver demo [--width=<w>] [--height=<h>] [--seed=<s>]

Options:
    -h --help              Show this screen.
    --width=<w>            The maze width in cells [default: 20].
    --height=<h>           The maze height in cells [default: 12].
    --seed=<s>             Seed for the maze generator. Chosen at random and logged if not given.
    --out=<path>           Save the maze as JSON, a nested array of cell bitmasks.
    --text-out=<path>      Output file path for a textual rendering of a maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --maze=<path>          A maze saved by the generate command.
    --start-x=<x>          x coordinate of the path start. The top left cell if not given.
    --start-y=<y>          y coordinate of the path start.
    --end-x=<x>            x coordinate of the path end. The bottom right cell if not given.
    --end-y=<y>            y coordinate of the path end.
    --longest-path         Solve between the two ends of the longest path in the maze instead.
    --show-distances       Show the distance from the start point to the cells instead of the path.
    --image-out=<path>     Output file path for an image rendering of a maze. Always PNG format. A solved maze shows the path.
    --cell-pixels=<n>      Pixel count to render one cell wall in a maze [default: 10] max 255.
    --colour-distances     Indicate the distance from the start point to any cell by the cell's background colour.
    --mark-start-end       Mark the path start (green) and end (red) cells.
    --gif-out=<path>       Output file path for an animation of Dijkstra's search spreading from the start point.
";
#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_generate: bool,
    cmd_dfs: bool,
    cmd_prim: bool,
    cmd_wilson: bool,
    cmd_solve: bool,
    cmd_dijkstra: bool,
    cmd_wavefront: bool,
    cmd_left_hand: bool,
    cmd_right_hand: bool,
    cmd_demo: bool,
    flag_width: usize,
    flag_height: usize,
    flag_seed: Option<u64>,
    flag_out: Option<String>,
    flag_text_out: Option<String>,
    flag_save_edges: Option<String>,
    flag_maze: Option<String>,
    flag_start_x: Option<u32>,
    flag_start_y: Option<u32>,
    flag_end_x: Option<u32>,
    flag_end_y: Option<u32>,
    flag_longest_path: bool,
    flag_show_distances: bool,
    flag_image_out: Option<String>,
    flag_cell_pixels: u8,
    flag_colour_distances: bool,
    flag_mark_start_end: bool,
    flag_gif_out: Option<String>,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    #![allow(deprecated)]
    use error_chain::*;
    error_chain! {

        links {
            Maze(perfect_mazes::errors::Error, perfect_mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Solver {
    Dijkstra,
    Wavefront,
    WallFollower(Hand),
}

const ALL_SOLVERS: [Solver; 4] = [Solver::Dijkstra,
                                  Solver::Wavefront,
                                  Solver::WallFollower(Hand::Left),
                                  Solver::WallFollower(Hand::Right)];

impl Solver {
    /// The solution plus, for the wavefront, the distances it finalized on the way.
    fn solve(self,
             grid: &Grid,
             start: Cartesian2DCoordinate,
             end: Cartesian2DCoordinate)
             -> Result<(Solution, Option<DistanceMap>)> {
        Ok(match self {
            Solver::Dijkstra => (pathing::dijkstra(grid, start, end)?, None),
            Solver::Wavefront => {
                let wavefront = pathing::dijkstra_wavefront(grid, start, end)?;
                (wavefront.solution, Some(wavefront.distances))
            }
            Solver::WallFollower(hand) => {
                (wall_follower::wall_follower(grid, start, end, hand)?, None)
            }
        })
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Solver::Dijkstra => "dijkstra",
            Solver::Wavefront => "wavefront",
            Solver::WallFollower(Hand::Left) => "left-hand",
            Solver::WallFollower(Hand::Right) => "right-hand",
        };
        f.write_str(name)
    }
}

fn main() -> Result<()> {

    env_logger::init();

    let args: DriverArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if e.fatal() => return Err(e.into()),
        Err(e) => e.exit(),
    };

    if args.cmd_generate {
        generate(&args)
    } else if args.cmd_solve {
        solve(&args)
    } else {
        demo(&args)
    }
}

fn generate(args: &DriverArgs) -> Result<()> {

    let algorithm = if args.cmd_dfs {
        MazeAlgorithm::Dfs
    } else if args.cmd_prim {
        MazeAlgorithm::Prims
    } else {
        MazeAlgorithm::Wilson
    };
    let maze_grid = algorithm.generate(Width(args.flag_width), Height(args.flag_height), args.flag_seed)?;

    if let Some(ref json_path) = args.flag_out {
        grid_serde::save_grid(&maze_grid, json_path)
            .chain_err(|| format!("Failed to save maze to {}", json_path))?;
        info!("saved {:?} to {}", maze_grid, json_path);
    }

    if let Some(ref edges_path) = args.flag_save_edges {
        write_text_to_file(&analysis::edges_listing(&maze_grid), edges_path)
            .chain_err(|| format!("Failed to save maze edges to {}", edges_path))?;
    }

    if let Some(ref image_path) = args.flag_image_out {
        let render_options = RenderOptionsBuilder::new()
            .cell_side_pixels_length(args.flag_cell_pixels)
            .build();
        renderers::save_png(&maze_grid, &render_options, image_path)
            .chain_err(|| format!("Failed to write maze image to {}", image_path))?;
    }

    output_text(&maze_grid.to_string(), args)
}

fn solve(args: &DriverArgs) -> Result<()> {

    let maze_path = args.flag_maze.as_ref().ok_or("A maze file is required to solve.")?;
    let maze_grid = grid_serde::load_grid(maze_path)
        .chain_err(|| format!("Failed to load maze from {}", maze_path))?;

    let solver = if args.cmd_dijkstra {
        Solver::Dijkstra
    } else if args.cmd_wavefront {
        Solver::Wavefront
    } else if args.cmd_left_hand {
        Solver::WallFollower(Hand::Left)
    } else {
        Solver::WallFollower(Hand::Right)
    };

    let (start, end) = endpoints_from_args(args, &maze_grid)?;
    let (solution, wavefront_distances) = solver.solve(&maze_grid, start, end)?;

    let distances = if args.flag_show_distances || args.flag_colour_distances {
        match wavefront_distances {
            Some(distances) => Some(distances),
            None => Some(DistanceMap::for_grid(&maze_grid, start)?),
        }
    } else {
        None
    };

    let text = match distances {
        Some(ref distances) if args.flag_show_distances => render_with(&maze_grid, distances),
        _ if !solution.path.is_empty() => render_with(&maze_grid, &PathDisplay::new(&solution.path)),
        _ => render_with(&maze_grid, &StartEndPointsDisplay::new(start, end)),
    };

    output_text(&text, args)?;

    if let Some(ref image_path) = args.flag_image_out {
        let render_options = RenderOptionsBuilder::new()
            .colour_distances(args.flag_colour_distances)
            .mark_start_end(args.flag_mark_start_end)
            .start(Some(start))
            .end(Some(end))
            .distances(distances.as_ref())
            .path(Some(solution.path.as_slice()))
            .cell_side_pixels_length(args.flag_cell_pixels)
            .build();
        renderers::save_png(&maze_grid, &render_options, image_path)
            .chain_err(|| format!("Failed to write maze image to {}", image_path))?;
    }

    if let Some(ref gif_path) = args.flag_gif_out {
        let wavefront = pathing::dijkstra_wavefront(&maze_grid, start, end)?;
        let frames = renderers::wavefront_frames(&maze_grid,
                                                 &wavefront,
                                                 end,
                                                 args.flag_cell_pixels,
                                                 renderers::DEFAULT_MAX_FRAMES);
        renderers::save_gif(frames, gif_path)
            .chain_err(|| format!("Failed to write search animation to {}", gif_path))?;
    }

    println!("{}: {}", solver, solution.outcome);
    println!("{}", PathStats::from_solution(&solution));
    Ok(())
}

fn demo(args: &DriverArgs) -> Result<()> {

    let (width, height) = (Width(args.flag_width), Height(args.flag_height));
    let start = Cartesian2DCoordinate::new(0, 0);
    let end = Cartesian2DCoordinate::new(width.0.saturating_sub(1) as u32,
                                         height.0.saturating_sub(1) as u32);

    for algorithm in &ALL_ALGORITHMS {
        let maze_grid = algorithm.generate(width, height, args.flag_seed)?;
        println!("{} {}x{}", algorithm, width.0, height.0);
        println!("{}", maze_grid);

        for solver in &ALL_SOLVERS {
            let (solution, _) = solver.solve(&maze_grid, start, end)?;
            println!("  {:<10} {:<28} {}", solver.to_string(), solution.outcome.to_string(),
                     PathStats::from_solution(&solution));
        }
        println!();
    }

    Ok(())
}

/// The start and end requested on the command line, falling back to the top left and bottom right
/// corners. With `--longest-path` the ends of the longest path are used instead.
fn endpoints_from_args(args: &DriverArgs,
                       maze_grid: &Grid)
                       -> Result<(Cartesian2DCoordinate, Cartesian2DCoordinate)> {

    if args.flag_longest_path {
        let longest_path = pathing::longest_path(maze_grid)?;
        let ends = (longest_path.first(), longest_path.last());
        if let (Some(&start), Some(&end)) = ends {
            return Ok((start, end));
        }
        bail!("Failed to find the longest path through the maze.");
    }

    let start = match (args.flag_start_x, args.flag_start_y) {
        (Some(x), Some(y)) => Cartesian2DCoordinate::new(x, y),
        _ => Cartesian2DCoordinate::new(0, 0),
    };
    let end = match (args.flag_end_x, args.flag_end_y) {
        (Some(x), Some(y)) => Cartesian2DCoordinate::new(x, y),
        _ => Cartesian2DCoordinate::new(maze_grid.width().0 as u32 - 1,
                                        maze_grid.height().0 as u32 - 1),
    };
    Ok((start, end))
}

fn render_with(maze_grid: &Grid, display: &dyn GridDisplay) -> String {
    grid_displays::render(maze_grid, Some(display))
}

fn output_text(text: &str, args: &DriverArgs) -> Result<()> {
    match args.flag_text_out {
        Some(ref text_path) => {
            write_text_to_file(text, text_path)
                .chain_err(|| format!("Failed to write maze to text file {}", text_path))
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
