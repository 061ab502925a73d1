//! Mazes as images: PNG stills and animated GIFs of Dijkstra's wavefront.
//!
//! Walls are one pixel black lines on a white background. Each cell is a square of
//! `cell_side_pixels_length` pixels whose interior can be shaded by its distance from the start,
//! covered by a path, or marked as the start (green) or end (red).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, Rgb, RgbImage};
use log::debug;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::{DistanceMap, Wavefront};
use crate::utils::{self, CoordinateSet};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const PATH_LIME: Rgb<u8> = Rgb([0x33, 0xff, 0x33]);
const START_GREEN: Rgb<u8> = Rgb([0, 0x80, 0]);
const END_RED: Rgb<u8> = Rgb([0xff, 0, 0]);
const NEWEST_ORANGE: Rgb<u8> = Rgb([0xff, 0xa5, 0]);

pub const DEFAULT_CELL_PIXELS: u8 = 10;
/// Smaller cells have no room between their walls.
pub const MIN_CELL_PIXELS: u8 = 3;
pub const DEFAULT_MAX_FRAMES: usize = 200;

const FRAME_DELAY_MS: u32 = 80;
const LAST_FRAME_DELAY_MS: u32 = 1500;

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    colour_distances: bool,
    mark_start_end: bool,
    start: Option<Cartesian2DCoordinate>,
    end: Option<Cartesian2DCoordinate>,
    distances: Option<&'a DistanceMap>,
    path: Option<&'a [Cartesian2DCoordinate]>,
    cell_side_pixels_length: u8,
}

impl<'a> Default for RenderOptions<'a> {
    fn default() -> Self {
        RenderOptions {
            colour_distances: false,
            mark_start_end: false,
            start: None,
            end: None,
            distances: None,
            path: None,
            cell_side_pixels_length: DEFAULT_CELL_PIXELS,
        }
    }
}

pub struct RenderOptionsBuilder<'a> {
    options: RenderOptions<'a>,
}

impl<'a> RenderOptionsBuilder<'a> {
    pub fn new() -> RenderOptionsBuilder<'a> {
        RenderOptionsBuilder { options: RenderOptions::default() }
    }
    pub fn colour_distances(mut self, colour_distances: bool) -> RenderOptionsBuilder<'a> {
        self.options.colour_distances = colour_distances;
        self
    }
    pub fn mark_start_end(mut self, mark_start_end: bool) -> RenderOptionsBuilder<'a> {
        self.options.mark_start_end = mark_start_end;
        self
    }
    pub fn start(mut self, start: Option<Cartesian2DCoordinate>) -> RenderOptionsBuilder<'a> {
        self.options.start = start;
        self
    }
    pub fn end(mut self, end: Option<Cartesian2DCoordinate>) -> RenderOptionsBuilder<'a> {
        self.options.end = end;
        self
    }
    pub fn distances(mut self, distances: Option<&'a DistanceMap>) -> RenderOptionsBuilder<'a> {
        self.options.distances = distances;
        self
    }
    pub fn path(mut self, path: Option<&'a [Cartesian2DCoordinate]>) -> RenderOptionsBuilder<'a> {
        self.options.path = path;
        self
    }
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u8) -> RenderOptionsBuilder<'a> {
        self.options.cell_side_pixels_length = cell_side_pixels_length;
        self
    }
    pub fn build(self) -> RenderOptions<'a> {
        self.options
    }
}

impl<'a> Default for RenderOptionsBuilder<'a> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

/// Draw the maze. The image is `width * cell + 1` by `height * cell + 1` pixels.
///
/// A path takes precedence over distance shading. Distances are only drawn with
/// `colour_distances` set, and start/end only with `mark_start_end` set.
pub fn render_square_grid(grid: &Grid, options: &RenderOptions) -> RgbImage {
    let on_path = path_cells(options.path.unwrap_or(&[]));
    let distances = if options.colour_distances { options.distances } else { None };

    let mut img = draw_grid(grid, options.cell_side_pixels_length, |coord| {
        if on_path.contains(&coord) {
            Some(PATH_LIME)
        } else {
            distances.and_then(|d| {
                d.distance_from_start_to(coord).map(|distance| distance_colour(distance, d.max()))
            })
        }
    });

    if options.mark_start_end {
        mark_ends(&mut img, grid, options.cell_side_pixels_length, options.start, options.end);
    }
    img
}

pub fn save_png<P: AsRef<Path>>(grid: &Grid, options: &RenderOptions, path: P) -> Result<()> {
    let img = render_square_grid(grid, options);
    img.save_with_format(path.as_ref(), ImageFormat::Png)?;
    debug!("saved {}x{} pixel maze image to {}", img.width(), img.height(), path.as_ref().display());
    Ok(())
}

/// Frames of the search spreading out from the start.
///
/// Finalized cells are shaded by distance and the most recently finalized one is orange. The
/// visit trace is sampled so there are at most `max_frames` frames. The last frame shows the
/// path found, if any, over the explored cells.
pub fn wavefront_frames(grid: &Grid,
                        wavefront: &Wavefront,
                        end: Cartesian2DCoordinate,
                        cell_side_pixels_length: u8,
                        max_frames: usize)
                        -> Vec<RgbImage> {
    let visits = &wavefront.solution.visits;
    let start = Some(wavefront.distances.start());
    let search_frames = max_frames.saturating_sub(1).max(1);
    let stride = ((visits.len() + search_frames - 1) / search_frames).max(1);

    let mut reached: Vec<Option<usize>> = vec![None; grid.size()];
    let mut frames = Vec::with_capacity(visits.len() / stride + 2);

    for (i, visit) in visits.iter().enumerate() {
        reached[visit.coord.row_major_index(grid.width())] = Some(visit.cost);
        if (i + 1) % stride != 0 && i + 1 != visits.len() {
            continue;
        }

        let mut frame = draw_grid(grid, cell_side_pixels_length, |coord| {
            if coord == visit.coord {
                Some(NEWEST_ORANGE)
            } else {
                reached[coord.row_major_index(grid.width())]
                    .map(|distance| distance_colour(distance, visit.cost))
            }
        });
        mark_ends(&mut frame, grid, cell_side_pixels_length, start, Some(end));
        frames.push(frame);
    }

    let max_distance = visits.last().map_or(0, |v| v.cost);
    let on_path = path_cells(&wavefront.solution.path);
    let mut last_frame = draw_grid(grid, cell_side_pixels_length, |coord| {
        if on_path.contains(&coord) {
            Some(PATH_LIME)
        } else {
            reached[coord.row_major_index(grid.width())]
                .map(|distance| distance_colour(distance, max_distance))
        }
    });
    mark_ends(&mut last_frame, grid, cell_side_pixels_length, start, Some(end));
    frames.push(last_frame);

    frames
}

/// Write an endlessly looping GIF. The last frame is held longer than the others.
pub fn save_gif<P: AsRef<Path>>(frames: Vec<RgbImage>, path: P) -> Result<()> {
    let frames_count = frames.len();
    let mut encoder = GifEncoder::new(BufWriter::new(File::create(path.as_ref())?));
    encoder.set_repeat(Repeat::Infinite)?;

    let gif_frames = frames.into_iter().enumerate().map(|(i, img)| {
        let delay_ms = if i + 1 == frames_count { LAST_FRAME_DELAY_MS } else { FRAME_DELAY_MS };
        Frame::from_parts(DynamicImage::ImageRgb8(img).into_rgba8(),
                          0,
                          0,
                          Delay::from_numer_denom_ms(delay_ms, 1))
    });
    encoder.encode_frames(gif_frames)?;

    debug!("saved {} frame animation to {}", frames_count, path.as_ref().display());
    Ok(())
}

/// Light blue at the start fading to violet at the furthest cell.
fn distance_colour(distance: usize, max_distance: usize) -> Rgb<u8> {
    let intensity = distance as f64 / max_distance.max(1) as f64;
    let green = 224.0 - 76.0 * intensity.min(1.0);
    Rgb([194, green.round() as u8, 0xff])
}

fn path_cells(path: &[Cartesian2DCoordinate]) -> CoordinateSet {
    let mut cells = utils::coordinate_set(path.len());
    cells.extend(path.iter().cloned());
    cells
}

fn cell_pixels(cell_side_pixels_length: u8) -> u32 {
    u32::from(cell_side_pixels_length.max(MIN_CELL_PIXELS))
}

fn draw_grid<F>(grid: &Grid, cell_side_pixels_length: u8, cell_colour: F) -> RgbImage
    where F: Fn(Cartesian2DCoordinate) -> Option<Rgb<u8>>
{
    let size = cell_pixels(cell_side_pixels_length);
    let img_width = grid.width().0 as u32 * size + 1;
    let img_height = grid.height().0 as u32 * size + 1;
    let mut img = RgbImage::from_pixel(img_width, img_height, WHITE);

    for coord in grid.iter() {
        let x1 = coord.x * size;
        let y1 = coord.y * size;
        let x2 = (coord.x + 1) * size;
        let y2 = (coord.y + 1) * size;

        if let Some(colour) = cell_colour(coord) {
            fill_rect(&mut img, x1 + 1, y1 + 1, x2, y2, colour);
        }

        let linked_towards = |dir| {
            grid.neighbour_at_direction(coord, dir).map_or(false, |n| grid.is_linked(coord, n))
        };

        // Inner north and west walls are drawn as the south and east walls of the cell beyond.
        if grid.neighbour_at_direction(coord, CompassPrimary::North).is_none() {
            horizontal_line(&mut img, x1, x2, y1);
        }
        if grid.neighbour_at_direction(coord, CompassPrimary::West).is_none() {
            vertical_line(&mut img, x1, y1, y2);
        }
        if !linked_towards(CompassPrimary::East) {
            vertical_line(&mut img, x2, y1, y2);
        }
        if !linked_towards(CompassPrimary::South) {
            horizontal_line(&mut img, x1, x2, y2);
        }
    }

    img
}

fn mark_ends(img: &mut RgbImage,
             grid: &Grid,
             cell_side_pixels_length: u8,
             start: Option<Cartesian2DCoordinate>,
             end: Option<Cartesian2DCoordinate>) {
    for &(point, colour) in &[(start, START_GREEN), (end, END_RED)] {
        if let Some(coord) = point.filter(|&c| grid.is_valid_coordinate(c)) {
            let size = cell_pixels(cell_side_pixels_length);
            let inset = size / 4;
            let (x1, y1) = (coord.x * size, coord.y * size);
            fill_rect(img,
                      x1 + 1 + inset,
                      y1 + 1 + inset,
                      x1 + size - inset,
                      y1 + size - inset,
                      colour);
        }
    }
}

/// Fill `[x1, x2) x [y1, y2)`.
fn fill_rect(img: &mut RgbImage, x1: u32, y1: u32, x2: u32, y2: u32, colour: Rgb<u8>) {
    for y in y1..y2 {
        for x in x1..x2 {
            img.put_pixel(x, y, colour);
        }
    }
}

fn horizontal_line(img: &mut RgbImage, x1: u32, x2: u32, y: u32) {
    for x in x1..=x2 {
        img.put_pixel(x, y, BLACK);
    }
}

fn vertical_line(img: &mut RgbImage, x: u32, y1: u32, y2: u32) {
    for y in y1..=y2 {
        img.put_pixel(x, y, BLACK);
    }
}


#[cfg(test)]
mod tests {

    use std::env;
    use std::fs;

    use super::*;
    use crate::generators::ALL_ALGORITHMS;
    use crate::pathing;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn corridor() -> Grid {
        let mut g = Grid::new(Width(2), Height(1)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("perfect_mazes_{}_{}", std::process::id(), name))
    }

    #[test]
    fn image_size_follows_cell_pixels() {
        let g = Grid::new(Width(4), Height(3)).unwrap();
        let img = render_square_grid(&g, &RenderOptions::default());
        assert_eq!(img.dimensions(), (41, 31));

        let tiny = RenderOptionsBuilder::new().cell_side_pixels_length(1).build();
        assert_eq!(render_square_grid(&g, &tiny).dimensions(), (13, 10));
    }

    #[test]
    fn walls_are_drawn_unless_linked() {
        let closed = render_square_grid(&Grid::new(Width(2), Height(1)).unwrap(),
                                        &RenderOptions::default());
        assert_eq!(*closed.get_pixel(5, 0), BLACK);
        assert_eq!(*closed.get_pixel(0, 5), BLACK);
        assert_eq!(*closed.get_pixel(10, 5), BLACK);
        assert_eq!(*closed.get_pixel(5, 10), BLACK);
        assert_eq!(*closed.get_pixel(5, 5), WHITE);

        let open = render_square_grid(&corridor(), &RenderOptions::default());
        assert_eq!(*open.get_pixel(10, 5), WHITE);
        assert_eq!(*open.get_pixel(10, 0), BLACK);
        assert_eq!(*open.get_pixel(10, 10), BLACK);
        assert_eq!(*open.get_pixel(20, 5), BLACK);
    }

    #[test]
    fn one_sided_passages_keep_their_wall() {
        let g = Grid::from_rows(vec![vec![CompassPrimary::East.bit(), 0]]).unwrap();
        let img = render_square_grid(&g, &RenderOptions::default());
        assert_eq!(*img.get_pixel(10, 5), BLACK);
    }

    #[test]
    fn cells_shaded_by_distance() {
        let g = corridor();
        let distances = DistanceMap::for_grid(&g, gc(0, 0)).unwrap();
        let options = RenderOptionsBuilder::new()
            .colour_distances(true)
            .distances(Some(&distances))
            .build();
        let img = render_square_grid(&g, &options);
        assert_eq!(*img.get_pixel(5, 5), Rgb([194, 224, 255]));
        assert_eq!(*img.get_pixel(15, 5), Rgb([194, 148, 255]));

        let unshaded = RenderOptionsBuilder::new().distances(Some(&distances)).build();
        assert_eq!(*render_square_grid(&g, &unshaded).get_pixel(5, 5), WHITE);
    }

    #[test]
    fn path_and_end_markers() {
        let mut g = Grid::new(Width(3), Height(1)).unwrap();
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g.carve(gc(1, 0), CompassPrimary::East).unwrap();
        let path = [gc(0, 0), gc(1, 0), gc(2, 0)];
        let options = RenderOptionsBuilder::new()
            .path(Some(&path[..]))
            .mark_start_end(true)
            .start(Some(gc(0, 0)))
            .end(Some(gc(2, 0)))
            .build();
        let img = render_square_grid(&g, &options);

        assert_eq!(*img.get_pixel(5, 5), START_GREEN);
        assert_eq!(*img.get_pixel(15, 5), PATH_LIME);
        assert_eq!(*img.get_pixel(25, 5), END_RED);
        // The markers are inset, leaving the path colour around them.
        assert_eq!(*img.get_pixel(1, 1), PATH_LIME);
    }

    #[test]
    fn wavefront_animation_frames() {
        let g = ALL_ALGORITHMS[1].generate(Width(12), Height(9), Some(5)).unwrap();
        let end = gc(11, 8);
        let wavefront = pathing::dijkstra_wavefront(&g, gc(0, 0), end).unwrap();

        let frames = wavefront_frames(&g, &wavefront, end, 6, 20);
        assert!(frames.len() >= 2 && frames.len() <= 20);
        assert!(frames.iter().all(|f| f.dimensions() == (73, 55)));

        // The last search frame shows the end cell as the newest one finalized.
        let last_search = &frames[frames.len() - 2];
        assert_eq!(*last_search.get_pixel(11 * 6 + 1, 8 * 6 + 1), NEWEST_ORANGE);

        let last = &frames[frames.len() - 1];
        assert_eq!(*last.get_pixel(11 * 6 + 3, 8 * 6 + 3), END_RED);
        assert_eq!(*last.get_pixel(11 * 6 + 1, 8 * 6 + 1), PATH_LIME);
        assert_eq!(*last.get_pixel(3, 3), START_GREEN);

        let every_visit = wavefront_frames(&g, &wavefront, end, 6, DEFAULT_MAX_FRAMES);
        assert_eq!(every_visit.len(), wavefront.solution.visits.len() + 1);
    }

    #[test]
    fn save_png_and_gif() {
        let g = ALL_ALGORITHMS[0].generate(Width(6), Height(4), Some(3)).unwrap();
        let solution = pathing::dijkstra(&g, gc(0, 0), gc(5, 3)).unwrap();
        let options = RenderOptionsBuilder::new()
            .path(Some(solution.path.as_slice()))
            .mark_start_end(true)
            .start(Some(gc(0, 0)))
            .end(Some(gc(5, 3)))
            .build();

        let png_path = temp_path("maze.png");
        save_png(&g, &options, &png_path).unwrap();
        let loaded = image::open(&png_path).map(|img| img.to_rgb8());
        fs::remove_file(&png_path).unwrap();
        assert_eq!(loaded.unwrap(), render_square_grid(&g, &options));

        let wavefront = pathing::dijkstra_wavefront(&g, gc(0, 0), gc(5, 3)).unwrap();
        let gif_path = temp_path("wavefront.gif");
        save_gif(wavefront_frames(&g, &wavefront, gc(5, 3), 8, 10), &gif_path).unwrap();
        let bytes = fs::read(&gif_path);
        fs::remove_file(&gif_path).unwrap();
        assert!(bytes.unwrap().starts_with(b"GIF89a"));
    }
}
