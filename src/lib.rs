//! **perfect_mazes** generates perfect mazes, mazes with exactly one route between any two cells,
//! and finds routes through them.
//!
//! A maze is a [`grid::Grid`] of cell bitmasks. The [`generators`] carve one from a seeded
//! [`rng::Lcg`] so every maze can be regenerated. The solvers in [`pathing`] and
//! [`wall_follower`] return a [`pathing::Solution`] which can be drawn as text with
//! [`grid_displays`], as an image with [`renderers`], and summarised with [`stats`].

pub mod analysis;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_serde;
pub mod pathing;
pub mod renderers;
pub mod rng;
pub mod stats;
pub mod units;
pub mod wall_follower;
mod utils;
