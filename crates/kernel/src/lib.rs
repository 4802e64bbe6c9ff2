//! Maze Kernel: grid topology and maze generation.
//!
//! # Invariants
//! - Grids are square and addressed 1..=side on both axes.
//! - Generated grids are perfect mazes: exactly one simple path joins any two open cells.
//! - The border ring is always wall.

pub mod generator;
pub mod grid;

pub use generator::{BacktrackerGenerator, MazeGenerator};
pub use grid::{Cell, Grid, GridError, MIN_SIDE, validate_side};
