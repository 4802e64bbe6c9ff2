use mazescape_common::GridPos;
use serde::{Deserialize, Serialize};

/// Smallest side length a maze can have.
pub const MIN_SIDE: usize = 5;

/// A single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Open,
    Wall,
}

/// Errors from grid construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid maze dimension {side}: side must be odd and at least 5")]
    InvalidDimension { side: usize },
}

/// Check that `side` is an odd integer >= [`MIN_SIDE`].
pub fn validate_side(side: usize) -> Result<(), GridError> {
    if side < MIN_SIDE || side % 2 == 0 {
        return Err(GridError::InvalidDimension { side });
    }
    Ok(())
}

/// Square matrix of [`Cell`]s addressed 1..=side on both axes.
///
/// Stored column-major so that iterating a column touches contiguous memory,
/// matching the column-by-column order the synchronizer walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    side: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Grid of the given side filled with one value.
    pub fn new(side: usize, fill: Cell) -> Self {
        Self {
            side,
            cells: vec![fill; side * side],
        }
    }

    /// Build a grid by evaluating `f(x, y)` at every 1-based position.
    pub fn from_fn(side: usize, mut f: impl FnMut(usize, usize) -> Cell) -> Self {
        let mut grid = Self::new(side, Cell::Open);
        for x in 1..=side {
            for y in 1..=side {
                grid.cells[(x - 1) * side + (y - 1)] = f(x, y);
            }
        }
        grid
    }

    pub fn side(&self) -> usize {
        self.side
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x == 0 || y == 0 || x > self.side || y > self.side {
            return None;
        }
        Some((x - 1) * self.side + (y - 1))
    }

    /// Cell at `(x, y)`, or `None` outside 1..=side.
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Cell::Wall)
    }

    /// Set the cell at `(x, y)`. Returns false when out of range.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    pub fn open_count(&self) -> usize {
        self.cells.len() - self.wall_count()
    }

    /// Iterate every position with its cell, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, c)| {
            let x = i / self.side + 1;
            let y = i % self.side + 1;
            (GridPos::new(x, y), *c)
        })
    }

    /// Text rendering: `#` for walls, space for open cells, one row per `y`.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.side * (self.side + 1));
        for y in 1..=self.side {
            for x in 1..=self.side {
                out.push(if self.is_wall(x, y) { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}
