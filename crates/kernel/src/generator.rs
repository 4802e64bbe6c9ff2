use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::grid::{Cell, Grid};

/// Produces a maze grid for a given side length.
///
/// Callers are expected to pass an odd side >= 5. Implementations must not
/// panic on other values, but the returned shape is then unspecified.
pub trait MazeGenerator {
    fn generate(&mut self, side: usize) -> Grid;
}

impl<G: MazeGenerator + ?Sized> MazeGenerator for Box<G> {
    fn generate(&mut self, side: usize) -> Grid {
        (**self).generate(side)
    }
}

/// Randomized depth-first backtracking over the even-indexed lattice.
///
/// Rooms sit at even `(x, y)`; walls between neighbouring rooms are carved as
/// the walk advances, which yields a spanning tree of the rooms (a perfect maze).
/// Seeded with ChaCha8 so the same seed replays the same sequence of mazes.
pub struct BacktrackerGenerator {
    rng: ChaCha8Rng,
}

const STEPS: [(isize, isize); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

impl BacktrackerGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::with_seed(rand::random())
    }
}

impl MazeGenerator for BacktrackerGenerator {
    fn generate(&mut self, side: usize) -> Grid {
        let mut grid = Grid::new(side, Cell::Wall);
        if side < 3 {
            return grid;
        }

        let interior = |x: isize, y: isize| x >= 2 && y >= 2 && x < side as isize && y < side as isize;

        grid.set(2, 2, Cell::Open);
        let mut stack: Vec<(isize, isize)> = vec![(2, 2)];
        let mut carved = 1usize;

        while let Some(&(cx, cy)) = stack.last() {
            let candidates: Vec<(isize, isize)> = STEPS
                .iter()
                .map(|(dx, dy)| (cx + dx, cy + dy))
                .filter(|&(nx, ny)| interior(nx, ny) && grid.is_wall(nx as usize, ny as usize))
                .collect();

            match candidates.choose(&mut self.rng) {
                Some(&(nx, ny)) => {
                    let (mx, my) = ((cx + nx) / 2, (cy + ny) / 2);
                    grid.set(mx as usize, my as usize, Cell::Open);
                    grid.set(nx as usize, ny as usize, Cell::Open);
                    stack.push((nx, ny));
                    carved += 1;
                }
                None => {
                    stack.pop();
                }
            }
        }

        tracing::trace!(side, rooms = carved, "maze generated");
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// True when open cells form a single tree under 4-neighbour adjacency.
    fn is_perfect(grid: &Grid) -> bool {
        let side = grid.side();
        let open: Vec<(usize, usize)> = grid
            .iter()
            .filter(|(_, c)| *c == Cell::Open)
            .map(|(p, _)| (p.x, p.y))
            .collect();
        let Some(&start) = open.first() else {
            return true;
        };

        let mut edges = 0usize;
        for &(x, y) in &open {
            if grid.get(x + 1, y) == Some(Cell::Open) {
                edges += 1;
            }
            if grid.get(x, y + 1) == Some(Cell::Open) {
                edges += 1;
            }
        }

        let mut seen = vec![false; (side + 1) * (side + 1)];
        let mut queue = VecDeque::from([start]);
        seen[start.0 * (side + 1) + start.1] = true;
        let mut reached = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            reached += 1;
            let neighbours = [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)];
            for (nx, ny) in neighbours {
                if grid.get(nx, ny) == Some(Cell::Open) && !seen[nx * (side + 1) + ny] {
                    seen[nx * (side + 1) + ny] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        reached == open.len() && edges == open.len() - 1
    }

    #[test]
    fn generates_requested_side() {
        let mut generator = BacktrackerGenerator::with_seed(1);
        let grid = generator.generate(21);
        assert_eq!(grid.side(), 21);
    }

    #[test]
    fn border_is_wall() {
        let mut generator = BacktrackerGenerator::with_seed(7);
        let grid = generator.generate(11);
        for i in 1..=11 {
            assert!(grid.is_wall(i, 1));
            assert!(grid.is_wall(i, 11));
            assert!(grid.is_wall(1, i));
            assert!(grid.is_wall(11, i));
        }
    }

    #[test]
    fn every_room_is_carved() {
        let mut generator = BacktrackerGenerator::with_seed(3);
        for side in [5, 7, 9, 21] {
            let grid = generator.generate(side);
            let rooms = ((side - 1) / 2).pow(2);
            // a spanning tree over `rooms` nodes carves `rooms - 1` connecting cells
            assert_eq!(grid.open_count(), 2 * rooms - 1, "side {side}");
        }
    }

    #[test]
    fn mazes_are_perfect() {
        for seed in 0..10 {
            let mut generator = BacktrackerGenerator::with_seed(seed);
            for side in [5, 9, 15, 21] {
                let grid = generator.generate(side);
                assert!(is_perfect(&grid), "seed {seed} side {side}");
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = BacktrackerGenerator::with_seed(42);
        let mut b = BacktrackerGenerator::with_seed(42);
        assert_eq!(a.generate(21), b.generate(21));
        assert_eq!(a.generate(21), b.generate(21));
    }

    #[test]
    fn successive_mazes_differ() {
        let mut generator = BacktrackerGenerator::with_seed(42);
        let first = generator.generate(21);
        let second = generator.generate(21);
        assert_ne!(first, second);
    }

    #[test]
    fn degenerate_sides_do_not_panic() {
        let mut generator = BacktrackerGenerator::with_seed(0);
        assert_eq!(generator.generate(0).side(), 0);
        assert_eq!(generator.generate(2).wall_count(), 4);
        let even = generator.generate(8);
        assert_eq!(even.side(), 8);
        assert!(is_perfect(&even));
    }
}
