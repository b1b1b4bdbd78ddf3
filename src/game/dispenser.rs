//! Projectile color supply
//!
//! Colors are drawn from a seeded PCG stream so a level replays identically
//! for a given seed. Only colors still present in the grid are offered.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::grid::{BubbleColor, CellKind, Grid};

#[derive(Debug, Clone)]
pub struct Dispenser {
    rng: Pcg32,
    /// Shots left to hand out (None = unlimited)
    remaining: Option<u32>,
}

impl Dispenser {
    pub fn new(seed: u64, shots: Option<u32>) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            remaining: shots,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.seed, config.shots())
    }

    /// Next projectile, consuming one shot. None once the budget is spent.
    pub fn next(&mut self, grid: &Grid) -> Option<BubbleColor> {
        if let Some(left) = self.remaining.as_mut() {
            if *left == 0 {
                return None;
            }
            *left -= 1;
        }
        Some(self.pick(grid))
    }

    /// A fresh color for an already-loaded projectile; does not use a shot
    pub fn replacement(&mut self, grid: &Grid) -> BubbleColor {
        self.pick(grid)
    }

    pub fn shots_left(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn pick(&mut self, grid: &Grid) -> BubbleColor {
        let present: Vec<BubbleColor> = BubbleColor::ALL
            .into_iter()
            .filter(|&c| grid.is_kind_in_grid(CellKind::Normal(c)))
            .collect();
        // An empty grid means the level is over; any color will do
        let pool: &[BubbleColor] = if present.is_empty() {
            &BubbleColor::ALL
        } else {
            &present
        };
        pool[self.rng.random_range(0..pool.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, GridPos};

    fn two_color_grid() -> Grid {
        let mut grid = Grid::new(2, 4);
        grid.set(GridPos::new(0, 0), Some(Cell::normal(BubbleColor::Green)));
        grid.set(GridPos::new(0, 1), Some(Cell::normal(BubbleColor::Purple)));
        grid.set(GridPos::new(0, 2), Some(Cell::new(CellKind::Bomb)));
        grid
    }

    #[test]
    fn test_only_present_colors() {
        let grid = two_color_grid();
        let mut d = Dispenser::new(7, None);
        for _ in 0..200 {
            let c = d.next(&grid).unwrap();
            assert!(c == BubbleColor::Green || c == BubbleColor::Purple);
        }
        assert_eq!(d.shots_left(), None);
    }

    #[test]
    fn test_budget_yields_exactly_n() {
        let grid = two_color_grid();
        let mut d = Dispenser::new(1, Some(3));
        assert!(d.next(&grid).is_some());
        assert!(d.next(&grid).is_some());
        // Replacements are free
        d.replacement(&grid);
        assert!(d.next(&grid).is_some());
        assert!(d.is_exhausted());
        assert_eq!(d.next(&grid), None);
        assert_eq!(d.shots_left(), Some(0));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let grid = two_color_grid();
        let mut a = Dispenser::new(42, None);
        let mut b = Dispenser::new(42, None);
        let sa: Vec<_> = (0..32).filter_map(|_| a.next(&grid)).collect();
        let sb: Vec<_> = (0..32).filter_map(|_| b.next(&grid)).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_empty_grid_still_yields() {
        let grid = Grid::new(2, 3);
        let mut d = Dispenser::new(0, Some(1));
        assert!(d.next(&grid).is_some());
    }
}
