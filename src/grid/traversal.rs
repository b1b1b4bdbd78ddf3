//! Breadth-first traversals over the neighbor graph
//!
//! The visited set and queue are reused between runs and cleared at the start
//! of every traversal. Only one traversal runs at a time (`&mut self`).

use std::collections::{HashSet, VecDeque};

use super::cell::{CellKind, GridPos};
use super::store::Grid;

#[derive(Debug, Default)]
pub struct Traversal {
    visited: HashSet<GridPos>,
    queue: VecDeque<GridPos>,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.visited.clear();
        self.queue.clear();
    }

    /// Same-colored region connected to `seed`, seed first.
    ///
    /// Only normal neighbors matching the seed's color are followed, so a
    /// special seed yields just itself. An empty seed yields nothing.
    pub fn cluster(&mut self, grid: &Grid, seed: GridPos) -> Vec<GridPos> {
        let Some(seed_cell) = grid.get(seed) else {
            debug_assert!(grid.is_in_bounds(seed), "cluster seed {seed:?} outside grid");
            self.reset();
            return Vec::new();
        };
        self.cluster_from(grid, seed, seed_cell.kind)
    }

    /// Region of `kind`'s color reachable from `seed`, seed first.
    ///
    /// The seed itself need not be occupied: a placed bubble already cleared
    /// by a special effect still links the cells around it.
    pub fn cluster_from(&mut self, grid: &Grid, seed: GridPos, kind: CellKind) -> Vec<GridPos> {
        self.reset();
        let mut cluster = vec![seed];
        let Some(color) = kind.color() else {
            return cluster;
        };
        self.visited.insert(seed);
        self.queue.push_back(seed);

        while let Some(pos) = self.queue.pop_front() {
            for (n, cell) in grid.neighbors(pos) {
                if cell.kind.color() == Some(color) && self.visited.insert(n) {
                    cluster.push(n);
                    self.queue.push_back(n);
                }
            }
        }
        cluster
    }

    /// Every occupied cell reachable from the top row through occupied cells.
    ///
    /// All top-row cells seed the same search, so regions joined below the
    /// top row are only walked once.
    pub fn attached(&mut self, grid: &Grid) -> HashSet<GridPos> {
        self.reset();
        for seed in grid.row_positions(0) {
            if self.visited.insert(seed) {
                self.queue.push_back(seed);
            }
        }

        while let Some(pos) = self.queue.pop_front() {
            for (n, _) in grid.neighbors(pos) {
                if self.visited.insert(n) {
                    self.queue.push_back(n);
                }
            }
        }
        std::mem::take(&mut self.visited)
    }

    /// Occupied cells not reachable from the top row, row-major
    pub fn unattached(&mut self, grid: &Grid) -> Vec<GridPos> {
        let attached = self.attached(grid);
        grid.occupied()
            .map(|(p, _)| p)
            .filter(|p| !attached.contains(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::cell::{BubbleColor, Cell, CellKind};
    use proptest::prelude::*;

    const R: Option<CellKind> = Some(CellKind::Normal(BubbleColor::Red));
    const B: Option<CellKind> = Some(CellKind::Normal(BubbleColor::Blue));
    const S: Option<CellKind> = Some(CellKind::Star);
    const X: Option<CellKind> = Some(CellKind::Indestructible);
    const E: Option<CellKind> = None;

    #[test]
    fn test_cluster_follows_color_only() {
        let grid = Grid::from_layout(&[
            vec![R, R, B, R],
            vec![R, B, R],
            vec![E, R, E, E],
        ])
        .unwrap();
        let mut t = Traversal::new();
        let mut cluster = t.cluster(&grid, GridPos::new(0, 0));
        cluster.sort();
        assert_eq!(
            cluster,
            vec![
                GridPos::new(0, 0),
                GridPos::new(0, 1),
                GridPos::new(1, 0),
                GridPos::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_cluster_special_seed_is_singleton() {
        let grid = Grid::from_layout(&[vec![S, R, R], vec![R, R]]).unwrap();
        let mut t = Traversal::new();
        assert_eq!(t.cluster(&grid, GridPos::new(0, 0)), vec![GridPos::new(0, 0)]);
    }

    #[test]
    fn test_cluster_empty_seed() {
        let grid = Grid::new(2, 3);
        let mut t = Traversal::new();
        assert!(t.cluster(&grid, GridPos::new(0, 0)).is_empty());
    }

    #[test]
    fn test_cluster_from_empty_seed_links_neighbors() {
        // The gap at (1,1) joins the reds above it to the one below
        let grid = Grid::from_layout(&[
            vec![E, R, R, E],
            vec![B, E, E],
            vec![E, E, R, E],
        ])
        .unwrap();
        let mut t = Traversal::new();
        let red = CellKind::Normal(BubbleColor::Red);
        let mut cluster = t.cluster_from(&grid, GridPos::new(1, 1), red);
        assert_eq!(cluster[0], GridPos::new(1, 1));
        cluster.sort();
        assert_eq!(
            cluster,
            vec![
                GridPos::new(0, 1),
                GridPos::new(0, 2),
                GridPos::new(1, 1),
                GridPos::new(2, 2),
            ]
        );
        assert_eq!(
            t.cluster_from(&grid, GridPos::new(1, 1), CellKind::Bomb),
            vec![GridPos::new(1, 1)]
        );
    }

    #[test]
    fn test_attached_crosses_kinds() {
        let grid = Grid::from_layout(&[
            vec![X, E, E, E],
            vec![S, E, E],
            vec![B, E, R, E],
            vec![E, E, R],
        ])
        .unwrap();
        let mut t = Traversal::new();
        let attached = t.attached(&grid);
        assert_eq!(attached.len(), 3);
        assert!(attached.contains(&GridPos::new(2, 0)));
        assert_eq!(
            t.unattached(&grid),
            vec![GridPos::new(2, 2), GridPos::new(3, 2)]
        );
    }

    #[test]
    fn test_attached_empty_top_row() {
        let grid = Grid::from_layout(&[vec![E, E, E], vec![R, R]]).unwrap();
        let mut t = Traversal::new();
        assert!(t.attached(&grid).is_empty());
        assert_eq!(t.unattached(&grid).len(), 2);
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        let kind = prop_oneof![
            Just(None),
            Just(None),
            Just(R),
            Just(B),
            Just(S),
            Just(X),
        ];
        proptest::collection::vec(kind, 6 * 7).prop_map(|kinds| {
            let mut grid = Grid::new(6, 7);
            let mut it = kinds.into_iter();
            for row in 0..6 {
                for col in 0..grid.cols_in_row(row) {
                    if let Some(Some(kind)) = it.next() {
                        grid.set(GridPos::new(row, col), Some(Cell::new(kind)));
                    }
                }
            }
            grid
        })
    }

    proptest! {
        #[test]
        fn prop_attached_is_idempotent(grid in arb_grid()) {
            let mut t = Traversal::new();
            let first = t.attached(&grid);
            let second = t.attached(&grid);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_cluster_is_color_homogeneous(grid in arb_grid(), row in 0usize..6, col in 0usize..6) {
            let seed = GridPos::new(row, col);
            let mut t = Traversal::new();
            let cluster = t.cluster(&grid, seed);
            if let Some(seed_cell) = grid.get(seed) {
                prop_assert_eq!(cluster[0], seed);
                if seed_cell.kind.is_normal() {
                    for p in &cluster {
                        prop_assert_eq!(grid.get(*p).map(|c| c.kind), Some(seed_cell.kind));
                    }
                } else {
                    prop_assert_eq!(cluster.len(), 1);
                }
            } else {
                prop_assert!(cluster.is_empty());
            }
        }
    }
}
