//! Special bubble activation cascade
//!
//! Activating a cell dispatches on its kind:
//! - Normal: removed (end of the branch)
//! - Bomb: removed, then every neighbor is activated
//! - Lightning: removed, then every other cell in its row is activated
//! - Star: removed (optionally with its activator), then every cell sharing
//!   the activator's kind is activated
//! - Indestructible: nothing happens
//!
//! A cell is always removed before its targets are activated, and each
//! position is activated at most once per cascade, so cycles such as
//! Star -> Bomb -> Star terminate.

use std::collections::HashSet;

use super::events::{Cause, EventSink, GameEvent};
use crate::grid::{Cell, CellKind, Grid, GridPos};

/// How a cell left the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    Popped,
    Detached,
    Activated,
}

/// A cell removed from the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub pos: GridPos,
    pub cell: Cell,
    pub kind: RemovalKind,
}

/// Special kinds checked around a newly placed cell, in this order
const TRIGGER_ORDER: [CellKind; 3] = [CellKind::Star, CellKind::Lightning, CellKind::Bomb];

/// One activation cascade over a grid
pub struct Cascade<'a> {
    grid: &'a mut Grid,
    sink: &'a mut dyn EventSink,
    star_removes_activator: bool,
    processed: HashSet<GridPos>,
    removals: Vec<Removal>,
}

impl<'a> Cascade<'a> {
    pub fn new(grid: &'a mut Grid, sink: &'a mut dyn EventSink, star_removes_activator: bool) -> Self {
        Self {
            grid,
            sink,
            star_removes_activator,
            processed: HashSet::new(),
            removals: Vec::new(),
        }
    }

    /// Activate every special neighbor of `placed`
    pub fn trigger_neighbors(&mut self, placed: GridPos) {
        let Some(cell) = self.grid.get(placed).copied() else {
            return;
        };
        let cause = Cause {
            pos: placed,
            kind: cell.kind,
        };
        for kind in TRIGGER_ORDER {
            // Rescan: an earlier effect may already have cleared some neighbors
            let targets: Vec<GridPos> = self
                .grid
                .neighbors(placed)
                .filter(|(_, c)| c.kind == kind)
                .map(|(p, _)| p)
                .collect();
            for target in targets {
                self.activate(target, cause);
            }
        }
    }

    /// Activate the cell at `pos` on behalf of `cause`
    pub fn activate(&mut self, pos: GridPos, cause: Cause) {
        let Some(cell) = self.grid.get(pos).copied() else {
            return;
        };
        if !self.processed.insert(pos) {
            return;
        }

        let targets = match cell.kind {
            CellKind::Indestructible => return,
            CellKind::Normal(_) => {
                self.remove(pos, RemovalKind::Popped);
                return;
            }
            CellKind::Bomb => {
                let targets = self.grid.neighbors(pos).map(|(p, _)| p).collect();
                self.fire(pos, cell, cause);
                targets
            }
            CellKind::Lightning => {
                let mut targets = self.grid.row_positions(pos.row);
                targets.retain(|&p| p != pos);
                self.fire(pos, cell, cause);
                targets
            }
            CellKind::Star => {
                let mut targets = self.grid.positions_of_kind(cause.kind);
                targets.retain(|&p| p != pos && p != cause.pos);
                self.fire(pos, cell, cause);
                if self.star_removes_activator {
                    self.remove_activator(cause.pos);
                }
                targets
            }
        };

        let next = Cause {
            pos,
            kind: cell.kind,
        };
        log::debug!("{:?} at {:?} reaches {} cells", cell.kind, pos, targets.len());
        for target in targets {
            self.activate(target, next);
        }
    }

    /// Cells removed so far, in removal order
    pub fn finish(self) -> Vec<Removal> {
        self.removals
    }

    fn fire(&mut self, pos: GridPos, cell: Cell, cause: Cause) {
        self.grid.remove(pos);
        self.sink.on_event(&GameEvent::Activated { pos, cell, cause });
        self.removals.push(Removal {
            pos,
            cell,
            kind: RemovalKind::Activated,
        });
    }

    fn remove_activator(&mut self, pos: GridPos) {
        let removable = self
            .grid
            .get(pos)
            .is_some_and(|c| c.kind != CellKind::Indestructible);
        if removable && self.processed.insert(pos) {
            self.remove(pos, RemovalKind::Popped);
        }
    }

    fn remove(&mut self, pos: GridPos, kind: RemovalKind) {
        let Some(cell) = self.grid.remove(pos) else {
            return;
        };
        let event = match kind {
            RemovalKind::Detached => GameEvent::Detached { pos, cell },
            RemovalKind::Popped | RemovalKind::Activated => GameEvent::Popped { pos, cell },
        };
        self.sink.on_event(&event);
        self.removals.push(Removal { pos, cell, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BubbleColor;

    const R: Option<CellKind> = Some(CellKind::Normal(BubbleColor::Red));
    const B: Option<CellKind> = Some(CellKind::Normal(BubbleColor::Blue));
    const BOMB: Option<CellKind> = Some(CellKind::Bomb);
    const ZAP: Option<CellKind> = Some(CellKind::Lightning);
    const STAR: Option<CellKind> = Some(CellKind::Star);
    const X: Option<CellKind> = Some(CellKind::Indestructible);
    const E: Option<CellKind> = None;

    fn cause_at(grid: &Grid, pos: GridPos) -> Cause {
        Cause {
            pos,
            kind: grid.get(pos).map(|c| c.kind).unwrap(),
        }
    }

    #[test]
    fn test_bomb_clears_all_neighbors() {
        let mut grid = Grid::from_layout(&[vec![BOMB, B], vec![B]]).unwrap();
        let mut events = Vec::new();
        // Fired at from below by a red projectile
        let cause = Cause {
            pos: GridPos::new(1, 0),
            kind: CellKind::Normal(BubbleColor::Red),
        };
        let mut cascade = Cascade::new(&mut grid, &mut events, true);
        cascade.activate(GridPos::new(0, 0), cause);
        let removals = cascade.finish();
        assert!(grid.is_empty());
        assert_eq!(removals.len(), 3);
        assert_eq!(removals[0].kind, RemovalKind::Activated);
        assert!(matches!(events[0], GameEvent::Activated { .. }));
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::Popped { .. })).count(),
            2
        );
    }

    #[test]
    fn test_lightning_clears_row_except_indestructible() {
        let mut grid = Grid::from_layout(&[vec![R, B, ZAP, X], vec![R, R, R]]).unwrap();
        let mut events = Vec::new();
        let cause = Cause {
            pos: GridPos::new(1, 1),
            kind: CellKind::Normal(BubbleColor::Red),
        };
        let mut cascade = Cascade::new(&mut grid, &mut events, true);
        cascade.activate(GridPos::new(0, 2), cause);
        let removals = cascade.finish();

        assert_eq!(removals.len(), 3);
        assert_eq!(grid.row_positions(0), vec![GridPos::new(0, 3)]);
        assert_eq!(grid.row_positions(1).len(), 3);
    }

    #[test]
    fn test_star_clears_activator_kind() {
        let mut grid = Grid::from_layout(&[
            vec![STAR, R, B, R],
            vec![B, R, E],
        ])
        .unwrap();
        let activator = GridPos::new(1, 1);
        let cause = cause_at(&grid, activator);
        let mut events = Vec::new();
        let mut cascade = Cascade::new(&mut grid, &mut events, true);
        cascade.activate(GridPos::new(0, 0), cause);
        cascade.finish();

        // Star, activator and both other reds are gone; blues stay
        assert_eq!(grid.len(), 2);
        assert!(!grid.is_kind_in_grid(CellKind::Normal(BubbleColor::Red)));
        assert!(!grid.is_kind_in_grid(CellKind::Star));
    }

    #[test]
    fn test_star_can_keep_activator() {
        let mut grid = Grid::from_layout(&[vec![STAR, R, R], vec![R, E]]).unwrap();
        let activator = GridPos::new(1, 0);
        let cause = cause_at(&grid, activator);
        let mut events = Vec::new();
        let mut cascade = Cascade::new(&mut grid, &mut events, false);
        cascade.activate(GridPos::new(0, 0), cause);
        cascade.finish();

        assert_eq!(grid.len(), 1);
        assert!(grid.is_occupied(activator));
    }

    #[test]
    fn test_star_bomb_cycle_terminates() {
        // Bomb next to a star next to another bomb: the star fans out to
        // every bomb, which in turn reach back to the star
        let mut grid = Grid::from_layout(&[
            vec![BOMB, STAR, BOMB, E],
            vec![R, E, BOMB],
        ])
        .unwrap();
        let mut events = Vec::new();
        let cause = Cause {
            pos: GridPos::new(1, 0),
            kind: CellKind::Normal(BubbleColor::Red),
        };
        let mut cascade = Cascade::new(&mut grid, &mut events, false);
        cascade.activate(GridPos::new(0, 0), cause);
        let removals = cascade.finish();

        assert!(grid.is_empty());
        let mut seen = HashSet::new();
        assert!(removals.iter().all(|r| seen.insert(r.pos)), "no cell removed twice");
        assert_eq!(removals.len(), 5);
    }

    #[test]
    fn test_isolated_bombs_activate_once_each() {
        let mut grid = Grid::from_layout(&[
            vec![BOMB, E, BOMB, E, BOMB],
            vec![E, E, E, E],
            vec![BOMB, E, BOMB, E, BOMB],
        ])
        .unwrap();
        let bombs: Vec<GridPos> = grid.positions_of_kind(CellKind::Bomb);
        let mut events = Vec::new();
        let cause = Cause {
            pos: GridPos::new(1, 1),
            kind: CellKind::Normal(BubbleColor::Red),
        };
        let mut cascade = Cascade::new(&mut grid, &mut events, true);
        for &bomb in &bombs {
            cascade.activate(bomb, cause);
            // Repeat activations are ignored
            cascade.activate(bomb, cause);
        }
        let removals = cascade.finish();

        assert_eq!(removals.len(), bombs.len());
        assert_eq!(events.len(), bombs.len());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_trigger_neighbors_order() {
        // New red at (1,0) touches a star at (0,0) and a bomb at (0,1)
        let mut grid = Grid::from_layout(&[vec![STAR, BOMB, B], vec![R, E]]).unwrap();
        let mut events = Vec::new();
        let mut cascade = Cascade::new(&mut grid, &mut events, false);
        cascade.trigger_neighbors(GridPos::new(1, 0));
        cascade.finish();

        // Star fires first (red activator), then the bomb clears the rest
        let activated: Vec<CellKind> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Activated { cell, .. } => Some(cell.kind),
                _ => None,
            })
            .collect();
        assert_eq!(activated, vec![CellKind::Star, CellKind::Bomb]);
        assert!(grid.is_empty());
    }
}
