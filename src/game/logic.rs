//! Grid reconciliation after a projectile snaps
//!
//! Order of operations for one placement:
//! 1. special neighbors fire (Star, then Lightning, then Bomb)
//! 2. the same-color cluster around the placed cell pops when large enough,
//!    even if an effect already cleared the placed cell itself
//! 3. everything no longer connected to the top row detaches

use super::cascade::{Cascade, Removal, RemovalKind};
use super::events::{EventSink, GameEvent};
use crate::config::GameConfig;
use crate::grid::{Cell, Grid, GridPos, Traversal};

/// Cells removed while reconciling one placement
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconciliation {
    pub removals: Vec<Removal>,
}

impl Reconciliation {
    pub fn count(&self, kind: RemovalKind) -> usize {
        self.removals.iter().filter(|r| r.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }
}

/// Matching and falling rules
#[derive(Debug)]
pub struct GameLogic {
    traversal: Traversal,
    cluster_threshold: usize,
    star_removes_activator: bool,
}

impl GameLogic {
    pub fn new(cluster_threshold: usize, star_removes_activator: bool) -> Self {
        Self {
            traversal: Traversal::new(),
            cluster_threshold,
            star_removes_activator,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.cluster_threshold, config.star_removes_activator)
    }

    /// Place `cell` at `pos` and resolve the consequences
    pub fn handle_snapped(
        &mut self,
        grid: &mut Grid,
        pos: GridPos,
        cell: Cell,
        sink: &mut dyn EventSink,
    ) -> Reconciliation {
        if let Some(previous) = grid.set(pos, Some(cell)) {
            log::warn!("snap at {pos:?} overwrote {:?}", previous.kind);
        }
        sink.on_event(&GameEvent::Snapped { pos, cell });

        let mut removals = {
            let mut cascade = Cascade::new(grid, sink, self.star_removes_activator);
            cascade.trigger_neighbors(pos);
            cascade.finish()
        };

        let cluster = self.traversal.cluster_from(grid, pos, cell.kind);
        if cluster.len() >= self.cluster_threshold {
            log::debug!("cluster of {} at {pos:?}", cluster.len());
            for p in cluster {
                if let Some(popped) = grid.remove(p) {
                    sink.on_event(&GameEvent::Popped { pos: p, cell: popped });
                    removals.push(Removal {
                        pos: p,
                        cell: popped,
                        kind: RemovalKind::Popped,
                    });
                }
            }
        }

        removals.extend(self.remove_unattached(grid, sink));
        Reconciliation { removals }
    }

    /// Drop every cell not connected to the top row
    pub fn remove_unattached(&mut self, grid: &mut Grid, sink: &mut dyn EventSink) -> Vec<Removal> {
        let loose = self.traversal.unattached(grid);
        let mut removals = Vec::with_capacity(loose.len());
        for pos in loose {
            if let Some(cell) = grid.remove(pos) {
                sink.on_event(&GameEvent::Detached { pos, cell });
                removals.push(Removal {
                    pos,
                    cell,
                    kind: RemovalKind::Detached,
                });
            }
        }
        if !removals.is_empty() {
            log::debug!("{} cells detached", removals.len());
        }
        removals
    }

    /// No colored bubbles left
    pub fn is_won(grid: &Grid) -> bool {
        !grid.has_normal_cells()
    }
}
