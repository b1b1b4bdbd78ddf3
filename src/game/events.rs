//! Typed game events and the sink interface
//!
//! Events are delivered synchronously, in emission order, to every
//! registered listener (renderer, animator, scorer).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, CellKind, GridPos};
use crate::physics::EntityId;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// A projectile found no cell to snap into (grid overflow)
    NoSnapLocation,
    /// The shot budget ran out with colored bubbles left
    OutOfShots,
    /// The clock ran out with colored bubbles left
    OutOfTime,
}

/// Terminal state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost(LossReason),
}

/// The cell that triggered a special effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub pos: GridPos,
    pub kind: CellKind,
}

/// Discrete things the simulation reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An entity's position changed
    Moved { entity: EntityId, position: DVec2 },
    /// A projectile came to rest in the grid
    Snapped { pos: GridPos, cell: Cell },
    /// A cell was removed as part of a cluster or an effect
    Popped { pos: GridPos, cell: Cell },
    /// A cell lost its connection to the top row and falls
    Detached { pos: GridPos, cell: Cell },
    /// A special cell fired its effect and left the grid
    Activated { pos: GridPos, cell: Cell, cause: Cause },
    /// A projectile left the cannon
    Fired { entity: EntityId, velocity: DVec2 },
    /// A projectile was placed in the cannon or the next-shot slot
    Loaded { entity: EntityId, kind: CellKind },
    /// An entity left the scene
    Removed { entity: EntityId },
    GameOver { outcome: GameOutcome },
}

/// Receiver of game events
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Recording sink
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Ordered list of listeners
#[derive(Default)]
pub struct Listeners {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Listeners {
    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for Listeners {
    fn on_event(&mut self, event: &GameEvent) {
        for sink in &mut self.sinks {
            sink.on_event(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("len", &self.sinks.len()).finish()
    }
}
