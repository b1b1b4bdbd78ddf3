//! Grid cell contents

use serde::{Deserialize, Serialize};

use crate::physics::EntityId;

/// Row/column address in the offset grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_even_row(&self) -> bool {
        self.row % 2 == 0
    }
}

/// Colors a normal bubble can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BubbleColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl BubbleColor {
    pub const ALL: [BubbleColor; 7] = [
        BubbleColor::Red,
        BubbleColor::Orange,
        BubbleColor::Yellow,
        BubbleColor::Green,
        BubbleColor::Blue,
        BubbleColor::Purple,
        BubbleColor::Pink,
    ];
}

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Pops in clusters of its own color
    Normal(BubbleColor),
    /// Removes its neighbors when activated
    Bomb,
    /// Removes its whole row when activated
    Lightning,
    /// Removes every bubble of the activator's kind
    Star,
    /// Never removed by an activation (can still fall)
    Indestructible,
}

impl CellKind {
    pub fn color(&self) -> Option<BubbleColor> {
        match *self {
            CellKind::Normal(color) => Some(color),
            _ => None,
        }
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, CellKind::Normal(_))
    }

    /// Bomb, Lightning and Star trigger effects when a neighbor lands
    #[inline]
    pub fn is_special(&self) -> bool {
        matches!(self, CellKind::Bomb | CellKind::Lightning | CellKind::Star)
    }
}

/// An occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// Scene entity drawn for this bubble, if any
    #[serde(skip)]
    pub entity: Option<EntityId>,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self { kind, entity: None }
    }

    pub fn with_entity(kind: CellKind, entity: EntityId) -> Self {
        Self {
            kind,
            entity: Some(entity),
        }
    }

    pub fn normal(color: BubbleColor) -> Self {
        Self::new(CellKind::Normal(color))
    }
}
