//! Hex offset bubble grid
//!
//! Storage, pixel mapping and the two flood fills (cluster and attached).
//! Neighbors are derived from row parity, never stored.

pub mod cell;
pub mod geometry;
pub mod store;
pub mod traversal;

pub use cell::{BubbleColor, Cell, CellKind, GridPos};
pub use geometry::{GridGeometry, HexLayout};
pub use store::Grid;
pub use traversal::Traversal;
