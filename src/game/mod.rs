//! Game rules on top of the physics world and the grid
//!
//! - `scene`: tick driver and collision resolver
//! - `logic`: reconciliation after a projectile snaps
//! - `cascade`: special bubble activation
//! - `events`: typed event stream for renderers and scorers

pub mod cascade;
pub mod dispenser;
pub mod events;
pub mod logic;
pub mod scene;
pub mod score;

pub use cascade::{Cascade, Removal, RemovalKind};
pub use dispenser::Dispenser;
pub use events::{Cause, EventSink, GameEvent, GameOutcome, Listeners, LossReason};
pub use logic::{GameLogic, Reconciliation};
pub use scene::{Loaded, Scene};
pub use score::Scoreboard;
