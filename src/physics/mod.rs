//! Minimal physics engine
//!
//! Circles and one static edge loop, nothing more:
//! - Per-tick Euler integration of awake bodies
//! - All-pairs contact detection, moving body first
//! - Positions live with the owning entity, never in the body

pub mod body;
pub mod response;
pub mod shape;
pub mod world;

pub use body::{Body, BodyId, BodyOwners, EntityId};
pub use response::{elastic_exchange, reflect_horizontal, separate_circles};
pub use shape::{CollisionKind, Shape, circle_edge_loop_contact, circles_touch};
pub use world::{Collision, PhysicsWorld};
