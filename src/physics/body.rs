//! Rigid bodies and their owners
//!
//! A body never stores a position. Circles are centered on their owner's
//! position, which the owner table provides through [`BodyOwners`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Identity of a scene entity that may own a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Handle to a body registered in a [`super::PhysicsWorld`]
///
/// Carries a generation so a handle kept after deregistration never aliases
/// a body registered later in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Source of truth for owner positions
///
/// Implementors should signal observers (the renderer) whenever
/// `set_position` is called.
pub trait BodyOwners {
    fn position(&self, owner: EntityId) -> Option<DVec2>;
    fn set_position(&mut self, owner: EntityId, position: DVec2);
}

/// A physics-bearing body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub shape: Shape,
    pub owner: EntityId,
    velocity: DVec2,
    resting: bool,
}

impl Body {
    /// A circle that starts at rest
    pub fn circle(radius: f64, owner: EntityId) -> Self {
        Self {
            shape: Shape::circle(radius),
            owner,
            velocity: DVec2::ZERO,
            resting: true,
        }
    }

    /// A static bounding rectangle
    pub fn edge_loop(origin: DVec2, size: DVec2, owner: EntityId) -> Self {
        Self {
            shape: Shape::edge_loop(origin, size),
            owner,
            velocity: DVec2::ZERO,
            resting: true,
        }
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Set a new velocity. A non-zero velocity wakes the body; a zero
    /// velocity leaves the resting flag untouched.
    pub fn set_velocity(&mut self, velocity: DVec2) {
        debug_assert!(
            !matches!(self.shape, Shape::EdgeLoop { .. }) || velocity == DVec2::ZERO,
            "edge loops are static"
        );
        self.velocity = velocity;
        if velocity != DVec2::ZERO {
            self.resting = false;
        }
    }

    #[inline]
    pub fn is_resting(&self) -> bool {
        self.resting
    }

    /// Mark the body as resting (zeroes velocity) or awake
    pub fn set_resting(&mut self, resting: bool) {
        self.resting = resting;
        if resting {
            self.velocity = DVec2::ZERO;
        }
    }
}
