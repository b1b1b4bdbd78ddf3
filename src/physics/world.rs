//! Body registry, integrator and collision detector
//!
//! One `step` advances every awake body by its velocity and then tests each
//! awake circle against every other registered body. Velocities are per-tick
//! displacements, so callers keep them small enough that no contact is missed.

use super::body::{Body, BodyId, BodyOwners};
use super::shape::{CollisionKind, Shape};

/// A contact found during a tick. `first` is always the moving body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub first: BodyId,
    pub second: BodyId,
    pub kind: CollisionKind,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Owns every live body
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body, reusing a freed slot when one is available
    pub fn register(&mut self, body: Body) -> BodyId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyId {
            index,
            generation: 0,
        }
    }

    /// Remove a body. Unknown or stale handles are ignored.
    pub fn deregister(&mut self, id: BodyId) -> Option<Body> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(body)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.body.as_ref())
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.body.as_mut())
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Registered bodies in slot order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.body.as_ref().map(|b| {
                (
                    BodyId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    b,
                )
            })
        })
    }

    /// Whether any body is still moving
    pub fn has_moving_bodies(&self) -> bool {
        self.iter().any(|(_, b)| !b.is_resting())
    }

    /// Advance one tick and return the contacts found, moving body first
    pub fn step<O: BodyOwners>(&mut self, owners: &mut O) -> Vec<Collision> {
        self.integrate(owners);
        self.detect(owners)
    }

    /// Euler step: position += velocity for every awake body
    fn integrate<O: BodyOwners>(&mut self, owners: &mut O) {
        for slot in &self.slots {
            let Some(body) = &slot.body else { continue };
            if body.is_resting() {
                continue;
            }
            let position = owners.position(body.owner);
            debug_assert!(position.is_some(), "moving body {:?} has no position", body.owner);
            let Some(position) = position else { continue };
            owners.set_position(body.owner, position + body.velocity());
        }
    }

    /// All-pairs tests of each awake circle against every other body
    fn detect<O: BodyOwners>(&self, owners: &O) -> Vec<Collision> {
        let mut collisions = Vec::new();
        let bodies: Vec<(BodyId, &Body)> = self.iter().collect();

        for &(id, body) in &bodies {
            if body.is_resting() {
                continue;
            }
            debug_assert!(body.shape.radius().is_some(), "only circles can move");
            let Shape::Circle { radius } = body.shape else { continue };
            let center = owners.position(body.owner);
            debug_assert!(center.is_some(), "moving circle {:?} has no position", body.owner);
            let Some(center) = center else { continue };

            for &(other_id, other) in &bodies {
                if other_id == id {
                    continue;
                }
                let other_center = owners.position(other.owner);
                if let Some(kind) = other.shape.test_circle(center, radius, other_center) {
                    collisions.push(Collision {
                        first: id,
                        second: other_id,
                        kind,
                    });
                }
            }
        }
        collisions
    }
}
