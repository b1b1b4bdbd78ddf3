//! Collision shapes
//!
//! Only two shapes exist: a circle centered on its owner's position, and a
//! static axis-aligned edge loop that bounds the scene.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Kind of contact between a moving circle and another body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    CircleCircle,
    CircleTopEdge,
    CircleLeftEdge,
    CircleRightEdge,
    CircleBottomEdge,
}

/// Shape carried by a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Circle centered on the owning body's position
    Circle { radius: f64 },
    /// Static bounding rectangle
    EdgeLoop { origin: DVec2, size: DVec2 },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    pub fn edge_loop(origin: DVec2, size: DVec2) -> Self {
        Shape::EdgeLoop { origin, size }
    }

    /// Circle radius, if this is a circle
    pub fn radius(&self) -> Option<f64> {
        match *self {
            Shape::Circle { radius } => Some(radius),
            Shape::EdgeLoop { .. } => None,
        }
    }

    /// Test a moving circle centered at `center` against this shape.
    ///
    /// `other_center` is only consulted for circles; edge loops are static and
    /// carry their own placement.
    pub fn test_circle(
        &self,
        center: DVec2,
        radius: f64,
        other_center: Option<DVec2>,
    ) -> Option<CollisionKind> {
        match *self {
            Shape::Circle {
                radius: other_radius,
            } => {
                let other_center = other_center?;
                circles_touch(center, radius, other_center, other_radius)
                    .then_some(CollisionKind::CircleCircle)
            }
            Shape::EdgeLoop { origin, size } => circle_edge_loop_contact(center, radius, origin, size),
        }
    }
}

/// Two circles collide when their centers are no further apart than the sum
/// of their radii
#[inline]
pub fn circles_touch(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    a.distance(b) <= ra + rb
}

/// Contact between a circle and the sides of an edge loop.
///
/// Every side is checked, but only one contact is reported, with priority
/// right, left, bottom, top. A circle wedged in a corner therefore bounces off
/// the side wall instead of snapping to the top.
pub fn circle_edge_loop_contact(
    center: DVec2,
    radius: f64,
    origin: DVec2,
    size: DVec2,
) -> Option<CollisionKind> {
    let right = center.x + radius > size.x - origin.x;
    let left = center.x - radius <= origin.x;
    let bottom = center.y + radius > size.y - origin.y;
    let top = center.y - radius <= origin.y;

    if right {
        Some(CollisionKind::CircleRightEdge)
    } else if left {
        Some(CollisionKind::CircleLeftEdge)
    } else if bottom {
        Some(CollisionKind::CircleBottomEdge)
    } else if top {
        Some(CollisionKind::CircleTopEdge)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Shape {
        Shape::edge_loop(DVec2::ZERO, DVec2::new(100.0, 200.0))
    }

    #[test]
    fn test_circles_touching_at_exact_distance() {
        assert!(circles_touch(DVec2::ZERO, 5.0, DVec2::new(10.0, 0.0), 5.0));
        assert!(!circles_touch(DVec2::ZERO, 5.0, DVec2::new(10.01, 0.0), 5.0));
    }

    #[test]
    fn test_circle_inside_bounds_misses() {
        let hit = bounds().test_circle(DVec2::new(50.0, 100.0), 5.0, None);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_each_edge() {
        let b = bounds();
        assert_eq!(
            b.test_circle(DVec2::new(97.0, 100.0), 5.0, None),
            Some(CollisionKind::CircleRightEdge)
        );
        assert_eq!(
            b.test_circle(DVec2::new(5.0, 100.0), 5.0, None),
            Some(CollisionKind::CircleLeftEdge)
        );
        assert_eq!(
            b.test_circle(DVec2::new(50.0, 196.0), 5.0, None),
            Some(CollisionKind::CircleBottomEdge)
        );
        assert_eq!(
            b.test_circle(DVec2::new(50.0, 5.0), 5.0, None),
            Some(CollisionKind::CircleTopEdge)
        );
    }

    #[test]
    fn test_corner_prefers_side_wall() {
        let b = bounds();
        // Top-right corner: right wins over top
        assert_eq!(
            b.test_circle(DVec2::new(98.0, 2.0), 5.0, None),
            Some(CollisionKind::CircleRightEdge)
        );
        // Top-left corner: left wins over top
        assert_eq!(
            b.test_circle(DVec2::new(2.0, 2.0), 5.0, None),
            Some(CollisionKind::CircleLeftEdge)
        );
        // Bottom-left corner: left wins over bottom
        assert_eq!(
            b.test_circle(DVec2::new(2.0, 198.0), 5.0, None),
            Some(CollisionKind::CircleLeftEdge)
        );
    }

    #[test]
    fn test_circle_without_other_center_misses() {
        let c = Shape::circle(5.0);
        assert_eq!(c.test_circle(DVec2::ZERO, 5.0, None), None);
        assert_eq!(
            c.test_circle(DVec2::ZERO, 5.0, Some(DVec2::new(3.0, 4.0))),
            Some(CollisionKind::CircleCircle)
        );
    }
}
