//! Collision response maths
//!
//! Pure functions; the scene decides which response a contact gets.

use glam::DVec2;

use crate::direction_or;

/// Move two overlapping circles apart so they exactly touch.
///
/// Each circle is placed one radius away from the shared midpoint, along the
/// line joining the centers. Coincident centers are split along the x axis.
pub fn separate_circles(a: DVec2, ra: f64, b: DVec2, rb: f64) -> (DVec2, DVec2) {
    let midpoint = (a + b) / 2.0;
    let away_from_b = direction_or(a - b, DVec2::X);
    (midpoint + away_from_b * ra, midpoint - away_from_b * rb)
}

/// Equal-mass elastic exchange along the collision normal.
///
/// With `n = normalize(pos_b - pos_a)` and `p = v_a·n - v_b·n`:
/// `v_a' = v_a - p·n`, `v_b' = v_b + p·n`. Tangential components are kept.
pub fn elastic_exchange(pos_a: DVec2, vel_a: DVec2, pos_b: DVec2, vel_b: DVec2) -> (DVec2, DVec2) {
    let n = direction_or(pos_b - pos_a, DVec2::X);
    let p = vel_a.dot(n) - vel_b.dot(n);
    (vel_a - p * n, vel_b + p * n)
}

/// Bounce off a vertical wall with no energy loss
#[inline]
pub fn reflect_horizontal(velocity: DVec2) -> DVec2 {
    DVec2::new(-velocity.x, velocity.y)
}
