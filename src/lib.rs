//! Bubble Blast - physics and grid engine for a bubble shooter
//!
//! Core modules:
//! - `physics`: Circle/edge-loop bodies, integration and collision detection
//! - `grid`: Hex offset grid, geometry lookup and flood-fill traversals
//! - `game`: Collision resolution, activation cascades, scoring and the scene
//! - `config`: Data-driven game configuration

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod physics;

pub use config::{Difficulty, GameConfig};
pub use error::{ConfigError, FireError, GridError};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Reference grid dimensions (odd rows hold one fewer column)
    pub const GRID_ROWS: usize = 12;
    pub const GRID_COLUMNS: usize = 12;

    /// Minimum same-colored group size that pops
    pub const CLUSTER_THRESHOLD: usize = 3;

    /// Scene bounds (pixels)
    pub const SCENE_WIDTH: f64 = 768.0;
    pub const SCENE_HEIGHT: f64 = 1024.0;

    /// Collision radius as a fraction of the drawn bubble radius.
    /// Slightly smaller than the bubble so shots squeeze through gaps.
    pub const COLLISION_RADIUS_FACTOR: f64 = 0.8;

    /// Projectile displacement per tick (pixels)
    pub const PROJECTILE_SPEED: f64 = 2.0;
    /// Physics ticks per rendered frame
    pub const STEPS_PER_FRAME: u32 = 8;

    /// Firing cone half-angle measured from straight up (radians)
    pub const MAX_FIRE_ANGLE: f64 = 1.4;

    /// Shot budget before the difficulty multiplier
    pub const BASE_SHOTS: u32 = 40;
    /// Per-shot bonus before dividing by the squared multiplier
    pub const BASE_SHOT_BONUS: f64 = 90.0;
    /// Time limit in seconds before the difficulty multiplier
    pub const BASE_TIME_LIMIT: u32 = 20;
    /// Per-second bonus before dividing by the squared multiplier
    pub const BASE_TIME_BONUS: f64 = 100.0;
    /// Display frames per second of game time
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Row pitch as a fraction of the cell diameter (rows are packed d/8 tighter)
    pub const ROW_PITCH_FACTOR: f64 = 7.0 / 8.0;
}

/// Normalize `v`, falling back to `fallback` when `v` has no usable length
#[inline]
pub fn direction_or(v: DVec2, fallback: DVec2) -> DVec2 {
    v.try_normalize().unwrap_or(fallback)
}

/// Angle of `offset` measured from straight up (negative y), positive to the right
#[inline]
pub fn angle_from_vertical(offset: DVec2) -> f64 {
    offset.x.atan2(-offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_or_zero_vector() {
        assert_eq!(direction_or(DVec2::ZERO, DVec2::X), DVec2::X);
        let d = direction_or(DVec2::new(3.0, 4.0), DVec2::X);
        assert!((d.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_from_vertical() {
        assert!(angle_from_vertical(DVec2::new(0.0, -5.0)).abs() < 1e-12);
        assert!(angle_from_vertical(DVec2::new(5.0, 0.0)) > 1.5);
        assert!(angle_from_vertical(DVec2::new(-5.0, 0.0)) < -1.5);
    }
}
