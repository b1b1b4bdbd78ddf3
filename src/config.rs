//! Game configuration
//!
//! Loaded once at startup from JSON; every field has a default so partial
//! files are accepted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Difficulty levels (scale the shot budget and the time limit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Shot budget and time limit multiplier
    pub fn multiplier(&self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 2,
            Difficulty::Hard => 1,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    /// Number of grid rows
    pub rows: usize,
    /// Columns in even rows (odd rows hold one fewer)
    pub columns: usize,
    /// Minimum cluster size that pops
    pub cluster_threshold: usize,

    // === Scene ===
    /// Width of the bounding edge loop; also sets the cell diameter
    pub scene_width: f64,
    /// Height of the bounding edge loop
    pub scene_height: f64,
    /// Collision radius as a fraction of the bubble radius
    pub collision_radius_factor: f64,

    // === Projectiles ===
    /// Displacement per tick
    pub projectile_speed: f64,
    /// Physics ticks per frame
    pub steps_per_frame: u32,
    /// Firing cone half-angle from vertical (radians)
    pub max_fire_angle: f64,
    /// Whether the shot budget is enforced
    pub shots_limited: bool,
    /// Shot budget scale
    pub difficulty: Difficulty,
    /// Dispenser RNG seed
    pub seed: u64,

    // === Clock ===
    /// Whether the game is played against a time limit
    pub timed: bool,
    /// Time limit scale
    pub time_difficulty: Difficulty,

    // === Special bubbles ===
    /// Whether a star also removes the bubble that activated it
    pub star_removes_activator: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            columns: GRID_COLUMNS,
            cluster_threshold: CLUSTER_THRESHOLD,

            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            collision_radius_factor: COLLISION_RADIUS_FACTOR,

            projectile_speed: PROJECTILE_SPEED,
            steps_per_frame: STEPS_PER_FRAME,
            max_fire_angle: MAX_FIRE_ANGLE,
            shots_limited: false,
            difficulty: Difficulty::Easy,
            seed: 0,

            timed: false,
            time_difficulty: Difficulty::Easy,

            star_removes_activator: true,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that values describe a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(invalid("rows", "must be at least 1"));
        }
        if self.columns < 2 {
            return Err(invalid("columns", "must be at least 2"));
        }
        if self.cluster_threshold < 2 {
            return Err(invalid("cluster_threshold", "must be at least 2"));
        }
        if !(self.scene_width > 0.0 && self.scene_height > 0.0) {
            return Err(invalid("scene_width", "scene size must be positive"));
        }
        if !(self.collision_radius_factor > 0.0 && self.collision_radius_factor <= 1.0) {
            return Err(invalid("collision_radius_factor", "must be in (0, 1]"));
        }
        if !(self.projectile_speed > 0.0) {
            return Err(invalid("projectile_speed", "must be positive"));
        }
        // Per-tick travel must stay below one collision radius or shots tunnel
        if self.projectile_speed >= self.bubble_radius() * self.collision_radius_factor {
            return Err(invalid(
                "projectile_speed",
                format!(
                    "{} per tick would skip past bubbles of radius {}",
                    self.projectile_speed,
                    self.bubble_radius()
                ),
            ));
        }
        if self.steps_per_frame == 0 {
            return Err(invalid("steps_per_frame", "must be at least 1"));
        }
        if !(self.max_fire_angle > 0.0 && self.max_fire_angle < std::f64::consts::FRAC_PI_2) {
            return Err(invalid("max_fire_angle", "must be in (0, pi/2)"));
        }
        Ok(())
    }

    /// Diameter of one grid cell
    pub fn cell_diameter(&self) -> f64 {
        self.scene_width / self.columns as f64
    }

    /// Drawn radius of a bubble
    pub fn bubble_radius(&self) -> f64 {
        self.cell_diameter() / 2.0
    }

    /// Radius used for collision tests
    pub fn collision_radius(&self) -> f64 {
        self.bubble_radius() * self.collision_radius_factor
    }

    /// Shot budget (None = unlimited)
    pub fn shots(&self) -> Option<u32> {
        self.shots_limited
            .then(|| BASE_SHOTS * self.difficulty.multiplier())
    }

    /// Bonus per unused shot on a win
    pub fn shot_bonus(&self) -> f64 {
        let m = self.difficulty.multiplier() as f64;
        BASE_SHOT_BONUS / (m * m)
    }

    /// Time limit in seconds (None = untimed)
    pub fn time_limit(&self) -> Option<u32> {
        self.timed
            .then(|| BASE_TIME_LIMIT * self.time_difficulty.multiplier())
    }

    /// Physics ticks in one second of game time
    pub fn ticks_per_second(&self) -> u64 {
        u64::from(FRAMES_PER_SECOND) * u64::from(self.steps_per_frame)
    }

    /// Time limit in ticks (None = untimed)
    pub fn time_limit_ticks(&self) -> Option<u64> {
        self.time_limit()
            .map(|secs| u64::from(secs) * self.ticks_per_second())
    }

    /// Bonus per second left on the clock at the end
    pub fn time_bonus(&self) -> f64 {
        let m = self.time_difficulty.multiplier() as f64;
        BASE_TIME_BONUS / (m * m)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
