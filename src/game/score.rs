//! Score keeping
//!
//! The scoreboard is an ordinary event listener: it only sees what the
//! renderer sees. End-of-game bonuses are added by the scene.

use serde::{Deserialize, Serialize};

use super::events::{EventSink, GameEvent};

/// Points for a colored bubble popped in a cluster or by an effect
pub const POP_POINTS: u64 = 10;
/// Points for a bubble that fell
pub const DETACH_POINTS: u64 = 20;
/// Points for a special bubble firing
pub const ACTIVATE_POINTS: u64 = 30;

/// Running score for one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub popped: u32,
    pub detached: u32,
    pub activated: u32,
    /// End-of-game bonus for unused shots
    pub shot_bonus: Option<u64>,
    /// End-of-game bonus for seconds left on the clock
    pub time_bonus: Option<u64>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the unused-shot bonus. Only applied once.
    pub fn apply_shot_bonus(&mut self, shots_left: u32, per_shot: f64) {
        if self.shot_bonus.is_none() {
            let bonus = award(shots_left, per_shot);
            self.shot_bonus = Some(bonus);
            self.score += bonus;
        }
    }

    /// Add the time-left bonus. Only applied once.
    pub fn apply_time_bonus(&mut self, seconds_left: u32, per_second: f64) {
        if self.time_bonus.is_none() {
            let bonus = award(seconds_left, per_second);
            self.time_bonus = Some(bonus);
            self.score += bonus;
        }
    }

    /// Both end-of-game bonuses together
    pub fn bonus(&self) -> u64 {
        self.shot_bonus.unwrap_or(0) + self.time_bonus.unwrap_or(0)
    }

    /// Bubbles cleared by any means
    pub fn cleared(&self) -> u32 {
        self.popped + self.detached + self.activated
    }
}

fn award(units: u32, per_unit: f64) -> u64 {
    (units as f64 * per_unit).round() as u64
}

impl EventSink for Scoreboard {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Popped { cell, .. } if cell.kind.is_normal() => {
                self.popped += 1;
                self.score += POP_POINTS;
            }
            GameEvent::Detached { .. } => {
                self.detached += 1;
                self.score += DETACH_POINTS;
            }
            GameEvent::Activated { .. } => {
                self.activated += 1;
                self.score += ACTIVATE_POINTS;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::Cause;
    use crate::grid::{BubbleColor, Cell, CellKind, GridPos};

    #[test]
    fn test_points_per_event() {
        let mut board = Scoreboard::new();
        let pos = GridPos::new(0, 0);
        let red = Cell::normal(BubbleColor::Red);
        board.on_event(&GameEvent::Popped { pos, cell: red });
        board.on_event(&GameEvent::Detached { pos, cell: red });
        board.on_event(&GameEvent::Activated {
            pos,
            cell: Cell::new(CellKind::Bomb),
            cause: Cause {
                pos,
                kind: red.kind,
            },
        });
        board.on_event(&GameEvent::Snapped { pos, cell: red });

        assert_eq!(board.score, 60);
        assert_eq!(board.cleared(), 3);
    }

    #[test]
    fn test_shot_bonus_once() {
        let mut board = Scoreboard::new();
        board.apply_shot_bonus(5, 22.5);
        board.apply_shot_bonus(5, 22.5);
        assert_eq!(board.shot_bonus, Some(113));
        assert_eq!(board.score, 113);
    }

    #[test]
    fn test_time_bonus_adds_to_shot_bonus() {
        let mut board = Scoreboard::new();
        board.apply_time_bonus(12, 25.0);
        board.apply_time_bonus(3, 25.0);
        board.apply_shot_bonus(0, 90.0);
        assert_eq!(board.time_bonus, Some(300));
        assert_eq!(board.shot_bonus, Some(0));
        assert_eq!(board.bonus(), 300);
        assert_eq!(board.score, 300);
    }
}
