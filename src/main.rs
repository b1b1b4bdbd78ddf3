//! Bubble Blast headless runner
//!
//! Plays a built-in level with a fixed aiming pattern and reports the result.
//! Pass a JSON config path as the first argument to override the defaults.

use std::process::ExitCode;

use bubble_blast::game::{EventSink, GameEvent, Scene};
use bubble_blast::grid::{BubbleColor, Cell, CellKind, Grid, GridPos};
use bubble_blast::{ConfigError, GameConfig};
use glam::DVec2;

/// Safety net for a shot that never settles
const MAX_FRAMES_PER_SHOT: usize = 2_000;
/// Unlimited-shot games stop here
const MAX_SHOTS: usize = 500;

/// Logs cascade events as they happen
struct EventLog;

impl EventSink for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Activated { pos, cell, cause } => {
                log::info!("{:?} at {pos:?} set off by {:?}", cell.kind, cause.kind)
            }
            GameEvent::GameOver { outcome } => log::info!("game over: {outcome:?}"),
            _ => {}
        }
    }
}

fn load_config() -> Result<GameConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| ConfigError::Invalid {
                field: "path",
                reason: format!("{path}: {e}"),
            })?;
            GameConfig::from_json(&json)
        }
        None => Ok(GameConfig::default()),
    }
}

/// Four rows of striped colors with a few specials mixed in
fn demo_level(config: &GameConfig) -> Grid {
    let mut grid = Grid::new(config.rows, config.columns);
    let colors = [BubbleColor::Red, BubbleColor::Blue, BubbleColor::Yellow, BubbleColor::Green];
    for row in 0..config.rows.min(4) {
        for col in 0..grid.cols_in_row(row) {
            let kind = match (row, col % 5) {
                (1, 2) => CellKind::Bomb,
                (2, 4) => CellKind::Lightning,
                (3, 0) => CellKind::Star,
                (0, 4) => CellKind::Indestructible,
                _ => CellKind::Normal(colors[(col / 2 + row) % colors.len()]),
            };
            grid.set(GridPos::new(row, col), Some(Cell::new(kind)));
        }
    }
    grid
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let grid = demo_level(&config);
    let mut scene = match Scene::new(config, grid) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    scene.add_listener(Box::new(EventLog));

    // Sweep the aim across the cone, left to right and back
    let cannon = scene.cannon_position();
    let sweep = [-300.0, -150.0, -40.0, 0.0, 60.0, 180.0, 320.0, 90.0, -90.0];
    let mut shots = 0;
    while !scene.is_over() && shots < MAX_SHOTS {
        let dx = sweep[shots % sweep.len()];
        if let Err(e) = scene.fire(cannon + DVec2::new(dx, -cannon.y)) {
            log::warn!("shot {shots} refused: {e}");
            break;
        }
        shots += 1;
        for _ in 0..MAX_FRAMES_PER_SHOT {
            scene.run_frame();
            if scene.is_settled() || scene.is_over() {
                break;
            }
        }
    }

    let board = scene.scoreboard();
    log::info!(
        "{shots} shots, {} bubbles left, {} cleared",
        scene.grid().len(),
        board.cleared()
    );
    match serde_json::to_string_pretty(board) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("could not encode score: {e}"),
    }
    ExitCode::SUCCESS
}
