/// Per-level configuration and the formation spawner.

use crate::entities::{Alien, AlienKind, Difficulty};

pub const MAX_LEVEL: u32 = 3;

/// Grid geometry shared by every level.
const COLUMN_SPACING: f64 = 80.0;
const ROW_SPACING: f64 = 70.0;
const TOP_MARGIN: f64 = 50.0;

/// Everything that varies between levels.
#[derive(Clone, Copy, Debug)]
pub struct LevelConfig {
    pub rows: u32,
    pub cols: u32,
    pub kind: AlienKind,
    /// Base horizontal speed, before the difficulty multiplier.
    pub speed: f64,
    /// Score for destroying one alien.
    pub points: u32,
    /// Chance per kill of dropping a power-up.
    pub power_up_chance: f64,
    /// Base chance per alien per tick of firing.
    pub alien_fire_chance: f64,
    /// Pixels the formation steps down on an edge bounce.
    pub vertical_move: f64,
}

/// Configuration for a 1-based level index. Indexes past the last
/// level clamp to it.
pub fn level_config(level: u32) -> LevelConfig {
    match level {
        0 | 1 => LevelConfig {
            rows: 4,
            cols: 8,
            kind: AlienKind::Scout,
            speed: 0.5,
            points: 10,
            power_up_chance: 0.1,
            alien_fire_chance: 0.0005,
            vertical_move: 8.0,
        },
        2 => LevelConfig {
            rows: 5,
            cols: 8,
            kind: AlienKind::Armored,
            speed: 0.8,
            points: 15,
            power_up_chance: 0.15,
            alien_fire_chance: 0.001,
            vertical_move: 10.0,
        },
        _ => LevelConfig {
            rows: 5,
            cols: 10,
            kind: AlienKind::Elite,
            speed: 1.2,
            points: 20,
            power_up_chance: 0.2,
            alien_fire_chance: 0.0015,
            vertical_move: 12.0,
        },
    }
}

/// Build the alien formation for a level: a horizontally centered
/// `rows x cols` grid starting near the top, in row-major creation
/// order. Alien speed already includes the difficulty multiplier.
pub fn create_aliens(level: u32, difficulty: Difficulty, play_width: f64) -> Vec<Alien> {
    let config = level_config(level);
    let speed = config.speed * difficulty.multiplier();

    let start_x = (play_width - config.cols as f64 * COLUMN_SPACING) / 2.0 + COLUMN_SPACING / 2.0;
    let start_y = TOP_MARGIN;

    let mut aliens = Vec::with_capacity((config.rows * config.cols) as usize);
    for row in 0..config.rows {
        for col in 0..config.cols {
            let x = start_x + col as f64 * COLUMN_SPACING;
            let y = start_y + row as f64 * ROW_SPACING;
            aliens.push(Alien::new(config.kind, x, y, speed));
        }
    }
    aliens
}
