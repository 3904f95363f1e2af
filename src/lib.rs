//! Arcade Playground - a small 2D arcade engine
//!
//! Core modules:
//! - `sim`: Simulation core (game objects, colliders, controllers, playground state)
//! - `levels`: Level logic (shooter state machine, breakout)
//! - `game_loop`: Orchestrator driving levels frame by frame
//! - `renderer`: Render sink abstraction and artists
//! - `platform`: Input buffering, UI commands and paint back-pressure
//! - `highscores`, `settings`, `audio`, `assets`: boundary services

pub mod assets;
pub mod audio;
pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod levels;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::EngineError;
pub use game_loop::{FrameOutcome, GameLoop};
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 700.0;
    pub const CANVAS_HEIGHT: f32 = 700.0;

    /// Frame pacing for the native loop
    pub const TARGET_FPS: u32 = 60;
    /// Longest timestep fed to the simulation after a stall (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const EGO_SPEED: f32 = 220.0;
    pub const EGO_RADIUS: f32 = 15.0;
    pub const SHOT_SPEED: f32 = 175.0;
    /// Minimum time between two player shots (seconds)
    pub const FIRE_INTERVAL: f32 = 0.1;
    pub const START_LIVES: i64 = 5;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 30;
    pub const ENEMY_SPEED_X: f32 = 60.0;
    pub const ENEMY_SPEED_Y: f32 = 40.0;
    pub const ENEMY_SCALE: f32 = 1.0;
    pub const ENEMY_SHOT_SPEED: f32 = 75.0;
    /// Enemy fire probability per second of simulated time
    pub const ENEMY_FIRE_FACTOR: f32 = 0.1;
    pub const ENEMY_SHOT_LIFETIME: f32 = 10.0;
    /// Sideways speed of a landed mine
    pub const MINE_SPEED: f32 = 50.0;

    /// Collectables (extra lives)
    pub const COLLECT_COUNT: usize = 5;
    pub const COLLECT_SPEED_Y: f32 = 20.0;
    pub const COLLECT_SCALE: f32 = 0.3;

    /// Scoring
    pub const ENEMY_POINTS: i64 = 200;
    pub const CONTACT_PENALTY: i64 = 500;
    pub const ESCAPE_PENALTY: i64 = 200;

    /// Effects
    pub const STAR_COUNT: usize = 80;
    pub const STAR_SPEED: f32 = 100.0;
    pub const SHARD_COUNT: usize = 50;
    pub const SHARD_SPEED: f32 = 200.0;
    pub const BONUS_DURATION: f32 = 1.0;
    pub const READY_TEXT_DURATION: f32 = 3.0;
    pub const READY_TEXT_SPEED: f32 = 100.0;

    /// Level timing (seconds)
    pub const LEVEL_INIT_TIME: f32 = 1.0;
    pub const DYING_INTERVAL: f32 = 2.0;
}
