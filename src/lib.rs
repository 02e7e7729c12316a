//! Pixel Raiders - a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (ships, projectiles, pickups, waves, loss state machine)
//! - `assets`: Sprite sheet and per-sprite pixel masks
//! - `settings`: Immutable game config plus the data-driven ruleset
//! - `platform`: Renderer / input / clock contracts and the session loop
//! - `highscores`: Leaderboard kept by the outer menu

pub mod assets;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use settings::{GameConfig, Ruleset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the fixed-rate loop
    pub const TARGET_FPS: u32 = 60;

    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 750.0;
    pub const SCREEN_HEIGHT: f32 = 750.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 300.0;
    pub const PLAYER_START_Y: f32 = 600.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Space kept free under the player for the health bar
    pub const HEALTH_BAR_MARGIN: f32 = 25.0;
    pub const HEALTH_BAR_GAP: f32 = 10.0;
    pub const HEALTH_BAR_HEIGHT: f32 = 10.0;

    pub const STARTING_LIVES: i32 = 3;

    /// Frames between shots for cooldown-gated ships
    pub const COOLDOWN_FRAMES: u32 = 30;
    /// Damage dealt by one projectile hit
    pub const HIT_DAMAGE: i32 = 10;
    /// Damage dealt to the player when an enemy rams it
    pub const BODY_DAMAGE: i32 = 50;

    /// Wave growth per level
    pub const WAVE_STEP: u32 = 5;

    /// Boss defaults
    pub const BOSS_HEALTH: i32 = 1000;
    pub const BOSS_Y: f32 = 50.0;
    pub const BOSS_SPEED: f32 = 2.0;

    /// Alpha above which a pixel counts as opaque for masks
    pub const ALPHA_THRESHOLD: u8 = 127;
}

/// Snap a sub-pixel position to the integer pixel grid used by masks
#[inline]
pub fn to_pixel(pos: Vec2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}
