//! Pickups dropped by destroyed enemies and the effects they grant

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Positioned;
use super::combatant::Combatant;
use super::state::Difficulty;
use crate::assets::Sprite;
use crate::error::{Error, Result};

pub const PLAYER_SPEED_STEP: f32 = 1.0;
pub const MIN_PLAYER_SPEED: f32 = 1.0;
pub const ENEMY_LASER_STEP: f32 = 0.5;
pub const PLAYER_LASER_STEP: f32 = 1.0;
pub const HEAL_AMOUNT: i32 = 25;
pub const COOLDOWN_STEP: u32 = 5;
pub const MIN_COOLDOWN: u32 = 1;

/// One permanent change applied when the player touches a pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupEffect {
    PlayerSpeedUp,
    EnemyLaserSpeedUp,
    ExtraLife,
    PlayerLaserSpeedUp,
    /// Hazard: lives drop straight to one
    DrainLives,
    Heal,
    FasterCooldown,
    PlayerSpeedDown,
}

/// Table used by the basic rules
pub const BASIC_EFFECTS: [PickupEffect; 5] = [
    PickupEffect::PlayerSpeedUp,
    PickupEffect::EnemyLaserSpeedUp,
    PickupEffect::ExtraLife,
    PickupEffect::PlayerLaserSpeedUp,
    PickupEffect::DrainLives,
];

/// Table used by the extended rules
pub const EXTENDED_EFFECTS: [PickupEffect; 7] = [
    PickupEffect::PlayerSpeedUp,
    PickupEffect::EnemyLaserSpeedUp,
    PickupEffect::ExtraLife,
    PickupEffect::PlayerLaserSpeedUp,
    PickupEffect::Heal,
    PickupEffect::FasterCooldown,
    PickupEffect::PlayerSpeedDown,
];

impl PickupEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupEffect::PlayerSpeedUp => "player_speed_up",
            PickupEffect::EnemyLaserSpeedUp => "enemy_laser_speed_up",
            PickupEffect::ExtraLife => "extra_life",
            PickupEffect::PlayerLaserSpeedUp => "player_laser_speed_up",
            PickupEffect::DrainLives => "drain_lives",
            PickupEffect::Heal => "heal",
            PickupEffect::FasterCooldown => "faster_cooldown",
            PickupEffect::PlayerSpeedDown => "player_speed_down",
        }
    }

    /// Apply to the session. Effects never expire.
    pub fn apply(self, difficulty: &mut Difficulty, lives: &mut i32, player: &mut Combatant) {
        match self {
            PickupEffect::PlayerSpeedUp => difficulty.player_speed += PLAYER_SPEED_STEP,
            PickupEffect::EnemyLaserSpeedUp => difficulty.enemy_laser_speed += ENEMY_LASER_STEP,
            PickupEffect::ExtraLife => *lives += 1,
            PickupEffect::PlayerLaserSpeedUp => difficulty.player_laser_speed += PLAYER_LASER_STEP,
            PickupEffect::DrainLives => *lives = 1,
            PickupEffect::Heal => player.heal(HEAL_AMOUNT),
            PickupEffect::FasterCooldown => {
                let faster = difficulty.cooldown.saturating_sub(COOLDOWN_STEP);
                difficulty.cooldown = faster.max(MIN_COOLDOWN);
            }
            PickupEffect::PlayerSpeedDown => {
                let slower = difficulty.player_speed - PLAYER_SPEED_STEP;
                difficulty.player_speed = slower.max(MIN_PLAYER_SPEED);
            }
        }
    }
}

impl fmt::Display for PickupEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickupEffect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        BASIC_EFFECTS
            .iter()
            .chain(EXTENDED_EFFECTS.iter())
            .copied()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| Error::UnknownEffect(s.to_string()))
    }
}

/// A stationary collectible. Lives until the player touches it.
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    sprite: Arc<Sprite>,
}

impl Pickup {
    pub fn new(id: u32, pos: Vec2, sprite: Arc<Sprite>) -> Self {
        Self { id, pos, sprite }
    }
}

impl Positioned for Pickup {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}
