//! Session state and core simulation types
//!
//! Everything a frame reads or writes lives in `GameState`; nothing is global.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::pickup::{Pickup, PickupEffect};
use crate::assets::SpriteSheet;
use crate::consts::COOLDOWN_FRAMES;
use crate::error::Result;
use crate::settings::{GameConfig, Ruleset};

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Active gameplay
    Playing,
    /// Loss overlay shown, gameplay frozen
    LostPending { ticks_remaining: u32 },
    /// Session over, control goes back to the menu
    Terminated,
}

/// Difficulty knobs. Pickups mutate the session copy permanently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    /// Enemy descent, pixels per frame
    pub enemy_speed: f32,
    pub player_speed: f32,
    pub player_laser_speed: f32,
    pub enemy_laser_speed: f32,
    /// Frames between shots for cooldown-gated ships
    pub cooldown: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            enemy_speed: 1.0,
            player_speed: 3.0,
            player_laser_speed: 8.0,
            enemy_laser_speed: 8.0,
            cooldown: COOLDOWN_FRAMES,
        }
    }
}

/// Things that happened during one tick, for renderers, audio and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    WaveStarted { level: u32, enemies: u32 },
    BossSpawned { id: u32 },
    EnemyHit { id: u32 },
    EnemyDestroyed { id: u32 },
    EnemyRammed { id: u32 },
    PlayerHit { hits: u32 },
    LifeLost { lives: i32 },
    PickupCollected { effect: PickupEffect },
    Lost,
    Terminated,
}

/// Monotonic entity id source
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for EntityIds {
    fn default() -> Self {
        Self::new()
    }
}

/// End-of-session record handed to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub score: u32,
    pub level: u32,
    pub frames: u64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub rules: Ruleset,
    /// Session copy of the ruleset's starting difficulty
    pub difficulty: Difficulty,
    pub sprites: Arc<SpriteSheet>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub lives: i32,
    /// Waves cleared so far (0 before the first wave spawns)
    pub level: u32,
    /// Enemy count of the current wave
    pub wave_intensity: u32,
    /// Gameplay frames simulated
    pub frame: u64,
    pub phase: Phase,
    pub player: Combatant,
    /// Regular enemies and the boss, in spawn order
    pub enemies: Vec<Combatant>,
    pub pickups: Vec<Pickup>,
    /// Events of the most recent tick
    pub events: Vec<GameEvent>,
    pub ids: EntityIds,
}

impl GameState {
    pub fn new(
        config: GameConfig,
        rules: Ruleset,
        sprites: Arc<SpriteSheet>,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        rules.validate()?;

        let mut ids = EntityIds::new();
        let player = Combatant::player(
            ids.next(),
            config.player_start,
            config.player_max_health,
            &sprites,
        );

        Ok(Self {
            difficulty: rules.difficulty,
            lives: config.starting_lives,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 0,
            wave_intensity: 0,
            frame: 0,
            phase: Phase::Playing,
            player,
            enemies: Vec::new(),
            pickups: Vec::new(),
            events: Vec::new(),
            ids,
            config,
            rules,
            sprites,
        })
    }

    /// New session with the default config and built-in sprites
    pub fn with_rules(rules: Ruleset, seed: u64) -> Result<Self> {
        let config = GameConfig::default();
        let sprites = Arc::new(SpriteSheet::builtin(config.alpha_threshold));
        Self::new(config, rules, sprites, seed)
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    /// True from the frame the loss condition is met onward
    pub fn is_lost(&self) -> bool {
        !matches!(self.phase, Phase::Playing)
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    pub fn loss_condition(&self) -> bool {
        self.lives <= 0 || self.player.health <= 0
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            score: self.score(),
            level: self.level,
            frames: self.frame,
        }
    }
}
