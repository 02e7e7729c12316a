//! Game configuration and rulesets
//!
//! `GameConfig` is fixed for a session (screen, timing, damage, spawn ranges).
//! `Ruleset` selects between the basic and extended rule variants and carries
//! the starting difficulty. Both can be overridden from a JSON settings file.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::ShipColor;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::combatant::{FireGate, PlayArea, SweepBounds};
use crate::sim::pickup::{BASIC_EFFECTS, EXTENDED_EFFECTS, PickupEffect};
use crate::sim::projectile::Expiry;
use crate::sim::state::Difficulty;

/// Immutable per-session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub fps: u32,
    /// Seconds the loss overlay stays up before the session ends
    pub loss_grace_secs: u32,

    pub player_start: Vec2,
    pub player_max_health: i32,
    pub starting_lives: i32,
    /// Free space under the player for the health bar
    pub bottom_margin: f32,

    pub hit_damage: i32,
    pub body_damage: i32,

    /// Enemies spawn with x in `[margin, width - margin)`
    pub spawn_margin_x: i32,
    /// Enemies spawn with y in `[min, max)` (above the screen)
    pub spawn_y_min: i32,
    pub spawn_y_max: i32,

    pub boss_y: f32,
    pub boss_min_x: f32,
    /// Boss turns around at `width - boss_right_margin`
    pub boss_right_margin: f32,
    pub boss_speed: f32,

    /// Pickup position relative to the destroyed enemy's origin
    pub pickup_offset: Vec2,

    pub alpha_threshold: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fps: TARGET_FPS,
            loss_grace_secs: 2,

            player_start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            player_max_health: PLAYER_MAX_HEALTH,
            starting_lives: STARTING_LIVES,
            bottom_margin: HEALTH_BAR_MARGIN,

            hit_damage: HIT_DAMAGE,
            body_damage: BODY_DAMAGE,

            spawn_margin_x: 100,
            spawn_y_min: -1500,
            spawn_y_max: -100,

            boss_y: BOSS_Y,
            boss_min_x: 100.0,
            boss_right_margin: 50.0,
            boss_speed: BOSS_SPEED,

            // Centres the 30px gem on a 56x50 enemy hull
            pickup_offset: Vec2::new(13.0, 10.0),

            alpha_threshold: ALPHA_THRESHOLD,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return invalid(format!(
                "screen must be non-empty, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if self.fps == 0 {
            return invalid("fps must be positive".into());
        }
        if self.player_max_health <= 0 {
            return invalid(format!(
                "player max health must be positive, got {}",
                self.player_max_health
            ));
        }
        if self.starting_lives <= 0 {
            return invalid(format!("starting lives must be positive, got {}", self.starting_lives));
        }
        if self.fps.checked_mul(self.loss_grace_secs).is_none() {
            return invalid(format!(
                "loss grace of {}s at {} fps overflows the frame counter",
                self.loss_grace_secs, self.fps
            ));
        }
        if self.spawn_margin_x < 0 || self.spawn_margin_x as i64 * 2 >= self.screen_width as i64 {
            return invalid(format!(
                "spawn margin {} leaves no room on a {}px wide screen",
                self.spawn_margin_x, self.screen_width
            ));
        }
        if self.spawn_y_min >= self.spawn_y_max {
            return invalid(format!(
                "empty spawn height range [{}, {})",
                self.spawn_y_min, self.spawn_y_max
            ));
        }
        if self.boss_min_x >= self.screen_width - self.boss_right_margin {
            return invalid("boss sweep range is empty".into());
        }
        Ok(())
    }

    /// Grace period in frames
    pub fn loss_grace_ticks(&self) -> u32 {
        self.fps.saturating_mul(self.loss_grace_secs)
    }

    pub fn play_area(&self) -> PlayArea {
        PlayArea {
            width: self.screen_width,
            height: self.screen_height,
            bottom_margin: self.bottom_margin,
        }
    }

    pub fn boss_sweep(&self) -> SweepBounds {
        SweepBounds {
            min_x: self.boss_min_x,
            max_x: self.screen_width - self.boss_right_margin,
            speed: self.boss_speed,
        }
    }
}

/// Boss encounter policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossRule {
    /// A boss joins every wave whose level is a non-zero multiple of this
    pub every_levels: u32,
    pub health: i32,
}

impl BossRule {
    pub fn spawns_on(&self, level: u32) -> bool {
        level != 0 && self.every_levels != 0 && level % self.every_levels == 0
    }
}

/// Data-driven rule variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub name: String,
    /// Starting health of a regular enemy
    pub enemy_health: i32,
    /// Any hit destroys a regular enemy regardless of health
    pub enemy_one_hit_kill: bool,
    pub enemy_fire_gate: FireGate,
    /// Regular enemies try to fire with probability 1/n per frame
    pub enemy_fire_chance: u32,
    pub palette: Vec<ShipColor>,
    pub boss: Option<BossRule>,
    pub pickup_effects: Vec<PickupEffect>,
    /// Distance above the top edge before a projectile is culled
    pub offscreen_slack: f32,
    /// Starting difficulty; pickups change the session copy
    pub difficulty: Difficulty,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::basic()
    }
}

impl Ruleset {
    /// One-hit enemies on a cooldown, no boss, hazard pickup in the table
    pub fn basic() -> Self {
        Self {
            name: "basic".into(),
            enemy_health: 100,
            enemy_one_hit_kill: true,
            enemy_fire_gate: FireGate::Cooldown,
            enemy_fire_chance: 2 * TARGET_FPS,
            palette: ShipColor::ALL.to_vec(),
            boss: None,
            pickup_effects: BASIC_EFFECTS.to_vec(),
            offscreen_slack: 0.0,
            difficulty: Difficulty::default(),
        }
    }

    /// Tougher enemies that fire without a cooldown, bosses on even levels
    pub fn extended() -> Self {
        Self {
            name: "extended".into(),
            enemy_health: 50,
            enemy_one_hit_kill: false,
            enemy_fire_gate: FireGate::Unconditional,
            boss: Some(BossRule {
                every_levels: 2,
                health: BOSS_HEALTH,
            }),
            pickup_effects: EXTENDED_EFFECTS.to_vec(),
            offscreen_slack: 10.0,
            ..Self::basic()
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "basic" | "simple" => Ok(Self::basic()),
            "extended" => Ok(Self::extended()),
            _ => Err(Error::UnknownRuleset(name.to_string())),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.enemy_health <= 0 {
            return invalid(format!("enemy health must be positive, got {}", self.enemy_health));
        }
        if self.enemy_fire_chance == 0 {
            return invalid("enemy fire chance must be at least 1".into());
        }
        if self.palette.is_empty() {
            return invalid("enemy palette is empty".into());
        }
        if self.pickup_effects.is_empty() {
            return invalid("pickup effect table is empty".into());
        }
        if let Some(boss) = self.boss {
            if boss.every_levels == 0 || boss.health <= 0 {
                return invalid(format!("invalid boss rule {boss:?}"));
            }
        }
        if self.difficulty.cooldown == 0 {
            return invalid("cooldown must be at least one frame".into());
        }
        Ok(())
    }

    pub fn expiry(&self, config: &GameConfig) -> Expiry {
        Expiry {
            screen_height: config.screen_height,
            top_slack: self.offscreen_slack,
        }
    }
}

/// Settings file: config and ruleset, both optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub config: GameConfig,
    pub ruleset: Ruleset,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.config.validate()?;
        settings.ruleset.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(Ruleset::basic().validate().is_ok());
        assert!(Ruleset::extended().validate().is_ok());
    }

    #[test]
    fn test_loss_grace_is_two_seconds() {
        assert_eq!(GameConfig::default().loss_grace_ticks(), 120);
    }

    #[test]
    fn test_config_rejects_nonsense() {
        let config = GameConfig {
            player_max_health: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = GameConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            spawn_y_min: -100,
            spawn_y_max: -100,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            loss_grace_secs: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        assert_eq!(config.loss_grace_ticks(), u32::MAX);

        for spawn_margin_x in [i32::MAX, i32::MIN, -1, 375] {
            let config = GameConfig {
                spawn_margin_x,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "margin {spawn_margin_x} accepted");
        }
    }

    #[test]
    fn test_ruleset_from_name() {
        assert_eq!(Ruleset::from_name("Extended").unwrap().name, "extended");
        assert_eq!(Ruleset::from_name("basic").unwrap(), Ruleset::basic());
        assert!(matches!(
            Ruleset::from_name("nightmare"),
            Err(Error::UnknownRuleset(_))
        ));
    }

    #[test]
    fn test_variant_policies_differ() {
        let basic = Ruleset::basic();
        let extended = Ruleset::extended();
        assert!(basic.enemy_one_hit_kill && !extended.enemy_one_hit_kill);
        assert_eq!(basic.enemy_fire_gate, FireGate::Cooldown);
        assert_eq!(extended.enemy_fire_gate, FireGate::Unconditional);
        assert!(basic.boss.is_none());
        assert_eq!(basic.pickup_effects.len(), 5);
        assert_eq!(extended.pickup_effects.len(), 7);
        assert!(basic.pickup_effects.contains(&PickupEffect::DrainLives));
        assert!(!extended.pickup_effects.contains(&PickupEffect::DrainLives));
    }

    #[test]
    fn test_boss_cadence() {
        let rule = Ruleset::extended().boss.unwrap();
        assert!(!rule.spawns_on(0));
        assert!(!rule.spawns_on(1));
        assert!(rule.spawns_on(2));
        assert!(!rule.spawns_on(3));
        assert!(rule.spawns_on(4));
    }

    #[test]
    fn test_settings_partial_json() {
        let json = r#"{
            "config": { "fps": 30 },
            "ruleset": {
                "name": "custom",
                "pickup_effects": ["heal", "extra_life"],
                "palette": ["red"]
            }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.config.fps, 30);
        assert_eq!(settings.config.screen_width, SCREEN_WIDTH);
        assert_eq!(
            settings.ruleset.pickup_effects,
            vec![PickupEffect::Heal, PickupEffect::ExtraLife]
        );
        assert_eq!(settings.ruleset.palette, vec![ShipColor::Red]);
        // Unspecified ruleset fields fall back to basic
        assert!(settings.ruleset.enemy_one_hit_kill);
    }

    #[test]
    fn test_settings_reject_unknown_color() {
        let json = r#"{ "ruleset": { "palette": ["purple"] } }"#;
        assert!(matches!(Settings::from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_settings_reject_invalid_values() {
        let json = r#"{ "ruleset": { "pickup_effects": [] } }"#;
        assert!(matches!(Settings::from_json(json), Err(Error::InvalidConfig(_))));
    }
}
