//! Ships: the player, enemies and the boss
//!
//! One record covers all three. The variant tag selects the small bits of
//! behaviour that differ (movement step, projectile direction, sprites).

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Positioned, overlaps};
use super::projectile::{Expiry, Projectile};
use crate::assets::{ShipColor, Sprite, SpriteKey, SpriteSheet};
use crate::consts::{HEALTH_BAR_GAP, HEALTH_BAR_HEIGHT};

/// Whether a ship must wait for its cooldown counter before firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireGate {
    Cooldown,
    Unconditional,
}

/// Boss horizontal heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipKind {
    Player,
    Enemy(ShipColor),
    Boss { heading: Heading },
}

/// Horizontal range the boss sweeps between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
}

/// Pressed movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steer {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Area the player is allowed to occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
    /// Free space kept under the player for its health bar
    pub bottom_margin: f32,
}

/// Derived health bar geometry (red background, green fill)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill_width: f32,
}

#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: u32,
    pub kind: ShipKind,
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Frames since the last shot; 0 means ready
    pub cooldown: u32,
    /// Only the player scores
    pub score: u32,
    pub projectiles: Vec<Projectile>,
    sprite: Arc<Sprite>,
    projectile_sprite: Arc<Sprite>,
}

impl Combatant {
    fn new(id: u32, kind: ShipKind, pos: Vec2, health: i32, sheet: &SpriteSheet) -> Self {
        let (ship, laser) = match kind {
            ShipKind::Player => (SpriteKey::Player, SpriteKey::PlayerLaser),
            ShipKind::Enemy(color) => (SpriteKey::Ship(color), SpriteKey::Laser(color)),
            ShipKind::Boss { .. } => (SpriteKey::Boss, SpriteKey::BossLaser),
        };
        Self {
            id,
            kind,
            pos,
            health,
            max_health: health,
            cooldown: 0,
            score: 0,
            projectiles: Vec::new(),
            sprite: sheet.get(ship).clone(),
            projectile_sprite: sheet.get(laser).clone(),
        }
    }

    pub fn player(id: u32, pos: Vec2, max_health: i32, sheet: &SpriteSheet) -> Self {
        Self::new(id, ShipKind::Player, pos, max_health, sheet)
    }

    pub fn enemy(id: u32, pos: Vec2, color: ShipColor, health: i32, sheet: &SpriteSheet) -> Self {
        Self::new(id, ShipKind::Enemy(color), pos, health, sheet)
    }

    pub fn boss(id: u32, pos: Vec2, health: i32, sheet: &SpriteSheet) -> Self {
        let heading = Heading::Right;
        Self::new(id, ShipKind::Boss { heading }, pos, health, sheet)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.sprite.width() as f32
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.sprite.height() as f32
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, ShipKind::Boss { .. })
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Swap the ship image; the mask comes with it
    pub fn set_sprite(&mut self, sprite: Arc<Sprite>) {
        self.sprite = sprite;
    }

    /// Health never drops below zero
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        if self.health < self.max_health {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Advance the cooldown counter: counting frames in `[1, threshold)`,
    /// back to ready once it reaches `threshold`.
    pub fn tick_cooldown(&mut self, threshold: u32) {
        if self.cooldown >= threshold {
            self.cooldown = 0;
        } else if self.cooldown > 0 {
            self.cooldown += 1;
        }
    }

    pub fn can_fire(&self, gate: FireGate) -> bool {
        match gate {
            FireGate::Cooldown => self.cooldown == 0,
            FireGate::Unconditional => true,
        }
    }

    /// Emit a projectile centred on the ship. Returns false when gated.
    pub fn fire(&mut self, gate: FireGate, projectile_id: u32) -> bool {
        if !self.can_fire(gate) {
            return false;
        }
        let offset = (self.width() - self.projectile_sprite.width() as f32) / 2.0;
        self.projectiles.push(Projectile::new(
            projectile_id,
            Vec2::new(self.pos.x + offset, self.pos.y),
            self.projectile_sprite.clone(),
        ));
        if gate == FireGate::Cooldown {
            self.cooldown = 1;
        }
        true
    }

    /// Sign of this ship's projectile travel (player shoots up)
    pub fn projectile_direction(&self) -> f32 {
        match self.kind {
            ShipKind::Player => -1.0,
            _ => 1.0,
        }
    }

    /// Tick the cooldown, then move every projectile by `speed` in this ship's
    /// firing direction. Expired shots are dropped; each remaining shot hits
    /// at most the first live target it overlaps, calls `on_hit` for it and is
    /// removed. Returns the number of hits.
    pub fn advance_projectiles(
        &mut self,
        cooldown_threshold: u32,
        speed: f32,
        expiry: Expiry,
        targets: &mut [Combatant],
        mut on_hit: impl FnMut(&mut Combatant),
    ) -> u32 {
        self.tick_cooldown(cooldown_threshold);

        let dy = speed * self.projectile_direction();
        let mut hits = 0;
        self.projectiles.retain_mut(|projectile| {
            projectile.advance(dy);
            if projectile.is_expired(expiry) {
                return false;
            }
            match targets
                .iter_mut()
                .find(|target| target.is_alive() && overlaps(&*projectile, &**target))
            {
                Some(target) => {
                    on_hit(target);
                    hits += 1;
                    false
                }
                None => true,
            }
        });
        hits
    }

    /// Per-frame movement for non-player ships
    pub fn step(&mut self, descent_speed: f32, sweep: SweepBounds) {
        match &mut self.kind {
            ShipKind::Player => {}
            ShipKind::Enemy(_) => self.pos.y += descent_speed,
            ShipKind::Boss { heading } => match *heading {
                Heading::Right if self.pos.x >= sweep.max_x => {
                    *heading = Heading::Left;
                    self.pos.x -= sweep.speed;
                }
                Heading::Right => self.pos.x += sweep.speed,
                Heading::Left if self.pos.x <= sweep.min_x => {
                    *heading = Heading::Right;
                    self.pos.x += sweep.speed;
                }
                Heading::Left => self.pos.x -= sweep.speed,
            },
        }
    }

    /// Player movement, clamped to the play area
    pub fn steer(&mut self, keys: Steer, speed: f32, area: PlayArea) {
        if keys.left {
            self.pos.x -= speed;
        }
        if keys.right {
            self.pos.x += speed;
        }
        if keys.up {
            self.pos.y -= speed;
        }
        if keys.down {
            self.pos.y += speed;
        }
        let max_x = (area.width - self.width()).max(0.0);
        let max_y = (area.height - self.height() - area.bottom_margin).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }

    /// Bar just under the ship, green part proportional to health
    pub fn health_bar(&self) -> HealthBar {
        let width = self.width();
        let ratio = if self.max_health > 0 {
            (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        HealthBar {
            x: self.pos.x,
            y: self.pos.y + self.height() + HEALTH_BAR_GAP,
            width,
            height: HEALTH_BAR_HEIGHT,
            fill_width: width * ratio,
        }
    }
}

impl Positioned for Combatant {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SpriteSheet {
        SpriteSheet::builtin(127)
    }

    const NO_EXPIRY: Expiry = Expiry {
        screen_height: 10_000.0,
        top_slack: 10_000.0,
    };

    #[test]
    fn test_cooldown_cycle() {
        let mut ship = Combatant::player(1, Vec2::new(300.0, 600.0), 100, &sheet());
        assert!(ship.fire(FireGate::Cooldown, 2));
        assert_eq!(ship.cooldown, 1);

        // 29 ticks count 1 -> 30, still gated
        for _ in 0..29 {
            ship.tick_cooldown(30);
            assert!(!ship.can_fire(FireGate::Cooldown));
            assert!(!ship.fire(FireGate::Cooldown, 3));
        }
        assert_eq!(ship.cooldown, 30);

        // 30th tick resets and the ship can shoot straight away
        ship.tick_cooldown(30);
        assert_eq!(ship.cooldown, 0);
        assert!(ship.fire(FireGate::Cooldown, 4));
        assert_eq!(ship.projectiles.len(), 2);
    }

    #[test]
    fn test_idle_cooldown_stays_ready() {
        let mut ship = Combatant::player(1, Vec2::ZERO, 100, &sheet());
        ship.tick_cooldown(30);
        assert_eq!(ship.cooldown, 0);
    }

    #[test]
    fn test_unconditional_fire_ignores_cooldown() {
        let mut boss = Combatant::boss(1, Vec2::new(300.0, 50.0), 1000, &sheet());
        for id in 0..5 {
            assert!(boss.fire(FireGate::Unconditional, id));
        }
        assert_eq!(boss.projectiles.len(), 5);
        assert_eq!(boss.cooldown, 0);
    }

    #[test]
    fn test_projectile_spawns_centred() {
        let mut enemy = Combatant::enemy(1, Vec2::new(200.0, 100.0), ShipColor::Red, 100, &sheet());
        enemy.fire(FireGate::Cooldown, 2);
        // (56 - 100) / 2
        assert_eq!(enemy.projectiles[0].pos, Vec2::new(178.0, 100.0));

        let mut player = Combatant::player(1, Vec2::new(300.0, 600.0), 100, &sheet());
        player.fire(FireGate::Cooldown, 2);
        assert_eq!(player.projectiles[0].pos, Vec2::new(300.0, 600.0));
    }

    #[test]
    fn test_projectiles_hit_first_target_once() {
        let sheet = sheet();
        let mut player = Combatant::player(1, Vec2::new(300.0, 300.0), 100, &sheet);
        player.fire(FireGate::Cooldown, 10);

        // Two stacked enemies under the bolt's path
        let mut enemies = vec![
            Combatant::enemy(2, Vec2::new(322.0, 300.0), ShipColor::Red, 50, &sheet),
            Combatant::enemy(3, Vec2::new(322.0, 300.0), ShipColor::Blue, 50, &sheet),
        ];
        let hits = player.advance_projectiles(
            30,
            8.0,
            NO_EXPIRY,
            &mut enemies,
            |e| e.take_damage(10),
        );
        assert_eq!(hits, 1);
        assert!(player.projectiles.is_empty());
        assert_eq!(enemies[0].health, 40);
        assert_eq!(enemies[1].health, 50);
    }

    #[test]
    fn test_dead_targets_are_skipped() {
        let sheet = sheet();
        let mut player = Combatant::player(1, Vec2::new(300.0, 300.0), 100, &sheet);
        player.fire(FireGate::Unconditional, 10);
        player.fire(FireGate::Unconditional, 11);

        let mut enemies = vec![Combatant::enemy(
            2,
            Vec2::new(322.0, 300.0),
            ShipColor::Red,
            10,
            &sheet,
        )];
        let hits = player.advance_projectiles(
            30,
            8.0,
            NO_EXPIRY,
            &mut enemies,
            |e| e.take_damage(10),
        );
        // First shot kills, second finds no live target and keeps flying
        assert_eq!(hits, 1);
        assert_eq!(player.projectiles.len(), 1);
        assert_eq!(player.projectiles[0].id, 11);
    }

    #[test]
    fn test_expired_projectiles_removed() {
        let sheet = sheet();
        let mut player = Combatant::player(1, Vec2::new(300.0, 4.0), 100, &sheet);
        player.fire(FireGate::Cooldown, 10);
        let expiry = Expiry {
            screen_height: 750.0,
            top_slack: 0.0,
        };
        player.advance_projectiles(30, 8.0, expiry, &mut [], |_| {});
        assert!(player.projectiles.is_empty());
        // The cooldown still ticked
        assert_eq!(player.cooldown, 2);
    }

    #[test]
    fn test_enemy_descends() {
        let sweep = SweepBounds {
            min_x: 100.0,
            max_x: 700.0,
            speed: 2.0,
        };
        let mut enemy = Combatant::enemy(
            1,
            Vec2::new(200.0, -100.0),
            ShipColor::Green,
            100,
            &sheet(),
        );
        enemy.step(1.5, sweep);
        assert_eq!(enemy.pos, Vec2::new(200.0, -98.5));
    }

    #[test]
    fn test_boss_oscillation() {
        let sweep = SweepBounds {
            min_x: 100.0,
            max_x: 700.0,
            speed: 2.0,
        };
        let mut boss = Combatant::boss(1, Vec2::new(699.0, 50.0), 1000, &sheet());
        boss.step(1.0, sweep);
        assert!(boss.pos.x >= 700.0);
        assert!(matches!(boss.kind, ShipKind::Boss { heading: Heading::Right }));

        boss.step(1.0, sweep);
        assert!(matches!(boss.kind, ShipKind::Boss { heading: Heading::Left }));
        assert_eq!(boss.pos.x, 699.0);
        // Never descends
        assert_eq!(boss.pos.y, 50.0);

        boss.pos.x = 100.0;
        boss.step(1.0, sweep);
        assert!(matches!(boss.kind, ShipKind::Boss { heading: Heading::Right }));
        assert_eq!(boss.pos.x, 102.0);
    }

    #[test]
    fn test_steer_clamps_to_play_area() {
        let area = PlayArea {
            width: 750.0,
            height: 750.0,
            bottom_margin: 25.0,
        };
        let mut player = Combatant::player(1, Vec2::new(1.0, 1.0), 100, &sheet());
        let up_left = Steer {
            left: true,
            up: true,
            ..Default::default()
        };
        player.steer(up_left, 3.0, area);
        assert_eq!(player.pos, Vec2::ZERO);

        player.pos = Vec2::new(649.0, 634.0);
        let down_right = Steer {
            right: true,
            down: true,
            ..Default::default()
        };
        player.steer(down_right, 3.0, area);
        // 750 - 100 and 750 - 90 - 25
        assert_eq!(player.pos, Vec2::new(650.0, 635.0));
    }

    #[test]
    fn test_health_bar_scaling() {
        let mut player = Combatant::player(1, Vec2::new(300.0, 600.0), 100, &sheet());
        player.health = 50;
        let bar = player.health_bar();
        assert_eq!(bar.width, 100.0);
        assert_eq!(bar.fill_width, 50.0);
        assert_eq!(bar.y, 600.0 + 90.0 + 10.0);
    }

    #[test]
    fn test_health_bar_zero_max_health() {
        let mut player = Combatant::player(1, Vec2::ZERO, 100, &sheet());
        player.max_health = 0;
        assert_eq!(player.health_bar().fill_width, 0.0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut player = Combatant::player(1, Vec2::ZERO, 100, &sheet());
        player.take_damage(120);
        assert_eq!(player.health, 0);
        player.heal(25);
        assert_eq!(player.health, 25);
        player.health = 90;
        player.heal(25);
        assert_eq!(player.health, 100);
    }

    #[test]
    fn test_set_sprite_swaps_mask() {
        let sheet = sheet();
        let mut enemy = Combatant::enemy(1, Vec2::ZERO, ShipColor::Red, 100, &sheet);
        enemy.set_sprite(sheet.get(SpriteKey::Boss).clone());
        assert_eq!(enemy.width(), 160.0);
        assert_eq!(enemy.sprite().mask().width(), 160);
    }
}
