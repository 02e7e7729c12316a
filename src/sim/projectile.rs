//! Projectiles fired by ships

use std::sync::Arc;

use glam::Vec2;

use super::collision::Positioned;
use crate::assets::Sprite;

/// Vertical culling bounds for projectiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expiry {
    pub screen_height: f32,
    /// How far above the top edge a projectile may travel before it is culled
    pub top_slack: f32,
}

/// A projectile owned by the ship that fired it.
///
/// Velocity is not stored: the owner supplies the signed per-frame delta
/// (negative = upward) so speed pickups apply to shots already in flight.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    sprite: Arc<Sprite>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, sprite: Arc<Sprite>) -> Self {
        Self { id, pos, sprite }
    }

    #[inline]
    pub fn advance(&mut self, dy: f32) {
        self.pos.y += dy;
    }

    /// Outside `[-top_slack, screen_height]`
    pub fn is_expired(&self, expiry: Expiry) -> bool {
        self.pos.y < -expiry.top_slack || self.pos.y > expiry.screen_height
    }
}

impl Positioned for Projectile {
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
    use crate::assets::{SpriteKey, SpriteSheet};

    fn laser_at(y: f32) -> Projectile {
        let sheet = SpriteSheet::builtin(127);
        Projectile::new(1, Vec2::new(10.0, y), sheet.get(SpriteKey::PlayerLaser).clone())
    }

    #[test]
    fn test_advance_signed() {
        let mut p = laser_at(100.0);
        p.advance(-8.0);
        assert_eq!(p.pos.y, 92.0);
        p.advance(8.5);
        assert_eq!(p.pos.y, 100.5);
    }

    #[test]
    fn test_expiry_strict() {
        let strict = Expiry {
            screen_height: 750.0,
            top_slack: 0.0,
        };
        assert!(laser_at(-1.0).is_expired(strict));
        assert!(!laser_at(0.0).is_expired(strict));
        assert!(!laser_at(750.0).is_expired(strict));
        assert!(laser_at(751.0).is_expired(strict));
    }

    #[test]
    fn test_expiry_with_slack() {
        let tolerant = Expiry {
            screen_height: 750.0,
            top_slack: 10.0,
        };
        assert!(!laser_at(-1.0).is_expired(tolerant));
        assert!(!laser_at(-10.0).is_expired(tolerant));
        assert!(laser_at(-11.0).is_expired(tolerant));
        assert!(!laser_at(0.0).is_expired(tolerant));
    }
}
