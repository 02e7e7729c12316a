//! Sprite sheet
//!
//! Every visible entity is drawn from a small closed set of images. The sheet
//! owns one immutable [`Sprite`] per [`SpriteKey`]; entities hold `Arc`
//! handles so an image and its mask always travel together.
//!
//! Real art is loaded by the frontend. The built-in sheet paints simple
//! procedural shapes at the same sizes so the simulation runs headless.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::mask::Mask;

/// Enemy ship palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipColor {
    Red,
    Green,
    Blue,
}

impl ShipColor {
    pub const ALL: [ShipColor; 3] = [ShipColor::Red, ShipColor::Green, ShipColor::Blue];

    #[inline]
    fn index(self) -> usize {
        match self {
            ShipColor::Red => 0,
            ShipColor::Green => 1,
            ShipColor::Blue => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipColor::Red => "red",
            ShipColor::Green => "green",
            ShipColor::Blue => "blue",
        }
    }

    fn rgb(self) -> [u8; 3] {
        match self {
            ShipColor::Red => [220, 60, 60],
            ShipColor::Green => [60, 200, 90],
            ShipColor::Blue => [70, 110, 230],
        }
    }
}

impl fmt::Display for ShipColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(ShipColor::Red),
            "green" => Ok(ShipColor::Green),
            "blue" => Ok(ShipColor::Blue),
            _ => Err(Error::UnknownColor(s.to_string())),
        }
    }
}

/// Closed set of images the simulation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Player,
    PlayerLaser,
    Ship(ShipColor),
    Laser(ShipColor),
    Boss,
    BossLaser,
    Pickup,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 11] = [
        SpriteKey::Player,
        SpriteKey::PlayerLaser,
        SpriteKey::Ship(ShipColor::Red),
        SpriteKey::Ship(ShipColor::Green),
        SpriteKey::Ship(ShipColor::Blue),
        SpriteKey::Laser(ShipColor::Red),
        SpriteKey::Laser(ShipColor::Green),
        SpriteKey::Laser(ShipColor::Blue),
        SpriteKey::Boss,
        SpriteKey::BossLaser,
        SpriteKey::Pickup,
    ];
}

/// An immutable image plus the mask derived from it
#[derive(Debug, Clone)]
pub struct Sprite {
    pub key: SpriteKey,
    width: u32,
    height: u32,
    /// RGBA8, row-major; kept for renderers
    rgba: Vec<u8>,
    mask: Mask,
}

impl Sprite {
    /// Wrap decoded pixels, deriving the mask from alpha
    pub fn from_rgba(
        key: SpriteKey,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        threshold: u8,
    ) -> Self {
        let mask = Mask::from_rgba(width, height, &rgba, threshold);
        Self {
            key,
            width,
            height,
            rgba,
            mask,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// One sprite per key. Total by construction: lookups cannot fail once built.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    player: Arc<Sprite>,
    player_laser: Arc<Sprite>,
    ships: [Arc<Sprite>; 3],
    lasers: [Arc<Sprite>; 3],
    boss: Arc<Sprite>,
    boss_laser: Arc<Sprite>,
    pickup: Arc<Sprite>,
}

impl SpriteSheet {
    /// Procedural stand-ins at the shipped art's dimensions
    pub fn builtin(threshold: u8) -> Self {
        let mut builder = SpriteSheetBuilder::default();
        let yellow = [240, 210, 60];

        builder.insert(paint(SpriteKey::Player, 100, 90, yellow, threshold, hull_up));
        builder.insert(paint(SpriteKey::PlayerLaser, 100, 90, yellow, threshold, bolt(6, 24)));
        for color in ShipColor::ALL {
            builder.insert(paint(
                SpriteKey::Ship(color),
                56,
                50,
                color.rgb(),
                threshold,
                hull_down,
            ));
            builder.insert(paint(
                SpriteKey::Laser(color),
                100,
                90,
                color.rgb(),
                threshold,
                bolt(6, 24),
            ));
        }
        builder.insert(paint(SpriteKey::Boss, 160, 110, [170, 70, 200], threshold, hull_down));
        builder.insert(paint(
            SpriteKey::BossLaser,
            100,
            90,
            [170, 70, 200],
            threshold,
            bolt(12, 30),
        ));
        builder.insert(paint(SpriteKey::Pickup, 30, 30, yellow, threshold, diamond));

        // Every key was inserted above
        match builder.build() {
            Ok(sheet) => sheet,
            Err(e) => unreachable!("built-in sprite sheet incomplete: {e}"),
        }
    }

    pub fn get(&self, key: SpriteKey) -> &Arc<Sprite> {
        match key {
            SpriteKey::Player => &self.player,
            SpriteKey::PlayerLaser => &self.player_laser,
            SpriteKey::Ship(c) => &self.ships[c.index()],
            SpriteKey::Laser(c) => &self.lasers[c.index()],
            SpriteKey::Boss => &self.boss,
            SpriteKey::BossLaser => &self.boss_laser,
            SpriteKey::Pickup => &self.pickup,
        }
    }
}

/// Collects sprites from an asset loader; `build` fails on the first missing key
#[derive(Debug, Default)]
pub struct SpriteSheetBuilder {
    sprites: HashMap<SpriteKey, Arc<Sprite>>,
}

impl SpriteSheetBuilder {
    pub fn insert(&mut self, sprite: Sprite) -> &mut Self {
        self.sprites.insert(sprite.key, Arc::new(sprite));
        self
    }

    pub fn build(mut self) -> Result<SpriteSheet> {
        let mut take = |key: SpriteKey| self.sprites.remove(&key).ok_or(Error::MissingSprite(key));
        Ok(SpriteSheet {
            player: take(SpriteKey::Player)?,
            player_laser: take(SpriteKey::PlayerLaser)?,
            ships: [
                take(SpriteKey::Ship(ShipColor::Red))?,
                take(SpriteKey::Ship(ShipColor::Green))?,
                take(SpriteKey::Ship(ShipColor::Blue))?,
            ],
            lasers: [
                take(SpriteKey::Laser(ShipColor::Red))?,
                take(SpriteKey::Laser(ShipColor::Green))?,
                take(SpriteKey::Laser(ShipColor::Blue))?,
            ],
            boss: take(SpriteKey::Boss)?,
            boss_laser: take(SpriteKey::BossLaser)?,
            pickup: take(SpriteKey::Pickup)?,
        })
    }
}

// --- procedural art -------------------------------------------------------

type Shape = dyn Fn(f32, f32) -> bool;

fn paint(
    key: SpriteKey,
    width: u32,
    height: u32,
    rgb: [u8; 3],
    threshold: u8,
    shape: impl Fn(f32, f32) -> bool,
) -> Sprite {
    let mut rgba = vec![0u8; (width * height * 4) as usize];
    for y in 0..height {
        for x in 0..width {
            // Normalized pixel centre in [0, 1]
            let u = (x as f32 + 0.5) / width as f32;
            let v = (y as f32 + 0.5) / height as f32;
            if shape(u, v) {
                let i = ((y * width + x) * 4) as usize;
                rgba[i..i + 3].copy_from_slice(&rgb);
                rgba[i + 3] = 255;
            }
        }
    }
    Sprite::from_rgba(key, width, height, rgba, threshold)
}

/// Triangle hull, nose at the top
fn hull_up(u: f32, v: f32) -> bool {
    (u - 0.5).abs() <= v * 0.5
}

/// Triangle hull, nose at the bottom
fn hull_down(u: f32, v: f32) -> bool {
    hull_up(u, 1.0 - v)
}

fn diamond(u: f32, v: f32) -> bool {
    (u - 0.5).abs() + (v - 0.5).abs() <= 0.5
}

/// Centered vertical bolt of `w` x `h` pixels on a 100x90 canvas
fn bolt(w: u32, h: u32) -> Box<Shape> {
    let half_w = w as f32 / 200.0;
    let half_h = h as f32 / 180.0;
    Box::new(move |u, v| (u - 0.5).abs() < half_w && (v - 0.5).abs() < half_h)
}
