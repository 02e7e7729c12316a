//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One tick per frame, speeds in pixels per frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combatant;
pub mod mask;
pub mod pickup;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Positioned, overlaps};
pub use combatant::{Combatant, FireGate, Heading, HealthBar, ShipKind};
pub use mask::Mask;
pub use pickup::{BASIC_EFFECTS, EXTENDED_EFFECTS, Pickup, PickupEffect};
pub use projectile::{Expiry, Projectile};
pub use state::{Difficulty, GameEvent, GameState, Phase, SessionSummary};
pub use tick::{TickInput, tick};
pub use wave::spawn_wave;
