//! Demo player
//!
//! Steers toward the lowest on-screen enemy and fires constantly. Incoming
//! bolts take priority; with nothing threatening, it detours for pickups.

use crate::sim::{Combatant, GameState, Positioned, TickInput};

use super::{InputFrame, InputSource};

/// How far above the player a bolt counts as incoming, in pixels
const DANGER_ZONE: f32 = 160.0;
/// Close enough to the target column to stop steering
const DEADBAND: f32 = 4.0;

#[derive(Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }
}

fn center_x(ship: &Combatant) -> f32 {
    ship.pos.x + ship.width() / 2.0
}

fn sprite_center_x<T: Positioned>(thing: &T) -> f32 {
    thing.position().x + thing.sprite().width() as f32 / 2.0
}

/// Horizontal center of the nearest enemy bolt inside the danger zone
fn incoming_bolt(state: &GameState) -> Option<f32> {
    let player = &state.player;
    let (left, right) = (player.pos.x, player.pos.x + player.width());

    state
        .enemies
        .iter()
        .flat_map(|enemy| enemy.projectiles.iter())
        .filter(|shot| {
            let cx = sprite_center_x(*shot);
            let gap = player.pos.y - shot.pos.y;
            cx > left - 10.0 && cx < right + 10.0 && (-player.height()..DANGER_ZONE).contains(&gap)
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(sprite_center_x)
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> InputFrame {
        let player = &state.player;
        let px = center_x(player);
        let mut keys = TickInput {
            fire: true,
            ..Default::default()
        };

        if let Some(bolt_x) = incoming_bolt(state) {
            // Sidestep away from the bolt unless pinned against that wall
            let step = state.difficulty.player_speed;
            let room_left = player.pos.x;
            let room_right = state.config.screen_width - (player.pos.x + player.width());
            let go_left = if bolt_x >= px {
                room_left > step
            } else {
                room_right <= step
            };
            keys.left = go_left;
            keys.right = !go_left;
            keys.down = true;
            return InputFrame { keys, quit: false };
        }

        let target = state
            .pickups
            .iter()
            .filter(|p| p.pos.y > player.pos.y - DANGER_ZONE)
            .map(sprite_center_x)
            .next()
            .or_else(|| {
                state
                    .enemies
                    .iter()
                    .filter(|e| e.pos.y + e.height() > 0.0)
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(center_x)
            });

        if let Some(tx) = target {
            if tx < px - DEADBAND {
                keys.left = true;
            } else if tx > px + DEADBAND {
                keys.right = true;
            }
        }

        InputFrame { keys, quit: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ShipColor;
    use crate::settings::Ruleset;
    use crate::sim::{FireGate, tick};
    use glam::Vec2;

    fn parked_state() -> GameState {
        let mut state = GameState::with_rules(Ruleset::basic(), 8).unwrap();
        state.rules.enemy_fire_chance = u32::MAX;
        state.difficulty.enemy_speed = 0.0;
        state
    }

    #[test]
    fn test_tracks_lowest_visible_enemy() {
        let mut state = parked_state();
        let high = state.ids.next();
        state.enemies.push(Combatant::enemy(
            high,
            Vec2::new(600.0, 50.0),
            ShipColor::Red,
            100,
            &state.sprites,
        ));
        let low = state.ids.next();
        state.enemies.push(Combatant::enemy(
            low,
            Vec2::new(20.0, 300.0),
            ShipColor::Red,
            100,
            &state.sprites,
        ));

        let frame = Autopilot::new().poll(&state);
        assert!(frame.keys.fire);
        assert!(frame.keys.left);
        assert!(!frame.keys.right);
        assert!(!frame.quit);
    }

    #[test]
    fn test_sidesteps_incoming_bolt() {
        let mut state = parked_state();
        let id = state.ids.next();
        let mut shooter = Combatant::enemy(
            id,
            Vec2::new(322.0, 480.0),
            ShipColor::Blue,
            100,
            &state.sprites,
        );
        shooter.fire(FireGate::Cooldown, state.ids.next());
        state.enemies.push(shooter);

        let frame = Autopilot::new().poll(&state);
        assert!(frame.keys.left || frame.keys.right);
        assert!(frame.keys.down);
    }

    #[test]
    fn test_demo_session_stays_in_bounds() {
        let mut state = GameState::with_rules(Ruleset::basic(), 31).unwrap();
        let mut pilot = Autopilot::new();
        for _ in 0..3_000 {
            let frame = pilot.poll(&state);
            tick(&mut state, &frame.keys);
            if state.is_terminated() {
                break;
            }
        }
        assert!(state.level >= 1);
        assert!(state.player.pos.x >= 0.0);
        assert!(state.player.pos.x <= state.config.screen_width - state.player.width());
    }
}
