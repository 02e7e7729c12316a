//! Fixed-rate simulation tick
//!
//! Advances one frame. Update order matters and is fixed:
//! player → wave director → enemies (move, shots, ramming, bottom edge)
//! → pickups → player shots → loss check.

use rand::Rng;

use super::collision::overlaps;
use super::combatant::{FireGate, Steer};
use super::pickup::Pickup;
use super::state::{GameEvent, GameState, Phase};
use super::wave::spawn_wave;
use crate::assets::SpriteKey;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl TickInput {
    fn steer(&self) -> Steer {
        Steer {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
        }
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    match state.phase {
        Phase::Terminated => return,
        Phase::LostPending { ticks_remaining } => {
            let remaining = ticks_remaining.saturating_sub(1);
            if remaining == 0 {
                state.pickups.clear();
                state.phase = Phase::Terminated;
                state.events.push(GameEvent::Terminated);
                log::info!(
                    "Session over: score {}, level {}, {} frames",
                    state.score(),
                    state.level,
                    state.frame
                );
            } else {
                state.phase = Phase::LostPending {
                    ticks_remaining: remaining,
                };
            }
            return;
        }
        Phase::Playing => {}
    }

    state.frame += 1;

    update_player(state, input);

    if state.enemies.is_empty() {
        spawn_wave(state);
    }

    update_enemies(state);
    collect_pickups(state);
    resolve_player_shots(state);

    if state.loss_condition() {
        state.phase = Phase::LostPending {
            ticks_remaining: state.config.loss_grace_ticks(),
        };
        state.events.push(GameEvent::Lost);
        log::info!(
            "Lost at level {} (lives {}, health {})",
            state.level,
            state.lives,
            state.player.health
        );
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let area = state.config.play_area();
    state
        .player
        .steer(input.steer(), state.difficulty.player_speed, area);

    if input.fire && state.player.can_fire(FireGate::Cooldown) {
        let id = state.ids.next();
        state.player.fire(FireGate::Cooldown, id);
    }
}

/// Move every enemy, advance its shots against the player, let it fire,
/// then resolve ramming and the bottom edge, in that order.
fn update_enemies(state: &mut GameState) {
    let GameState {
        config,
        rules,
        difficulty,
        rng,
        lives,
        player,
        enemies,
        events,
        ids,
        ..
    } = state;

    let expiry = rules.expiry(config);
    let sweep = config.boss_sweep();
    let hit_damage = config.hit_damage;

    let mut i = 0;
    while i < enemies.len() {
        let enemy = &mut enemies[i];
        enemy.step(difficulty.enemy_speed, sweep);

        let hits = enemy.advance_projectiles(
            difficulty.cooldown,
            difficulty.enemy_laser_speed,
            expiry,
            std::slice::from_mut(player),
            |p| p.take_damage(hit_damage),
        );
        if hits > 0 {
            events.push(GameEvent::PlayerHit { hits });
        }

        // The boss shoots every frame; regular ships roll for it
        let (wants_fire, gate) = if enemy.is_boss() {
            (true, FireGate::Unconditional)
        } else {
            (
                rng.random_range(0..rules.enemy_fire_chance) == 0,
                rules.enemy_fire_gate,
            )
        };
        if wants_fire && enemy.can_fire(gate) {
            enemy.fire(gate, ids.next());
        }

        if overlaps(&*enemy, &*player) {
            player.take_damage(config.body_damage);
            events.push(GameEvent::EnemyRammed { id: enemy.id });
            if !enemy.is_boss() {
                player.score += 1;
                log::debug!("Enemy {} rammed the player", enemy.id);
                enemies.remove(i);
                continue;
            }
        }

        if enemy.pos.y + enemy.height() > config.screen_height {
            *lives -= 1;
            events.push(GameEvent::LifeLost { lives: *lives });
            log::debug!("Enemy {} got through, {} lives left", enemy.id, *lives);
            enemies.remove(i);
            continue;
        }

        i += 1;
    }
}

/// Apply one random effect per pickup the player is touching
fn collect_pickups(state: &mut GameState) {
    let GameState {
        rules,
        difficulty,
        rng,
        lives,
        player,
        pickups,
        events,
        ..
    } = state;

    let before = pickups.len();
    pickups.retain(|pickup| !overlaps(pickup, &*player));
    let collected = before - pickups.len();

    for _ in 0..collected {
        let effect = rules.pickup_effects[rng.random_range(0..rules.pickup_effects.len())];
        effect.apply(difficulty, lives, player);
        events.push(GameEvent::PickupCollected { effect });
        log::debug!("Pickup: {effect}");
    }
}

/// Player shots against the enemy collection. Every hit scores; destroyed
/// enemies drop a pickup where they died.
fn resolve_player_shots(state: &mut GameState) {
    let GameState {
        config,
        rules,
        difficulty,
        player,
        enemies,
        pickups,
        events,
        ids,
        sprites,
        ..
    } = state;

    let expiry = rules.expiry(config);
    let one_hit_kill = rules.enemy_one_hit_kill;
    let damage = config.hit_damage;

    let hits = player.advance_projectiles(
        difficulty.cooldown,
        difficulty.player_laser_speed,
        expiry,
        enemies,
        |enemy| {
            if one_hit_kill && !enemy.is_boss() {
                enemy.health = 0;
            } else {
                enemy.take_damage(damage);
            }
            events.push(GameEvent::EnemyHit { id: enemy.id });
        },
    );
    player.score += hits;

    let pickup_sprite = sprites.get(SpriteKey::Pickup);
    enemies.retain(|enemy| {
        if enemy.is_alive() {
            return true;
        }
        let id = ids.next();
        let pos = enemy.pos + config.pickup_offset;
        pickups.push(Pickup::new(id, pos, pickup_sprite.clone()));
        events.push(GameEvent::EnemyDestroyed { id: enemy.id });
        log::debug!("Enemy {} destroyed", enemy.id);
        false
    });
}
