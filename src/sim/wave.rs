//! Wave director
//!
//! A new wave spawns the frame the enemy collection runs dry. Each wave is
//! `WAVE_STEP` ships larger than the last, staggered above the screen so
//! they trickle in.

use glam::Vec2;
use rand::Rng;

use super::combatant::Combatant;
use super::state::{GameEvent, GameState};
use crate::consts::WAVE_STEP;

/// Advance the level and spawn its enemies (plus a boss on boss levels)
pub fn spawn_wave(state: &mut GameState) {
    state.level += 1;
    state.wave_intensity += WAVE_STEP;

    let config = &state.config;
    let rules = &state.rules;
    let min_x = config.spawn_margin_x;
    let max_x = config.screen_width as i32 - config.spawn_margin_x;

    for _ in 0..state.wave_intensity {
        let x = state.rng.random_range(min_x..max_x);
        let y = state.rng.random_range(config.spawn_y_min..config.spawn_y_max);
        let color = rules.palette[state.rng.random_range(0..rules.palette.len())];
        state.enemies.push(Combatant::enemy(
            state.ids.next(),
            Vec2::new(x as f32, y as f32),
            color,
            rules.enemy_health,
            &state.sprites,
        ));
    }

    log::info!(
        "Wave {}: {} enemies ({} rules)",
        state.level,
        state.wave_intensity,
        rules.name
    );
    state.events.push(GameEvent::WaveStarted {
        level: state.level,
        enemies: state.wave_intensity,
    });

    if let Some(boss_rule) = rules.boss {
        if boss_rule.spawns_on(state.level) {
            let id = state.ids.next();
            let mut boss = Combatant::boss(id, Vec2::ZERO, boss_rule.health, &state.sprites);
            boss.pos = Vec2::new(config.screen_width / 2.0 - boss.width() / 2.0, config.boss_y);
            state.enemies.push(boss);

            log::info!("Boss joins wave {}", state.level);
            state.events.push(GameEvent::BossSpawned { id });
        }
    }
}
