//! Frame-stepped simulation tick
//!
//! One call advances the session by one frame. Distances are per frame,
//! `dt` only feeds the session clock used for fire cadence and debuffs.

use super::collision::resolve_hits;
use super::events::GameEvent;
use super::input::InputEvent;
use super::progression::{advance_wave, update_power_ups};
use super::spawn::update_spawning;
use super::state::GameState;
use super::weapon::{update_projectiles, update_weapon};
use crate::consts::*;

/// Input events delivered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Input is tracked even while paused so held keys survive a pause
    state.input.advance(dt);
    for &event in &input.events {
        state.handle_input(event);
    }

    if !state.is_running() {
        return;
    }

    state.frame += 1;
    state.clock += dt;

    state.player.pos.x = state
        .input
        .resolve(state.player.pos.x, &state.settings.input);

    update_weapon(state);
    update_spawning(state);
    update_projectiles(state);

    if move_zombies(state) {
        state.breached = true;
        state.game_over();
        state.publish_hud();
        return;
    }

    resolve_hits(state);
    update_particles(state);
    update_floating_texts(state);
    update_power_ups(state);

    if state.frame % WAVE_INTERVAL_FRAMES == 0 {
        advance_wave(state);
    }

    if let Some(level) = state.danger.assess(state.player.pos.z, &state.zombies) {
        state.emit(GameEvent::DangerChanged(level));
    }
    state.publish_hud();
}

/// Advance zombies toward the player line. Returns true if any crossed it.
fn move_zombies(state: &mut GameState) -> bool {
    let now = state.clock;
    let player = state.player.pos;
    let mut crossed = false;

    for i in (0..state.zombies.len()).rev() {
        let z = &mut state.zombies[i];
        z.pos.z += z.current_speed(now);

        let dx = player.x - z.pos.x;
        if dx.abs() > DRIFT_DEADBAND {
            z.pos.x += ZOMBIE_DRIFT * dx.signum();
        }

        if z.pos.z > player.z {
            log::debug!("{:?} #{} crossed the line", z.kind, z.id);
            state.zombies.remove(i);
            crossed = true;
        }
    }
    crossed
}

fn update_particles(state: &mut GameState) {
    for p in state.particles.iter_mut() {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

fn update_floating_texts(state: &mut GameState) {
    for t in state.floating_texts.iter_mut() {
        t.pos.y += TEXT_RISE;
        t.life = t.life.saturating_sub(1);
    }
    state.floating_texts.retain(|t| t.life > 0);
}
