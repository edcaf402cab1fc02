//! Projectile-zombie hit resolution
//!
//! Zombies are walked back-to-front and each takes at most one hit per frame
//! (the first projectile found, also walked back-to-front). Removal happens
//! in the same pass, so the reverse order is load-bearing.
//!
//! Per hit: crit roll, damage, baseline knockback, tech effects, particles,
//! a damage number, then the projectile's continuation:
//! chain (if a retarget exists) > pierce > destroy.

use glam::Vec3;
use rand::Rng;

use super::progression;
use super::state::{FloatingText, GameState, Particle};
use super::weapon::nearest_zombie;
use crate::consts::*;

/// Particle color for a non-lethal hit
const HIT_SPARK: u32 = 0xfbbf24;
const CRIT_TEXT: u32 = 0xfacc15;
const DAMAGE_TEXT: u32 = 0xffffff;
const TEXT_LIFE: u32 = 40;

/// What happened to the projectile after a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Chained,
    Pierced,
    Destroyed,
}

/// Outcome of a single hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub damage: f32,
    pub crit: bool,
    pub killed: bool,
    pub continuation: Continuation,
}

/// Index of the first projectile (scanning from the back) touching zombie `zi`.
/// A projectile never strikes the zombie it just passed through or chained off.
fn find_hit(state: &GameState, zi: usize) -> Option<usize> {
    let z = &state.zombies[zi];
    let radius = z.hit_radius();
    (0..state.projectiles.len()).rev().find(|&j| {
        let p = &state.projectiles[j];
        p.last_hit != Some(z.id) && p.pos.distance(z.pos) < radius
    })
}

/// Resolve all hits for this frame and remove dead zombies
pub fn resolve_hits(state: &mut GameState) {
    for i in (0..state.zombies.len()).rev() {
        // Splash may have finished this one off already; the sweep below collects it
        if !state.zombies[i].is_alive() {
            continue;
        }
        let Some(j) = find_hit(state, i) else {
            continue;
        };

        let hit = apply_hit(state, i, j);
        if hit.killed {
            let zombie = state.zombies.remove(i);
            progression::on_zombie_killed(state, &zombie);
        }
    }

    // Splash kills on zombies that took no direct hit
    for i in (0..state.zombies.len()).rev() {
        if !state.zombies[i].is_alive() {
            let zombie = state.zombies.remove(i);
            spawn_burst(state, zombie.pos, zombie.base_color, true);
            progression::on_zombie_killed(state, &zombie);
        }
    }
}

/// Apply projectile `pj` to zombie `zi`
pub fn apply_hit(state: &mut GameState, zi: usize, pj: usize) -> Hit {
    let crit = state.rng.random::<f32>() * 100.0 < state.weapon.crit_chance;
    let damage = if crit {
        state.weapon.crit_damage()
    } else {
        state.weapon.damage
    };
    let tech = state.weapon.tech_level;
    let now = state.clock;

    let (hit_pos, hit_id, color, killed) = {
        let z = &mut state.zombies[zi];
        z.take_damage(damage);
        z.push_back(KNOCKBACK_FORCE);
        if tech >= 4 {
            z.slow_until = Some(now + SLOW_DURATION);
        }
        (z.pos, z.id, z.base_color, !z.is_alive())
    };

    if tech >= 5 {
        let splash = damage * SPLASH_RATIO;
        for (k, other) in state.zombies.iter_mut().enumerate() {
            if k != zi && other.is_alive() && other.pos.distance(hit_pos) < SPLASH_RADIUS {
                other.take_damage(splash);
            }
        }
    }

    if tech >= 6 && crit {
        for z in state.zombies.iter_mut() {
            if z.pos.distance(hit_pos) < VORTEX_RADIUS {
                z.push_back(VORTEX_FORCE);
            }
        }
    }

    spawn_burst(state, hit_pos, color, killed);
    spawn_damage_text(state, hit_pos, damage, crit);
    let continuation = continue_projectile(state, pj, hit_id);

    Hit {
        damage,
        crit,
        killed,
        continuation,
    }
}

/// Decide whether projectile `pj` survives hitting zombie `struck_id`
pub fn continue_projectile(state: &mut GameState, pj: usize, struck_id: u32) -> Continuation {
    let pos = state.projectiles[pj].pos;

    if state.projectiles[pj].chain > 0 {
        if let Some(t) = nearest_zombie(&state.zombies, pos, CHAIN_RADIUS, Some(struck_id)) {
            let dir = (state.zombies[t].pos - pos).normalize_or_zero();
            let p = &mut state.projectiles[pj];
            p.vel = dir * PROJECTILE_SPEED;
            p.pos += dir * CHAIN_NUDGE;
            p.chain -= 1;
            p.last_hit = Some(struck_id);
            return Continuation::Chained;
        }
    }

    let p = &mut state.projectiles[pj];
    if p.pierce > 0 {
        p.pierce -= 1;
        p.last_hit = Some(struck_id);
        return Continuation::Pierced;
    }

    state.projectiles.remove(pj);
    Continuation::Destroyed
}

/// Cosmetic burst at a hit; larger and longer-lived on a kill
pub fn spawn_burst(state: &mut GameState, pos: Vec3, zombie_color: u32, killed: bool) {
    if state.particles.capacity() == 0 {
        return;
    }
    let (count, life, color) = if killed {
        (6, 40, zombie_color)
    } else {
        (3, 20, HIT_SPARK)
    };
    for _ in 0..count {
        if state.particles.is_full() {
            break;
        }
        let vel = Vec3::new(
            (state.rng.random::<f32>() - 0.5) * 0.3,
            state.rng.random::<f32>() * 0.3,
            (state.rng.random::<f32>() - 0.5) * 0.3,
        );
        let id = state.next_entity_id();
        state.particles.push(Particle {
            id,
            pos,
            vel,
            color,
            life,
        });
    }
}

/// Floating damage number above the zombie
pub fn spawn_damage_text(state: &mut GameState, pos: Vec3, damage: f32, crit: bool) {
    if state.floating_texts.is_full() {
        return;
    }
    let id = state.next_entity_id();
    state.floating_texts.push(FloatingText {
        id,
        pos: pos + Vec3::new(0.0, 1.5, 0.0),
        content: format!("{}", damage.round() as i64),
        color: if crit { CRIT_TEXT } else { DAMAGE_TEXT },
        life: TEXT_LIFE,
        max_life: TEXT_LIFE,
        is_crit: crit,
    });
}
