//! Weapon fire and projectile motion
//!
//! Auto-fire emits a fan of projectiles centred on the player. Tech level
//! sets each projectile's pierce/bounce/chain budgets at launch.

use glam::Vec3;

use super::pool::Pool;
use super::state::{GameState, Projectile, WeaponStats, Zombie};
use crate::consts::*;

/// Special-behaviour budgets for a freshly fired projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub pierce: u32,
    pub bounce: u32,
    pub chain: u32,
}

impl Budgets {
    pub fn for_weapon(weapon: &WeaponStats) -> Self {
        let tech = weapon.tech_level;
        Self {
            pierce: if tech >= 1 { 3 } else { 0 },
            bounce: weapon.max_bounce + if tech >= 2 { 3 } else { 0 },
            chain: if tech >= 3 { 3 } else { 0 },
        }
    }
}

/// Lateral offset of cannon `index` in a fan of `count`
pub fn cannon_offset(index: u32, count: u32) -> f32 {
    let start = -((count.saturating_sub(1)) as f32 * CANNON_SPACING) / 2.0;
    start + index as f32 * CANNON_SPACING
}

/// Fire a volley if the weapon is off cooldown. Returns projectiles emitted.
pub fn update_weapon(state: &mut GameState) -> usize {
    if state.clock - state.last_shot <= state.weapon.delay {
        return 0;
    }
    state.last_shot = state.clock;

    let budgets = Budgets::for_weapon(&state.weapon);
    let count = state.weapon.count;
    let emit = (count as usize)
        .min(MAX_PROJECTILES_PER_TICK)
        .min(state.projectiles.remaining());
    let origin = state.player.pos;

    for i in 0..emit as u32 {
        let offset_x = cannon_offset(i, count);
        let offset_z = offset_x.abs() * 0.2;
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos: Vec3::new(origin.x + offset_x, ENTITY_Y, origin.z - 1.2 + offset_z),
            vel: Vec3::new(offset_x * 0.05, 0.0, -PROJECTILE_SPEED),
            pierce: budgets.pierce,
            bounce: budgets.bounce,
            chain: budgets.chain,
            ttl: PROJECTILE_TTL_FRAMES,
            is_cluster: false,
            last_hit: None,
        });
    }
    emit
}

/// Nearest live zombie to `pos` within `radius`, skipping `exclude`
pub fn nearest_zombie(
    zombies: &Pool<Zombie>,
    pos: Vec3,
    radius: f32,
    exclude: Option<u32>,
) -> Option<usize> {
    let mut best = None;
    let mut best_dist = radius;
    for (i, z) in zombies.iter().enumerate() {
        if !z.is_alive() || Some(z.id) == exclude {
            continue;
        }
        let d = pos.distance(z.pos);
        if d < best_dist {
            best_dist = d;
            best = Some(i);
        }
    }
    best
}

/// Blend velocity toward the nearest zombie, keeping projectile speed
pub fn steer_homing(projectile: &mut Projectile, zombies: &Pool<Zombie>) {
    let Some(target) = nearest_zombie(zombies, projectile.pos, HOMING_RADIUS, None) else {
        return;
    };
    let desired = (zombies[target].pos - projectile.pos).normalize_or_zero() * PROJECTILE_SPEED;
    if desired == Vec3::ZERO {
        return;
    }
    let blended = projectile.vel.lerp(desired, HOMING_BLEND);
    projectile.vel = blended.normalize_or_zero() * PROJECTILE_SPEED;
}

/// Reflect off arena bounds while bounce budget remains
pub fn apply_bounce(p: &mut Projectile) {
    let half_w = FIELD_WIDTH / 2.0;
    if p.bounce > 0 && p.pos.x.abs() > half_w {
        p.vel.x = -p.vel.x;
        p.bounce -= 1;
        p.pos.x = p.pos.x.clamp(-half_w, half_w);
    }

    let front = -FIELD_DEPTH;
    let back = PLAYER_Z;
    if p.bounce > 0 && (p.pos.z < front || p.pos.z > back) {
        p.vel.z = -p.vel.z;
        p.bounce -= 1;
        p.pos.z = p.pos.z.clamp(front, back);
    }
}

/// True while the projectile is inside the playfield envelope
pub fn in_envelope(pos: Vec3) -> bool {
    let m = PROJECTILE_CULL_MARGIN;
    pos.x.abs() <= FIELD_WIDTH / 2.0 + m && pos.z >= -FIELD_DEPTH - m && pos.z <= PLAYER_Z + m
}

/// Steer, move, bounce and cull all projectiles
pub fn update_projectiles(state: &mut GameState) {
    let homing = state.weapon.is_homing;
    for i in (0..state.projectiles.len()).rev() {
        let p = &mut state.projectiles[i];
        if homing {
            steer_homing(p, &state.zombies);
        }
        p.pos += p.vel;
        p.ttl = p.ttl.saturating_sub(1);
        apply_bounce(p);

        if p.ttl == 0 || !in_envelope(p.pos) {
            state.projectiles.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::make_zombie;
    use crate::sim::state::ZombieKind;

    fn projectile(pos: Vec3, vel: Vec3) -> Projectile {
        Projectile {
            id: 1,
            pos,
            vel,
            pierce: 0,
            bounce: 0,
            chain: 0,
            ttl: PROJECTILE_TTL_FRAMES,
            is_cluster: false,
            last_hit: None,
        }
    }

    #[test]
    fn test_budgets_by_tech() {
        let mut w = WeaponStats::default();
        assert_eq!(
            Budgets::for_weapon(&w),
            Budgets {
                pierce: 0,
                bounce: 1,
                chain: 0
            }
        );
        w.tech_level = 1;
        assert_eq!(Budgets::for_weapon(&w).pierce, 3);
        w.tech_level = 2;
        assert_eq!(Budgets::for_weapon(&w).bounce, 4);
        w.tech_level = 3;
        assert_eq!(Budgets::for_weapon(&w).chain, 3);
    }

    #[test]
    fn test_fan_is_centered() {
        assert_eq!(cannon_offset(0, 1), 0.0);
        let left = cannon_offset(0, 3);
        let right = cannon_offset(2, 3);
        assert!((left + right).abs() < 1e-6);
        assert!((right - left - 2.0 * CANNON_SPACING).abs() < 1e-6);
    }

    #[test]
    fn test_fire_respects_delay() {
        let mut state = GameState::new(1);
        state.clock = 0.2;
        assert_eq!(update_weapon(&mut state), 0);
        state.clock = 0.31;
        assert_eq!(update_weapon(&mut state), 1);
        assert_eq!(state.last_shot, 0.31);
        assert_eq!(update_weapon(&mut state), 0);
    }

    #[test]
    fn test_volley_capped_per_tick_and_by_pool() {
        let mut state = GameState::new(1);
        state.weapon.count = 500;
        state.clock = 1.0;
        assert_eq!(update_weapon(&mut state), MAX_PROJECTILES_PER_TICK);

        for k in 2..10 {
            state.clock = k as f32;
            update_weapon(&mut state);
        }
        assert_eq!(state.projectiles.len(), MAX_PROJECTILES);
    }

    #[test]
    fn test_side_bounce_reflects_and_clamps() {
        let mut p = projectile(Vec3::new(FIELD_WIDTH / 2.0 + 0.3, 1.0, -10.0), Vec3::new(0.5, 0.0, -0.8));
        p.bounce = 1;
        apply_bounce(&mut p);
        assert_eq!(p.bounce, 0);
        assert!(p.vel.x < 0.0);
        assert_eq!(p.pos.x, FIELD_WIDTH / 2.0);

        // Budget exhausted: no further reflection
        p.pos.x = -FIELD_WIDTH / 2.0 - 0.3;
        apply_bounce(&mut p);
        assert!(p.vel.x < 0.0);
    }

    #[test]
    fn test_front_wall_bounce() {
        let mut p = projectile(Vec3::new(0.0, 1.0, -FIELD_DEPTH - 0.2), Vec3::new(0.0, 0.0, -0.8));
        p.bounce = 2;
        apply_bounce(&mut p);
        assert_eq!(p.bounce, 1);
        assert!(p.vel.z > 0.0);
        assert_eq!(p.pos.z, -FIELD_DEPTH);
    }

    #[test]
    fn test_homing_blends_toward_target() {
        let mut zombies = Pool::with_capacity(4);
        zombies.push(make_zombie(1, ZombieKind::Walker, 5.0, 1, 0));
        zombies[0].pos = Vec3::new(5.0, 1.0, -5.0);

        let mut p = projectile(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -PROJECTILE_SPEED));
        steer_homing(&mut p, &zombies);
        assert!(p.vel.x > 0.0, "should turn toward target");
        assert!(p.vel.x < PROJECTILE_SPEED * 0.5, "should blend, not snap");
        assert!((p.vel.length() - PROJECTILE_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_homing_without_target_keeps_velocity() {
        let zombies: Pool<Zombie> = Pool::with_capacity(4);
        let vel = Vec3::new(0.1, 0.0, -0.8);
        let mut p = projectile(Vec3::ZERO, vel);
        steer_homing(&mut p, &zombies);
        assert_eq!(p.vel, vel);
    }

    #[test]
    fn test_projectiles_culled_outside_envelope() {
        let mut state = GameState::new(1);
        state
            .projectiles
            .push(projectile(Vec3::new(0.0, 1.0, -FIELD_DEPTH - PROJECTILE_CULL_MARGIN + 0.1), Vec3::new(0.0, 0.0, -0.8)));
        state
            .projectiles
            .push(projectile(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -0.8)));
        update_projectiles(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert!((state.projectiles[0].pos.z - -0.8).abs() < 1e-6);
    }

    #[test]
    fn test_projectile_expires() {
        let mut state = GameState::new(1);
        let mut p = projectile(Vec3::ZERO, Vec3::ZERO);
        p.ttl = 1;
        state.projectiles.push(p);
        update_projectiles(&mut state);
        assert!(state.projectiles.is_empty());
    }
}
