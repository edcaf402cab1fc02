//! Spawning and difficulty scaling
//!
//! Cadence, type selection and per-wave stat scaling for zombies.

use glam::Vec3;
use rand::Rng;

use super::state::{GameState, Zombie, ZombieKind};
use crate::consts::*;

/// Frames between spawn attempts at a difficulty level
pub fn spawn_interval(level: u32) -> u64 {
    SPAWN_BASE_INTERVAL
        .saturating_sub(2 * level as u64)
        .max(SPAWN_MIN_INTERVAL)
}

/// Whether a spawn is attempted on this frame
pub fn should_spawn(frame: u64, level: u32) -> bool {
    frame == FIRST_SPAWN_FRAME || frame % spawn_interval(level) == 0
}

/// Base zombie hp for a level: `100 * 1.2^(level-1)`
pub fn wave_base_hp(level: u32) -> f32 {
    ZOMBIE_BASE_HP * ZOMBIE_HP_GROWTH.powi(level.saturating_sub(1) as i32)
}

/// Starting hp and speed for a zombie of `kind`
pub fn zombie_stats(kind: ZombieKind, level: u32, perfect_streak: u32) -> (f32, f32) {
    let profile = kind.profile();

    let base = wave_base_hp(level);
    let mut hp = match kind {
        ZombieKind::Runner => (base * profile.hp_mult).floor().max(1.0),
        _ => base * profile.hp_mult,
    };
    if perfect_streak >= ELITE_STREAK {
        hp *= ELITE_HP_MULT;
    }

    let increment = level.saturating_sub(1) as f32 * ZOMBIE_SPEED_PER_LEVEL;
    let speed = (ZOMBIE_BASE_SPEED + increment) * profile.speed_mult;
    (hp, speed)
}

/// Build a zombie at the spawn line
pub fn make_zombie(id: u32, kind: ZombieKind, x: f32, level: u32, perfect_streak: u32) -> Zombie {
    let (hp, speed) = zombie_stats(kind, level, perfect_streak);
    let profile = kind.profile();
    Zombie {
        id,
        pos: Vec3::new(x, ENTITY_Y, -FIELD_DEPTH),
        speed,
        hp,
        max_hp: hp,
        kind,
        size: profile.size,
        base_color: profile.color,
        slow_until: None,
    }
}

/// Spawn a zombie if this frame is on the cadence and the pool has room
pub fn update_spawning(state: &mut GameState) {
    if !should_spawn(state.frame, state.level) || state.zombies.is_full() {
        return;
    }

    let x = (state.rng.random::<f32>() - 0.5) * FIELD_WIDTH;
    let roll = state.rng.random::<f32>();
    let kind = ZombieKind::from_roll(roll);
    let id = state.next_entity_id();
    let zombie = make_zombie(id, kind, x, state.level, state.perfect_streak);

    log::debug!(
        "Spawned {:?} #{} (hp {:.0}, speed {:.3})",
        kind,
        id,
        zombie.hp,
        zombie.speed
    );
    state.zombies.push(zombie);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(spawn_interval(1), 58);
        assert_eq!(spawn_interval(10), 40);
        assert_eq!(spawn_interval(15), 30);
        assert_eq!(spawn_interval(100), 30);
    }

    #[test]
    fn test_should_spawn() {
        assert!(should_spawn(FIRST_SPAWN_FRAME, 1));
        assert!(should_spawn(58, 1));
        assert!(!should_spawn(59, 1));
        assert!(should_spawn(90, 20));
    }

    #[test]
    fn test_tank_at_level_one() {
        let kind = ZombieKind::from_roll(0.9);
        assert_eq!(kind, ZombieKind::Tank);
        let (hp, speed) = zombie_stats(kind, 1, 0);
        assert!((hp - 400.0).abs() < 1e-3);
        assert!((speed - ZOMBIE_BASE_SPEED * 0.4).abs() < 1e-7);

        // One increment per level above the first
        let (_, speed) = zombie_stats(kind, 3, 0);
        let expected = (ZOMBIE_BASE_SPEED + 2.0 * ZOMBIE_SPEED_PER_LEVEL) * 0.4;
        assert!((speed - expected).abs() < 1e-7);
    }

    #[test]
    fn test_hp_scaling() {
        assert!((wave_base_hp(1) - 100.0).abs() < 1e-3);
        assert!((wave_base_hp(2) - 120.0).abs() < 1e-3);
        assert!((wave_base_hp(3) - 144.0).abs() < 1e-3);

        let (boss_hp, _) = zombie_stats(ZombieKind::Boss, 1, 0);
        assert!((boss_hp - 1000.0).abs() < 1e-3);

        // 120 * 0.5 = 60; 144 * 0.5 = 72; level 4: 172.8 * 0.5 = 86.4 -> 86
        let (runner_hp, _) = zombie_stats(ZombieKind::Runner, 4, 0);
        assert_eq!(runner_hp, 86.0);
    }

    #[test]
    fn test_elite_streak_bonus() {
        let (normal, _) = zombie_stats(ZombieKind::Walker, 1, 4);
        let (elite, _) = zombie_stats(ZombieKind::Walker, 1, 5);
        assert!((normal - 100.0).abs() < 1e-3);
        assert!((elite - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_update_spawning_respects_cap() {
        let mut state = GameState::new(7);
        for _ in 0..MAX_ZOMBIES {
            let id = state.next_entity_id();
            state
                .zombies
                .push(make_zombie(id, ZombieKind::Walker, 0.0, 1, 0));
        }
        state.frame = FIRST_SPAWN_FRAME;
        update_spawning(&mut state);
        assert_eq!(state.zombies.len(), MAX_ZOMBIES);
    }

    #[test]
    fn test_update_spawning_places_zombie_in_field() {
        let mut state = GameState::new(7);
        state.frame = FIRST_SPAWN_FRAME;
        update_spawning(&mut state);
        assert_eq!(state.zombies.len(), 1);
        let z = &state.zombies[0];
        assert!(z.pos.x.abs() <= FIELD_WIDTH / 2.0);
        assert_eq!(z.pos.z, -FIELD_DEPTH);
        assert_eq!(z.hp, z.max_hp);
    }
}
