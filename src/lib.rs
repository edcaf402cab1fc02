//! Arena Defense - frame-stepped zombie shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, weapons, collisions, waves)
//! - `settings`: Host-tunable quality and input settings
//!
//! Rendering, audio and score persistence belong to the host. The simulation
//! only publishes plain snapshots and events.

pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec3;

/// Game configuration constants
///
/// Distances are field units; speeds are field units per frame.
pub mod consts {
    /// Nominal frame time used by the demo driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 20.0;
    pub const FIELD_DEPTH: f32 = 60.0;
    /// Player line (zombies crossing it end the run)
    pub const PLAYER_Z: f32 = 8.0;
    /// Height entities travel at
    pub const ENTITY_Y: f32 = 1.0;

    /// Player movement
    pub const PLAYER_SPEED: f32 = 0.3;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 0.8;
    pub const PROJECTILE_TTL_FRAMES: u32 = 180;
    /// Distance past the field edges before a projectile is culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 5.0;
    pub const CANNON_SPACING: f32 = 0.3;
    pub const HOMING_RADIUS: f32 = 15.0;
    pub const HOMING_BLEND: f32 = 0.1;

    /// Zombie defaults
    pub const ZOMBIE_BASE_SPEED: f32 = 0.04;
    pub const ZOMBIE_SPEED_PER_LEVEL: f32 = 0.001;
    pub const ZOMBIE_BASE_HP: f32 = 100.0;
    pub const ZOMBIE_HP_GROWTH: f32 = 1.2;
    pub const ZOMBIE_DRIFT: f32 = 0.02;
    pub const ELITE_STREAK: u32 = 5;
    pub const ELITE_HP_MULT: f32 = 1.5;

    /// Spawn cadence (frames)
    pub const SPAWN_BASE_INTERVAL: u64 = 60;
    pub const SPAWN_MIN_INTERVAL: u64 = 30;
    pub const FIRST_SPAWN_FRAME: u64 = 10;

    /// Wave cadence (frames)
    pub const WAVE_INTERVAL_FRAMES: u64 = 600;
    pub const SUPER_REWARD_EVERY: u32 = 10;
    pub const SUPER_REWARD_CHOICES: usize = 3;

    /// Combat
    pub const HIT_RADIUS_BASE: f32 = 0.7;
    pub const HIT_RADIUS_PER_SIZE: f32 = 0.5;
    pub const KNOCKBACK_FORCE: f32 = 0.3;
    pub const CHAIN_RADIUS: f32 = 10.0;
    pub const CHAIN_NUDGE: f32 = 0.5;
    pub const SLOW_FACTOR: f32 = 0.75;
    pub const SLOW_DURATION: f32 = 1.5;
    pub const SPLASH_RADIUS: f32 = 4.0;
    pub const SPLASH_RATIO: f32 = 0.3;
    pub const VORTEX_RADIUS: f32 = 6.0;
    pub const VORTEX_FORCE: f32 = 1.5;

    /// Weapon defaults and clamps
    pub const WEAPON_COUNT: u32 = 1;
    pub const WEAPON_DELAY: f32 = 0.3;
    pub const WEAPON_MIN_DELAY: f32 = 0.05;
    pub const WEAPON_DAMAGE: f32 = 50.0;
    pub const WEAPON_BOUNCE: u32 = 1;
    pub const WEAPON_CRIT_CHANCE: f32 = 5.0;
    pub const WEAPON_CRIT_BONUS: f32 = 100.0;
    pub const MAX_TECH_LEVEL: u8 = 6;
    pub const MAX_CRIT_CHANCE: f32 = 100.0;

    /// Loot
    pub const LOOT_RANGE: f32 = 25.0;
    pub const POWERUP_DRIFT: f32 = 0.1;
    pub const POWERUP_MAGNET_RADIUS: f32 = 5.0;
    pub const POWERUP_MAGNET_LERP: f32 = 0.1;
    pub const PICKUP_RADIUS: f32 = 1.5;
    /// Cosmetics
    pub const TEXT_RISE: f32 = 0.03;
    /// Zombies closer than this (x) to the player stop drifting sideways
    pub const DRIFT_DEADBAND: f32 = 0.5;

    /// Pool capacities (hard caps)
    pub const MAX_ZOMBIES: usize = 100;
    pub const MAX_PROJECTILES: usize = 1000;
    pub const MAX_PROJECTILES_PER_TICK: usize = 200;
    pub const MAX_PARTICLES: usize = 300;
    pub const MAX_POWERUPS: usize = 50;
    pub const MAX_FLOATING_TEXTS: usize = 50;
}

/// Horizontal distance between two points (ignores height)
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Legal x-range of the player
#[inline]
pub fn clamp_player_x(x: f32) -> f32 {
    let limit = consts::FIELD_WIDTH / 2.0 - 1.0;
    x.clamp(-limit, limit)
}
