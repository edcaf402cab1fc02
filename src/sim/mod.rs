//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One frame per tick, per-frame distances
//! - Seeded RNG only
//! - Stable iteration order (pool order, reverse sweeps for removal)
//! - No rendering or platform dependencies

pub mod collision;
pub mod danger;
pub mod events;
pub mod input;
pub mod pool;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{Continuation, Hit, resolve_hits};
pub use danger::DangerAssessor;
pub use events::GameEvent;
pub use input::{InputEvent, InputSource, Key, VirtualMove};
pub use pool::Pool;
pub use progression::{SuperUpgrade, UpgradeEffect};
pub use snapshot::{HudState, InstanceData, RenderSnapshot, TextInstance};
pub use state::{
    GamePhase, GameState, Particle, Player, PowerUp, PowerUpKind, Projectile, WeaponStats,
    Zombie, ZombieKind,
};
pub use tick::{TickInput, tick};
