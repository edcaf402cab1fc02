//! Game state and core simulation types
//!
//! Everything a session owns lives here. The host only ever sees events,
//! `HudState` values and render snapshots, never these structures directly.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::danger::DangerAssessor;
use super::events::GameEvent;
use super::input::{InputArbiter, InputEvent, VirtualMove};
use super::pool::Pool;
use super::progression::SuperUpgrade;
use super::snapshot::HudState;
use crate::consts::*;
use crate::settings::Settings;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, waiting for the host to start
    Ready,
    /// Active gameplay
    Playing,
    /// A zombie crossed the player line
    GameOver,
}

/// Per-type zombie data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub hp_mult: f32,
    pub speed_mult: f32,
    /// Render size multiplier (also widens the hit radius)
    pub size: f32,
    pub color: u32,
    /// Multiplier on forced displacement (lower resists more)
    pub knockback: f32,
    /// Loot chance outside the danger zone
    pub drop_chance: f32,
}

/// Zombie types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZombieKind {
    Walker,
    Runner,
    Tank,
    Boss,
}

const WALKER: KindProfile = KindProfile {
    hp_mult: 1.0,
    speed_mult: 1.0,
    size: 1.0,
    color: 0x10b981,
    knockback: 1.0,
    drop_chance: 0.2,
};

const RUNNER: KindProfile = KindProfile {
    hp_mult: 0.5,
    speed_mult: 1.6,
    size: 0.8,
    color: 0xfacc15,
    knockback: 1.5,
    drop_chance: 0.4,
};

const TANK: KindProfile = KindProfile {
    hp_mult: 4.0,
    speed_mult: 0.4,
    size: 1.5,
    color: 0xef4444,
    knockback: 0.3,
    drop_chance: 0.8,
};

const BOSS: KindProfile = KindProfile {
    hp_mult: 10.0,
    speed_mult: 0.3,
    size: 2.5,
    color: 0x9333ea,
    knockback: 0.1,
    drop_chance: 1.0,
};

impl ZombieKind {
    pub const ALL: [ZombieKind; 4] = [
        ZombieKind::Walker,
        ZombieKind::Runner,
        ZombieKind::Tank,
        ZombieKind::Boss,
    ];

    pub fn profile(self) -> &'static KindProfile {
        match self {
            ZombieKind::Walker => &WALKER,
            ZombieKind::Runner => &RUNNER,
            ZombieKind::Tank => &TANK,
            ZombieKind::Boss => &BOSS,
        }
    }

    /// Pick a type from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        if roll > 0.96 {
            ZombieKind::Boss
        } else if roll > 0.88 {
            ZombieKind::Tank
        } else if roll > 0.70 {
            ZombieKind::Runner
        } else {
            ZombieKind::Walker
        }
    }
}

/// Tint applied while a zombie is slowed
pub const SLOW_TINT: u32 = 0x60a5fa;

/// An enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub id: u32,
    pub pos: Vec3,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub kind: ZombieKind,
    pub size: f32,
    pub base_color: u32,
    /// Session clock time when the slow debuff expires
    pub slow_until: Option<f32>,
}

impl Zombie {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn is_slowed(&self, now: f32) -> bool {
        self.slow_until.is_some_and(|t| now < t)
    }

    /// Forward speed this frame
    pub fn current_speed(&self, now: f32) -> f32 {
        if self.is_slowed(now) {
            self.speed * SLOW_FACTOR
        } else {
            self.speed
        }
    }

    pub fn color(&self, now: f32) -> u32 {
        if self.is_slowed(now) {
            SLOW_TINT
        } else {
            self.base_color
        }
    }

    /// Apply damage, keeping hp within [0, max_hp]
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
    }

    /// Push away from the player (toward the spawn line)
    pub fn push_back(&mut self, force: f32) {
        self.pos.z -= force * self.kind.profile().knockback;
    }

    /// Hit radius against projectiles
    pub fn hit_radius(&self) -> f32 {
        HIT_RADIUS_BASE + HIT_RADIUS_PER_SIZE * self.size
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Hits it may pass through
    pub pierce: u32,
    /// Wall reflections left
    pub bounce: u32,
    /// Retargets left
    pub chain: u32,
    /// Frames left to live
    pub ttl: u32,
    pub is_cluster: bool,
    /// Zombie this projectile last struck; it passes through that one
    pub last_hit: Option<u32>,
}

/// A cosmetic particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: u32,
    /// Frames left
    pub life: u32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Scatter,
    Rapid,
    Tech,
    Damage,
    Crit,
    Bounce,
}

/// A dropped power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec3,
    pub kind: PowerUpKind,
    pub color: u32,
}

/// A floating damage number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u32,
    pub pos: Vec3,
    pub content: String,
    pub color: u32,
    pub life: u32,
    pub max_life: u32,
    pub is_crit: bool,
}

/// Current weapon loadout
///
/// Only pickups and super rewards change it. Nothing decreases except
/// `delay`, which only decreases and never below `WEAPON_MIN_DELAY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Cannons fired per volley
    pub count: u32,
    /// Seconds between volleys
    pub delay: f32,
    pub tech_level: u8,
    pub damage: f32,
    /// Percent (0-100)
    pub crit_chance: f32,
    /// Extra damage on crit, percent of base
    pub crit_bonus: f32,
    pub max_bounce: u32,
    pub is_homing: bool,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            count: WEAPON_COUNT,
            delay: WEAPON_DELAY,
            tech_level: 0,
            damage: WEAPON_DAMAGE,
            crit_chance: WEAPON_CRIT_CHANCE,
            crit_bonus: WEAPON_CRIT_BONUS,
            max_bounce: WEAPON_BOUNCE,
            is_homing: false,
        }
    }
}

impl WeaponStats {
    pub fn reduce_delay(&mut self, factor: f32) {
        self.delay = (self.delay * factor).max(WEAPON_MIN_DELAY);
    }

    pub fn raise_tech(&mut self, by: u8) {
        self.tech_level = self.tech_level.saturating_add(by).min(MAX_TECH_LEVEL);
    }

    pub fn raise_crit_chance(&mut self, by: f32) {
        self.crit_chance = (self.crit_chance + by).min(MAX_CRIT_CHANCE);
    }

    /// Damage dealt on a crit
    pub fn crit_damage(&self) -> f32 {
        self.damage * (1.0 + self.crit_bonus / 100.0)
    }
}

/// The player turret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, 0.0, PLAYER_Z),
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Host-controlled pause (rules overlay, menus)
    pub paused: bool,
    /// Frames simulated while running
    pub frame: u64,
    /// Session clock in seconds (frozen while paused)
    pub clock: f32,
    pub last_shot: f32,
    /// Difficulty level; doubles as the wave number
    pub level: u32,
    pub score: u32,
    pub kills: u32,
    pub perfect_streak: u32,
    /// A zombie crossed the player line during the current wave interval
    pub breached: bool,
    /// Base zombie hp for the current wave (HUD)
    pub wave_base_hp: f32,
    /// Last wave that requested a super reward
    pub last_reward_wave: u32,
    /// Choices presented to the host, awaiting a selection
    pub pending_reward: Option<Vec<SuperUpgrade>>,
    pub player: Player,
    pub weapon: WeaponStats,
    pub zombies: Pool<Zombie>,
    pub projectiles: Pool<Projectile>,
    pub particles: Pool<Particle>,
    pub power_ups: Pool<PowerUp>,
    pub floating_texts: Pool<FloatingText>,
    pub input: InputArbiter,
    pub danger: DangerAssessor,
    events: Vec<GameEvent>,
    last_hud: Option<HudState>,
    pointer_lock_requested: bool,
    game_over_sent: bool,
    next_id: u32,
}

impl GameState {
    /// Create a new session with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let particle_cap = settings.max_particles();
        let text_cap = if settings.floating_texts {
            MAX_FLOATING_TEXTS
        } else {
            0
        };

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            phase: GamePhase::Ready,
            paused: false,
            frame: 0,
            clock: 0.0,
            last_shot: 0.0,
            level: 1,
            score: 0,
            kills: 0,
            perfect_streak: 0,
            breached: false,
            wave_base_hp: ZOMBIE_BASE_HP,
            last_reward_wave: 0,
            pending_reward: None,
            player: Player::default(),
            weapon: WeaponStats::default(),
            zombies: Pool::with_capacity(MAX_ZOMBIES),
            projectiles: Pool::with_capacity(MAX_PROJECTILES),
            particles: Pool::with_capacity(particle_cap),
            power_ups: Pool::with_capacity(MAX_POWERUPS),
            floating_texts: Pool::with_capacity(text_cap),
            input: InputArbiter::new(),
            danger: DangerAssessor::default(),
            events: Vec::new(),
            last_hud: None,
            pointer_lock_requested: false,
            game_over_sent: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID. IDs only need to be unique among live
    /// entities, so the counter wraps.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Begin play
    pub fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        log::info!("Session started with seed {}", self.seed);
        self.phase = GamePhase::Playing;
        self.score = self.level;
        self.notify(format!("WAVE {}", self.level), super::events::colors::WAVE);
        self.publish_hud();
        self.sync_pointer_lock();
    }

    /// Discard everything and start a fresh, reseeded session
    pub fn restart(&mut self, seed: u64) {
        log::info!("Session restarted with seed {}", seed);
        let mut input = std::mem::take(&mut self.input);
        input.release_all();
        let was_locked = self.pointer_lock_requested;
        let undrained = std::mem::take(&mut self.events);

        *self = Self::with_settings(seed, self.settings.clone());
        self.input = input;
        self.pointer_lock_requested = was_locked;
        self.events = undrained;
        self.start();
    }

    /// Host pause toggle. The tick is a no-op while paused.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("Paused: {}", paused);
        }
        self.paused = paused;
        self.sync_pointer_lock();
    }

    /// Whether the next tick will advance the simulation
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused && self.pending_reward.is_none()
    }

    /// Forward one input event to the arbiter
    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.handle(event, &self.settings.input);
    }

    /// On-screen move buttons
    pub fn set_virtual_move(&mut self, handle: VirtualMove, pressed: bool) {
        self.handle_input(InputEvent::Virtual { handle, pressed });
    }

    /// Host callback for a super-reward choice. Returns false if the id was
    /// not among the presented choices.
    pub fn select_super_reward(&mut self, id: &str) -> bool {
        let applied = super::progression::apply_super_reward(self, id);
        if applied {
            self.publish_hud();
            self.sync_pointer_lock();
        }
        applied
    }

    /// Take all events emitted since the last drain.
    ///
    /// The queue is unbounded; the host is expected to drain it once per
    /// frame. Undrained events survive `restart`.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, text: impl Into<String>, color: u32) {
        self.emit(GameEvent::notification(text, color));
    }

    /// Current HUD values
    pub fn hud(&self) -> HudState {
        HudState {
            score: self.score,
            wave: self.level,
            kills: self.kills,
            wave_base_hp: self.wave_base_hp.round() as u32,
            weapon: self.weapon.clone(),
        }
    }

    /// Emit `HudChanged` if anything visible changed
    pub fn publish_hud(&mut self) {
        let hud = self.hud();
        if self.last_hud.as_ref() != Some(&hud) {
            self.last_hud = Some(hud.clone());
            self.emit(GameEvent::HudChanged(hud));
        }
    }

    /// Request or release pointer lock when running state flips
    pub fn sync_pointer_lock(&mut self) {
        let want = self.is_running();
        if want != self.pointer_lock_requested {
            self.pointer_lock_requested = want;
            self.emit(GameEvent::PointerLock(want));
        }
    }

    /// Terminal transition; only the first call emits
    pub fn game_over(&mut self) {
        if self.game_over_sent {
            return;
        }
        self.game_over_sent = true;
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over at wave {} ({} kills, score {})",
            self.level,
            self.kills,
            self.score
        );
        let event = GameEvent::GameOver {
            score: self.score,
            wave: self.level,
            kills: self.kills,
        };
        self.emit(event);
        self.sync_pointer_lock();
    }
}
