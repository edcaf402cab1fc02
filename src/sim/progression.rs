//! Kills, loot, pickups, waves and super rewards

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::danger::DANGER_ZONE;
use super::events::{GameEvent, colors};
use super::spawn::wave_base_hp;
use super::state::{GameState, PowerUp, PowerUpKind, WeaponStats, Zombie};
use crate::consts::*;
use crate::ground_distance;

/// Power-ups past this far behind the player are lost
const POWERUP_LOST_MARGIN: f32 = 2.0;

/// Loot weights (sum to 1)
const LOOT_TABLE: [(PowerUpKind, f32); 6] = [
    (PowerUpKind::Scatter, 0.25),
    (PowerUpKind::Rapid, 0.20),
    (PowerUpKind::Damage, 0.15),
    (PowerUpKind::Crit, 0.15),
    (PowerUpKind::Bounce, 0.15),
    (PowerUpKind::Tech, 0.10),
];

impl PowerUpKind {
    /// Weighted pick from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        let mut acc = 0.0;
        for (kind, weight) in LOOT_TABLE {
            acc += weight;
            if roll < acc {
                return kind;
            }
        }
        LOOT_TABLE[LOOT_TABLE.len() - 1].0
    }

    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Scatter => 0xfacc15,
            PowerUpKind::Rapid => 0x3b82f6,
            PowerUpKind::Tech => 0xef4444,
            PowerUpKind::Damage => 0xf97316,
            PowerUpKind::Crit => 0xfde047,
            PowerUpKind::Bounce => 0x22c55e,
        }
    }

    /// Pickup notification text
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Scatter => "+1 CANNON",
            PowerUpKind::Rapid => "FIRE RATE UP",
            PowerUpKind::Tech => "TECH UPGRADE",
            PowerUpKind::Damage => "+10 DAMAGE",
            PowerUpKind::Crit => "+10% CRIT",
            PowerUpKind::Bounce => "+1 BOUNCE",
        }
    }

    /// Apply this pickup's single stat change
    pub fn apply(self, weapon: &mut WeaponStats) {
        match self {
            PowerUpKind::Scatter => weapon.count += 1,
            PowerUpKind::Rapid => weapon.reduce_delay(0.9),
            PowerUpKind::Tech => weapon.raise_tech(1),
            PowerUpKind::Damage => weapon.damage += 10.0,
            PowerUpKind::Crit => weapon.raise_crit_chance(10.0),
            PowerUpKind::Bounce => weapon.max_bounce += 1,
        }
    }
}

/// Stat change granted by a super reward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    DamageMult(f32),
    CritBonus(f32),
    FireRate(f32),
    Homing,
}

impl UpgradeEffect {
    pub fn apply(self, weapon: &mut WeaponStats) {
        match self {
            UpgradeEffect::DamageMult(mult) => weapon.damage = (weapon.damage * mult).round(),
            UpgradeEffect::CritBonus(bonus) => weapon.crit_bonus += bonus,
            UpgradeEffect::FireRate(factor) => weapon.reduce_delay(factor),
            UpgradeEffect::Homing => weapon.is_homing = true,
        }
    }
}

/// Descriptor presented to the host when a super reward is offered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperUpgrade {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon reference for the host to resolve
    pub icon: String,
    pub effect: UpgradeEffect,
}

impl SuperUpgrade {
    fn new(id: &str, name: &str, description: &str, icon: &str, effect: UpgradeEffect) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            effect,
        }
    }
}

/// Every super reward that can be offered
pub fn super_upgrade_catalogue() -> Vec<SuperUpgrade> {
    vec![
        SuperUpgrade::new("dmg_50", "Overcharge", "+50% damage", "rocket", UpgradeEffect::DamageMult(1.5)),
        SuperUpgrade::new("dmg_100", "Annihilator", "+100% damage", "bolt", UpgradeEffect::DamageMult(2.0)),
        SuperUpgrade::new("crit_b_50", "Precision Optics", "+50% critical damage", "target", UpgradeEffect::CritBonus(50.0)),
        SuperUpgrade::new("crit_b_150", "Executioner", "+150% critical damage", "skull", UpgradeEffect::CritBonus(150.0)),
        SuperUpgrade::new("fire_50", "Overclock", "Fire delay halved", "fire", UpgradeEffect::FireRate(0.5)),
        SuperUpgrade::new("homing_shot", "Seeker Rounds", "Projectiles home in on nearby zombies", "crosshair", UpgradeEffect::Homing),
    ]
}

/// Bookkeeping for a dead zombie: kill count and loot
pub fn on_zombie_killed(state: &mut GameState, zombie: &Zombie) {
    state.kills += 1;
    log::debug!("Killed {:?} #{} ({} kills)", zombie.kind, zombie.id, state.kills);
    roll_loot(state, zombie);
}

/// Drop chance for a kill at `pos`
pub fn drop_chance(zombie: &Zombie, player_pos: Vec3) -> f32 {
    if (player_pos.z - zombie.pos.z).abs() < DANGER_ZONE {
        1.0
    } else {
        zombie.kind.profile().drop_chance
    }
}

fn roll_loot(state: &mut GameState, zombie: &Zombie) {
    if ground_distance(zombie.pos, state.player.pos) >= LOOT_RANGE {
        return;
    }
    let chance = drop_chance(zombie, state.player.pos);
    if state.rng.random::<f32>() >= chance || state.power_ups.is_full() {
        return;
    }
    let kind = PowerUpKind::from_roll(state.rng.random::<f32>());
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        pos: zombie.pos,
        kind,
        color: kind.color(),
    });
}

/// Apply a pickup to the weapon and tell the host
pub fn collect_power_up(state: &mut GameState, kind: PowerUpKind) {
    kind.apply(&mut state.weapon);
    log::debug!("Picked up {:?}: {:?}", kind, state.weapon);
    state.notify(kind.label(), kind.color());
}

/// Drift power-ups toward the player; collect or discard them
pub fn update_power_ups(state: &mut GameState) {
    let player = state.player.pos;
    for i in (0..state.power_ups.len()).rev() {
        let p = &mut state.power_ups[i];
        p.pos.z += POWERUP_DRIFT;

        let dist = ground_distance(p.pos, player);
        if dist < POWERUP_MAGNET_RADIUS {
            let target = Vec3::new(player.x, p.pos.y, player.z);
            p.pos = p.pos.lerp(target, POWERUP_MAGNET_LERP);
        }

        if dist < PICKUP_RADIUS {
            let kind = p.kind;
            state.power_ups.remove(i);
            collect_power_up(state, kind);
            continue;
        }

        if p.pos.z > player.z + POWERUP_LOST_MARGIN {
            state.power_ups.remove(i);
        }
    }
}

/// Close the current wave interval and start the next wave
pub fn advance_wave(state: &mut GameState) {
    if state.breached {
        if state.perfect_streak >= ELITE_STREAK {
            state.notify("STREAK BROKEN", colors::STREAK_BROKEN);
        }
        state.perfect_streak = 0;
    } else {
        state.perfect_streak += 1;
        let streak = state.perfect_streak;
        state.notify(format!("PERFECT WAVE x{}", streak), colors::STREAK);
        if streak == ELITE_STREAK {
            state.notify("ELITE CHALLENGE: zombies +50% HP", colors::ELITE);
        }
    }
    state.breached = false;

    state.level += 1;
    state.score = state.level;
    state.wave_base_hp = wave_base_hp(state.level);
    log::info!(
        "Wave {} (base hp {:.0}, streak {})",
        state.level,
        state.wave_base_hp,
        state.perfect_streak
    );
    state.notify(format!("WAVE {}", state.level), colors::WAVE);

    if state.level % SUPER_REWARD_EVERY == 0 && state.last_reward_wave != state.level {
        state.last_reward_wave = state.level;
        request_super_reward(state);
    }
}

/// Offer a random subset of the catalogue and suspend the session
pub fn request_super_reward(state: &mut GameState) {
    let mut choices: Vec<SuperUpgrade> = super_upgrade_catalogue()
        .into_iter()
        .filter(|u| !(u.effect == UpgradeEffect::Homing && state.weapon.is_homing))
        .collect();
    choices.shuffle(&mut state.rng);
    choices.truncate(SUPER_REWARD_CHOICES);

    log::info!(
        "Super reward at wave {}: {:?}",
        state.level,
        choices.iter().map(|c| c.id.as_str()).collect::<Vec<_>>()
    );
    state.pending_reward = Some(choices.clone());
    state.emit(GameEvent::SuperRewardRequested(choices));
    state.sync_pointer_lock();
}

/// Apply the host's choice. False if nothing is pending or the id was not offered.
pub fn apply_super_reward(state: &mut GameState, id: &str) -> bool {
    let Some(choices) = state.pending_reward.as_ref() else {
        log::warn!("Super reward '{}' chosen but none pending", id);
        return false;
    };
    let Some(upgrade) = choices.iter().find(|u| u.id == id).cloned() else {
        log::warn!("Super reward '{}' was not offered", id);
        return false;
    };

    upgrade.effect.apply(&mut state.weapon);
    state.pending_reward = None;
    log::info!("Installed {}", upgrade.name);
    state.notify(format!("INSTALLED: {}", upgrade.name), colors::INSTALLED);
    true
}
