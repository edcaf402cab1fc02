//! Read-only exports for the rendering and HUD layers
//!
//! Instance data is plain `Pod` so the host can upload it straight into its
//! own GPU buffers. Snapshot buffers are reused frame to frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{GameState, WeaponStats, ZombieKind};
use crate::consts::*;

/// HUD values pushed to the host whenever they change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    pub score: u32,
    pub wave: u32,
    pub kills: u32,
    /// Base hp of a walker spawned this wave
    pub wave_base_hp: u32,
    pub weapon: WeaponStats,
}

/// One instanced transform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct InstanceData {
    pub position: [f32; 3],
    /// Euler angles (radians)
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    /// 0xRRGGBB
    pub color: u32,
}

impl InstanceData {
    pub fn new(position: Vec3, rotation: Vec3, scale: f32, color: u32) -> Self {
        Self {
            position: position.to_array(),
            rotation: rotation.to_array(),
            scale: [scale; 3],
            color,
        }
    }
}

/// A floating damage number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInstance {
    pub position: [f32; 3],
    pub content: String,
    pub color: u32,
    /// Fades from 1 to 0 over the text's life
    pub alpha: f32,
    pub is_crit: bool,
}

/// Per-category render ceilings
pub const RENDER_CAP_PER_ZOMBIE_KIND: usize = MAX_ZOMBIES;
pub const RENDER_CAP_PROJECTILES: usize = MAX_PROJECTILES;
pub const RENDER_CAP_PARTICLES: usize = MAX_PARTICLES;
pub const RENDER_CAP_POWERUPS: usize = MAX_POWERUPS;
pub const RENDER_CAP_TEXTS: usize = MAX_FLOATING_TEXTS;

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub player: [f32; 3],
    pub walkers: Vec<InstanceData>,
    pub runners: Vec<InstanceData>,
    pub tanks: Vec<InstanceData>,
    pub bosses: Vec<InstanceData>,
    pub projectiles: Vec<InstanceData>,
    pub particles: Vec<InstanceData>,
    pub power_ups: Vec<InstanceData>,
    pub texts: Vec<TextInstance>,
}

impl RenderSnapshot {
    /// Pre-size every buffer to its ceiling
    pub fn with_capacity() -> Self {
        Self {
            frame: 0,
            player: [0.0; 3],
            walkers: Vec::with_capacity(RENDER_CAP_PER_ZOMBIE_KIND),
            runners: Vec::with_capacity(RENDER_CAP_PER_ZOMBIE_KIND),
            tanks: Vec::with_capacity(RENDER_CAP_PER_ZOMBIE_KIND),
            bosses: Vec::with_capacity(RENDER_CAP_PER_ZOMBIE_KIND),
            projectiles: Vec::with_capacity(RENDER_CAP_PROJECTILES),
            particles: Vec::with_capacity(RENDER_CAP_PARTICLES),
            power_ups: Vec::with_capacity(RENDER_CAP_POWERUPS),
            texts: Vec::with_capacity(RENDER_CAP_TEXTS),
        }
    }

    fn clear(&mut self) {
        self.walkers.clear();
        self.runners.clear();
        self.tanks.clear();
        self.bosses.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.power_ups.clear();
        self.texts.clear();
    }

    /// Zombie instances of one kind
    pub fn zombies(&self, kind: ZombieKind) -> &[InstanceData] {
        match kind {
            ZombieKind::Walker => &self.walkers,
            ZombieKind::Runner => &self.runners,
            ZombieKind::Tank => &self.tanks,
            ZombieKind::Boss => &self.bosses,
        }
    }

    fn zombies_mut(&mut self, kind: ZombieKind) -> &mut Vec<InstanceData> {
        match kind {
            ZombieKind::Walker => &mut self.walkers,
            ZombieKind::Runner => &mut self.runners,
            ZombieKind::Tank => &mut self.tanks,
            ZombieKind::Boss => &mut self.bosses,
        }
    }
}

fn push_capped<T>(buf: &mut Vec<T>, cap: usize, item: T) {
    if buf.len() < cap {
        buf.push(item);
    }
}

impl GameState {
    /// Fill `out` with this frame's transforms
    pub fn write_snapshot(&self, out: &mut RenderSnapshot) {
        out.clear();
        out.frame = self.frame;
        out.player = self.player.pos.to_array();

        let t = self.frame as f32;
        let wobble = !self.settings.reduced_motion;

        for z in &self.zombies {
            let roll = if wobble {
                (t * 0.2 + z.id as f32 * 10.0).sin() * 0.1
            } else {
                0.0
            };
            let inst = InstanceData::new(z.pos, Vec3::new(0.0, 0.0, roll), z.size, z.color(self.clock));
            push_capped(out.zombies_mut(z.kind), RENDER_CAP_PER_ZOMBIE_KIND, inst);
        }

        for p in &self.projectiles {
            let inst = InstanceData::new(p.pos, Vec3::ZERO, 1.0, 0x60a5fa);
            push_capped(&mut out.projectiles, RENDER_CAP_PROJECTILES, inst);
        }

        for p in &self.particles {
            let inst = InstanceData::new(p.pos, Vec3::ZERO, p.life as f32 / 20.0, p.color);
            push_capped(&mut out.particles, RENDER_CAP_PARTICLES, inst);
        }

        let spin = Vec3::new(t * 0.02, t * 0.05, 0.0);
        for p in &self.power_ups {
            let inst = InstanceData::new(p.pos, spin, 1.0, p.color);
            push_capped(&mut out.power_ups, RENDER_CAP_POWERUPS, inst);
        }

        for text in &self.floating_texts {
            let inst = TextInstance {
                position: text.pos.to_array(),
                content: text.content.clone(),
                color: text.color,
                alpha: text.life as f32 / text.max_life.max(1) as f32,
                is_crit: text.is_crit,
            };
            push_capped(&mut out.texts, RENDER_CAP_TEXTS, inst);
        }
    }

    /// Allocate and fill a fresh snapshot
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut out = RenderSnapshot::with_capacity();
        self.write_snapshot(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::make_zombie;

    #[test]
    fn test_snapshot_groups_zombies_by_kind() {
        let mut state = GameState::new(1);
        for (i, kind) in ZombieKind::ALL.into_iter().enumerate() {
            state.zombies.push(make_zombie(i as u32 + 1, kind, 0.0, 1, 0));
        }
        state.zombies.push(make_zombie(9, ZombieKind::Walker, 1.0, 1, 0));

        let snap = state.snapshot();
        assert_eq!(snap.zombies(ZombieKind::Walker).len(), 2);
        assert_eq!(snap.zombies(ZombieKind::Boss).len(), 1);
        assert_eq!(snap.bosses[0].scale, [2.5; 3]);
        assert_eq!(snap.tanks[0].color, ZombieKind::Tank.profile().color);
    }

    #[test]
    fn test_snapshot_buffers_are_reused() {
        let mut state = GameState::new(1);
        state.zombies.push(make_zombie(1, ZombieKind::Runner, 0.0, 1, 0));
        let mut snap = RenderSnapshot::with_capacity();
        state.write_snapshot(&mut snap);
        let cap = snap.runners.capacity();
        state.zombies.clear();
        state.write_snapshot(&mut snap);
        assert!(snap.runners.is_empty());
        assert_eq!(snap.runners.capacity(), cap);
    }

    #[test]
    fn test_reduced_motion_drops_wobble() {
        let mut state = GameState::new(1);
        state.settings.reduced_motion = true;
        state.frame = 17;
        state.zombies.push(make_zombie(3, ZombieKind::Walker, 0.0, 1, 0));
        let snap = state.snapshot();
        assert_eq!(snap.walkers[0].rotation, [0.0; 3]);
    }

    #[test]
    fn test_instance_data_is_plain_bytes() {
        let data = [InstanceData::new(Vec3::ONE, Vec3::ZERO, 1.0, 0xffffff); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<InstanceData>());
        assert_eq!(std::mem::size_of::<InstanceData>(), 40);
    }

    #[test]
    fn test_hud_reflects_state() {
        let mut state = GameState::new(1);
        state.kills = 3;
        state.weapon.count = 4;
        let hud = state.hud();
        assert_eq!(hud.kills, 3);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.wave_base_hp, 100);
        assert_eq!(hud.weapon.count, 4);
    }
}
