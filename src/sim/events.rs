//! Outbound events for the presentation layer
//!
//! The simulation only emits. Queuing, display duration and eviction of
//! notifications belong to the host. Events accumulate on `GameState` and
//! are drained by the host once per frame.

use serde::{Deserialize, Serialize};

use super::progression::SuperUpgrade;
use super::snapshot::HudState;

/// Notification colors (0xRRGGBB)
pub mod colors {
    pub const WAVE: u32 = 0x22d3ee;
    pub const STREAK: u32 = 0x4ade80;
    pub const ELITE: u32 = 0xf43f5e;
    pub const STREAK_BROKEN: u32 = 0x9ca3af;
    pub const INSTALLED: u32 = 0x22d3ee;
}

/// Something the host should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Transient message (wave started, streak, pickup, ...)
    Notification { text: String, color: u32 },
    /// HUD values changed since the last published state
    HudChanged(HudState),
    /// Edge-triggered danger level (0, 0.3, 0.6 or 1.0)
    DangerChanged(f32),
    /// Present these upgrades; the session is suspended until one is chosen
    SuperRewardRequested(Vec<SuperUpgrade>),
    /// Acquire (true) or release (false) pointer lock
    PointerLock(bool),
    /// Run ended; fired exactly once per session
    GameOver { score: u32, wave: u32, kills: u32 },
}

impl GameEvent {
    pub fn notification(text: impl Into<String>, color: u32) -> Self {
        GameEvent::Notification {
            text: text.into(),
            color,
        }
    }
}
