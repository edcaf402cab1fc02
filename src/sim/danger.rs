//! Proximity-to-threat signal for the presentation layer

use serde::{Deserialize, Serialize};

use super::pool::Pool;
use super::state::Zombie;

/// Z-distance inside which a zombie is "in the danger zone"
pub const DANGER_ZONE: f32 = 8.0;

/// (distance below, level) steps, nearest first
const DANGER_STEPS: [(f32, f32); 3] = [(DANGER_ZONE, 1.0), (18.0, 0.6), (30.0, 0.3)];

/// Map a z-distance to a danger level
pub fn danger_for_distance(distance: f32) -> f32 {
    DANGER_STEPS
        .iter()
        .find(|(limit, _)| distance < *limit)
        .map(|&(_, level)| level)
        .unwrap_or(0.0)
}

/// Smallest |z| gap between the player and any live zombie
pub fn nearest_threat(player_z: f32, zombies: &Pool<Zombie>) -> Option<f32> {
    zombies
        .iter()
        .filter(|z| z.is_alive())
        .map(|z| (player_z - z.pos.z).abs())
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Edge-triggered danger level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DangerAssessor {
    last: f32,
}

impl DangerAssessor {
    /// Last emitted level
    pub fn level(&self) -> f32 {
        self.last
    }

    /// Returns the new level only when it differs from the last one emitted
    pub fn assess(&mut self, player_z: f32, zombies: &Pool<Zombie>) -> Option<f32> {
        let level = nearest_threat(player_z, zombies)
            .map(danger_for_distance)
            .unwrap_or(0.0);
        if level != self.last {
            self.last = level;
            Some(level)
        } else {
            None
        }
    }
}
