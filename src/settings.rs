//! Session settings and preferences
//!
//! Loaded by the host from JSON. Gameplay constants live in `consts`;
//! everything here only tunes input feel and cosmetic load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Live particle budget for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 200,
            QualityPreset::High => MAX_PARTICLES,
        }
    }
}

/// Input feel tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Touch offsets below this magnitude (normalized -1..1) are ignored
    pub touch_deadzone: f32,
    /// Touch offset multiplier; offset * sensitivity >= 1 moves at full speed
    pub touch_sensitivity: f32,
    /// Field units per pixel of pointer-locked mouse movement
    pub mouse_sensitivity: f32,
    /// Accumulated mouse deltas below this many pixels are dropped
    pub mouse_deadzone: f32,
    /// Smoothing factor for absolute (unlocked) mouse tracking
    pub mouse_lerp: f32,
    /// Seconds mouse events are ignored after a touch (synthesized clicks)
    pub ghost_click_delay: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            touch_deadzone: 0.1,
            touch_sensitivity: 2.0,
            mouse_sensitivity: 0.02,
            mouse_deadzone: 0.5,
            mouse_lerp: 0.15,
            ghost_click_delay: 0.5,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Cosmetic effects ===
    /// Hit/death particle bursts
    pub particles: bool,
    /// Floating damage numbers
    pub floating_texts: bool,

    // === Accessibility ===
    /// Reduced motion (no zombie wobble in snapshots)
    pub reduced_motion: bool,

    // === Input ===
    pub input: InputTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            floating_texts: true,
            reduced_motion: false,
            input: InputTuning::default(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap (never above the hard pool cap)
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles().min(MAX_PARTICLES)
        }
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
