//! Input arbitration
//!
//! Keyboard, mouse and touch are folded into a single "last active source".
//! Whichever source produced the most recent event drives movement for the
//! frame; sources never blend. On-screen virtual buttons count as keyboard.

use serde::{Deserialize, Serialize};

use crate::clamp_player_x;
use crate::consts::{FIELD_WIDTH, PLAYER_SPEED};
use crate::settings::InputTuning;

/// Source that produced the most recent input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputSource {
    #[default]
    Keyboard,
    Mouse,
    Touch,
}

/// Logical direction keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
}

impl Key {
    /// Map a DOM-style key code to a logical key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            _ => None,
        }
    }
}

/// Host-toggled on-screen control handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VirtualMove {
    MoveLeft,
    MoveRight,
}

/// Raw input events as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// `dx` is the relative movement in pixels; `pointer_x` the normalized
    /// absolute position (-1 left edge, 1 right edge)
    MouseMove { dx: f32, pointer_x: f32 },
    MouseDown,
    MouseUp,
    TouchStart { pointer_x: f32 },
    TouchMove { pointer_x: f32 },
    TouchEnd,
    Virtual { handle: VirtualMove, pressed: bool },
    /// Host reports whether pointer lock is currently held
    PointerLockChanged(bool),
}

/// Direction key state (physical keys and virtual handles kept apart so
/// releasing one does not cancel the other)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct DirectionKeys {
    left: bool,
    right: bool,
    virtual_left: bool,
    virtual_right: bool,
}

impl DirectionKeys {
    fn axis(&self) -> f32 {
        let left = self.left || self.virtual_left;
        let right = self.right || self.virtual_right;
        match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            // Both held: left then right applied, net zero
            _ => 0.0,
        }
    }
}

/// Folds raw input events into per-frame player displacement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputArbiter {
    keys: DirectionKeys,
    last_source: InputSource,
    pointer_down: bool,
    /// Normalized pointer x (-1..1), shared by mouse and touch
    pointer_x: f32,
    /// Accumulated relative mouse movement (pixels) since last resolve
    mouse_delta_x: f32,
    pointer_locked: bool,
    /// Arbiter clock (seconds); runs even while the simulation is paused
    now: f32,
    ignore_mouse_until: f32,
}

impl InputArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_source(&self) -> InputSource {
        self.last_source
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Advance the arbiter clock
    pub fn advance(&mut self, dt: f32) {
        self.now += dt;
    }

    /// Record one input event
    pub fn handle(&mut self, event: InputEvent, tuning: &InputTuning) {
        match event {
            InputEvent::KeyDown(key) => {
                self.set_key(key, true);
                self.last_source = InputSource::Keyboard;
            }
            InputEvent::KeyUp(key) => self.set_key(key, false),
            InputEvent::Virtual { handle, pressed } => {
                match handle {
                    VirtualMove::MoveLeft => {
                        self.keys.virtual_left = pressed;
                        if pressed {
                            self.keys.virtual_right = false;
                        }
                    }
                    VirtualMove::MoveRight => {
                        self.keys.virtual_right = pressed;
                        if pressed {
                            self.keys.virtual_left = false;
                        }
                    }
                }
                if pressed {
                    self.last_source = InputSource::Keyboard;
                }
            }
            InputEvent::TouchStart { pointer_x } => {
                self.pointer_down = true;
                self.pointer_x = pointer_x.clamp(-1.0, 1.0);
                self.touched(tuning);
            }
            InputEvent::TouchMove { pointer_x } => {
                self.pointer_x = pointer_x.clamp(-1.0, 1.0);
                self.touched(tuning);
            }
            InputEvent::TouchEnd => {
                self.pointer_down = false;
                self.ignore_mouse_until = self.now + tuning.ghost_click_delay;
            }
            InputEvent::MouseDown => {
                if self.mouse_suppressed() {
                    return;
                }
                self.pointer_down = true;
                self.last_source = InputSource::Mouse;
            }
            InputEvent::MouseUp => {
                if self.mouse_suppressed() {
                    return;
                }
                self.pointer_down = false;
            }
            InputEvent::MouseMove { dx, pointer_x } => {
                if self.mouse_suppressed() {
                    return;
                }
                self.last_source = InputSource::Mouse;
                self.pointer_x = pointer_x.clamp(-1.0, 1.0);
                self.mouse_delta_x += dx;
            }
            InputEvent::PointerLockChanged(locked) => {
                self.pointer_locked = locked;
                self.mouse_delta_x = 0.0;
            }
        }
    }

    /// Resolve this frame's player x from the governing source.
    /// Consumes any accumulated mouse delta.
    pub fn resolve(&mut self, player_x: f32, tuning: &InputTuning) -> f32 {
        let x = match self.last_source {
            InputSource::Keyboard => player_x + self.keys.axis() * PLAYER_SPEED,
            InputSource::Mouse => {
                if self.pointer_locked {
                    let dx = self.mouse_delta_x;
                    if dx.abs() > tuning.mouse_deadzone {
                        player_x + dx * tuning.mouse_sensitivity
                    } else {
                        player_x
                    }
                } else {
                    let target = self.pointer_x * (FIELD_WIDTH / 2.0);
                    player_x + (target - player_x) * tuning.mouse_lerp
                }
            }
            InputSource::Touch => {
                if self.pointer_down && self.pointer_x.abs() > tuning.touch_deadzone {
                    let speed_factor = (self.pointer_x.abs() * tuning.touch_sensitivity).min(1.0);
                    player_x + PLAYER_SPEED * speed_factor * self.pointer_x.signum()
                } else {
                    player_x
                }
            }
        };
        self.mouse_delta_x = 0.0;
        clamp_player_x(x)
    }

    /// Drop held keys and pointer state (e.g. on restart)
    pub fn release_all(&mut self) {
        self.keys = DirectionKeys::default();
        self.pointer_down = false;
        self.mouse_delta_x = 0.0;
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.keys.left = down,
            Key::Right => self.keys.right = down,
        }
    }

    fn touched(&mut self, tuning: &InputTuning) {
        self.last_source = InputSource::Touch;
        self.ignore_mouse_until = self.now + tuning.ghost_click_delay;
    }

    fn mouse_suppressed(&self) -> bool {
        self.now < self.ignore_mouse_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> InputTuning {
        InputTuning::default()
    }

    #[test]
    fn test_keyboard_steps_fixed_amount() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::KeyDown(Key::Right), &t);
        let x = input.resolve(0.0, &t);
        assert!((x - PLAYER_SPEED).abs() < 1e-6);

        input.handle(InputEvent::KeyUp(Key::Right), &t);
        assert_eq!(input.resolve(x, &t), x);
    }

    #[test]
    fn test_output_clamped_to_player_range() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::KeyDown(Key::Left), &t);
        let mut x = 0.0;
        for _ in 0..200 {
            x = input.resolve(x, &t);
        }
        assert!((x - -(FIELD_WIDTH / 2.0 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_latest_source_wins() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::KeyDown(Key::Right), &t);
        input.handle(InputEvent::TouchStart { pointer_x: -1.0 }, &t);
        assert_eq!(input.last_source(), InputSource::Touch);

        // Touch governs; the held right key is ignored
        let x = input.resolve(0.0, &t);
        assert!(x < 0.0);
    }

    #[test]
    fn test_touch_deadzone() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::TouchStart { pointer_x: 0.05 }, &t);
        assert_eq!(input.resolve(1.0, &t), 1.0);

        input.handle(InputEvent::TouchMove { pointer_x: 0.25 }, &t);
        let x = input.resolve(1.0, &t);
        assert!((x - (1.0 + PLAYER_SPEED * 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_touch_released_does_not_move() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::TouchStart { pointer_x: 0.9 }, &t);
        input.handle(InputEvent::TouchEnd, &t);
        assert_eq!(input.resolve(0.0, &t), 0.0);
    }

    #[test]
    fn test_ghost_mouse_after_touch_is_ignored() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::TouchStart { pointer_x: 0.0 }, &t);
        input.handle(InputEvent::MouseMove { dx: 50.0, pointer_x: 1.0 }, &t);
        assert_eq!(input.last_source(), InputSource::Touch);

        input.advance(t.ghost_click_delay + 0.01);
        input.handle(InputEvent::MouseMove { dx: 50.0, pointer_x: 1.0 }, &t);
        assert_eq!(input.last_source(), InputSource::Mouse);
    }

    #[test]
    fn test_pointer_locked_mouse_uses_relative_delta() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::PointerLockChanged(true), &t);
        input.handle(InputEvent::MouseMove { dx: 10.0, pointer_x: 0.0 }, &t);
        input.handle(InputEvent::MouseMove { dx: 15.0, pointer_x: 0.0 }, &t);
        let x = input.resolve(0.0, &t);
        assert!((x - 25.0 * t.mouse_sensitivity).abs() < 1e-5);

        // Delta is consumed
        assert_eq!(input.resolve(x, &t), x);

        // Sub-deadzone jitter is dropped
        input.handle(InputEvent::MouseMove { dx: 0.3, pointer_x: 0.0 }, &t);
        assert_eq!(input.resolve(x, &t), x);
    }

    #[test]
    fn test_unlocked_mouse_lerps_to_pointer() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::MouseMove { dx: 0.0, pointer_x: 0.5 }, &t);
        let x = input.resolve(0.0, &t);
        assert!((x - 5.0 * t.mouse_lerp).abs() < 1e-5);
    }

    #[test]
    fn test_virtual_handles_act_as_keyboard() {
        let t = tuning();
        let mut input = InputArbiter::new();
        input.handle(InputEvent::TouchStart { pointer_x: 0.0 }, &t);
        input.handle(
            InputEvent::Virtual {
                handle: VirtualMove::MoveLeft,
                pressed: true,
            },
            &t,
        );
        assert_eq!(input.last_source(), InputSource::Keyboard);
        assert!(input.resolve(0.0, &t) < 0.0);

        // Pressing right cancels left
        input.handle(
            InputEvent::Virtual {
                handle: VirtualMove::MoveRight,
                pressed: true,
            },
            &t,
        );
        assert!(input.resolve(0.0, &t) > 0.0);
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("KeyA"), Some(Key::Left));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_code("Space"), None);
    }
}
