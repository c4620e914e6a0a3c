//! Polled input state for one frame.
//!
//! The window layer feeds raw events in (`key_down`, `mouse_moved`, ...) while
//! the event queue is drained; screens then poll the result once per frame.
//!
//! - `is_held(key)` is level-triggered: true every frame the key is down.
//! - `is_just_pressed(key)` / `is_just_released(key)` are edge-triggered and
//!   are cleared by `end_frame()`, which the main loop calls after the frame's
//!   update and draw have run.
//!
//! Pointer motion and wheel ticks accumulate over the frame the same way.

use std::collections::HashSet;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    Space,
    Escape,
    LShift,
    LCtrl,
    Delete,
    Backspace,
    F3,
}

impl Key {
    /// Keys that steer the player. Gameplay releases these on entry so a key
    /// still held from the menu does not leak into the level.
    pub const MOVEMENT: &'static [Key] = &[
        Key::Left,
        Key::Right,
        Key::Up,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::LShift,
        Key::LCtrl,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,
    mouse_just_released: HashSet<MouseBtn>,

    mouse_position: Vec2,
    mouse_delta: Vec2,
    wheel_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Force a key up without producing a release edge.
    pub fn release_key(&mut self, key: Key) {
        self.held.remove(&key);
        self.just_pressed.remove(&key);
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        if self.mouse_held.remove(&btn) {
            self.mouse_just_released.insert(btn);
        }
    }

    /// Record a new pointer position in window pixels (y down).
    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        self.mouse_delta += position - self.mouse_position;
        self.mouse_position = position;
    }

    /// Accumulate wheel ticks; positive is away from the user.
    pub fn wheel_scrolled(&mut self, ticks: f32) {
        self.wheel_delta += ticks;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    pub fn is_mouse_just_released(&self, btn: MouseBtn) -> bool {
        self.mouse_just_released.contains(&btn)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
        self.mouse_just_released.clear();
        self.mouse_delta = Vec2::ZERO;
        self.wheel_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn key_repeat_does_not_produce_second_edge() {
        let mut input = InputState::new();
        input.key_down(Key::W);
        input.end_frame();
        // OS key repeat delivers another press while the key is still held.
        input.key_down(Key::W);
        assert!(input.is_held(Key::W));
        assert!(!input.is_just_pressed(Key::W));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Space);
        assert!(!input.is_just_released(Key::Space));
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn release_key_drops_held_state_silently() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        input.release_key(Key::D);
        assert!(!input.is_held(Key::D));
        assert!(!input.is_just_pressed(Key::D));
        assert!(!input.is_just_released(Key::D));
    }

    #[test]
    fn end_frame_keeps_held_but_clears_edges() {
        let mut input = InputState::new();
        input.key_down(Key::LShift);
        input.mouse_down(MouseBtn::Left);
        input.end_frame();
        assert!(input.is_held(Key::LShift));
        assert!(!input.is_just_pressed(Key::LShift));
        assert!(input.is_mouse_held(MouseBtn::Left));
        assert!(!input.is_mouse_just_pressed(MouseBtn::Left));

        input.mouse_up(MouseBtn::Left);
        assert!(input.is_mouse_just_released(MouseBtn::Left));
        input.end_frame();
        assert!(!input.is_mouse_just_released(MouseBtn::Left));
    }

    #[test]
    fn mouse_delta_accumulates_until_end_of_frame() {
        let mut input = InputState::new();
        input.mouse_moved(10.0, 10.0);
        input.end_frame();
        input.mouse_moved(15.0, 8.0);
        input.mouse_moved(20.0, 4.0);
        assert_eq!(input.mouse_position(), Vec2::new(20.0, 4.0));
        assert_eq!(input.mouse_delta(), Vec2::new(10.0, -6.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(20.0, 4.0));
    }

    #[test]
    fn wheel_ticks_accumulate_per_frame() {
        let mut input = InputState::new();
        input.wheel_scrolled(1.0);
        input.wheel_scrolled(2.0);
        assert!((input.wheel_delta() - 3.0).abs() < f32::EPSILON);
        input.end_frame();
        assert_eq!(input.wheel_delta(), 0.0);
    }

    #[test]
    fn movement_keys_cover_player_controls() {
        for key in [Key::A, Key::D, Key::W, Key::Space] {
            assert!(Key::MOVEMENT.contains(&key));
        }
        assert!(!Key::MOVEMENT.contains(&Key::Escape));
    }
}
