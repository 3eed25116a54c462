//! Polled input state
//!
//! Window events write into a live state as they arrive. Once per frame the
//! game calls [`InputState::begin_frame`], which publishes what gameplay code
//! sees for the rest of that frame.

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

use pond_core::Vector2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// One flag per mouse button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MouseButtons {
    pub fn any(&self) -> bool {
        self.left || self.middle || self.right
    }

    pub fn get(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }

    fn slot(&mut self, button: MouseButton) -> &mut bool {
        match button {
            MouseButton::Left => &mut self.left,
            MouseButton::Middle => &mut self.middle,
            MouseButton::Right => &mut self.right,
        }
    }
}

/// Tracks keyboard and mouse input state per frame
pub struct InputState {
    /// Keys currently held down (live)
    keys_down: HashSet<KeyCode>,
    /// Presses recorded since the last `begin_frame`
    pending_presses: HashSet<KeyCode>,
    /// Keys that must be released before they can register another press
    press_blacklist: HashSet<KeyCode>,
    /// Presses visible during the current frame
    keys_pressed: HashSet<KeyCode>,

    mouse_pressed: MouseButtons,
    mouse_held: MouseButtons,

    /// Cursor position in window pixels as last reported by the window
    cursor_position: Vector2,
    /// Cursor position published for the current frame
    mouse_position: Vector2,

    /// Action map: action name -> list of key bindings
    action_map: HashMap<String, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            pending_presses: HashSet::new(),
            press_blacklist: HashSet::new(),
            keys_pressed: HashSet::new(),
            mouse_pressed: MouseButtons::default(),
            mouse_held: MouseButtons::default(),
            cursor_position: Vector2::ZERO,
            mouse_position: Vector2::ZERO,
            action_map: HashMap::new(),
        }
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Process a key press event. OS key repeat does not register new presses.
    pub fn process_key_down(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
        if self.press_blacklist.insert(key) {
            self.pending_presses.insert(key);
        }
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
        self.press_blacklist.remove(&key);
    }

    /// Process mouse button press
    pub fn process_mouse_button_down(&mut self, button: MouseButton) {
        *self.mouse_pressed.slot(button) = true;
    }

    /// Process mouse button release
    pub fn process_mouse_button_up(&mut self, button: MouseButton) {
        *self.mouse_pressed.slot(button) = false;
        *self.mouse_held.slot(button) = false;
    }

    /// Process cursor movement, in window pixels
    pub fn process_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor_position = Vector2::new(x as f32, y as f32);
    }

    /// Publish the live state for this frame. Call once at the start of each tick.
    ///
    /// A mouse press is reported as pressed for exactly one frame and as held
    /// from that frame until release.
    pub fn begin_frame(&mut self) {
        self.mouse_position = self.cursor_position;
        self.keys_pressed = std::mem::take(&mut self.pending_presses);

        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            let pressed = self.mouse_pressed.get(button);
            let held = self.mouse_held.get(button);
            if held && pressed {
                *self.mouse_pressed.slot(button) = false;
            } else if pressed && !held {
                *self.mouse_held.slot(button) = true;
            }
        }
    }

    // --- Query methods ---

    /// Is a key currently held down?
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was a key pressed since the previous frame? Holding a key reports one press.
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Buttons pressed this frame
    pub fn mouse_pressed(&self) -> MouseButtons {
        self.mouse_pressed
    }

    /// Buttons held this frame
    pub fn mouse_held(&self) -> MouseButtons {
        self.mouse_held
    }

    pub fn mouse_position(&self) -> Vector2 {
        self.mouse_position
    }

    /// Is an action currently held? (any bound key is down)
    pub fn is_action_held(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.is_held(*k)))
            .unwrap_or(false)
    }

    /// Was an action pressed this frame?
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.is_pressed(*k)))
            .unwrap_or(false)
    }

    /// Get all registered action names
    pub fn action_names(&self) -> Vec<String> {
        self.action_map.keys().cloned().collect()
    }
}
