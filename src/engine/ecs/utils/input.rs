use log::trace;
use specs::{Component, HashMapStorage};
use winit::{
    event::{ElementState, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
};

// Heavily inspired by winit_input_helper
/// Per player input state. Only an active surface records events, the
/// ownership gate activates it on the locally controlled player only.
#[derive(Component, Clone, Debug)]
#[storage(HashMapStorage)]
pub struct InputSurface {
    active: bool,
    key_actions: Vec<ScanCodeAction>,
    mouse_actions: Vec<MouseAction>,
    keys_held: Vec<PhysicalKey>,
    mouse_buttons_held: Vec<MouseButton>,
    mouse_diff_: (f32, f32),
}

impl Default for InputSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSurface {
    pub fn new() -> Self {
        Self {
            active: true,
            key_actions: vec![],
            mouse_actions: vec![],
            keys_held: vec![],
            mouse_buttons_held: vec![],
            mouse_diff_: (0.0, 0.0),
        }
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivating drops everything currently held
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.key_actions.clear();
            self.mouse_actions.clear();
            self.keys_held.clear();
            self.mouse_buttons_held.clear();
            self.mouse_diff_ = (0.0, 0.0);
        }
        self.active = active;
    }

    // Utility functions

    pub fn key_held(&self, key: KeyCode) -> bool {
        let physical_key = PhysicalKey::Code(key);
        self.keys_held.contains(&physical_key)
    }

    pub fn key_pressed(&self, key: KeyCode) -> bool {
        let searched_action = ScanCodeAction::Pressed(PhysicalKey::Code(key));
        self.key_actions.contains(&searched_action)
    }

    pub fn key_released(&self, key: KeyCode) -> bool {
        let searched_action = ScanCodeAction::Released(PhysicalKey::Code(key));
        self.key_actions.contains(&searched_action)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        let searched_action = MouseAction::Pressed(button);
        self.mouse_actions.contains(&searched_action)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_buttons_held.contains(&button)
    }

    pub const fn mouse_diff(&self) -> (f32, f32) {
        self.mouse_diff_
    }

    // Update functions

    /// Clears the per frame actions, held keys and buttons stay.
    pub fn step(&mut self) {
        self.key_actions.clear();
        self.mouse_actions.clear();
        self.mouse_diff_ = (0.0, 0.0);
    }

    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        if !self.active {
            trace!("Inactive input surface ignored {:?} {:?}", key, state);
            return;
        }

        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.key_actions.push(ScanCodeAction::Pressed(key));
                    self.keys_held.push(key);
                }
            }
            ElementState::Released => {
                self.key_actions.push(ScanCodeAction::Released(key));
                self.keys_held.retain(|x| *x != key);
            }
        }
    }

    pub fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if !self.active {
            trace!("Inactive input surface ignored {:?} {:?}", button, state);
            return;
        }

        match state {
            ElementState::Pressed => {
                if !self.mouse_buttons_held.contains(&button) {
                    self.mouse_actions.push(MouseAction::Pressed(button));
                    self.mouse_buttons_held.push(button);
                }
            }
            ElementState::Released => {
                self.mouse_actions.push(MouseAction::Released(button));
                self.mouse_buttons_held.retain(|x| *x != button);
            }
        }
    }

    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.active {
            return;
        }

        // not sure if we can get multiple of these per frame
        self.mouse_diff_.0 += delta.0 as f32;
        self.mouse_diff_.1 += delta.1 as f32;
    }
}

#[derive(Clone, Debug, PartialEq)]
enum ScanCodeAction {
    Pressed(PhysicalKey),
    Released(PhysicalKey),
}

#[derive(Clone, Debug, PartialEq)]
enum MouseAction {
    Pressed(MouseButton),
    Released(MouseButton),
}
