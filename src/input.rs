use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// What the player asked for, independent of the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Quit,
    ToggleMap,
}

impl Intent {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        Some(match code {
            KeyCode::ArrowUp | KeyCode::KeyW => Intent::Forward,
            KeyCode::ArrowDown | KeyCode::KeyS => Intent::Backward,
            KeyCode::ArrowLeft | KeyCode::KeyA => Intent::TurnLeft,
            KeyCode::ArrowRight | KeyCode::KeyD => Intent::TurnRight,
            KeyCode::Escape => Intent::Quit,
            KeyCode::KeyM | KeyCode::Tab => Intent::ToggleMap,
            _ => return None,
        })
    }

    /// Held intents repeat every tick; the rest fire once per press.
    #[inline]
    pub fn repeats(self) -> bool {
        matches!(
            self,
            Intent::Forward | Intent::Backward | Intent::TurnLeft | Intent::TurnRight
        )
    }
}

/// Keys currently down plus one-shot presses not yet consumed by a tick.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Intent>,
    pressed: Vec<Intent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, intent: Intent) {
        // Key repeat from the OS arrives as repeated presses.
        if self.held.insert(intent) && !intent.repeats() {
            self.pressed.push(intent);
        }
    }

    pub fn release(&mut self, intent: Intent) {
        self.held.remove(&intent);
    }

    pub fn key_down(&mut self, code: KeyCode) {
        if let Some(intent) = Intent::from_key(code) {
            self.press(intent);
        }
    }

    pub fn key_up(&mut self, code: KeyCode) {
        if let Some(intent) = Intent::from_key(code) {
            self.release(intent);
        }
    }

    #[inline]
    pub fn is_held(&self, intent: Intent) -> bool {
        self.held.contains(&intent)
    }

    /// One-shot presses since the last call.
    pub fn take_pressed(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.pressed)
    }

    /// Drop everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}
