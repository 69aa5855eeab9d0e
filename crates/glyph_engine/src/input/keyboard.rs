//! Keyboard state
//!
//! Tracks which keys are held, and which went down or up during the current
//! frame. The host feeds raw key transitions in, components read the result
//! through [`Component::process_keyboard`](crate::components::Component::process_keyboard).

use std::collections::HashSet;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// 0 key on the main row
    Digit0,
    /// 1 key on the main row
    Digit1,
    /// 2 key on the main row
    Digit2,
    /// 3 key on the main row
    Digit3,
    /// 4 key on the main row
    Digit4,
    /// 5 key on the main row
    Digit5,
    /// 6 key on the main row
    Digit6,
    /// 7 key on the main row
    Digit7,
    /// 8 key on the main row
    Digit8,
    /// 9 key on the main row
    Digit9,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Keyboard state for one frame
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    down: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
}

impl Keyboard {
    /// Create a keyboard with no keys held
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.down.insert(key) {
                self.pressed_this_frame.insert(key);
            }
        } else if self.down.remove(&key) {
            self.released_this_frame.insert(key);
        }
    }

    /// Reset per-frame flags (call after input has been dispatched)
    pub fn reset_frame_flags(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }

    /// Key is currently held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    /// Key went down this frame
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    /// Key went up this frame
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.released_this_frame.contains(&key)
    }

    /// Any key changed state this frame
    pub fn has_activity(&self) -> bool {
        !self.pressed_this_frame.is_empty() || !self.released_this_frame.is_empty()
    }

    /// Keys currently held, in no particular order
    pub fn keys_down(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.down.iter().copied()
    }
}
