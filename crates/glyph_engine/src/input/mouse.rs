//! Mouse state and hit testing
//!
//! Handles mouse state separate from dispatch: the scene decides which
//! object sees the mouse, components decide what a click means.

use crate::foundation::math::{Point, Rect};

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

/// Mouse state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseState {
    /// Cursor position in the same unit as node absolute positions
    pub position: Point,
    /// Accumulated wheel movement this frame (positive = away from the user)
    pub scroll_delta: i32,
    down: [bool; 3],
    pressed_this_frame: [bool; 3],
    released_this_frame: [bool; 3],
}

impl MouseState {
    /// Create a new mouse state at the origin
    pub fn new() -> Self {
        Self {
            position: Point::zeros(),
            scroll_delta: 0,
            down: [false; 3],
            pressed_this_frame: [false; 3],
            released_this_frame: [false; 3],
        }
    }

    /// Update mouse position
    pub fn update_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Update mouse button state
    pub fn update_button(&mut self, button: MouseButton, pressed: bool) {
        let i = button.index();
        let was_down = self.down[i];
        self.down[i] = pressed;

        // Detect press/release this frame
        if !was_down && pressed {
            self.pressed_this_frame[i] = true;
        }
        if was_down && !pressed {
            self.released_this_frame[i] = true;
        }
    }

    /// Accumulate wheel movement
    pub fn scroll(&mut self, delta: i32) {
        self.scroll_delta += delta;
    }

    /// Reset per-frame input flags (call after the frame has been dispatched)
    pub fn reset_frame_flags(&mut self) {
        self.pressed_this_frame = [false; 3];
        self.released_this_frame = [false; 3];
        self.scroll_delta = 0;
    }

    /// Button is currently held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.down[button.index()]
    }

    /// Button went down this frame
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_this_frame[button.index()]
    }

    /// Button went up this frame, which is what counts as a click
    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.released_this_frame[button.index()]
    }

    /// Check if the cursor is inside `area`
    pub fn is_over(&self, area: &Rect) -> bool {
        area.contains(self.position)
    }

    /// Cursor position relative to `origin`, usually a node's absolute position
    pub fn relative_to(&self, origin: Point) -> Point {
        Point::new(
            self.position.x.saturating_sub(origin.x),
            self.position.y.saturating_sub(origin.y),
        )
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_is_release_after_press() {
        let mut mouse = MouseState::new();
        mouse.update_button(MouseButton::Left, true);
        assert!(mouse.is_button_pressed(MouseButton::Left));
        mouse.reset_frame_flags();

        mouse.update_button(MouseButton::Left, false);
        assert!(mouse.is_button_released(MouseButton::Left));
        assert!(!mouse.is_button_down(MouseButton::Left));
        assert!(!mouse.is_button_released(MouseButton::Right));
    }

    #[test]
    fn test_hit_test_and_relative_position() {
        let mut mouse = MouseState::new();
        mouse.update_position(Point::new(12, 5));

        let area = Rect::new(Point::new(10, 5), 4, 1);
        assert!(mouse.is_over(&area));
        assert_eq!(mouse.relative_to(area.origin), Point::new(2, 0));

        mouse.update_position(Point::new(14, 5));
        assert!(!mouse.is_over(&area));
    }

    #[test]
    fn test_scroll_resets_each_frame() {
        let mut mouse = MouseState::new();
        mouse.scroll(1);
        mouse.scroll(2);
        assert_eq!(mouse.scroll_delta, 3);
        mouse.reset_frame_flags();
        assert_eq!(mouse.scroll_delta, 0);
    }
}
