//! Glyph cells
//!
//! A cell is one character position on a surface: a glyph drawn in a
//! foreground color over a background color, optionally mirrored, with any
//! number of decorator glyphs layered on top. A cell can stash a copy of its
//! appearance in a [`CellState`] and restore it later.
//!
//! [`serialized`] holds the plain records used to persist cells.

mod color;
pub mod serialized;

use serde::{Deserialize, Serialize};

pub use color::Color;
pub use serialized::{CellSerialized, CellStateSerialized};

/// Mirroring applied when a glyph is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mirror {
    /// Drawn as-is
    #[default]
    None,
    /// Flipped top to bottom
    Vertical,
    /// Flipped left to right
    Horizontal,
}

/// Extra glyph drawn on top of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellDecorator {
    /// Decorator color
    pub color: Color,
    /// Decorator glyph
    pub glyph: u32,
    /// Decorator mirroring
    pub mirror: Mirror,
}

impl CellDecorator {
    /// Create a decorator
    pub const fn new(color: Color, glyph: u32, mirror: Mirror) -> Self {
        Self { color, glyph, mirror }
    }
}

/// Snapshot of a cell's appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellState {
    /// Foreground color
    pub foreground: Color,
    /// Background color
    pub background: Color,
    /// Glyph index
    pub glyph: u32,
    /// Glyph mirroring
    pub mirror: Mirror,
    /// Visibility
    pub is_visible: bool,
    /// Decorators in draw order
    pub decorators: Vec<CellDecorator>,
}

/// One glyph position on a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    foreground: Color,
    background: Color,
    glyph: u32,
    mirror: Mirror,
    is_visible: bool,
    decorators: Vec<CellDecorator>,
    state: Option<CellState>,
    is_dirty: bool,
}

impl Cell {
    /// Create a visible, undecorated cell
    pub fn new(foreground: Color, background: Color, glyph: u32, mirror: Mirror) -> Self {
        Self {
            foreground,
            background,
            glyph,
            mirror,
            is_visible: true,
            decorators: Vec::new(),
            state: None,
            is_dirty: true,
        }
    }

    /// Foreground color
    pub fn foreground(&self) -> Color {
        self.foreground
    }

    /// Background color
    pub fn background(&self) -> Color {
        self.background
    }

    /// Glyph index
    pub fn glyph(&self) -> u32 {
        self.glyph
    }

    /// Glyph mirroring
    pub fn mirror(&self) -> Mirror {
        self.mirror
    }

    /// Whether the cell is drawn
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Decorators in draw order
    pub fn decorators(&self) -> &[CellDecorator] {
        &self.decorators
    }

    /// Saved appearance, if any
    pub fn state(&self) -> Option<&CellState> {
        self.state.as_ref()
    }

    /// Set when the appearance changed since the flag was last cleared
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Clear or force the dirty flag
    pub fn set_dirty(&mut self, dirty: bool) {
        self.is_dirty = dirty;
    }

    /// Set the foreground color
    pub fn set_foreground(&mut self, foreground: Color) {
        if self.foreground != foreground {
            self.foreground = foreground;
            self.is_dirty = true;
        }
    }

    /// Set the background color
    pub fn set_background(&mut self, background: Color) {
        if self.background != background {
            self.background = background;
            self.is_dirty = true;
        }
    }

    /// Set the glyph index
    pub fn set_glyph(&mut self, glyph: u32) {
        if self.glyph != glyph {
            self.glyph = glyph;
            self.is_dirty = true;
        }
    }

    /// Set the glyph mirroring
    pub fn set_mirror(&mut self, mirror: Mirror) {
        if self.mirror != mirror {
            self.mirror = mirror;
            self.is_dirty = true;
        }
    }

    /// Show or hide the cell
    pub fn set_visible(&mut self, visible: bool) {
        if self.is_visible != visible {
            self.is_visible = visible;
            self.is_dirty = true;
        }
    }

    /// Replace the decorators
    pub fn set_decorators(&mut self, decorators: Vec<CellDecorator>) {
        if self.decorators != decorators {
            self.decorators = decorators;
            self.is_dirty = true;
        }
    }

    /// Stash the current appearance, replacing any earlier snapshot
    pub fn save_state(&mut self) {
        self.state = Some(CellState {
            foreground: self.foreground,
            background: self.background,
            glyph: self.glyph,
            mirror: self.mirror,
            is_visible: self.is_visible,
            decorators: self.decorators.clone(),
        });
    }

    /// Restore and discard the saved appearance; returns `false` if none was saved
    pub fn restore_state(&mut self) -> bool {
        let Some(state) = self.state.take() else {
            return false;
        };
        self.foreground = state.foreground;
        self.background = state.background;
        self.glyph = state.glyph;
        self.mirror = state.mirror;
        self.is_visible = state.is_visible;
        self.decorators = state.decorators;
        self.is_dirty = true;
        true
    }

    /// Discard the saved appearance
    pub fn clear_state(&mut self) {
        self.state = None;
    }

    pub(crate) fn set_state(&mut self, state: Option<CellState>) {
        self.state = state;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Color::WHITE, Color::TRANSPARENT, 0, Mirror::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_mark_dirty_only_on_change() {
        let mut cell = Cell::default();
        cell.set_dirty(false);

        cell.set_glyph(0);
        assert!(!cell.is_dirty());

        cell.set_glyph(b'@'.into());
        assert!(cell.is_dirty());
        assert_eq!(cell.glyph(), 64);
    }

    #[test]
    fn test_save_and_restore_state() {
        let mut cell = Cell::new(Color::RED, Color::BLACK, 1, Mirror::Horizontal);
        cell.set_decorators(vec![CellDecorator::new(Color::BLUE, 95, Mirror::None)]);
        cell.save_state();

        cell.set_foreground(Color::GREEN);
        cell.set_decorators(Vec::new());
        cell.set_visible(false);

        assert!(cell.restore_state());
        assert_eq!(cell.foreground(), Color::RED);
        assert_eq!(cell.decorators().len(), 1);
        assert!(cell.is_visible());
        assert!(cell.state().is_none());
        assert!(!cell.restore_state());
    }

    #[test]
    fn test_clear_state() {
        let mut cell = Cell::default();
        cell.save_state();
        assert!(cell.state().is_some());

        cell.clear_state();
        assert!(cell.state().is_none());
    }
}
