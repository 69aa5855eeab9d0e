//! Plain records for persisting cells
//!
//! The records carry exactly the appearance fields of a cell and convert to
//! and from [`Cell`] / [`CellState`] without loss. The dirty flag is runtime
//! state and is not persisted; a cell built from a record starts dirty.

use serde::{Deserialize, Serialize};

use super::{Cell, CellDecorator, CellState, Color, Mirror};

/// Persisted form of a [`Cell`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSerialized {
    /// Decorators in draw order
    #[serde(default)]
    pub decorators: Vec<CellDecorator>,
    /// Foreground color
    pub foreground: Color,
    /// Background color
    pub background: Color,
    /// Glyph index
    pub glyph: u32,
    /// Glyph mirroring
    #[serde(default)]
    pub mirror: Mirror,
    /// Visibility
    pub is_visible: bool,
    /// Saved appearance, if any
    #[serde(default)]
    pub cell_state: Option<CellStateSerialized>,
}

/// Persisted form of a [`CellState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStateSerialized {
    /// Decorators in draw order
    #[serde(default)]
    pub decorators: Vec<CellDecorator>,
    /// Foreground color
    pub foreground: Color,
    /// Background color
    pub background: Color,
    /// Glyph index
    pub glyph: u32,
    /// Glyph mirroring
    #[serde(default)]
    pub mirror: Mirror,
    /// Visibility
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
}

const fn visible_by_default() -> bool {
    true
}

impl From<&Cell> for CellSerialized {
    fn from(cell: &Cell) -> Self {
        Self {
            decorators: cell.decorators().to_vec(),
            foreground: cell.foreground(),
            background: cell.background(),
            glyph: cell.glyph(),
            mirror: cell.mirror(),
            is_visible: cell.is_visible(),
            cell_state: cell.state().map(CellStateSerialized::from),
        }
    }
}

impl From<CellSerialized> for Cell {
    fn from(record: CellSerialized) -> Self {
        let mut cell = Cell::new(record.foreground, record.background, record.glyph, record.mirror);
        cell.set_visible(record.is_visible);
        cell.set_decorators(record.decorators);
        cell.set_state(record.cell_state.map(CellState::from));
        cell
    }
}

impl From<&CellState> for CellStateSerialized {
    fn from(state: &CellState) -> Self {
        Self {
            decorators: state.decorators.clone(),
            foreground: state.foreground,
            background: state.background,
            glyph: state.glyph,
            mirror: state.mirror,
            is_visible: state.is_visible,
        }
    }
}

impl From<CellStateSerialized> for CellState {
    fn from(record: CellStateSerialized) -> Self {
        Self {
            foreground: record.foreground,
            background: record.background,
            glyph: record.glyph,
            mirror: record.mirror,
            is_visible: record.is_visible,
            decorators: record.decorators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decorated_cell() -> Cell {
        let mut cell = Cell::new(Color::RED, Color::rgb(10, 20, 30), 219, Mirror::Vertical);
        cell.set_decorators(vec![
            CellDecorator::new(Color::WHITE, 95, Mirror::None),
            CellDecorator::new(Color::new(1, 2, 3, 4), 196, Mirror::Horizontal),
        ]);
        cell.save_state();
        cell.set_visible(false);
        cell
    }

    #[test]
    fn test_cell_survives_ron() {
        let cell = decorated_cell();

        let text = ron::to_string(&CellSerialized::from(&cell)).unwrap();
        let record: CellSerialized = ron::from_str(&text).unwrap();
        let restored = Cell::from(record);

        assert_eq!(restored.foreground(), cell.foreground());
        assert_eq!(restored.background(), cell.background());
        assert_eq!(restored.glyph(), cell.glyph());
        assert_eq!(restored.mirror(), cell.mirror());
        assert_eq!(restored.is_visible(), cell.is_visible());
        assert_eq!(restored.decorators(), cell.decorators());
        assert_eq!(restored.state(), cell.state());
    }

    #[test]
    fn test_empty_decorators_and_missing_state() {
        let cell = Cell::default();
        let record = CellSerialized::from(&cell);
        assert!(record.decorators.is_empty());
        assert!(record.cell_state.is_none());

        let restored = Cell::from(record);
        assert!(restored.decorators().is_empty());
        assert!(restored.state().is_none());
        assert!(restored.is_dirty());
    }

    #[test]
    fn test_state_record_defaults_to_visible() {
        let text = "(foreground: (r: 0, g: 0, b: 0, a: 255), background: (r: 0, g: 0, b: 0, a: 0), glyph: 7)";
        let record: CellStateSerialized = ron::from_str(text).unwrap();

        let state = CellState::from(record);
        assert!(state.is_visible);
        assert!(state.decorators.is_empty());
        assert_eq!(state.mirror, Mirror::None);
    }
}
