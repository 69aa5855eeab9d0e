//! Absolute position providers
//!
//! A node's absolute position is derived from its local position and its
//! parent's absolute position. The scene decides *when* to recompute; a
//! provider decides *how*.

use crate::core::config::{PositioningMode, SceneConfig};
use crate::foundation::math::{saturating_add, CellSize, Point};

/// Computes a node's absolute position
pub trait AbsolutePositionProvider {
    /// Absolute position of a node at `local`, under a parent whose absolute
    /// position is `parent_absolute` (`None` for a root)
    fn absolute_position(&self, local: Point, parent_absolute: Option<Point>) -> Point;
}

/// Positions are cell offsets: absolute = local + parent absolute
///
/// Sums clamp at the `i32` range instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellPositioning;

impl AbsolutePositionProvider for CellPositioning {
    fn absolute_position(&self, local: Point, parent_absolute: Option<Point>) -> Point {
        saturating_add(local, parent_absolute.unwrap_or_else(Point::zeros))
    }
}

/// Positions are cells scaled to pixels: absolute = local * cell size + parent absolute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelPositioning {
    /// Font cell size
    pub cell_size: CellSize,
}

impl PixelPositioning {
    /// Create a provider for the given cell size
    pub const fn new(cell_size: CellSize) -> Self {
        Self { cell_size }
    }
}

impl AbsolutePositionProvider for PixelPositioning {
    fn absolute_position(&self, local: Point, parent_absolute: Option<Point>) -> Point {
        saturating_add(self.cell_size.to_pixels(local), parent_absolute.unwrap_or_else(Point::zeros))
    }
}

/// Provider matching `config.positioning`
pub fn provider_for(config: &SceneConfig) -> Box<dyn AbsolutePositionProvider> {
    match config.positioning {
        PositioningMode::Cells => Box::new(CellPositioning),
        PositioningMode::Pixels => Box::new(PixelPositioning::new(config.cell_size)),
    }
}
