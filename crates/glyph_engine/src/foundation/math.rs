//! Math utilities and types
//!
//! Screen objects live on a character-cell grid, so every coordinate is an
//! integer pair. Positions are plain `nalgebra` vectors so they add and
//! compare without any wrapper code.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D integer coordinate (cells or pixels, depending on the positioning mode)
pub type Point = Vector2<i32>;

/// Per-axis `a + b`, clamped to the `i32` range
pub fn saturating_add(a: Point, b: Point) -> Point {
    Point::new(a.x.saturating_add(b.x), a.y.saturating_add(b.y))
}

/// Size of one glyph cell in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSize {
    /// Cell width in pixels
    pub width: i32,
    /// Cell height in pixels
    pub height: i32,
}

impl CellSize {
    /// Create a new cell size
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Convert a cell coordinate into a pixel coordinate, clamped to the `i32` range
    pub fn to_pixels(&self, cells: Point) -> Point {
        Point::new(
            cells.x.saturating_mul(self.width),
            cells.y.saturating_mul(self.height),
        )
    }

    /// Convert a pixel coordinate into the cell that contains it
    ///
    /// Uses floored division so negative pixels map to negative cells.
    pub fn to_cells(&self, pixels: Point) -> Point {
        Point::new(
            pixels.x.div_euclid(self.width.max(1)),
            pixels.y.div_euclid(self.height.max(1)),
        )
    }
}

impl Default for CellSize {
    fn default() -> Self {
        // IBM 8x16 is the classic console font
        Self::new(8, 16)
    }
}

/// Axis-aligned integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    /// Width in the same unit as `origin`
    pub width: i32,
    /// Height in the same unit as `origin`
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(origin: Point, width: i32, height: i32) -> Self {
        Self { origin, width, height }
    }

    /// Check if this rectangle contains a point (right and bottom edges exclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x.saturating_add(self.width)
            && point.y < self.origin.y.saturating_add(self.height)
    }

    /// The same rectangle moved by `offset`
    pub fn translated(&self, offset: Point) -> Self {
        Self::new(saturating_add(self.origin, offset), self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_math_clamps() {
        let far = Point::new(i32::MAX, i32::MIN);
        assert_eq!(saturating_add(far, Point::new(1, -1)), far);
        assert_eq!(
            CellSize::new(8, 16).to_pixels(Point::new(300_000_000, -300_000_000)),
            Point::new(i32::MAX, i32::MIN)
        );
    }

    #[test]
    fn test_cell_size_to_pixels() {
        let size = CellSize::new(8, 16);
        assert_eq!(size.to_pixels(Point::new(2, 3)), Point::new(16, 48));
        assert_eq!(size.to_pixels(Point::new(-1, 0)), Point::new(-8, 0));
    }

    #[test]
    fn test_cell_size_to_cells_floors() {
        let size = CellSize::new(8, 16);
        assert_eq!(size.to_cells(Point::new(15, 16)), Point::new(1, 1));
        assert_eq!(size.to_cells(Point::new(-1, -1)), Point::new(-1, -1));
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(Point::new(2, 2), 3, 1);
        assert!(rect.contains(Point::new(2, 2)));
        assert!(rect.contains(Point::new(4, 2)));
        assert!(!rect.contains(Point::new(5, 2)));
        assert!(!rect.contains(Point::new(2, 3)));
        assert!(rect.translated(Point::new(1, 1)).contains(Point::new(3, 3)));
    }
}
