//! Mapping between grid cells and world space.

use crate::geom::{Point, Vec2};

/// Default tile edge length in pixels.
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Placement of the tile grid in world space.
///
/// Cell `(0, 0)` has its top-left corner at `origin`; each cell spans
/// `cell_size` pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub origin: Vec2,
    pub cell_size: Vec2,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            cell_size: Vec2::new(DEFAULT_CELL_SIZE, DEFAULT_CELL_SIZE),
        }
    }
}

impl From<Vec2> for GridLayout {
    fn from(cell_size: Vec2) -> Self {
        Self::new(cell_size)
    }
}

impl GridLayout {
    /// A layout with the given cell size, anchored at the world origin.
    pub fn new(cell_size: Vec2) -> Self {
        Self {
            origin: Vec2::ZERO,
            cell_size,
        }
    }

    /// Same layout, shifted to `origin`.
    pub fn with_origin(self, origin: Vec2) -> Self {
        Self { origin, ..self }
    }

    /// World position of the top-left corner of `cell`.
    #[inline]
    pub fn cell_origin(&self, cell: Point) -> Vec2 {
        Vec2::new(
            self.origin.x + cell.x as f32 * self.cell_size.x,
            self.origin.y + cell.y as f32 * self.cell_size.y,
        )
    }

    /// World position of the center of `cell`.
    #[inline]
    pub fn cell_center(&self, cell: Point) -> Vec2 {
        self.cell_origin(cell) + self.cell_size * 0.5
    }

    /// The cell containing world position `pos`.
    ///
    /// Cells are half-open: a point on the shared edge of two cells belongs
    /// to the right/lower one.
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> Point {
        let local = pos - self.origin;
        Point::new(
            (local.x / self.cell_size.x).floor() as i32,
            (local.y / self.cell_size.y).floor() as i32,
        )
    }
}
