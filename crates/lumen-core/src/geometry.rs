//! Surface sizes and terminal-to-world coordinate mapping.

use glam::Vec2;

/// Drawing surface extent in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// How many world units one terminal cell spans.
///
/// The raster has two pixels per cell vertically, so a pixel is
/// `cell_width` by `cell_height / 2` world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

impl Viewport {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// World size of a `columns` x `rows` terminal area.
    pub fn surface_size(&self, columns: u16, rows: u16) -> SurfaceSize {
        SurfaceSize::new(
            columns as f32 * self.cell_width,
            rows as f32 * self.cell_height,
        )
    }

    /// World position of the center of a terminal cell.
    pub fn cell_center(&self, column: u16, row: u16) -> Vec2 {
        Vec2::new(
            (column as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        )
    }

    /// Width and height of one raster pixel in world units.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.cell_width, self.cell_height / 2.0)
    }
}
