//! Half-block pixel raster.
//!
//! Each terminal cell holds two vertically stacked pixels drawn with `▀`:
//! the foreground is the upper pixel, the background the lower one.

use glam::Vec2;
use lumen_core::{Rgb, Rgba, SurfaceSize, Viewport};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::surface::Surface;

/// Upper half block.
const HALF_BLOCK: char = '▀';

/// RGB raster implementing [`Surface`] with alpha blending.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    viewport: Viewport,
    columns: u16,
    rows: u16,
    pixels: Vec<Rgb>,
}

impl PixelCanvas {
    /// Create a raster covering `columns` x `rows` cells filled with `fill`.
    ///
    /// Returns `None` when the area is empty; there is nothing to draw on.
    pub fn new(columns: u16, rows: u16, viewport: Viewport, fill: Rgb) -> Option<Self> {
        if columns == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            viewport,
            columns,
            rows,
            pixels: vec![fill; columns as usize * rows as usize * 2],
        })
    }

    /// Reallocate the backing raster for a new cell area.
    ///
    /// An empty area is ignored and the previous raster kept.
    pub fn resize(&mut self, columns: u16, rows: u16, fill: Rgb) {
        if columns == 0 || rows == 0 || (columns == self.columns && rows == self.rows) {
            return;
        }
        self.columns = columns;
        self.rows = rows;
        self.pixels = vec![fill; columns as usize * rows as usize * 2];
    }

    /// Raster width in pixels.
    pub fn width_px(&self) -> usize {
        self.columns as usize
    }

    /// Raster height in pixels (two per cell row).
    pub fn height_px(&self) -> usize {
        self.rows as usize * 2
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width_px() || y >= self.height_px() {
            return None;
        }
        Some(self.pixels[y * self.width_px() + x])
    }

    /// Pixel containing the world point, or `None` when outside.
    fn pixel_at(&self, p: Vec2) -> Option<(usize, usize)> {
        let px = self.viewport.pixel_size();
        let x = (p.x / px.x).floor();
        let y = (p.y / px.y).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width_px() && y < self.height_px()).then_some((x, y))
    }

    fn pixel_center(&self, x: usize, y: usize) -> Vec2 {
        let px = self.viewport.pixel_size();
        Vec2::new((x as f32 + 0.5) * px.x, (y as f32 + 0.5) * px.y)
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let idx = y * self.width_px() + x;
        self.pixels[idx] = self.pixels[idx].lerp(color.rgb, color.a);
    }

    /// Pixel index bounds of a world-space box, clipped to the raster.
    fn pixel_bounds(&self, min: Vec2, max: Vec2) -> Option<(usize, usize, usize, usize)> {
        let px = self.viewport.pixel_size();
        let x0 = (min.x / px.x).floor().max(0.0);
        let y0 = (min.y / px.y).floor().max(0.0);
        let x1 = (max.x / px.x).floor().min(self.width_px() as f32 - 1.0);
        let y1 = (max.y / px.y).floor().min(self.height_px() as f32 - 1.0);
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    /// Shade every pixel whose center is within `radius` of `center`.
    /// Discs smaller than a pixel still shade the pixel they sit in.
    fn shade_disc(&mut self, center: Vec2, radius: f32, mut shade: impl FnMut(f32) -> Rgba) {
        let radius = radius.max(0.0);
        let mut covered = false;
        if let Some((x0, y0, x1, y1)) =
            self.pixel_bounds(center - Vec2::splat(radius), center + Vec2::splat(radius))
        {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let d = self.pixel_center(x, y).distance(center);
                    if d <= radius {
                        let t = if radius > 0.0 { d / radius } else { 0.0 };
                        self.blend(x, y, shade(t));
                        covered = true;
                    }
                }
            }
        }
        if !covered && let Some((x, y)) = self.pixel_at(center) {
            self.blend(x, y, shade(0.0));
        }
    }

    /// Plot a list of world points once per pixel.
    fn plot_points(&mut self, points: impl Iterator<Item = Vec2>, color: Rgba) {
        let mut hit: Vec<(usize, usize)> = points.filter_map(|p| self.pixel_at(p)).collect();
        hit.sort_unstable();
        hit.dedup();
        for (x, y) in hit {
            self.blend(x, y, color);
        }
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> SurfaceSize {
        self.viewport.surface_size(self.columns, self.rows)
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        for p in &mut self.pixels {
            *p = p.lerp(color, alpha);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.shade_disc(center, radius, |_| color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let px = self.viewport.pixel_size().min_element().max(f32::EPSILON);
        let steps = ((std::f32::consts::TAU * radius / px) * 2.0).ceil().max(8.0) as usize;
        let points = (0..steps).map(|i| {
            let angle = i as f32 / steps as f32 * std::f32::consts::TAU;
            center + Vec2::from_angle(angle) * radius
        });
        self.plot_points(points, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let px = self.viewport.pixel_size().min_element().max(f32::EPSILON);
        let steps = (from.distance(to) / px * 2.0).ceil().max(1.0) as usize;
        let points = (0..=steps).map(|i| from.lerp(to, i as f32 / steps as f32));
        self.plot_points(points, color);
    }

    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.shade_disc(center, radius, |t| inner.lerp(outer, t));
    }
}

impl Widget for &PixelCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.min(self.columns);
        let height = area.height.min(self.rows);
        for row in 0..height {
            for col in 0..width {
                let (x, y) = (col as usize, row as usize * 2);
                let (Some(top), Some(bottom)) = (self.pixel(x, y), self.pixel(x, y + 1)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(HALF_BLOCK)
                        .set_fg(top.into())
                        .set_bg(bottom.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    const BG: Rgb = Rgb::new(10, 10, 10);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn canvas(columns: u16, rows: u16) -> PixelCanvas {
        PixelCanvas::new(columns, rows, Viewport::default(), BG).expect("non-empty")
    }

    #[test]
    fn test_empty_area_has_no_canvas() {
        assert!(PixelCanvas::new(0, 10, Viewport::default(), BG).is_none());
        assert!(PixelCanvas::new(10, 0, Viewport::default(), BG).is_none());
    }

    #[test]
    fn test_size_in_world_units() {
        let c = canvas(10, 5);
        assert_eq!(c.size(), SurfaceSize::new(80.0, 80.0));
        assert_eq!(c.width_px(), 10);
        assert_eq!(c.height_px(), 10);
    }

    #[test]
    fn test_tiny_circle_still_lights_its_pixel() {
        let mut c = canvas(4, 4);
        c.fill_circle(Vec2::new(9.0, 9.0), 1.0, WHITE.with_alpha(1.0));
        assert_eq!(c.pixel(1, 1), Some(WHITE));
        assert_eq!(c.pixel(0, 0), Some(BG));
    }

    #[test]
    fn test_line_covers_endpoints() {
        let mut c = canvas(10, 5);
        c.line(Vec2::new(4.0, 4.0), Vec2::new(76.0, 4.0), WHITE.with_alpha(1.0));
        for x in 0..10 {
            assert_eq!(c.pixel(x, 0), Some(WHITE));
        }
        assert_eq!(c.pixel(0, 1), Some(BG));
    }

    #[test]
    fn test_line_blends_each_pixel_once() {
        let mut c = canvas(10, 5);
        c.line(Vec2::new(4.0, 4.0), Vec2::new(76.0, 4.0), WHITE.with_alpha(0.5));
        let once = BG.lerp(WHITE, 0.5);
        assert_eq!(c.pixel(3, 0), Some(once));
    }

    #[test]
    fn test_fade_moves_toward_color() {
        let mut c = canvas(2, 1);
        c.clear(WHITE);
        c.fade(Rgb::BLACK, 0.5);
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(128, 128, 128)));
    }

    #[test]
    fn test_offscreen_drawing_is_clipped() {
        let mut c = canvas(4, 4);
        c.fill_circle(Vec2::new(-50.0, -50.0), 10.0, WHITE.with_alpha(1.0));
        c.line(Vec2::new(-100.0, -100.0), Vec2::new(-10.0, -10.0), WHITE.with_alpha(1.0));
        c.radial_glow(Vec2::new(500.0, 500.0), 20.0, WHITE.with_alpha(1.0), Rgba::TRANSPARENT);
        assert!(c.pixels.iter().all(|p| *p == BG));
    }

    #[test]
    fn test_radial_glow_center_brightest() {
        let mut c = canvas(8, 4);
        c.radial_glow(Vec2::new(32.0, 32.0), 24.0, WHITE.with_alpha(1.0), Rgba::TRANSPARENT);
        let center = c.pixel(3, 3).expect("in range");
        let edge = c.pixel(1, 3).expect("in range");
        assert!(center.r > edge.r);
        assert_eq!(c.pixel(7, 0), Some(BG));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut c = canvas(4, 4);
        c.resize(6, 2, WHITE);
        assert_eq!(c.width_px(), 6);
        assert_eq!(c.height_px(), 4);
        assert_eq!(c.pixel(5, 3), Some(WHITE));
        c.resize(0, 2, BG);
        assert_eq!(c.width_px(), 6);
    }

    #[test]
    fn test_render_into_buffer() {
        let mut c = canvas(2, 1);
        c.clear(BG);
        c.fill_circle(Vec2::new(4.0, 4.0), 1.0, WHITE.with_alpha(1.0));

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&c).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
        assert_eq!(cell.bg, Color::Rgb(10, 10, 10));
        assert_eq!(buf[(1, 0)].fg, Color::Rgb(10, 10, 10));
    }
}
