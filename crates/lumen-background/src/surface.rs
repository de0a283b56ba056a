//! Drawing surface abstraction.

use glam::Vec2;
use lumen_core::{Rgb, Rgba, SurfaceSize};

/// 2D drawing operations used by the animations, in world units.
pub trait Surface {
    /// Drawable extent.
    fn size(&self) -> SurfaceSize;

    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Rgb);

    /// Blend `color` over the whole surface at `alpha`, leaving a fading
    /// copy of the previous frame.
    fn fade(&mut self, color: Rgb, alpha: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Outline of a circle.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba);

    /// Filled disc whose color runs from `inner` at the center to `outer`
    /// at `radius`.
    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Fade {
        color: Rgb,
        alpha: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
    },
    RadialGlow {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    size: SurfaceSize,
    pub commands: Vec<DrawCommand>,
}

impl DrawLog {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// Filled circles drawn at exactly `center`.
    pub fn circles_at(&self, center: Vec2) -> impl Iterator<Item = &Rgba> {
        self.commands.iter().filter_map(move |cmd| match cmd {
            DrawCommand::FillCircle {
                center: c, color, ..
            } if *c == center => Some(color),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line { from, to, color } => Some((*from, *to, *color)),
            _ => None,
        })
    }
}

impl Surface for DrawLog {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Fade { color, alpha });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::RadialGlow {
            center,
            radius,
            inner,
            outer,
        });
    }
}
