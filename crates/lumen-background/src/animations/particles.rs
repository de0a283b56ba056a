//! Particle stream animation.
//!
//! Particles wander with a little random drift, wrap around the edges and
//! are pulled strongly toward the pointer. The previous frame is faded
//! rather than cleared, which together with per-particle trails leaves
//! streaks behind moving particles.

use std::collections::VecDeque;

use glam::Vec2;
use lumen_core::{DisplayMode, Rgb, SurfaceSize, hsl_to_rgb};
use rand::rngs::StdRng;

use super::{Animation, between, signed};
use crate::surface::Surface;

/// Tunables for the particle stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    /// Number of particles, fixed for the lifetime of a mount.
    pub particle_count: usize,
    pub pointer_radius: f32,
    pub attraction: f32,
    /// Per-axis random velocity change per frame, drawn from `±drift`.
    pub drift: f32,
    pub max_speed: f32,
    pub trail_length: usize,
    pub link_distance: f32,
    /// Opacity of the background wash applied each frame.
    pub fade_alpha: f32,
    pub initial_speed: f32,
    /// Hue band the particles live in, as start and width in degrees.
    pub hue_min: f32,
    pub hue_span: f32,
    /// Degrees added to the hue per frame while near the pointer.
    pub hue_shift: f32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            particle_count: 150,
            pointer_radius: 200.0,
            attraction: 0.5,
            drift: 0.05,
            max_speed: 3.0,
            trail_length: 15,
            link_distance: 100.0,
            fade_alpha: 0.1,
            initial_speed: 1.0,
            hue_min: 180.0,
            hue_span: 120.0,
            hue_shift: 2.0,
        }
    }
}

/// Fixed-capacity history of positions, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest once full.
    pub fn push(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// A single stream particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub opacity: f32,
    /// Hue in degrees.
    pub hue: f32,
    pub trail: Trail,
    /// Distance to the pointer as of the last update.
    pub pointer_distance: Option<f32>,
}

/// Entity store for [`ParticleStream`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStore {
    pub particles: Vec<Particle>,
}

/// Colors used by the stream for one display mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamPalette {
    pub background: Rgb,
    /// Saturation and lightness applied to each particle's hue.
    pub saturation: f32,
    pub lightness: f32,
    /// Glow ramp for particles near the pointer.
    pub near_inner: Rgb,
    pub near_outer: Rgb,
    pub link: Rgb,
    pub link_alpha: f32,
}

impl StreamPalette {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Dark => Self {
                background: Rgb::new(2, 6, 23),
                saturation: 0.8,
                lightness: 0.6,
                near_inner: Rgb::new(251, 191, 36),
                near_outer: Rgb::new(244, 63, 94),
                link: Rgb::new(148, 163, 184),
                link_alpha: 0.15,
            },
            DisplayMode::Light => Self {
                background: Rgb::new(248, 250, 252),
                saturation: 0.75,
                lightness: 0.42,
                near_inner: Rgb::new(217, 119, 6),
                near_outer: Rgb::new(225, 29, 72),
                link: Rgb::new(71, 85, 105),
                link_alpha: 0.2,
            },
        }
    }

    fn particle_color(&self, hue: f32) -> Rgb {
        hsl_to_rgb(hue, self.saturation, self.lightness)
    }
}

/// Particle stream animation.
#[derive(Debug, Clone, Default)]
pub struct ParticleStream {
    settings: StreamSettings,
}

impl ParticleStream {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    /// Advance one particle by one frame.
    pub fn step(
        &self,
        particle: &mut Particle,
        pointer: Option<Vec2>,
        size: SurfaceSize,
        rng: &mut StdRng,
    ) {
        let s = &self.settings;

        particle.pointer_distance = pointer.map(|p| particle.position.distance(p));
        if let (Some(p), Some(d)) = (pointer, particle.pointer_distance)
            && d < s.pointer_radius
        {
            if d > 0.0 {
                let force = (s.pointer_radius - d) / s.pointer_radius;
                particle.velocity += (p - particle.position) / d * force * s.attraction;
            }
            particle.hue =
                s.hue_min + (particle.hue - s.hue_min + s.hue_shift).rem_euclid(s.hue_span);
        }

        particle.velocity += Vec2::new(signed(rng, s.drift), signed(rng, s.drift));

        let speed = particle.velocity.length();
        if speed > s.max_speed {
            particle.velocity *= s.max_speed / speed;
        }

        particle.position += particle.velocity;
        particle.position.x = wrap(particle.position.x, size.width);
        particle.position.y = wrap(particle.position.y, size.height);

        particle.trail.push(particle.position);
    }
}

/// Wrap `v` into `[0, max]`.
fn wrap(v: f32, max: f32) -> f32 {
    if v < 0.0 || v > max {
        v.rem_euclid(max)
    } else {
        v
    }
}

impl Animation for ParticleStream {
    type Store = StreamStore;

    fn init(&self, size: SurfaceSize, rng: &mut StdRng) -> StreamStore {
        let s = &self.settings;
        let particles = (0..s.particle_count)
            .map(|_| Particle {
                position: Vec2::new(
                    between(rng, 0.0, size.width),
                    between(rng, 0.0, size.height),
                ),
                velocity: Vec2::new(signed(rng, s.initial_speed), signed(rng, s.initial_speed)),
                size: between(rng, 1.0, 3.0),
                opacity: between(rng, 0.5, 1.0),
                hue: between(rng, s.hue_min, s.hue_min + s.hue_span / 2.0),
                trail: Trail::new(s.trail_length),
                pointer_distance: None,
            })
            .collect();
        StreamStore { particles }
    }

    fn update(
        &self,
        store: &mut StreamStore,
        pointer: Option<Vec2>,
        size: SurfaceSize,
        rng: &mut StdRng,
    ) {
        for particle in &mut store.particles {
            self.step(particle, pointer, size, rng);
        }
    }

    fn draw(
        &self,
        store: &StreamStore,
        _pointer: Option<Vec2>,
        mode: DisplayMode,
        surface: &mut dyn Surface,
    ) {
        let s = &self.settings;
        let palette = StreamPalette::for_mode(mode);
        surface.fade(palette.background, s.fade_alpha);

        let particles = &store.particles;
        for (i, p) in particles.iter().enumerate() {
            let base = palette.particle_color(p.hue);

            let len = p.trail.len() as f32;
            for (k, point) in p.trail.iter().enumerate() {
                let recency = (k + 1) as f32 / len;
                surface.fill_circle(
                    *point,
                    p.size * recency,
                    base.with_alpha(p.opacity * recency * 0.5),
                );
            }

            let near = p.pointer_distance.is_some_and(|d| d < s.pointer_radius);
            let (inner, outer) = if near {
                (palette.near_inner, palette.near_outer)
            } else {
                (base, base)
            };
            surface.radial_glow(
                p.position,
                p.size * 4.0,
                inner.with_alpha(p.opacity),
                outer.with_alpha(0.0),
            );

            for q in &particles[i + 1..] {
                let d = p.position.distance(q.position);
                if d < s.link_distance {
                    let alpha = (1.0 - d / s.link_distance) * palette.link_alpha;
                    surface.line(p.position, q.position, palette.link.with_alpha(alpha));
                }
            }
        }
    }

    fn background(&self, mode: DisplayMode) -> Rgb {
        StreamPalette::for_mode(mode).background
    }

    fn entity_count(&self, store: &StreamStore) -> usize {
        store.particles.len()
    }

    fn positions(&self, store: &StreamStore) -> Vec<Vec2> {
        store.particles.iter().map(|p| p.position).collect()
    }
}
