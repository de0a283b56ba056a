//! Per-frame animations driven by [`Background`](crate::Background).

pub mod network;
pub mod particles;

use glam::Vec2;
use lumen_core::{DisplayMode, Rgb, SurfaceSize};
use rand::rngs::StdRng;

use crate::surface::Surface;

/// A physics step plus a draw step over an explicit entity store.
///
/// `update` and `draw` do not touch any state outside their arguments, so
/// both can be exercised without a terminal.
pub trait Animation {
    /// Entities owned by one mounted background.
    type Store: std::fmt::Debug;

    /// Create the entity set for a surface of `size`.
    fn init(&self, size: SurfaceSize, rng: &mut StdRng) -> Self::Store;

    /// Advance every entity by one frame.
    fn update(
        &self,
        store: &mut Self::Store,
        pointer: Option<Vec2>,
        size: SurfaceSize,
        rng: &mut StdRng,
    );

    /// Draw the current frame.
    fn draw(
        &self,
        store: &Self::Store,
        pointer: Option<Vec2>,
        mode: DisplayMode,
        surface: &mut dyn Surface,
    );

    /// Color the surface is filled with before the first frame.
    fn background(&self, mode: DisplayMode) -> Rgb;

    fn entity_count(&self, store: &Self::Store) -> usize;

    /// Positions of all entities, in store order.
    fn positions(&self, store: &Self::Store) -> Vec<Vec2>;
}

/// Uniform sample in `[-half, half)`.
pub(crate) fn signed(rng: &mut StdRng, half: f32) -> f32 {
    use rand::Rng;
    (rng.random::<f32>() - 0.5) * 2.0 * half
}

/// Uniform sample in `[min, max)`.
pub(crate) fn between(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    use rand::Rng;
    min + rng.random::<f32>() * (max - min)
}
