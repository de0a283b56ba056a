//! Animated backgrounds for the lumen front-end.
//!
//! Two animations are provided: a network mesh of drifting nodes joined by
//! proximity lines, and a particle stream with fading trails and glow.
//! Both run inside [`Background`], which owns the entity store, the raster
//! it draws into, its pointer and resize listeners, and a [`RenderLoop`].

mod animations;
mod canvas;
mod component;
mod host;
mod render_loop;
mod state;
mod surface;

pub use animations::Animation;
pub use animations::network::{Network, NetworkPalette, NetworkSettings, NetworkStore, Node};
pub use animations::particles::{
    Particle, ParticleStream, StreamPalette, StreamSettings, StreamStore, Trail,
};
pub use canvas::PixelCanvas;
pub use component::{Background, BackgroundOptions, NetworkBackground, ParticleStreamBackground};
pub use host::{HostEvents, ListenerId, PointerCell};
pub use render_loop::RenderLoop;
pub use state::{BackgroundSettings, BackgroundState};
pub use surface::{DrawCommand, DrawLog, Surface};
