//! Background component lifecycle.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use lumen_core::{DisplayMode, SurfaceSize, Viewport};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    buffer::Buffer,
    layout::{Rect, Size},
    widgets::Widget,
};

use crate::animations::Animation;
use crate::animations::network::Network;
use crate::animations::particles::ParticleStream;
use crate::canvas::PixelCanvas;
use crate::host::{HostEvents, ListenerId, PointerCell};
use crate::render_loop::RenderLoop;
use crate::surface::Surface;

/// Mesh background.
pub type NetworkBackground = Background<Network>;

/// Trailing particle background.
pub type ParticleStreamBackground = Background<ParticleStream>;

/// Construction options shared by every background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundOptions {
    pub viewport: Viewport,
    pub frame_rate: u32,
    /// Seed for entity placement and drift.
    pub seed: u64,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            frame_rate: 60,
            seed: 0,
        }
    }
}

/// State that only exists while mounted.
#[derive(Debug)]
struct Mounted<S> {
    store: S,
    canvas: PixelCanvas,
    size: SurfaceSize,
    rng: StdRng,
    pointer: PointerCell,
    pending_resize: Rc<Cell<Option<Size>>>,
    resize_listener: ListenerId,
    pointer_listener: ListenerId,
    render_loop: RenderLoop,
}

/// An animated background: an [`Animation`] plus everything needed to run it.
///
/// Unmounted until [`mount`](Self::mount) succeeds. While unmounted it
/// renders nothing.
#[derive(Debug)]
pub struct Background<A: Animation> {
    animation: A,
    mode: DisplayMode,
    options: BackgroundOptions,
    mounted: Option<Mounted<A::Store>>,
}

impl<A: Animation> Background<A> {
    pub fn new(animation: A, mode: DisplayMode, options: BackgroundOptions) -> Self {
        Self {
            animation,
            mode,
            options,
            mounted: None,
        }
    }

    /// Attach to a terminal area of `size` cells and start animating.
    ///
    /// Returns false and stays unmounted when there is no area to draw on.
    /// Mounting an already mounted background is a no-op.
    pub fn mount(&mut self, host: &mut HostEvents, size: Size, now_ms: u64) -> bool {
        if self.mounted.is_some() {
            return true;
        }
        let fill = self.animation.background(self.mode);
        let Some(canvas) = PixelCanvas::new(size.width, size.height, self.options.viewport, fill)
        else {
            tracing::debug!(?size, "no drawable area, background left unmounted");
            return false;
        };

        let surface_size = self.options.viewport.surface_size(size.width, size.height);
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let store = self.animation.init(surface_size, &mut rng);
        let pointer = PointerCell::new();
        let pending_resize = Rc::new(Cell::new(None));
        let (resize_listener, pointer_listener) =
            subscribe(host, self.options.viewport, &pointer, &pending_resize);
        let mut render_loop = RenderLoop::new(self.options.frame_rate);
        render_loop.start(now_ms);

        tracing::debug!(
            entities = self.animation.entity_count(&store),
            width = surface_size.width,
            height = surface_size.height,
            mode = self.mode.name(),
            resize_listeners = host.resize_listener_count(),
            pointer_listeners = host.pointer_listener_count(),
            "background mounted"
        );

        self.mounted = Some(Mounted {
            store,
            canvas,
            size: surface_size,
            rng,
            pointer,
            pending_resize,
            resize_listener,
            pointer_listener,
            render_loop,
        });
        true
    }

    /// Remove listeners, stop the render loop and drop all entities.
    pub fn teardown(&mut self, host: &mut HostEvents) {
        if let Some(mut m) = self.mounted.take() {
            host.remove(m.resize_listener);
            host.remove(m.pointer_listener);
            m.render_loop.stop();
            tracing::debug!("background torn down");
        }
    }

    /// Switch palettes.
    ///
    /// Listeners and the render loop are re-created, the entity store is
    /// kept as is. The raster is refilled with the new background color.
    pub fn set_mode(&mut self, host: &mut HostEvents, mode: DisplayMode, now_ms: u64) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        let fill = self.animation.background(mode);
        let viewport = self.options.viewport;
        if let Some(m) = self.mounted.as_mut() {
            host.remove(m.resize_listener);
            host.remove(m.pointer_listener);
            m.render_loop.stop();

            (m.resize_listener, m.pointer_listener) =
                subscribe(host, viewport, &m.pointer, &m.pending_resize);
            m.render_loop.start(now_ms);
            m.canvas.clear(fill);
            tracing::debug!(mode = mode.name(), "background mode changed");
        }
    }

    /// Run one frame if the render loop says one is due.
    ///
    /// Pending resizes are applied first. Returns whether a frame ran.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let fill = self.animation.background(self.mode);
        let viewport = self.options.viewport;
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };
        if !m.render_loop.poll(now_ms) {
            return false;
        }

        if let Some(size) = m.pending_resize.take()
            && size.width > 0
            && size.height > 0
        {
            m.canvas.resize(size.width, size.height, fill);
            m.size = viewport.surface_size(size.width, size.height);
            tracing::trace!(?size, "background resized");
        }

        let pointer = m.pointer.get();
        self.animation
            .update(&mut m.store, pointer, m.size, &mut m.rng);
        self.animation
            .draw(&m.store, pointer, self.mode, &mut m.canvas);
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn store(&self) -> Option<&A::Store> {
        self.mounted.as_ref().map(|m| &m.store)
    }

    /// Current surface size in world units.
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.mounted.as_ref().map(|m| m.size)
    }

    /// Last pointer position seen by the listener.
    pub fn pointer(&self) -> Option<Vec2> {
        self.mounted.as_ref().and_then(|m| m.pointer.get())
    }

    pub fn entity_count(&self) -> usize {
        self.store()
            .map(|s| self.animation.entity_count(s))
            .unwrap_or(0)
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.store()
            .map(|s| self.animation.positions(s))
            .unwrap_or_default()
    }

    /// Milliseconds until the next frame is due, `None` when not running.
    pub fn time_until_next_frame(&self, now_ms: u64) -> Option<u64> {
        self.mounted
            .as_ref()
            .and_then(|m| m.render_loop.time_until_next(now_ms))
    }
}

/// Register the resize and pointer listeners feeding a mounted background.
fn subscribe(
    host: &mut HostEvents,
    viewport: Viewport,
    pointer: &PointerCell,
    pending_resize: &Rc<Cell<Option<Size>>>,
) -> (ListenerId, ListenerId) {
    let resize = {
        let pending = pending_resize.clone();
        host.on_resize(move |size| pending.set(Some(size)))
    };
    let pointer = {
        let pointer = pointer.clone();
        host.on_pointer_move(move |pos| pointer.set(viewport.cell_center(pos.x, pos.y)))
    };
    (resize, pointer)
}

impl<A: Animation> Widget for &Background<A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(m) = &self.mounted {
            (&m.canvas).render(area, buf);
        }
    }
}
