//! Resize and pointer listener registry.
//!
//! The terminal loop owns one [`HostEvents`] and forwards every resize and
//! mouse-move event to it. Backgrounds subscribe on mount and unsubscribe on
//! teardown.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use ratatui::layout::{Position, Size};

/// Handle returned by a subscription, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ResizeListener = Box<dyn FnMut(Size)>;
type PointerListener = Box<dyn FnMut(Position)>;

/// Registry of resize and pointer-move listeners.
#[derive(Default)]
pub struct HostEvents {
    next_id: u64,
    resize: Vec<(ListenerId, ResizeListener)>,
    pointer: Vec<(ListenerId, PointerListener)>,
}

impl std::fmt::Debug for HostEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEvents")
            .field("resize_listeners", &self.resize.len())
            .field("pointer_listeners", &self.pointer.len())
            .finish()
    }
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to terminal resizes. The listener receives the new size in cells.
    pub fn on_resize(&mut self, listener: impl FnMut(Size) + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.resize.push((id, Box::new(listener)));
        tracing::trace!(?id, "resize listener added");
        id
    }

    /// Subscribe to pointer movement. The listener receives the cell under the pointer.
    pub fn on_pointer_move(&mut self, listener: impl FnMut(Position) + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.pointer.push((id, Box::new(listener)));
        tracing::trace!(?id, "pointer listener added");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.resize.len() + self.pointer.len();
        self.resize.retain(|(lid, _)| *lid != id);
        self.pointer.retain(|(lid, _)| *lid != id);
        let removed = before != self.resize.len() + self.pointer.len();
        if removed {
            tracing::trace!(?id, "listener removed");
        }
        removed
    }

    pub fn dispatch_resize(&mut self, size: Size) {
        for (_, listener) in &mut self.resize {
            listener(size);
        }
    }

    /// Forward a pointer move to every subscriber. Nothing is consumed, so
    /// the caller still routes the event to the UI on top.
    pub fn dispatch_pointer_move(&mut self, position: Position) {
        for (_, listener) in &mut self.pointer {
            listener(position);
        }
    }

    pub fn resize_listener_count(&self) -> usize {
        self.resize.len()
    }

    pub fn pointer_listener_count(&self) -> usize {
        self.pointer.len()
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Shared pointer position in world units.
///
/// Written by the pointer listener, read by the update step. Empty until
/// the pointer first moves over the terminal.
#[derive(Debug, Clone, Default)]
pub struct PointerCell(Rc<Cell<Option<Vec2>>>);

impl PointerCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Vec2> {
        self.0.get()
    }

    pub fn set(&self, position: Vec2) {
        self.0.set(Some(position));
    }
}
