//! Core types shared by the lumen crates.

mod background;
mod clock;
mod color;
mod geometry;
mod mode;

pub use background::BackgroundKind;
pub use clock::{Clock, ManualClock, SystemClock};
pub use color::{Rgb, Rgba, hsl_to_rgb};
pub use geometry::{SurfaceSize, Viewport};
pub use mode::DisplayMode;
