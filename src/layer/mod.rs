//! Renderer components. Each layer owns its surface, caches, randomness and animation state.

use crate::foundation::core::{DisplaySize, Point};
use crate::schedule::FrameRenderer;
use crate::surface::{DeviceProfile, Surface};

pub(crate) mod background;
pub(crate) mod bar;

/// A noise layer that can be mounted into a viewport.
pub trait Layer: FrameRenderer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Target draw rate.
    fn fps(&self) -> f64;

    /// Final layer alpha applied when compositing.
    fn opacity(&self) -> f32;

    /// Recompute surface geometry after the viewport or the device pixel ratio changed.
    fn on_resize(&mut self, viewport: DisplaySize, device: DeviceProfile);

    /// The persistent drawing surface.
    fn surface(&self) -> &Surface;

    /// Top-left corner of the surface inside the viewport, logical px.
    fn placement(&self, viewport: DisplaySize) -> Point;
}
