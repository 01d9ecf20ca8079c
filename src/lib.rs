//! Procedural "static" overlays rendered on CPU pixel surfaces.
//!
//! Two layers share one viewport:
//!
//! - [`NoiseBackground`]: ambient random noise, downsampled and upscaled without smoothing, faded
//!   by a radial mask that is cached until the surface is reallocated.
//! - [`NoiseBar`]: a soft-edged band of full-resolution noise that waits, crosses the viewport
//!   with eased motion, and disappears again.
//!
//! # Frame pipeline
//!
//! 1. **Schedule**: the host fires a [`FrameScheduler`] callback; [`AnimationLoop`] throttles it
//!    to the layer's fps and always requests the next one.
//! 2. **Generate**: a fresh [`NoiseField`] is drawn from a [`UniformSource`] every drawn frame.
//! 3. **Mask**: gradient masks are intersected with destination-in compositing, after which the
//!    surface returns to source-over.
//! 4. **Compose**: [`OverlayStack::compose`] screens each layer over a backdrop with its opacity,
//!    beneath any foreground content.
//!
//! Drawing never fails loudly: zero-sized containers clamp to 1×1 surfaces and internal errors
//! are logged with `tracing` and skipped.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod bar;
mod config;
mod effects;
mod foundation;
mod host;
mod layer;
mod mask;
mod noise;
mod schedule;
mod surface;

pub use animation::ease::Ease;
pub use bar::{ActiveBar, BarFrame, BarMachine, BarParams, BarPhase, TravelDirection};
pub use config::{BackgroundConfig, BarConfig, OverlayConfig};
pub use effects::composite::{
    PremulRgba8, blend_region, destination_in, over, resample_nearest, screen,
};
pub use foundation::core::{Affine, DisplaySize, PixelSize, Point, Rect};
pub use foundation::error::{OverlayError, OverlayResult};
pub use foundation::random::{ConstantSource, UniformSource, entropy_source};
pub use host::frame::FrameRGBA;
pub use host::mount::MountedLayer;
pub use host::stack::OverlayStack;
pub use host::viewport::{FALLBACK_VIEWPORT, HostViewport, ListenerId, SimulatedViewport};
pub use layer::Layer;
pub use layer::background::NoiseBackground;
pub use layer::bar::NoiseBar;
pub use mask::{
    AlphaMask, Axis, BAR_HORIZONTAL_STOPS, BAR_VERTICAL_STOPS, GradientStop, MaskCache,
    RADIAL_STOPS, RadialGradient, apply_bar_mask, apply_linear_band, apply_mask, linear_mask,
    radial_mask, sample_stops,
};
pub use noise::{
    AUTO_DOWNSCALE, ColorMode, NoiseField, ResolutionStrategy, SMALL_SURFACE_AREA, generate,
    paint_noise,
};
pub use schedule::{
    AnimationLoop, FrameHandle, FrameOutcome, FrameRenderer, FrameScheduler, FrameThrottle,
    ManualScheduler,
};
pub use surface::{
    CompositeOp, DeviceProfile, ResolutionCap, Surface, configure, is_mobile_user_agent,
};
