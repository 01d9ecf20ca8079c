use rand::rngs::StdRng;

use crate::config::BackgroundConfig;
use crate::foundation::core::{DisplaySize, Point};
use crate::foundation::error::OverlayResult;
use crate::foundation::random::{UniformSource, entropy_source};
use crate::layer::Layer;
use crate::mask::{MaskCache, RADIAL_STOPS, apply_mask};
use crate::noise::{NoiseField, ResolutionStrategy, paint_noise};
use crate::schedule::FrameRenderer;
use crate::surface::{DeviceProfile, Surface, configure};

/// Ambient noise field faded by a cached radial mask.
#[derive(Debug)]
pub struct NoiseBackground<R = StdRng> {
    config: BackgroundConfig,
    surface: Surface,
    masks: MaskCache,
    scratch: NoiseField,
    rng: R,
}

impl NoiseBackground<StdRng> {
    /// Build with an entropy-seeded noise source.
    pub fn new(
        config: BackgroundConfig,
        viewport: DisplaySize,
        device: DeviceProfile,
    ) -> OverlayResult<Self> {
        Self::with_source(config, viewport, device, entropy_source())
    }
}

impl<R: UniformSource> NoiseBackground<R> {
    /// Build with an injected noise source.
    pub fn with_source(
        config: BackgroundConfig,
        viewport: DisplaySize,
        device: DeviceProfile,
        rng: R,
    ) -> OverlayResult<Self> {
        config.validate()?;
        let display = element_size(&config, viewport);
        let surface = configure(display, device, config.resolution_cap);
        let mut masks = MaskCache::new();
        masks.radial_for(&surface, &RADIAL_STOPS);
        Ok(Self {
            config,
            surface,
            masks,
            scratch: NoiseField::empty(),
            rng,
        })
    }

    /// Effective downscale factor; 1 when drawing at full resolution.
    pub fn downscale_factor(&self) -> u32 {
        self.strategy().factor()
    }

    /// Resolution strategy for the current surface: the configured scale, one step coarser on
    /// mobile-class devices.
    pub fn strategy(&self) -> ResolutionStrategy {
        let strategy = ResolutionStrategy::select(self.surface.pixel_size(), self.config.scale);
        if self.surface.device().mobile {
            strategy.coarser()
        } else {
            strategy
        }
    }

    /// Radial mask cache (exposed for inspection).
    pub fn masks(&self) -> &MaskCache {
        &self.masks
    }

    /// Layer configuration.
    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    fn draw(&mut self) -> OverlayResult<()> {
        let strategy = self.strategy();
        let dest = self.surface.logical_to_device(self.surface.display_size().to_rect());

        self.surface.clear();
        paint_noise(
            &mut self.surface,
            dest,
            strategy,
            self.config.color_mode,
            &mut self.scratch,
            &mut self.rng,
        )?;
        let mask = self.masks.radial_for(&self.surface, &RADIAL_STOPS);
        apply_mask(&mut self.surface, mask, (0, 0))
    }
}

/// Measured element size: the fixed box, or the viewport when filling it. A collapsed box falls
/// back to the configured size.
fn element_size(config: &BackgroundConfig, viewport: DisplaySize) -> DisplaySize {
    match config.size {
        Some(side) => DisplaySize::new(side, side),
        None if viewport.is_collapsed() => {
            let side = BackgroundConfig::default().size.unwrap_or(0.0);
            DisplaySize::new(side, side)
        }
        None => viewport.sanitized(),
    }
}

impl<R: UniformSource> FrameRenderer for NoiseBackground<R> {
    fn render_frame(&mut self, t_ms: f64) {
        if let Err(err) = self.draw() {
            tracing::warn!(%err, t_ms, "background frame skipped");
            return;
        }
        tracing::trace!(t_ms, "background frame drawn");
    }
}

impl<R: UniformSource> Layer for NoiseBackground<R> {
    fn name(&self) -> &'static str {
        "background"
    }

    fn fps(&self) -> f64 {
        self.config.fps
    }

    fn opacity(&self) -> f32 {
        self.config.opacity
    }

    fn on_resize(&mut self, viewport: DisplaySize, device: DeviceProfile) {
        let display = element_size(&self.config, viewport);
        if self.surface.resize(display, device) {
            self.scratch = NoiseField::empty();
            self.masks.radial_for(&self.surface, &RADIAL_STOPS);
        }
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn placement(&self, viewport: DisplaySize) -> Point {
        let viewport = viewport.sanitized();
        let own = self.surface.display_size();
        Point::new(
            (viewport.width - own.width) / 2.0,
            (viewport.height - own.height) / 2.0,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/background.rs"]
mod tests;
