use rand::rngs::StdRng;

use crate::bar::{BarFrame, BarMachine};
use crate::config::BarConfig;
use crate::foundation::core::{DisplaySize, PixelSize, Point};
use crate::foundation::error::OverlayResult;
use crate::foundation::random::{UniformSource, entropy_source};
use crate::layer::Layer;
use crate::mask::apply_bar_mask;
use crate::noise::{NoiseField, ResolutionStrategy, paint_noise};
use crate::schedule::FrameRenderer;
use crate::surface::{DeviceProfile, Surface, configure, pixel_bounds};

/// Full-viewport layer that occasionally sends a soft-edged noise bar across the screen.
#[derive(Debug)]
pub struct NoiseBar<R = StdRng> {
    config: BarConfig,
    surface: Surface,
    machine: BarMachine,
    scratch: NoiseField,
    rng: R,
    last_frame: Option<BarFrame>,
}

impl NoiseBar<StdRng> {
    /// Build with an entropy-seeded noise source.
    pub fn new(config: BarConfig, viewport: DisplaySize, device: DeviceProfile) -> OverlayResult<Self> {
        Self::with_source(config, viewport, device, entropy_source())
    }
}

impl<R: UniformSource> NoiseBar<R> {
    /// Build with an injected noise source.
    pub fn with_source(
        config: BarConfig,
        viewport: DisplaySize,
        device: DeviceProfile,
        rng: R,
    ) -> OverlayResult<Self> {
        config.validate()?;
        let surface = configure(viewport, device, config.resolution_cap);
        Ok(Self {
            machine: BarMachine::new(config.params),
            config,
            surface,
            scratch: NoiseField::empty(),
            rng,
            last_frame: None,
        })
    }

    /// Lifecycle state machine.
    pub fn machine(&self) -> &BarMachine {
        &self.machine
    }

    /// Geometry drawn by the most recent frame, if a bar was visible.
    pub fn last_frame(&self) -> Option<BarFrame> {
        self.last_frame
    }

    /// Layer configuration.
    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    fn draw(&mut self, t_ms: f64) -> OverlayResult<()> {
        self.surface.clear();
        self.last_frame = self
            .machine
            .step(t_ms, self.surface.display_size(), &mut self.rng);
        let Some(frame) = self.last_frame else {
            return Ok(());
        };

        let dest = self.surface.logical_to_device(frame.rect);
        let (x0, y0, x1, y1) = pixel_bounds(dest);
        let region = PixelSize::at_least_one((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32);
        let strategy = ResolutionStrategy::select(region, self.config.scale);

        paint_noise(
            &mut self.surface,
            dest,
            strategy,
            self.config.color_mode,
            &mut self.scratch,
            &mut self.rng,
        )?;
        apply_bar_mask(&mut self.surface, dest)
    }
}

impl<R: UniformSource> FrameRenderer for NoiseBar<R> {
    fn render_frame(&mut self, t_ms: f64) {
        if let Err(err) = self.draw(t_ms) {
            tracing::warn!(%err, t_ms, "bar frame skipped");
            return;
        }
        tracing::trace!(t_ms, visible = self.last_frame.is_some(), "bar frame drawn");
    }
}

impl<R: UniformSource> Layer for NoiseBar<R> {
    fn name(&self) -> &'static str {
        "bar"
    }

    fn fps(&self) -> f64 {
        self.config.fps
    }

    fn opacity(&self) -> f32 {
        self.config.opacity
    }

    fn on_resize(&mut self, viewport: DisplaySize, device: DeviceProfile) {
        if self.surface.resize(viewport, device) {
            self.scratch = NoiseField::empty();
        }
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn placement(&self, _viewport: DisplaySize) -> Point {
        Point::ORIGIN
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/bar.rs"]
mod tests;
