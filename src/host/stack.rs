use rand::rngs::StdRng;

use crate::config::OverlayConfig;
use crate::effects::composite::{blend_region, over, resample_nearest, screen};
use crate::foundation::core::{DisplaySize, PixelSize};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::random::{UniformSource, entropy_source};
use crate::host::frame::FrameRGBA;
use crate::host::mount::MountedLayer;
use crate::host::viewport::{HostViewport, ListenerId};
use crate::layer::Layer;
use crate::layer::background::NoiseBackground;
use crate::layer::bar::NoiseBar;
use crate::schedule::{FrameHandle, FrameOutcome, FrameScheduler};

/// The background and bar layers mounted into one viewport, each with its own loop and state.
#[derive(Debug)]
pub struct OverlayStack<R = StdRng> {
    background: Option<MountedLayer<NoiseBackground<R>>>,
    bar: Option<MountedLayer<NoiseBar<R>>>,
}

impl OverlayStack<StdRng> {
    /// Mount every enabled layer with entropy-seeded noise.
    pub fn mount<V, S>(config: &OverlayConfig, viewport: &mut V, scheduler: &mut S) -> OverlayResult<Self>
    where
        V: HostViewport + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        Self::mount_with(config, viewport, scheduler, entropy_source)
    }
}

impl<R: UniformSource> OverlayStack<R> {
    /// Mount every enabled layer, drawing one independent noise source per layer from `source`.
    pub fn mount_with<V, S>(
        config: &OverlayConfig,
        viewport: &mut V,
        scheduler: &mut S,
        mut source: impl FnMut() -> R,
    ) -> OverlayResult<Self>
    where
        V: HostViewport + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        config.validate()?;
        let size = viewport.size();
        let device = viewport.device();

        let background = match &config.background {
            Some(c) => {
                let layer = NoiseBackground::with_source(c.clone(), size, device, source())?;
                Some(MountedLayer::mount(layer, viewport, scheduler)?)
            }
            None => None,
        };
        let bar = match &config.bar {
            Some(c) => {
                let layer = NoiseBar::with_source(c.clone(), size, device, source())?;
                Some(MountedLayer::mount(layer, viewport, scheduler)?)
            }
            None => None,
        };
        Ok(Self { background, bar })
    }

    /// Deliver fired frame callbacks at `t_ms`. Returns the number of layers that drew.
    pub fn tick<S: FrameScheduler + ?Sized>(
        &mut self,
        due: &[FrameHandle],
        t_ms: f64,
        scheduler: &mut S,
    ) -> usize {
        let mut drawn = 0;
        if let Some(bg) = self.background.as_mut()
            && bg.is_due(due)
            && bg.on_frame(t_ms, scheduler) == FrameOutcome::Drawn
        {
            drawn += 1;
        }
        if let Some(bar) = self.bar.as_mut()
            && bar.is_due(due)
            && bar.on_frame(t_ms, scheduler) == FrameOutcome::Drawn
        {
            drawn += 1;
        }
        drawn
    }

    /// Deliver resize notifications.
    pub fn handle_resize<V: HostViewport + ?Sized>(&mut self, notified: &[ListenerId], viewport: &V) {
        for &id in notified {
            if let Some(bg) = self.background.as_mut() {
                bg.on_resize(id, viewport);
            }
            if let Some(bar) = self.bar.as_mut() {
                bar.on_resize(id, viewport);
            }
        }
    }

    /// Screen each layer over `backdrop` with its opacity, background first, then paint
    /// `foreground` on top with normal source-over.
    pub fn compose(
        &self,
        viewport: DisplaySize,
        backdrop: &mut FrameRGBA,
        foreground: Option<&FrameRGBA>,
    ) -> OverlayResult<()> {
        if let Some(bg) = &self.background {
            compose_layer(bg.layer(), viewport, backdrop)?;
        }
        if let Some(bar) = &self.bar {
            compose_layer(bar.layer(), viewport, backdrop)?;
        }
        if let Some(fg) = foreground {
            if fg.size() != backdrop.size() {
                return Err(OverlayError::surface(
                    "foreground must match the backdrop size",
                ));
            }
            let size = backdrop.size();
            blend_region(&mut backdrop.data, size, &fg.data, size, (0, 0), |d, s| {
                over(d, s, 1.0)
            })?;
        }
        Ok(())
    }

    /// Tear down every layer: pending frames cancelled, listeners removed.
    pub fn unmount<V, S>(self, viewport: &mut V, scheduler: &mut S)
    where
        V: HostViewport + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if let Some(bg) = self.background {
            bg.unmount(viewport, scheduler);
        }
        if let Some(bar) = self.bar {
            bar.unmount(viewport, scheduler);
        }
    }

    /// Mounted background, if enabled.
    pub fn background(&self) -> Option<&MountedLayer<NoiseBackground<R>>> {
        self.background.as_ref()
    }

    /// Mounted bar, if enabled.
    pub fn bar(&self) -> Option<&MountedLayer<NoiseBar<R>>> {
        self.bar.as_ref()
    }
}

fn compose_layer<L: Layer + ?Sized>(
    layer: &L,
    viewport: DisplaySize,
    frame: &mut FrameRGBA,
) -> OverlayResult<()> {
    let surface = layer.surface();
    let origin = layer.placement(viewport);
    let device_origin = (
        (origin.x * frame.scale).round() as i64,
        (origin.y * frame.scale).round() as i64,
    );
    let opacity = layer.opacity();
    let frame_size = frame.size();

    let display = surface.display_size();
    let target = PixelSize::at_least_one(
        (display.width * frame.scale).round() as u32,
        (display.height * frame.scale).round() as u32,
    );
    let pixels = resample_nearest(surface.data(), surface.pixel_size(), target)?;
    blend_region(
        &mut frame.data,
        frame_size,
        &pixels,
        target,
        device_origin,
        |d, s| screen(d, s, opacity),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/host/stack.rs"]
mod tests;
