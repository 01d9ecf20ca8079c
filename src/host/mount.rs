use crate::foundation::error::OverlayResult;
use crate::host::viewport::{FALLBACK_VIEWPORT, HostViewport, ListenerId};
use crate::layer::Layer;
use crate::schedule::{AnimationLoop, FrameHandle, FrameOutcome, FrameScheduler, FrameThrottle};

/// A layer wired to a viewport and a frame scheduler.
///
/// Unmounting consumes the value, so the pending frame is cancelled and the resize listener is
/// removed exactly once.
#[derive(Debug)]
pub struct MountedLayer<L> {
    layer: L,
    animation: AnimationLoop,
    listener: Option<ListenerId>,
}

impl<L: Layer> MountedLayer<L> {
    /// Register for resizes, size the surface, and request the first frame.
    #[tracing::instrument(skip_all, fields(layer = layer.name()))]
    pub fn mount<V, S>(mut layer: L, viewport: &mut V, scheduler: &mut S) -> OverlayResult<Self>
    where
        V: HostViewport + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let throttle = FrameThrottle::from_fps(layer.fps())?;
        let listener = match viewport.add_resize_listener() {
            Ok(id) => {
                layer.on_resize(viewport.size(), viewport.device());
                Some(id)
            }
            Err(err) => {
                tracing::warn!(%err, "resize notifications unavailable, using fallback size");
                layer.on_resize(FALLBACK_VIEWPORT, viewport.device());
                None
            }
        };

        let mut animation = AnimationLoop::new(throttle);
        animation.start(scheduler);
        tracing::debug!(
            width = layer.surface().pixel_size().width,
            height = layer.surface().pixel_size().height,
            "layer mounted"
        );
        Ok(Self {
            layer,
            animation,
            listener,
        })
    }

    /// Whether this layer's pending callback is among `due`.
    pub fn is_due(&self, due: &[FrameHandle]) -> bool {
        self.animation.pending().is_some_and(|h| due.contains(&h))
    }

    /// Deliver a fired frame callback.
    pub fn on_frame<S: FrameScheduler + ?Sized>(&mut self, t_ms: f64, scheduler: &mut S) -> FrameOutcome {
        self.animation.on_frame(t_ms, scheduler, &mut self.layer)
    }

    /// Deliver a resize notification addressed to `id`.
    pub fn on_resize<V: HostViewport + ?Sized>(&mut self, id: ListenerId, viewport: &V) {
        if self.listener == Some(id) {
            self.layer.on_resize(viewport.size(), viewport.device());
        }
    }

    /// Cancel the pending frame, deregister the resize listener, and hand back the layer.
    pub fn unmount<V, S>(mut self, viewport: &mut V, scheduler: &mut S) -> L
    where
        V: HostViewport + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.animation.teardown(scheduler);
        if let Some(id) = self.listener.take() {
            viewport.remove_resize_listener(id);
        }
        tracing::debug!(layer = self.layer.name(), draws = self.animation.draws(), "layer unmounted");
        self.layer
    }

    /// The mounted layer.
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Frame loop state.
    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    /// Registered resize listener, if the host supports them.
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/mount.rs"]
mod tests;
