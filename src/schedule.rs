//! Frame scheduling and throttling.
//!
//! Hosts expose their display-synchronized callback through [`FrameScheduler`]. Each layer owns
//! an [`AnimationLoop`] that keeps exactly one callback pending while running, draws at most once
//! per throttle interval and cancels its pending callback on teardown.

use crate::foundation::error::{OverlayError, OverlayResult};

/// Opaque token for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wrap a host-specific callback id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Host looping primitive: display-sync callbacks, timers, or manual ticks.
pub trait FrameScheduler {
    /// Ask for one more frame callback.
    fn request_next_frame(&mut self) -> FrameHandle;

    /// Cancel a callback that has not fired yet.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Something that performs one full draw cycle for a timestamp in milliseconds.
pub trait FrameRenderer {
    /// Generate, mask and composite one frame.
    fn render_frame(&mut self, t_ms: f64);
}

/// Limits redraws to a target rate regardless of how often the host calls back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_draw_ms: f64,
}

impl FrameThrottle {
    /// Throttle to `fps` draws per second.
    pub fn from_fps(fps: f64) -> OverlayResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(OverlayError::validation("fps must be finite and > 0"));
        }
        Ok(Self {
            interval_ms: 1000.0 / fps,
            last_draw_ms: 0.0,
        })
    }

    /// Minimum spacing between draws.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Timestamp of the last draw.
    pub fn last_draw_ms(&self) -> f64 {
        self.last_draw_ms
    }

    /// Whether a draw is due at `t_ms`; records `t_ms` as the last draw when it is.
    pub fn should_draw(&mut self, t_ms: f64) -> bool {
        if t_ms - self.last_draw_ms < self.interval_ms {
            return false;
        }
        self.last_draw_ms = t_ms;
        true
    }
}

/// What a frame callback did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A full draw cycle ran.
    Drawn,
    /// Too early; the next callback was still requested.
    Skipped,
    /// The loop was torn down; nothing ran and nothing was requested.
    Stopped,
}

/// Per-instance frame loop state.
#[derive(Debug)]
pub struct AnimationLoop {
    throttle: FrameThrottle,
    pending: Option<FrameHandle>,
    stopped: bool,
    draws: u64,
    skips: u64,
}

impl AnimationLoop {
    /// A loop that has not requested anything yet.
    pub fn new(throttle: FrameThrottle) -> Self {
        Self {
            throttle,
            pending: None,
            stopped: false,
            draws: 0,
            skips: 0,
        }
    }

    /// Request the first callback.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if self.stopped || self.pending.is_some() {
            return;
        }
        self.pending = Some(scheduler.request_next_frame());
    }

    /// Handle a fired callback at `t_ms`: draw if the throttle allows, then always request the
    /// next callback.
    pub fn on_frame<S, R>(&mut self, t_ms: f64, scheduler: &mut S, renderer: &mut R) -> FrameOutcome
    where
        S: FrameScheduler + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        if self.stopped {
            return FrameOutcome::Stopped;
        }
        self.pending = None;

        let outcome = if self.throttle.should_draw(t_ms) {
            renderer.render_frame(t_ms);
            self.draws = self.draws.saturating_add(1);
            FrameOutcome::Drawn
        } else {
            self.skips = self.skips.saturating_add(1);
            FrameOutcome::Skipped
        };

        self.pending = Some(scheduler.request_next_frame());
        outcome
    }

    /// Stop the loop and cancel the pending callback, if any. Idempotent.
    pub fn teardown<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.stopped = true;
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    /// The callback this loop is waiting on.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Whether the loop is still live.
    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    /// Number of completed draw cycles.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Number of throttled callbacks.
    pub fn skips(&self) -> u64 {
        self.skips
    }

    /// Throttle state.
    pub fn throttle(&self) -> &FrameThrottle {
        &self.throttle
    }
}

/// Deterministic scheduler: callbacks fire only when the host drains them with
/// [`ManualScheduler::take_due`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks requested and not yet fired or cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Every handle that was cancelled before firing.
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Fire all pending callbacks: returns and forgets them.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_next_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Some(i) = self.pending.iter().position(|&h| h == handle) {
            self.pending.swap_remove(i);
            self.cancelled.push(handle);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/schedule/schedule.rs"]
mod tests;
