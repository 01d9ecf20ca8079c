//! Lifecycle of the traveling noise bar.
//!
//! ```text
//! Dormant --first tick--> Waiting(next) --t >= next--> Active(..) --elapsed >= duration--> Dormant
//! ```
//!
//! All times are milliseconds on the host's frame clock. Positions are logical pixels.

use crate::animation::ease::Ease;
use crate::foundation::core::{DisplaySize, Rect};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::random::UniformSource;

/// Which way the bar crosses the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    /// Enters on the left, exits on the right.
    LeftToRight,
    /// Enters on the right, exits on the left.
    RightToLeft,
}

/// Randomization ranges for each bar pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BarParams {
    /// Shortest crossing, ms.
    pub min_duration: f64,
    /// Longest crossing, ms.
    pub max_duration: f64,
    /// Shortest pause between crossings, ms.
    pub min_delay: f64,
    /// Longest pause between crossings, ms.
    pub max_delay: f64,
    /// Narrowest bar, logical px.
    pub min_width: f64,
    /// Widest bar, logical px.
    pub max_width: f64,
    /// Bar thickness, logical px.
    pub height: f64,
    /// Progress curve.
    pub ease: Ease,
}

impl Default for BarParams {
    fn default() -> Self {
        Self {
            min_duration: 3000.0,
            max_duration: 6000.0,
            min_delay: 1000.0,
            max_delay: 5000.0,
            min_width: 50.0,
            max_width: 200.0,
            height: 25.0,
            ease: Ease::InOutCubic,
        }
    }
}

impl BarParams {
    /// Reject negative, non-finite or inverted ranges.
    pub fn validate(&self) -> OverlayResult<()> {
        fn range(name: &str, min: f64, max: f64) -> OverlayResult<()> {
            if !min.is_finite() || !max.is_finite() || min < 0.0 {
                return Err(OverlayError::validation(format!(
                    "bar {name} range must be finite and >= 0"
                )));
            }
            if min > max {
                return Err(OverlayError::validation(format!(
                    "bar min_{name} must be <= max_{name}"
                )));
            }
            Ok(())
        }

        range("duration", self.min_duration, self.max_duration)?;
        range("delay", self.min_delay, self.max_delay)?;
        range("width", self.min_width, self.max_width)?;
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(OverlayError::validation(
                "bar height must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// One crossing in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveBar {
    /// Activation timestamp.
    pub start_time: f64,
    /// Crossing length, ms.
    pub duration: f64,
    /// Travel direction.
    pub direction: TravelDirection,
    /// Top edge, logical px.
    pub vertical_position: f64,
    /// Bar width, logical px.
    pub width: f64,
}

/// Lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BarPhase {
    /// Nothing scheduled.
    Dormant,
    /// Waiting for `next_activation`.
    Waiting {
        /// Timestamp at which the bar becomes active.
        next_activation: f64,
    },
    /// Crossing the screen.
    Active(ActiveBar),
}

/// Geometry of the bar for one drawn frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarFrame {
    /// Bar rectangle in logical px; may extend past the surface edges.
    pub rect: Rect,
    /// `elapsed / duration`, clamped to `[0, 1]`.
    pub progress: f64,
    /// Progress after easing.
    pub eased: f64,
    /// Travel direction of this crossing.
    pub direction: TravelDirection,
}

/// Per-instance bar state, advanced once per drawn tick.
#[derive(Clone, Debug)]
pub struct BarMachine {
    params: BarParams,
    phase: BarPhase,
}

impl BarMachine {
    /// A dormant machine.
    pub fn new(params: BarParams) -> Self {
        Self {
            params,
            phase: BarPhase::Dormant,
        }
    }

    /// Current lifecycle state.
    pub fn phase(&self) -> BarPhase {
        self.phase
    }

    /// Parameters in use.
    pub fn params(&self) -> &BarParams {
        &self.params
    }

    /// Advance to `t` on a surface of `surface` logical size. Returns the bar geometry when a bar
    /// should be drawn this tick.
    pub fn step<R: UniformSource + ?Sized>(
        &mut self,
        t: f64,
        surface: DisplaySize,
        rng: &mut R,
    ) -> Option<BarFrame> {
        let p = self.params;

        if self.phase == BarPhase::Dormant {
            let next_activation = t + rng.uniform(p.min_delay, p.max_delay);
            tracing::trace!(next_activation, "bar scheduled");
            self.phase = BarPhase::Waiting { next_activation };
        }

        if let BarPhase::Waiting { next_activation } = self.phase
            && t >= next_activation
        {
            let surface = surface.sanitized();
            let bar = ActiveBar {
                start_time: t,
                duration: rng.uniform(p.min_duration, p.max_duration),
                direction: if rng.coin() {
                    TravelDirection::LeftToRight
                } else {
                    TravelDirection::RightToLeft
                },
                vertical_position: rng.uniform(0.0, (surface.height - p.height).max(0.0)),
                width: rng.uniform(p.min_width, p.max_width),
            };
            tracing::debug!(
                duration = bar.duration,
                width = bar.width,
                y = bar.vertical_position,
                direction = ?bar.direction,
                "bar activated"
            );
            self.phase = BarPhase::Active(bar);
        }

        let BarPhase::Active(bar) = self.phase else {
            return None;
        };

        let elapsed = t - bar.start_time;
        if elapsed >= bar.duration {
            tracing::debug!(elapsed, "bar finished");
            self.phase = BarPhase::Dormant;
            return None;
        }

        let progress = (elapsed / bar.duration).clamp(0.0, 1.0);
        let eased = p.ease.apply(progress);
        let width = surface.sanitized().width;
        let travel = width + bar.width;
        let x = match bar.direction {
            TravelDirection::LeftToRight => eased * travel - bar.width,
            TravelDirection::RightToLeft => width - eased * travel,
        };

        Some(BarFrame {
            rect: Rect::new(
                x,
                bar.vertical_position,
                x + bar.width,
                bar.vertical_position + p.height,
            ),
            progress,
            eased,
            direction: bar.direction,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/bar/bar.rs"]
mod tests;
