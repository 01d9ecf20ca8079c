//! Gradient alpha masks and destination-in masking.

use crate::foundation::core::{PixelSize, Point, Rect};
use crate::foundation::error::OverlayResult;
use crate::foundation::math::{lerp, unit_to_u8};
use crate::surface::{CompositeOp, Surface, pixel_bounds};

/// One gradient color stop; only alpha matters for masks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, `0..=1`.
    pub offset: f64,
    /// Opacity at this position, `0..=1`.
    pub alpha: f64,
}

const fn stop(offset: f64, alpha: f64) -> GradientStop {
    GradientStop { offset, alpha }
}

/// Ambient background falloff: strong center, soft shoulder, transparent rim.
pub const RADIAL_STOPS: [GradientStop; 3] = [stop(0.0, 0.9), stop(0.6, 0.6), stop(1.0, 0.0)];

/// Fade along the bar's direction of travel.
pub const BAR_HORIZONTAL_STOPS: [GradientStop; 4] =
    [stop(0.0, 0.0), stop(0.2, 1.0), stop(0.8, 1.0), stop(1.0, 0.0)];

/// Fade across the bar's height.
pub const BAR_VERTICAL_STOPS: [GradientStop; 4] =
    [stop(0.2, 0.0), stop(0.5, 1.0), stop(0.8, 1.0), stop(1.0, 0.0)];

/// Alpha at gradient position `t`. Before the first stop the first alpha holds, after the last
/// stop the last alpha holds.
pub fn sample_stops(stops: &[GradientStop], t: f64) -> f64 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return 0.0;
    };
    if t.is_nan() || t <= first.offset {
        return first.alpha;
    }
    if t >= last.offset {
        return last.alpha;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.alpha;
            }
            return lerp(a.alpha, b.alpha, (t - a.offset) / span);
        }
    }
    last.alpha
}

/// Concentric gradient around `center`, reaching its last stop at `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialGradient {
    /// Center in device pixels.
    pub center: Point,
    /// Radius of the outermost stop.
    pub radius: f64,
}

impl RadialGradient {
    /// Centered on `size`, radius half of the smaller side.
    pub fn centered(size: PixelSize) -> Self {
        let w = f64::from(size.width);
        let h = f64::from(size.height);
        Self {
            center: Point::new(w / 2.0, h / 2.0),
            radius: w.min(h) / 2.0,
        }
    }

    /// Opacity at `p`.
    pub fn alpha_at(&self, stops: &[GradientStop], p: Point) -> f64 {
        if self.radius <= 0.0 {
            return stops.last().map_or(0.0, |s| s.alpha);
        }
        sample_stops(stops, p.distance(self.center) / self.radius)
    }
}

/// A rectangular coverage map.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    size: PixelSize,
    coverage: Vec<u8>,
}

impl AlphaMask {
    /// Mask size in device pixels.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Coverage bytes, row-major.
    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    /// Coverage at `(x, y)`; `None` outside the mask.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.coverage
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }
}

/// Rasterize a centered radial mask over a surface of `size`, sampling at pixel centers.
pub fn radial_mask(size: PixelSize, stops: &[GradientStop]) -> AlphaMask {
    let gradient = RadialGradient::centered(size);
    let mut coverage = Vec::with_capacity(size.area());
    for y in 0..size.height {
        for x in 0..size.width {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            coverage.push(unit_to_u8(gradient.alpha_at(stops, p)));
        }
    }
    AlphaMask { size, coverage }
}

/// Gradient direction for [`linear_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Varies along x.
    Horizontal,
    /// Varies along y.
    Vertical,
}

/// Rasterize a one-dimensional gradient spanning `rect` (device pixels). Returns the mask and its
/// integer origin.
pub fn linear_mask(rect: Rect, axis: Axis, stops: &[GradientStop]) -> (AlphaMask, (i64, i64)) {
    let rect = rect.abs();
    let (x0, y0, x1, y1) = pixel_bounds(rect);
    let size = PixelSize::at_least_one((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32);
    let (start, extent) = match axis {
        Axis::Horizontal => (rect.x0, rect.width()),
        Axis::Vertical => (rect.y0, rect.height()),
    };

    let t_at = |pos: i64| {
        if extent <= 0.0 {
            return 1.0;
        }
        ((pos as f64 + 0.5) - start) / extent
    };

    let mut coverage = Vec::with_capacity(size.area());
    for y in 0..i64::from(size.height) {
        for x in 0..i64::from(size.width) {
            let pos = match axis {
                Axis::Horizontal => x0 + x,
                Axis::Vertical => y0 + y,
            };
            coverage.push(unit_to_u8(sample_stops(stops, t_at(pos))));
        }
    }
    (AlphaMask { size, coverage }, (x0, y0))
}

/// Intersect the surface with `mask` placed at `origin`: existing pixels are scaled by mask
/// coverage, pixels outside the mask become transparent. The composite op is restored afterwards.
pub fn apply_mask(surface: &mut Surface, mask: &AlphaMask, origin: (i64, i64)) -> OverlayResult<()> {
    surface.with_composite_op(CompositeOp::DestinationIn, |s| {
        s.draw_coverage(mask.coverage(), mask.size(), origin)
    })
}

/// Destination-in a single linear gradient across `rect`.
pub fn apply_linear_band(
    surface: &mut Surface,
    rect: Rect,
    axis: Axis,
    stops: &[GradientStop],
) -> OverlayResult<()> {
    let (mask, origin) = linear_mask(rect, axis, stops);
    apply_mask(surface, &mask, origin)
}

/// Soft rectangular falloff for the traveling bar: horizontal fade, then vertical fade.
pub fn apply_bar_mask(surface: &mut Surface, rect: Rect) -> OverlayResult<()> {
    apply_linear_band(surface, rect, Axis::Horizontal, &BAR_HORIZONTAL_STOPS)?;
    apply_linear_band(surface, rect, Axis::Vertical, &BAR_VERTICAL_STOPS)
}

/// Radial mask cached against a surface generation and the stops it was built from.
#[derive(Debug, Default)]
pub struct MaskCache {
    built_for: Option<u64>,
    stops: Vec<GradientStop>,
    mask: Option<AlphaMask>,
    rebuilds: u64,
}

impl MaskCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The radial mask for `surface`, rebuilt only if the surface was reallocated or the stops
    /// changed since the last build.
    pub fn radial_for(&mut self, surface: &Surface, stops: &[GradientStop]) -> &AlphaMask {
        let generation = surface.generation();
        if self.built_for != Some(generation) || self.stops != stops || self.mask.is_none() {
            tracing::debug!(
                generation,
                width = surface.pixel_size().width,
                height = surface.pixel_size().height,
                "rebuilding radial mask"
            );
            self.built_for = Some(generation);
            self.stops = stops.to_vec();
            self.rebuilds = self.rebuilds.saturating_add(1);
            self.mask = None;
        }
        self.mask
            .get_or_insert_with(|| radial_mask(surface.pixel_size(), stops))
    }

    /// Drop the cached mask.
    pub fn invalidate(&mut self) {
        self.built_for = None;
        self.stops.clear();
        self.mask = None;
    }

    /// Number of times the mask has been (re)built.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Surface generation the cached mask was built for.
    pub fn built_for(&self) -> Option<u64> {
        self.built_for
    }
}

#[cfg(test)]
#[path = "../tests/unit/mask/mask.rs"]
mod tests;
