//! Resizable drawing surfaces.
//!
//! A [`Surface`] owns a premultiplied RGBA8 buffer sized in device pixels, while drawing code
//! positions things in logical pixels and maps them through [`Surface::device_transform`].

use crate::effects::composite::{PremulRgba8, destination_in, over};
use crate::foundation::core::{Affine, DisplaySize, PixelSize, Rect};
use crate::foundation::error::{OverlayError, OverlayResult};

/// How drawing operations combine with existing surface content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOp {
    /// Normal painting.
    #[default]
    SourceOver,
    /// Keep existing pixels only where the drawn source has alpha; everything outside the drawn
    /// region becomes transparent.
    DestinationIn,
}

/// Device capability hints supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceProfile {
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
    /// Coarse "phone or tablet" detection.
    pub mobile: bool,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            mobile: false,
        }
    }
}

impl DeviceProfile {
    /// Build a profile from a user-agent string and the host's pixel ratio.
    pub fn from_user_agent(user_agent: &str, pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            mobile: is_mobile_user_agent(user_agent),
        }
    }

    fn sane_ratio(self) -> f64 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        }
    }
}

/// Case-insensitive match on the usual mobile user-agent tokens.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ["mobi", "android", "iphone", "ipad"]
        .iter()
        .any(|token| ua.contains(token))
}

/// Upper bound on the device-pixel ratio a surface will honor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ResolutionCap(f64);

impl ResolutionCap {
    /// Default cap on desktop-class devices.
    pub const DESKTOP: Self = Self(2.0);
    /// Default cap on mobile-class devices.
    pub const MOBILE: Self = Self(1.5);

    /// Validate and build a cap; must be finite and positive.
    pub fn new(cap: f64) -> OverlayResult<Self> {
        if !cap.is_finite() || cap <= 0.0 {
            return Err(OverlayError::validation(
                "resolution cap must be finite and > 0",
            ));
        }
        Ok(Self(cap))
    }

    /// Default cap for a device class.
    pub fn for_device(device: DeviceProfile) -> Self {
        if device.mobile {
            Self::MOBILE
        } else {
            Self::DESKTOP
        }
    }

    /// Raw cap value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ResolutionCap {
    type Error = OverlayError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResolutionCap> for f64 {
    fn from(cap: ResolutionCap) -> Self {
        cap.0
    }
}

/// A resizable premultiplied RGBA8 drawing surface.
#[derive(Clone, Debug)]
pub struct Surface {
    display: DisplaySize,
    pixels: PixelSize,
    scale: f64,
    data: Vec<u8>,
    op: CompositeOp,
    generation: u64,
    device: DeviceProfile,
    cap: Option<ResolutionCap>,
}

/// Create a surface for an element measured at `display` logical pixels.
pub fn configure(
    display: DisplaySize,
    device: DeviceProfile,
    cap: Option<ResolutionCap>,
) -> Surface {
    let mut surface = Surface {
        display: DisplaySize::new(0.0, 0.0),
        pixels: PixelSize::at_least_one(1, 1),
        scale: 1.0,
        data: Vec::new(),
        op: CompositeOp::SourceOver,
        generation: 0,
        device,
        cap,
    };
    surface.apply_size(display);
    surface
}

impl Surface {
    /// Logical size, always equal to the last measured element size.
    pub fn display_size(&self) -> DisplaySize {
        self.display
    }

    /// Buffer size in device pixels; never zero in either dimension.
    pub fn pixel_size(&self) -> PixelSize {
        self.pixels
    }

    /// Effective device pixels per logical pixel, `min(pixel_ratio, cap)`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Incremented whenever the buffer is reallocated. Caches built from an older generation are
    /// stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Device capabilities this surface was configured with.
    pub fn device(&self) -> DeviceProfile {
        self.device
    }

    /// Cap in effect: the configured one, or the default for the current device class.
    pub fn resolution_cap(&self) -> ResolutionCap {
        self.cap
            .unwrap_or_else(|| ResolutionCap::for_device(self.device))
    }

    /// Current composite operation.
    pub fn composite_op(&self) -> CompositeOp {
        self.op
    }

    /// Packed premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the packed pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Handle a resize notification with the host's current device profile. Returns `true` when
    /// the buffer was reallocated.
    pub fn resize(&mut self, display: DisplaySize, device: DeviceProfile) -> bool {
        let before = (self.pixels, self.scale);
        self.device = device;
        self.apply_size(display);
        let changed = before != (self.pixels, self.scale);
        if changed {
            tracing::debug!(
                width = self.pixels.width,
                height = self.pixels.height,
                scale = self.scale,
                "surface reallocated"
            );
        }
        changed
    }

    fn apply_size(&mut self, display: DisplaySize) {
        let display = display.sanitized();
        let scale = self.device.sane_ratio().min(self.resolution_cap().get());
        let pixels = PixelSize::at_least_one(
            (display.width * scale).round() as u32,
            (display.height * scale).round() as u32,
        );

        self.display = display;
        if pixels != self.pixels || scale != self.scale || self.data.is_empty() {
            self.pixels = pixels;
            self.scale = scale;
            self.data = vec![0; pixels.rgba_len()];
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Logical-to-device coordinate transform.
    pub fn device_transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    /// Map a logical rectangle into device pixels.
    pub fn logical_to_device(&self, rect: Rect) -> Rect {
        self.device_transform().transform_rect_bbox(rect)
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Run `f` with `op` active, then restore whatever op was active before.
    pub fn with_composite_op<T>(&mut self, op: CompositeOp, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = std::mem::replace(&mut self.op, op);
        let out = f(self);
        self.op = prev;
        out
    }

    /// Draw an RGBA8 image into `dest` (device pixels) with nearest-neighbor scaling and no
    /// smoothing, honoring the current composite op.
    pub fn draw_image(&mut self, src: &[u8], src_size: PixelSize, dest: Rect) -> OverlayResult<()> {
        if src.len() != src_size.rgba_len() {
            return Err(OverlayError::surface(
                "draw_image expects src matching width*height*4",
            ));
        }
        let (x0, y0, x1, y1) = pixel_bounds(dest);
        let dest_w = (x1 - x0).max(0);
        let dest_h = (y1 - y0).max(0);
        let sw = i64::from(src_size.width);
        let sh = i64::from(src_size.height);

        self.composite_with(x0, y0, x1, y1, |dx, dy| {
            let sx = ((dx - x0) * sw / dest_w).clamp(0, sw - 1);
            let sy = ((dy - y0) * sh / dest_h).clamp(0, sh - 1);
            let i = ((sy * sw + sx) * 4) as usize;
            [src[i], src[i + 1], src[i + 2], src[i + 3]]
        });
        Ok(())
    }

    /// Draw a coverage map (black with per-pixel alpha) at `origin` in device pixels, honoring the
    /// current composite op.
    pub fn draw_coverage(
        &mut self,
        coverage: &[u8],
        size: PixelSize,
        origin: (i64, i64),
    ) -> OverlayResult<()> {
        if coverage.len() != size.area() {
            return Err(OverlayError::surface(
                "draw_coverage expects width*height coverage bytes",
            ));
        }
        let (ox, oy) = origin;
        let w = i64::from(size.width);
        let h = i64::from(size.height);
        self.composite_with(ox, oy, ox + w, oy + h, |x, y| {
            let a = coverage[((y - oy) * w + (x - ox)) as usize];
            [0, 0, 0, a]
        });
        Ok(())
    }

    /// Shared pixel loop. `sample` yields the source pixel for device coordinate `(x, y)` inside
    /// `[x0, x1) × [y0, y1)`.
    fn composite_with(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        sample: impl Fn(i64, i64) -> PremulRgba8,
    ) {
        let w = i64::from(self.pixels.width);
        let h = i64::from(self.pixels.height);
        let cx0 = x0.clamp(0, w);
        let cy0 = y0.clamp(0, h);
        let cx1 = x1.clamp(0, w);
        let cy1 = y1.clamp(0, h);

        match self.op {
            CompositeOp::SourceOver => {
                for y in cy0..cy1 {
                    for x in cx0..cx1 {
                        let i = ((y * w + x) * 4) as usize;
                        let d = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
                        let out = over(d, sample(x, y), 1.0);
                        self.data[i..i + 4].copy_from_slice(&out);
                    }
                }
            }
            CompositeOp::DestinationIn => {
                for y in 0..h {
                    for x in 0..w {
                        let i = ((y * w + x) * 4) as usize;
                        let inside = y >= cy0 && y < cy1 && x >= cx0 && x < cx1;
                        let coverage = if inside { sample(x, y)[3] } else { 0 };
                        let d = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
                        let out = destination_in(d, coverage);
                        self.data[i..i + 4].copy_from_slice(&out);
                    }
                }
            }
        }
    }
}

/// Round a device-space rectangle to integer pixel bounds `(x0, y0, x1, y1)`.
pub(crate) fn pixel_bounds(rect: Rect) -> (i64, i64, i64, i64) {
    let r = rect.abs();
    (
        r.x0.round() as i64,
        r.y0.round() as i64,
        r.x1.round() as i64,
        r.y1.round() as i64,
    )
}

#[cfg(test)]
#[path = "../tests/unit/surface/surface.rs"]
mod tests;
