//! Per-frame random pixel fields.
//!
//! Every frame draws a brand new field: samples are independent per cell and per frame, and the
//! scratch allocation is the only thing that survives between frames.

use crate::foundation::core::{PixelSize, Rect};
use crate::foundation::error::OverlayResult;
use crate::foundation::math::mul_div255_u8;
use crate::foundation::random::UniformSource;
use crate::surface::{Surface, pixel_bounds};

/// Without a requested factor, regions up to this many device pixels are filled at full
/// resolution.
pub const SMALL_SURFACE_AREA: usize = 65_536;

/// Factor used for large regions when the caller did not request one.
pub const AUTO_DOWNSCALE: u32 = 2;

/// How a random sample becomes a color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// One sample replicated to R, G and B.
    #[default]
    Grayscale,
    /// One sample scaled by a tint color.
    Tinted([u8; 3]),
    /// Three independent samples, one per channel.
    Chromatic,
}

/// Generation resolution relative to the destination region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// One sample per destination device pixel.
    Full,
    /// Generate at `region / factor`, then upscale with nearest-neighbor.
    Downsampled {
        /// Linear reduction factor, at least 2.
        factor: u32,
    },
}

impl ResolutionStrategy {
    /// A requested factor is always honored (`<= 1` means full resolution). Without one, small
    /// regions are filled at full resolution and larger ones use [`AUTO_DOWNSCALE`].
    pub fn select(region: PixelSize, factor: Option<u32>) -> Self {
        let factor = match factor {
            Some(f) => f,
            None if region.area() <= SMALL_SURFACE_AREA => 1,
            None => AUTO_DOWNSCALE,
        };
        if factor <= 1 {
            Self::Full
        } else {
            Self::Downsampled { factor }
        }
    }

    /// One step coarser: downsampled fields grow their factor by one, full stays full.
    pub fn coarser(self) -> Self {
        match self {
            Self::Full => Self::Full,
            Self::Downsampled { factor } => Self::Downsampled {
                factor: factor.saturating_add(1),
            },
        }
    }

    /// Linear reduction factor; 1 at full resolution.
    pub fn factor(self) -> u32 {
        match self {
            Self::Full => 1,
            Self::Downsampled { factor } => factor,
        }
    }

    /// Size of the field generated for `region`.
    pub fn field_size(self, region: PixelSize) -> PixelSize {
        match self {
            Self::Full => region,
            Self::Downsampled { factor } => {
                let f = f64::from(factor.max(1));
                PixelSize::at_least_one(
                    (f64::from(region.width) / f).round() as u32,
                    (f64::from(region.height) / f).round() as u32,
                )
            }
        }
    }
}

/// A packed, opaque RGBA8 noise field.
#[derive(Clone, Debug)]
pub struct NoiseField {
    size: PixelSize,
    data: Vec<u8>,
}

impl NoiseField {
    /// An empty 1×1 field, ready to be regenerated.
    pub fn empty() -> Self {
        let size = PixelSize::at_least_one(1, 1);
        Self {
            size,
            data: vec![0; size.rgba_len()],
        }
    }

    /// Field size in cells.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Packed RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite every cell with fresh samples, reusing the allocation when possible.
    pub fn regenerate<R: UniformSource + ?Sized>(
        &mut self,
        size: PixelSize,
        mode: ColorMode,
        rng: &mut R,
    ) {
        self.size = size;
        self.data.resize(size.rgba_len(), 0);
        for px in self.data.chunks_exact_mut(4) {
            let rgb = match mode {
                ColorMode::Grayscale => {
                    let v = rng.next_byte();
                    [v, v, v]
                }
                ColorMode::Tinted(tint) => {
                    let v = u16::from(rng.next_byte());
                    [
                        mul_div255_u8(v, u16::from(tint[0])),
                        mul_div255_u8(v, u16::from(tint[1])),
                        mul_div255_u8(v, u16::from(tint[2])),
                    ]
                }
                ColorMode::Chromatic => [rng.next_byte(), rng.next_byte(), rng.next_byte()],
            };
            px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
}

/// Produce a fresh noise field of `size` cells.
pub fn generate<R: UniformSource + ?Sized>(
    size: PixelSize,
    mode: ColorMode,
    rng: &mut R,
) -> NoiseField {
    let mut field = NoiseField::empty();
    field.regenerate(size, mode, rng);
    field
}

/// Fill `dest` (device pixels) on `surface` with fresh noise using `strategy`.
///
/// `scratch` holds the generated field; its contents are fully replaced on every call.
pub fn paint_noise<R: UniformSource + ?Sized>(
    surface: &mut Surface,
    dest: Rect,
    strategy: ResolutionStrategy,
    mode: ColorMode,
    scratch: &mut NoiseField,
    rng: &mut R,
) -> OverlayResult<()> {
    let (x0, y0, x1, y1) = pixel_bounds(dest);
    let region = PixelSize::at_least_one((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32);
    scratch.regenerate(strategy.field_size(region), mode, rng);
    surface.draw_image(scratch.data(), scratch.size(), dest)
}

#[cfg(test)]
#[path = "../tests/unit/noise/noise.rs"]
mod tests;
