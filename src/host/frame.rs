use crate::foundation::core::{DisplaySize, PixelSize};
use crate::foundation::error::{OverlayError, OverlayResult};

/// A composed viewport frame as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// Device pixels per logical pixel.
    pub scale: f64,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// A frame covering `viewport` at `scale`, filled with one premultiplied color.
    pub fn solid(viewport: DisplaySize, scale: f64, rgba: [u8; 4]) -> Self {
        let viewport = viewport.sanitized();
        let size = PixelSize::at_least_one(
            (viewport.width * scale).round() as u32,
            (viewport.height * scale).round() as u32,
        );
        Self {
            width: size.width,
            height: size.height,
            scale,
            data: rgba.repeat(size.area()),
        }
    }

    /// Frame size in device pixels.
    pub fn size(&self) -> PixelSize {
        PixelSize::at_least_one(self.width, self.height)
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> OverlayResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        for px in straight.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| OverlayError::surface("frame buffer does not match its dimensions"))
    }
}
