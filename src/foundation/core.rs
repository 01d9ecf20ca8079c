pub use kurbo::{Affine, Point, Rect};

/// Size in logical (CSS-style) pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplaySize {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
}

impl DisplaySize {
    /// Build a display size from raw logical dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace NaN, infinite and negative components with zero.
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            width: clean(self.width),
            height: clean(self.height),
        }
    }

    /// True when either dimension is zero after sanitizing (a collapsed container).
    pub fn is_collapsed(self) -> bool {
        let s = self.sanitized();
        s.width == 0.0 || s.height == 0.0
    }

    /// Logical rectangle anchored at the origin.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Size in device pixels. Surfaces never hold a zero dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Device-pixel width.
    pub width: u32,
    /// Device-pixel height.
    pub height: u32,
}

impl PixelSize {
    /// Build a pixel size, clamping each dimension to at least 1.
    pub fn at_least_one(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.area().saturating_mul(4)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
