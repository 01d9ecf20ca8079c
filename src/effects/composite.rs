use crate::foundation::core::PixelSize;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::{mul_div255_u8, mul_div255_u16};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u16(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Porter-Duff destination-in against a coverage byte: keeps `dst` where the mask is opaque,
/// scales it down where the mask fades, and never adds color.
pub fn destination_in(dst: PremulRgba8, coverage: u8) -> PremulRgba8 {
    match coverage {
        255 => dst,
        0 => [0; 4],
        c => {
            let c = u16::from(c);
            [
                mul_div255_u8(u16::from(dst[0]), c),
                mul_div255_u8(u16::from(dst[1]), c),
                mul_div255_u8(u16::from(dst[2]), c),
                mul_div255_u8(u16::from(dst[3]), c),
            ]
        }
    }
}

/// Screen blend: `s + d - s*d`, per premultiplied channel. Never darkens the backdrop.
pub fn screen(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u16(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let mut out = [0u8; 4];
    for i in 0..4 {
        let s = mul_div255_u8(u16::from(src[i]), op);
        let sd = mul_div255_u16(u16::from(s), u16::from(dst[i]));
        out[i] = (u16::from(s) + u16::from(dst[i]) - sd).min(255) as u8;
    }
    out
}

/// Blend `src` onto `dst` at integer device-pixel `origin`, clipping to `dst`.
///
/// Both buffers are tightly packed premultiplied RGBA8.
pub fn blend_region(
    dst: &mut [u8],
    dst_size: PixelSize,
    src: &[u8],
    src_size: PixelSize,
    origin: (i64, i64),
    blend: impl Fn(PremulRgba8, PremulRgba8) -> PremulRgba8,
) -> OverlayResult<()> {
    if dst.len() != dst_size.rgba_len() || src.len() != src_size.rgba_len() {
        return Err(OverlayError::surface(
            "blend_region expects buffers matching width*height*4",
        ));
    }

    let (ox, oy) = origin;
    let x0 = ox.max(0);
    let y0 = oy.max(0);
    let x1 = (ox + i64::from(src_size.width)).min(i64::from(dst_size.width));
    let y1 = (oy + i64::from(src_size.height)).min(i64::from(dst_size.height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let dw = dst_size.width as usize;
    let sw = src_size.width as usize;
    for y in y0..y1 {
        let sy = (y - oy) as usize;
        for x in x0..x1 {
            let sx = (x - ox) as usize;
            let si = (sy * sw + sx) * 4;
            let di = (y as usize * dw + x as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&blend(d, s));
        }
    }
    Ok(())
}

/// Nearest-neighbor resample of a packed RGBA8 buffer.
pub fn resample_nearest(src: &[u8], src_size: PixelSize, dst_size: PixelSize) -> OverlayResult<Vec<u8>> {
    if src.len() != src_size.rgba_len() {
        return Err(OverlayError::surface(
            "resample_nearest expects src matching width*height*4",
        ));
    }
    if src_size == dst_size {
        return Ok(src.to_vec());
    }

    let (sw, sh) = (src_size.width as usize, src_size.height as usize);
    let (dw, dh) = (dst_size.width as usize, dst_size.height as usize);
    let mut out = vec![0u8; dst_size.rgba_len()];
    for y in 0..dh {
        let sy = (y * sh / dh).min(sh - 1);
        for x in 0..dw {
            let sx = (x * sw / dw).min(sw - 1);
            let si = (sy * sw + sx) * 4;
            let di = (y * dw + x) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    Ok(out)
}

fn opacity_u16(opacity: f32) -> u16 {
    if !opacity.is_finite() {
        return 0;
    }
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
