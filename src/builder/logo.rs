use image::Rgba;
use log::debug;

use crate::common::PixelBuffer;

// Logo compositor
//------------------------------------------------------------------------------

/// Share of the symbol's width and height a logo covers when no valid percent is given.
pub const DEFAULT_LOGO_PERCENT: f32 = 0.2;

/// Maps anything outside (0, 1], NaN included, to [`DEFAULT_LOGO_PERCENT`].
pub fn normalize_percent(percent: f32) -> f32 {
    if percent > 0.0 && percent <= 1.0 {
        percent
    } else {
        DEFAULT_LOGO_PERCENT
    }
}

/// Draws `logo` over the middle of `base`, stretched to `percent` of the base's dimensions.
///
/// The logo is scaled around the midpoint of the base with its unscaled top left corner at
/// `mid - logo_dim / 2`, and alpha blended over the base. Without a logo the base is returned
/// untouched.
pub fn composite(base: PixelBuffer, logo: Option<&PixelBuffer>, percent: f32) -> PixelBuffer {
    let Some(logo) = logo else {
        return base;
    };
    let (bw, bh) = base.dimensions();
    let (lw, lh) = logo.dimensions();
    if bw == 0 || bh == 0 || lw == 0 || lh == 0 {
        return base;
    }

    let p = normalize_percent(percent);
    let sx = bw as f32 * p / lw as f32;
    let sy = bh as f32 * p / lh as f32;
    let tw = ((lw as f32 * sx).round() as u32).max(1);
    let th = ((lh as f32 * sy).round() as u32).max(1);

    let (cx, cy) = ((bw / 2) as f32, (bh / 2) as f32);
    let left = (cx - (lw / 2) as f32 * sx).round() as i64;
    let top = (cy - (lh / 2) as f32 * sy).round() as i64;
    debug!("Placing {tw}x{th} logo at ({left}, {top})");

    let scaled = logo.scaled(tw, th).to_rgba_image();
    let mut canvas = base.to_rgba_image();
    for (x, y, src) in scaled.enumerate_pixels() {
        let (cx, cy) = (left + x as i64, top + y as i64);
        if cx < 0 || cy < 0 || cx >= bw as i64 || cy >= bh as i64 {
            continue;
        }
        let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
        *dst = blend_over(*dst, *src);
    }
    PixelBuffer::from(&canvas)
}

/// Source-over blend. Over an opaque destination the result stays opaque.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([mix(0), mix(1), mix(2), (out_a * 255.0).round() as u8])
}
