//! Separable Gaussian smoothing over image regions.
//!
//! Borders are handled by clamping to the full source image, never to the
//! requested region, so a pixel's smoothed value does not depend on which
//! region it was computed in. Both passes accumulate taps in the same order
//! for every pixel, which keeps results bit-identical across tilings.

use crate::image::{PixelSource, Rect};
use crate::util::math::clamp_index;

/// Smooths `rect` of `src` with the symmetric 1D kernel `weights` applied
/// along x and then along y. Returns row-major values for `rect`.
pub(crate) fn smooth_region<S: PixelSource + ?Sized>(
    src: &S,
    rect: Rect,
    weights: &[f32],
) -> Vec<f32> {
    let width = src.width();
    let height = src.height();
    let radius = (weights.len() / 2) as isize;
    let out_w = rect.width();
    let out_h = rect.height();
    if out_w == 0 || out_h == 0 {
        return Vec::new();
    }

    // Horizontal pass over every source row the vertical pass can touch.
    let row_lo = clamp_index(rect.y0 as isize - radius, height);
    let row_hi = clamp_index(rect.y1 as isize - 1 + radius, height) + 1;
    let mut horiz = vec![0.0f32; (row_hi - row_lo) * out_w];
    for sy in row_lo..row_hi {
        let dst = &mut horiz[(sy - row_lo) * out_w..(sy - row_lo + 1) * out_w];
        for (i, value) in dst.iter_mut().enumerate() {
            let x = (rect.x0 + i) as isize;
            let mut acc = 0.0f32;
            for (k, &w) in weights.iter().enumerate() {
                let sx = clamp_index(x + k as isize - radius, width);
                acc += w * src.sample(sx, sy);
            }
            *value = acc;
        }
    }

    let mut out = vec![0.0f32; out_w * out_h];
    for j in 0..out_h {
        let y = (rect.y0 + j) as isize;
        let dst = &mut out[j * out_w..(j + 1) * out_w];
        for (k, &w) in weights.iter().enumerate() {
            let sy = clamp_index(y + k as isize - radius, height);
            let src_row = &horiz[(sy - row_lo) * out_w..(sy - row_lo + 1) * out_w];
            for (value, &h) in dst.iter_mut().zip(src_row) {
                *value += w * h;
            }
        }
    }
    out
}
