//! Preprocessing filters applied to each image before matching.
//!
//! Filters are pure per-image transforms with identical output dimensions.
//! They read through `PixelSource` and produce `f32` samples; masks are never
//! touched. A filter may be evaluated on a sub-rectangle (`apply_region`),
//! which yields exactly the values the full-image evaluation would.

mod gaussian;

use crate::image::{OwnedImage, Patch, PixelSource, Rect};
use crate::util::math::gaussian_weights;
use crate::util::StereoResult;

/// Gaussian sigma used by [`PreFilter::Blur`].
pub const BLUR_SIGMA: f32 = 1.5;

/// Gaussian sigma of the surround used by [`PreFilter::Log`] and
/// [`PreFilter::SLog`].
pub const LOG_SIGMA: f32 = 1.5;

/// Preprocessing filter selected once per correlation call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PreFilter {
    /// Identity.
    #[default]
    Null,
    /// Gaussian smoothing with [`BLUR_SIGMA`].
    Blur,
    /// Unsigned center-surround response `|I - G * I|`.
    Log,
    /// Sign of the center-surround response `I - G * I`, as `-1`, `0` or `+1`.
    SLog,
}

impl PreFilter {
    /// Short lowercase name, used in logs and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            PreFilter::Null => "null",
            PreFilter::Blur => "blur",
            PreFilter::Log => "log",
            PreFilter::SLog => "slog",
        }
    }

    /// Filters the whole source image.
    pub fn apply<S: PixelSource + ?Sized>(&self, src: &S) -> StereoResult<OwnedImage<f32>> {
        self.apply_region(src, Rect::full(src.width(), src.height()))
            .into_image()
    }

    /// Filters the pixels of `rect`, reading neighbors from the whole source.
    ///
    /// `rect` must lie inside the source image.
    pub fn apply_region<S: PixelSource + ?Sized>(&self, src: &S, rect: Rect) -> Patch {
        debug_assert!(rect.x1 <= src.width() && rect.y1 <= src.height());
        let data = match self {
            PreFilter::Null => {
                let mut data = Vec::with_capacity(rect.width() * rect.height());
                for y in rect.y0..rect.y1 {
                    for x in rect.x0..rect.x1 {
                        data.push(src.sample(x, y));
                    }
                }
                data
            }
            PreFilter::Blur => gaussian::smooth_region(src, rect, &gaussian_weights(BLUR_SIGMA)),
            PreFilter::Log => center_surround(src, rect, |d| d.abs()),
            PreFilter::SLog => center_surround(src, rect, sign),
        };
        Patch::from_parts(rect, data)
    }
}

fn center_surround<S, F>(src: &S, rect: Rect, map: F) -> Vec<f32>
where
    S: PixelSource + ?Sized,
    F: Fn(f32) -> f32,
{
    let mut data = gaussian::smooth_region(src, rect, &gaussian_weights(LOG_SIGMA));
    let mut idx = 0;
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            data[idx] = map(src.sample(x, y) - data[idx]);
            idx += 1;
        }
    }
    data
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
