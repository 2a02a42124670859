//! Randomly addressable pixel sources.
//!
//! The correlator only needs to read scalar samples at integer coordinates,
//! so inputs are accepted through the small `PixelSource` trait. Adapters such
//! as `Translated` compose on top of any source without copying pixels.

use crate::image::{ImageView, OwnedImage};
use crate::util::StereoResult;

/// Read-only scalar image addressed by `(column, row)`.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> usize;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Returns the sample at `(x, y)`; callers guarantee in-bounds coordinates.
    fn sample(&self, x: usize, y: usize) -> f32;
}

impl<S: PixelSource + ?Sized> PixelSource for &S {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn sample(&self, x: usize, y: usize) -> f32 {
        (**self).sample(x, y)
    }
}

impl PixelSource for ImageView<'_, u8> {
    fn width(&self) -> usize {
        ImageView::width(self)
    }

    fn height(&self) -> usize {
        ImageView::height(self)
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> f32 {
        self.get(x, y).copied().map_or(0.0, f32::from)
    }
}

impl PixelSource for ImageView<'_, f32> {
    fn width(&self) -> usize {
        ImageView::width(self)
    }

    fn height(&self) -> usize {
        ImageView::height(self)
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> f32 {
        self.get(x, y).copied().unwrap_or(0.0)
    }
}

impl PixelSource for OwnedImage<u8> {
    fn width(&self) -> usize {
        OwnedImage::width(self)
    }

    fn height(&self) -> usize {
        OwnedImage::height(self)
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> f32 {
        self.get(x, y).map_or(0.0, f32::from)
    }
}

impl PixelSource for OwnedImage<f32> {
    fn width(&self) -> usize {
        OwnedImage::width(self)
    }

    fn height(&self) -> usize {
        OwnedImage::height(self)
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> f32 {
        self.get(x, y).unwrap_or(0.0)
    }
}

/// Policy for samples requested outside the wrapped source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeExtension {
    /// Out-of-bounds samples read as zero.
    Zero,
    /// Out-of-bounds samples read as the given value.
    Constant(f32),
    /// Out-of-bounds samples repeat the nearest edge pixel.
    Nearest,
}

/// Integer translation of a source with nearest-sample lookup.
///
/// The output pixel `(x, y)` reads the input at `(x - dx, y - dy)`, so a
/// positive offset moves content right and down. Output dimensions equal the
/// input dimensions.
#[derive(Clone, Debug)]
pub struct Translated<S> {
    inner: S,
    dx: isize,
    dy: isize,
    edge: EdgeExtension,
}

impl<S: PixelSource> Translated<S> {
    /// Wraps `inner`, shifting its content by `(dx, dy)`.
    pub fn new(inner: S, dx: isize, dy: isize, edge: EdgeExtension) -> Self {
        Self {
            inner,
            dx,
            dy,
            edge,
        }
    }
}

impl<S: PixelSource> PixelSource for Translated<S> {
    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    fn sample(&self, x: usize, y: usize) -> f32 {
        let w = self.inner.width();
        let h = self.inner.height();
        let sx = x as isize - self.dx;
        let sy = y as isize - self.dy;
        let inside = sx >= 0 && sy >= 0 && (sx as usize) < w && (sy as usize) < h;
        if inside {
            return self.inner.sample(sx as usize, sy as usize);
        }
        match self.edge {
            EdgeExtension::Zero => 0.0,
            EdgeExtension::Constant(value) => value,
            EdgeExtension::Nearest => {
                let cx = sx.clamp(0, w as isize - 1) as usize;
                let cy = sy.clamp(0, h as isize - 1) as usize;
                self.inner.sample(cx, cy)
            }
        }
    }
}

/// Copies every sample of `src` into a contiguous `f32` image.
pub fn materialize<S: PixelSource + ?Sized>(src: &S) -> StereoResult<OwnedImage<f32>> {
    OwnedImage::from_fn(src.width(), src.height(), |x, y| src.sample(x, y))
}
