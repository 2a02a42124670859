//! Image views, owned buffers, and filtered patches.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. `OwnedImage` is the
//! contiguous owned counterpart used for filter output and test fixtures.
//! Masks use the same types with `u8` elements, non-zero meaning valid.

use crate::util::{StereoError, StereoResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod source;

pub use source::{materialize, EdgeExtension, PixelSource, Translated};

/// Borrowed validity mask; non-zero entries are valid pixels.
pub type MaskView<'a> = ImageView<'a, u8>;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> StereoResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> StereoResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(StereoError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

impl ImageView<'_, u8> {
    /// Returns true when the mask entry at `(x, y)` exists and is non-zero.
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        matches!(self.get(x, y), Some(&v) if v != 0)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> StereoResult<usize> {
    if width == 0 || height == 0 {
        return Err(StereoError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(StereoError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(StereoError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy> OwnedImage<T> {
    /// Wraps a row-major buffer of exactly `width * height` elements.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> StereoResult<Self> {
        if width == 0 || height == 0 {
            return Err(StereoError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(StereoError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(StereoError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(StereoError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image with every element set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> StereoResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(StereoError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> StereoResult<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let len = width
            .checked_mul(height)
            .ok_or(StereoError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Overwrites the element at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }
}

/// Axis-aligned pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Rect {
    /// Rectangle covering a full `width x height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    /// Height of the rectangle.
    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    /// Returns true when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns true when `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Grows the rectangle by signed per-side margins and clips it to
    /// `[0, width) x [0, height)`.
    ///
    /// Negative margins shrink the corresponding side.
    pub fn grow_clipped(
        &self,
        left: isize,
        top: isize,
        right: isize,
        bottom: isize,
        width: usize,
        height: usize,
    ) -> Self {
        let clip = |v: isize, max: usize| -> usize {
            if v <= 0 {
                0
            } else {
                (v as usize).min(max)
            }
        };
        let x0 = clip(self.x0 as isize - left, width);
        let y0 = clip(self.y0 as isize - top, height);
        let x1 = clip(self.x1 as isize + right, width).max(x0);
        let y1 = clip(self.y1 as isize + bottom, height).max(y0);
        Self { x0, y0, x1, y1 }
    }
}

/// Filtered pixels for a sub-rectangle of an image, addressed in the
/// coordinates of the full image.
#[derive(Clone, Debug)]
pub struct Patch {
    rect: Rect,
    data: Vec<f32>,
}

impl Patch {
    pub(crate) fn from_parts(rect: Rect, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), rect.width() * rect.height());
        Self { rect, data }
    }

    /// Returns the covered rectangle in full-image coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Returns the pixel at full-image coordinates `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if !self.rect.contains(x, y) {
            return None;
        }
        let idx = (y - self.rect.y0) * self.rect.width() + (x - self.rect.x0);
        self.data.get(idx).copied()
    }

    /// Returns `len` consecutive pixels of row `y` starting at column `x`.
    pub fn segment(&self, x: usize, y: usize, len: usize) -> Option<&[f32]> {
        if len == 0 || !self.rect.contains(x, y) || x + len > self.rect.x1 {
            return None;
        }
        let start = (y - self.rect.y0) * self.rect.width() + (x - self.rect.x0);
        self.data.get(start..start + len)
    }

    /// Converts the patch into an owned image of the covered rectangle.
    pub fn into_image(self) -> StereoResult<OwnedImage<f32>> {
        OwnedImage::new(self.data, self.rect.width(), self.rect.height())
    }
}

#[cfg(test)]
mod tests {
    use super::{OwnedImage, Patch, Rect};

    #[test]
    fn rect_grow_clips_to_image() {
        let r = Rect {
            x0: 2,
            y0: 3,
            x1: 6,
            y1: 7,
        };
        let g = r.grow_clipped(4, 1, 10, -2, 12, 10);
        assert_eq!(
            g,
            Rect {
                x0: 0,
                y0: 2,
                x1: 12,
                y1: 5,
            }
        );
    }

    #[test]
    fn patch_uses_full_image_coordinates() {
        let rect = Rect {
            x0: 3,
            y0: 2,
            x1: 6,
            y1: 4,
        };
        let patch = Patch::from_parts(rect, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(patch.get(3, 2), Some(0.0));
        assert_eq!(patch.get(5, 3), Some(5.0));
        assert_eq!(patch.get(2, 2), None);
        assert_eq!(patch.segment(4, 3, 2), Some(&[4.0f32, 5.0][..]));
        assert!(patch.segment(4, 3, 3).is_none());
    }

    #[test]
    fn owned_image_from_fn_is_row_major() {
        let img = OwnedImage::from_fn(3, 2, |x, y| (x + 10 * y) as u8).unwrap();
        assert_eq!(img.data(), &[0u8, 1, 2, 10, 11, 12]);
        assert_eq!(img.get(2, 1), Some(12));
        assert_eq!(img.get(3, 1), None);
    }
}
