//! Candidate disparity ranges and correlation window geometry.
//!
//! Candidates are enumerated row-major over the offset box: `dy` increasing in
//! the outer loop, `dx` increasing in the inner loop. Tie-breaking in the
//! correlator depends on this order.

pub(crate) mod window;

use crate::util::{StereoError, StereoResult};

/// Inclusive integer box of candidate offsets `[dx_min, dx_max] x [dy_min, dy_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchRange {
    pub dx_min: i32,
    pub dx_max: i32,
    pub dy_min: i32,
    pub dy_max: i32,
}

impl Default for SearchRange {
    fn default() -> Self {
        Self {
            dx_min: 0,
            dx_max: 0,
            dy_min: 0,
            dy_max: 0,
        }
    }
}

impl SearchRange {
    /// Creates a validated search range.
    pub fn new(dx_min: i32, dx_max: i32, dy_min: i32, dy_max: i32) -> StereoResult<Self> {
        let range = Self {
            dx_min,
            dx_max,
            dy_min,
            dy_max,
        };
        range.validate()?;
        Ok(range)
    }

    /// Horizontal-only range `[dx_min, dx_max] x [0, 0]`.
    pub fn horizontal(dx_min: i32, dx_max: i32) -> StereoResult<Self> {
        Self::new(dx_min, dx_max, 0, 0)
    }

    /// Rejects empty or inverted ranges, and bounds of `i32::MIN`, which
    /// have no negation.
    pub fn validate(&self) -> StereoResult<()> {
        if self.dx_min > self.dx_max || self.dy_min > self.dy_max {
            return Err(StereoError::EmptySearchRange {
                dx_min: self.dx_min,
                dx_max: self.dx_max,
                dy_min: self.dy_min,
                dy_max: self.dy_max,
            });
        }
        if self.dx_min == i32::MIN || self.dy_min == i32::MIN {
            return Err(StereoError::InvalidConfig {
                reason: "search range bounds must be greater than i32::MIN",
            });
        }
        Ok(())
    }

    /// Number of candidate columns.
    pub fn width(&self) -> usize {
        (self.dx_max as i64 - self.dx_min as i64 + 1).max(0) as usize
    }

    /// Number of candidate rows.
    pub fn height(&self) -> usize {
        (self.dy_max as i64 - self.dy_min as i64 + 1).max(0) as usize
    }

    /// Total number of candidates, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Returns true when the range holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true when `(dx, dy)` is one of the candidates.
    pub fn contains(&self, dx: i32, dy: i32) -> bool {
        dx >= self.dx_min && dx <= self.dx_max && dy >= self.dy_min && dy <= self.dy_max
    }

    /// Intersects the range with the inclusive offset box
    /// `[dx_lo, dx_hi] x [dy_lo, dy_hi]`; `None` when nothing is left.
    ///
    /// Iterating the result visits the surviving candidates in the same
    /// relative order as the full range.
    pub fn clipped(&self, dx_lo: i64, dx_hi: i64, dy_lo: i64, dy_hi: i64) -> Option<Self> {
        let dx_min = (self.dx_min as i64).max(dx_lo);
        let dx_max = (self.dx_max as i64).min(dx_hi);
        let dy_min = (self.dy_min as i64).max(dy_lo);
        let dy_max = (self.dy_max as i64).min(dy_hi);
        if dx_min > dx_max || dy_min > dy_max {
            return None;
        }
        // Each bound lies between two i32 bounds, so the casts are exact.
        Some(Self {
            dx_min: dx_min as i32,
            dx_max: dx_max as i32,
            dy_min: dy_min as i32,
            dy_max: dy_max as i32,
        })
    }

    /// The range seen from the other image: every offset negated.
    ///
    /// Validated ranges never hold `i32::MIN`, so the negation cannot
    /// overflow.
    pub fn negated(&self) -> Self {
        Self {
            dx_min: -self.dx_max,
            dx_max: -self.dx_min,
            dy_min: -self.dy_max,
            dy_max: -self.dy_min,
        }
    }

    /// Iterates candidates in scan order: `dy` outer, `dx` inner.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> {
        let range = *self;
        (range.dy_min..=range.dy_max)
            .flat_map(move |dy| (range.dx_min..=range.dx_max).map(move |dx| (dx, dy)))
    }
}

/// Correlation window size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KernelSize {
    pub width: usize,
    pub height: usize,
}

impl Default for KernelSize {
    fn default() -> Self {
        Self {
            width: 7,
            height: 7,
        }
    }
}

impl KernelSize {
    /// Creates a validated kernel size.
    pub fn new(width: usize, height: usize) -> StereoResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Square kernel.
    pub fn square(side: usize) -> StereoResult<Self> {
        Self::new(side, side)
    }

    /// Rejects zero extents.
    pub fn validate(&self) -> StereoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StereoError::InvalidKernelSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Half extent `(width / 2, height / 2)`.
    ///
    /// A window centered at `(x, y)` starts at `(x - rx, y - ry)`. For even
    /// sizes the center sits right of / below the geometric middle.
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Returns true when the window centered at `(x, y)` fits inside an image
    /// of `img_width x img_height`.
    pub fn fits(&self, x: usize, y: usize, img_width: usize, img_height: usize) -> bool {
        let (rx, ry) = self.radius();
        x >= rx
            && y >= ry
            && x - rx + self.width <= img_width
            && y - ry + self.height <= img_height
    }
}

#[cfg(test)]
mod tests {
    use super::{KernelSize, SearchRange};
    use crate::util::StereoError;

    #[test]
    fn search_range_scan_order_is_row_major() {
        let range = SearchRange::new(-1, 1, 2, 3).unwrap();
        let order: Vec<_> = range.iter().collect();
        assert_eq!(
            order,
            vec![(-1, 2), (0, 2), (1, 2), (-1, 3), (0, 3), (1, 3)]
        );
        assert!(order.iter().all(|&(dx, dy)| range.contains(dx, dy)));
        assert!(!range.contains(2, 2));
    }

    #[test]
    fn clipped_keeps_scan_order_of_survivors() {
        let range = SearchRange::new(-3, 3, -1, 1).unwrap();
        let clipped = range.clipped(-1, 10, 0, 0).unwrap();
        assert_eq!(clipped, SearchRange::new(-1, 3, 0, 0).unwrap());
        let expected: Vec<_> = range
            .iter()
            .filter(|&(dx, dy)| dx >= -1 && dy == 0)
            .collect();
        assert_eq!(clipped.iter().collect::<Vec<_>>(), expected);
        assert_eq!(range.clipped(4, 9, 0, 0), None);

        let wide = SearchRange::new(i32::MIN + 1, i32::MAX, 0, 0).unwrap();
        let near = wide.clipped(-2, 2, -5, 5).unwrap();
        assert_eq!(near, SearchRange::new(-2, 2, 0, 0).unwrap());
    }

    #[test]
    fn negation_is_defined_for_every_valid_range() {
        let err = SearchRange::new(i32::MIN, 0, 0, 0).unwrap_err();
        assert!(matches!(err, StereoError::InvalidConfig { .. }));
        assert!(SearchRange::new(0, 0, i32::MIN, 0).is_err());

        let wide = SearchRange::new(i32::MIN + 1, i32::MAX, -4, 7).unwrap();
        assert_eq!(
            wide.negated(),
            SearchRange::new(i32::MIN + 1, i32::MAX, -7, 4).unwrap()
        );
    }

    #[test]
    fn search_range_rejects_inverted_axes() {
        let err = SearchRange::new(3, 2, 0, 0).unwrap_err();
        assert_eq!(
            err,
            StereoError::EmptySearchRange {
                dx_min: 3,
                dx_max: 2,
                dy_min: 0,
                dy_max: 0,
            }
        );
        assert!(SearchRange::new(0, 0, 1, -1).is_err());
        assert_eq!(SearchRange::new(4, 4, 0, 0).unwrap().len(), 1);
    }

    #[test]
    fn negated_range_mirrors_bounds() {
        let range = SearchRange::new(0, 6, -2, 1).unwrap();
        assert_eq!(
            range.negated(),
            SearchRange {
                dx_min: -6,
                dx_max: 0,
                dy_min: -1,
                dy_max: 2,
            }
        );
    }

    #[test]
    fn kernel_fits_respects_odd_and_even_sizes() {
        let odd = KernelSize::square(7).unwrap();
        assert!(!odd.fits(2, 10, 50, 50));
        assert!(odd.fits(3, 3, 50, 50));
        assert!(odd.fits(46, 46, 50, 50));
        assert!(!odd.fits(47, 10, 50, 50));

        let even = KernelSize::new(4, 2).unwrap();
        assert_eq!(even.radius(), (2, 1));
        assert!(even.fits(2, 1, 6, 3));
        assert!(even.fits(4, 2, 6, 3));
        assert!(!even.fits(5, 2, 6, 3));
    }

    #[test]
    fn kernel_rejects_zero_extent() {
        assert_eq!(
            KernelSize::new(0, 3).unwrap_err(),
            StereoError::InvalidKernelSize {
                width: 0,
                height: 3,
            }
        );
    }
}
