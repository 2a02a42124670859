//! Disparity map container.
//!
//! A `DisparityMap` has the dimensions of the left image. Each cell is either
//! a valid 2D offset `(dx, dy)` pointing from the left pixel to its match in
//! the right image, or invalid.

/// Offset from a left-image pixel to its right-image match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disparity {
    pub dx: f32,
    pub dy: f32,
}

impl Disparity {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length of the offset.
    pub fn magnitude(&self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

/// Dense grid of optional disparities.
#[derive(Clone, Debug, PartialEq)]
pub struct DisparityMap {
    width: usize,
    height: usize,
    cells: Vec<Option<Disparity>>,
}

impl DisparityMap {
    /// Creates an all-invalid map.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the disparity at `(x, y)`; `None` for invalid or out-of-bounds
    /// cells.
    pub fn get(&self, x: usize, y: usize) -> Option<Disparity> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some()
    }

    /// Stores a valid disparity; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, disparity: Disparity) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Some(disparity);
        }
    }

    /// Marks `(x, y)` invalid.
    pub fn invalidate(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = None;
        }
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Option<Disparity>] {
        &self.cells
    }

    /// Iterates `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Option<Disparity>)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i % width, i / width, cell))
    }

    /// Number of valid cells.
    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Share of valid cells whose offset equals `(dx, dy)` exactly.
    ///
    /// Returns `0.0` for a map without valid cells.
    pub fn fraction_equal(&self, dx: f32, dy: f32) -> f32 {
        let mut valid = 0usize;
        let mut equal = 0usize;
        for d in self.cells.iter().flatten() {
            valid += 1;
            if d.dx == dx && d.dy == dy {
                equal += 1;
            }
        }
        if valid == 0 {
            0.0
        } else {
            equal as f32 / valid as f32
        }
    }

    /// Per-axis extrema over valid cells as `(min, max)`.
    pub fn min_max(&self) -> Option<(Disparity, Disparity)> {
        let mut iter = self.cells.iter().flatten();
        let first = *iter.next()?;
        let (mut lo, mut hi) = (first, first);
        for d in iter {
            lo.dx = lo.dx.min(d.dx);
            lo.dy = lo.dy.min(d.dy);
            hi.dx = hi.dx.max(d.dx);
            hi.dy = hi.dy.max(d.dy);
        }
        Some((lo, hi))
    }

    /// Copies a row-major block of cells with its top-left corner at `(x0, y0)`.
    pub(crate) fn write_block(
        &mut self,
        x0: usize,
        y0: usize,
        block_width: usize,
        block: &[Option<Disparity>],
    ) {
        if block_width == 0 {
            return;
        }
        for (j, row) in block.chunks(block_width).enumerate() {
            let y = y0 + j;
            if y >= self.height {
                break;
            }
            let len = row.len().min(self.width.saturating_sub(x0));
            let start = y * self.width + x0;
            self.cells[start..start + len].copy_from_slice(&row[..len]);
        }
    }

    /// Renders offset magnitudes as an 8-bit image scaled by the largest
    /// valid magnitude. Invalid cells are black.
    #[cfg(feature = "image-io")]
    pub fn to_gray_image(&self) -> image::GrayImage {
        let max = self
            .cells
            .iter()
            .flatten()
            .map(Disparity::magnitude)
            .fold(0.0f32, f32::max);
        let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
        let mut out = image::GrayImage::new(self.width as u32, self.height as u32);
        for (x, y, cell) in self.iter() {
            let value = cell.map_or(0.0, |d| (d.magnitude() * scale).clamp(0.0, 255.0));
            out.put_pixel(x as u32, y as u32, image::Luma([value.round() as u8]));
        }
        out
    }
}
