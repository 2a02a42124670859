//! Output tiling and per-tile input footprints.

use crate::correlate::CorrelatorConfig;
use crate::image::Rect;

/// Splits a `width x height` output into row-major tiles of at most
/// `tile_size`, clipping the last row and column of tiles.
pub(crate) fn plan_tiles(width: usize, height: usize, tile_size: (usize, usize)) -> Vec<Rect> {
    let (tw, th) = (tile_size.0.max(1), tile_size.1.max(1));
    let mut tiles = Vec::with_capacity(width.div_ceil(tw) * height.div_ceil(th));
    let mut y0 = 0;
    while y0 < height {
        let y1 = (y0 + th).min(height);
        let mut x0 = 0;
        while x0 < width {
            let x1 = (x0 + tw).min(width);
            tiles.push(Rect { x0, y0, x1, y1 });
            x0 = x1;
        }
        y0 = y1;
    }
    tiles
}

/// Input rectangles a tile reads, as `(left, right)`.
///
/// The left footprint covers every reference window of the tile, plus every
/// reverse-search target window when the consistency check is enabled. The
/// right footprint covers every candidate window, widened by one pixel per
/// side for sub-pixel neighbors outside the range.
pub(crate) fn footprints(
    tile: Rect,
    config: &CorrelatorConfig,
    left_dims: (usize, usize),
    right_dims: (usize, usize),
) -> (Rect, Rect) {
    let kernel = config.kernel_size;
    let range = config.search_range;
    let (rx, ry) = kernel.radius();
    let (rx, ry) = (rx as isize, ry as isize);
    let ext_x = kernel.width as isize - 1 - rx;
    let ext_y = kernel.height as isize - 1 - ry;

    let (span_x, span_y) = if config.consistency_threshold.is_some() {
        (
            range.dx_max as isize - range.dx_min as isize,
            range.dy_max as isize - range.dy_min as isize,
        )
    } else {
        (0, 0)
    };
    let left = tile.grow_clipped(
        rx + span_x,
        ry + span_y,
        ext_x + span_x,
        ext_y + span_y,
        left_dims.0,
        left_dims.1,
    );

    let pad = isize::from(config.subpixel);
    let right = tile.grow_clipped(
        rx - range.dx_min as isize + pad,
        ry - range.dy_min as isize + pad,
        ext_x + range.dx_max as isize + pad,
        ext_y + range.dy_max as isize + pad,
        right_dims.0,
        right_dims.1,
    );
    (left, right)
}
