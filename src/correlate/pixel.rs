//! Per-pixel exhaustive search, refinement, and consistency checking.

use crate::correlate::CorrelatorConfig;
use crate::disparity::Disparity;
use crate::image::{MaskView, Patch};
use crate::metric::{Metric, WindowPlan};
use crate::refine::quad2d::{refine_disparity_2d, AxisCosts};
use crate::search::window::extract_window;
use crate::search::{KernelSize, SearchRange};

/// Filtered inputs and masks for one tile.
pub(crate) struct TileInputs<'a> {
    pub(crate) left: Patch,
    pub(crate) right: Patch,
    pub(crate) left_mask: MaskView<'a>,
    pub(crate) right_mask: MaskView<'a>,
}

/// Reusable buffers, one set per worker.
#[derive(Default)]
pub(crate) struct Scratch {
    reference: Vec<f32>,
    candidate: Vec<f32>,
    plan: WindowPlan,
}

/// Which image plays the reference role in a search.
#[derive(Clone, Copy)]
struct Side<'a> {
    reference: &'a Patch,
    reference_mask: MaskView<'a>,
    target: &'a Patch,
    target_mask: MaskView<'a>,
}

impl<'a> Side<'a> {
    fn forward(inputs: &'a TileInputs<'_>) -> Self {
        Self {
            reference: &inputs.left,
            reference_mask: inputs.left_mask,
            target: &inputs.right,
            target_mask: inputs.right_mask,
        }
    }

    fn reverse(inputs: &'a TileInputs<'_>) -> Self {
        Self {
            reference: &inputs.right,
            reference_mask: inputs.right_mask,
            target: &inputs.left,
            target_mask: inputs.left_mask,
        }
    }
}

/// Integer winner of a search.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Best {
    dx: i32,
    dy: i32,
    cost: f32,
}

/// Computes the output cell for left pixel `(x, y)`.
pub(crate) fn match_pixel(
    config: &CorrelatorConfig,
    inputs: &TileInputs<'_>,
    scratch: &mut Scratch,
    x: usize,
    y: usize,
) -> Option<Disparity> {
    let metric = config.metric;
    let kernel = config.kernel_size;
    let range = config.search_range;
    let forward = Side::forward(inputs);

    let best = search(metric, kernel, forward, scratch, x, y, range)?;

    let (dx, dy) = if config.subpixel {
        let costs = neighbor_costs(metric, kernel, forward, scratch, x, y, best);
        refine_disparity_2d(best.dx, best.dy, costs)
    } else {
        (best.dx as f32, best.dy as f32)
    };

    if let Some(threshold) = config.consistency_threshold {
        // The winner's window was fully in bounds, so it is a valid reference.
        let rx = (x as i64 + best.dx as i64) as usize;
        let ry = (y as i64 + best.dy as i64) as usize;
        let reverse = search(
            metric,
            kernel,
            Side::reverse(inputs),
            scratch,
            rx,
            ry,
            range.negated(),
        )?;
        let ex = (best.dx + reverse.dx).abs() as f32;
        let ey = (best.dy + reverse.dy).abs() as f32;
        if ex > threshold || ey > threshold {
            return None;
        }
    }

    Some(Disparity::new(dx, dy))
}

/// Scans `range` around reference pixel `(x, y)` and returns the lowest-cost
/// candidate. The first candidate in scan order wins ties.
///
/// Only offsets whose window fits the target image are visited, so the work
/// per pixel is bounded by the image size rather than the range size.
fn search(
    metric: Metric,
    kernel: KernelSize,
    side: Side<'_>,
    scratch: &mut Scratch,
    x: usize,
    y: usize,
    range: SearchRange,
) -> Option<Best> {
    let ref_w = side.reference_mask.width();
    let ref_h = side.reference_mask.height();
    if !kernel.fits(x, y, ref_w, ref_h) || !side.reference_mask.is_set(x, y) {
        return None;
    }
    if !extract_window(side.reference, kernel, x, y, &mut scratch.reference) {
        return None;
    }
    scratch.plan.reset(metric, &scratch.reference);

    let (rx, ry) = kernel.radius();
    let tgt_w = side.target_mask.width() as i64;
    let tgt_h = side.target_mask.height() as i64;
    let (x, y) = (x as i64, y as i64);
    let reachable = range.clipped(
        rx as i64 - x,
        tgt_w - (kernel.width - rx) as i64 - x,
        ry as i64 - y,
        tgt_h - (kernel.height - ry) as i64 - y,
    )?;

    let mut best: Option<Best> = None;
    for (dx, dy) in reachable.iter() {
        let cost = match candidate_cost(
            metric,
            kernel,
            side,
            &scratch.plan,
            &mut scratch.candidate,
            x as usize,
            y as usize,
            dx,
            dy,
        ) {
            Some(cost) => cost,
            None => continue,
        };
        match best {
            Some(b) if cost >= b.cost => {}
            _ => best = Some(Best { dx, dy, cost }),
        }
    }
    best
}

/// Cost of the candidate centered at `(x + dx, y + dy)` in the target image,
/// or `None` when it must be skipped.
#[allow(clippy::too_many_arguments)]
fn candidate_cost(
    metric: Metric,
    kernel: KernelSize,
    side: Side<'_>,
    plan: &WindowPlan,
    buf: &mut Vec<f32>,
    x: usize,
    y: usize,
    dx: i32,
    dy: i32,
) -> Option<f32> {
    let cx = x as i64 + dx as i64;
    let cy = y as i64 + dy as i64;
    if cx < 0 || cy < 0 {
        return None;
    }
    let (cx, cy) = (cx as usize, cy as usize);
    let tgt_w = side.target_mask.width();
    let tgt_h = side.target_mask.height();
    if cx >= tgt_w || cy >= tgt_h {
        return None;
    }
    if !side.target_mask.is_set(cx, cy) || !kernel.fits(cx, cy, tgt_w, tgt_h) {
        return None;
    }
    if !extract_window(side.target, kernel, cx, cy, buf) {
        return None;
    }
    metric.cost(plan, buf)
}

/// Evaluates the winner's ±1 neighbors per axis under the same skip rules
/// as the search, whether or not they lie inside the range.
fn neighbor_costs(
    metric: Metric,
    kernel: KernelSize,
    side: Side<'_>,
    scratch: &mut Scratch,
    x: usize,
    y: usize,
    best: Best,
) -> AxisCosts {
    let mut cost_at = |dx: i32, dy: i32| -> Option<f32> {
        candidate_cost(
            metric,
            kernel,
            side,
            &scratch.plan,
            &mut scratch.candidate,
            x,
            y,
            dx,
            dy,
        )
    };
    AxisCosts {
        center: best.cost,
        x_minus: cost_at(best.dx - 1, best.dy),
        x_plus: cost_at(best.dx + 1, best.dy),
        y_minus: cost_at(best.dx, best.dy - 1),
        y_plus: cost_at(best.dx, best.dy + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::{match_pixel, Scratch, TileInputs};
    use crate::correlate::CorrelatorConfig;
    use crate::filter::PreFilter;
    use crate::image::{OwnedImage, Rect};
    use crate::metric::Metric;
    use crate::search::{KernelSize, SearchRange};

    fn texture(width: usize, height: usize) -> OwnedImage<f32> {
        OwnedImage::from_fn(width, height, |x, y| {
            ((x * 131 + y * 71 + x * y * 17 + (x * x) * 3) % 241) as f32
        })
        .unwrap()
    }

    fn shifted(src: &OwnedImage<f32>, dx: usize) -> OwnedImage<f32> {
        OwnedImage::from_fn(src.width(), src.height(), |x, y| {
            if x >= dx {
                src.get(x - dx, y).unwrap_or(0.0)
            } else {
                0.0
            }
        })
        .unwrap()
    }

    fn inputs<'a>(
        left: &OwnedImage<f32>,
        right: &OwnedImage<f32>,
        left_mask: &'a OwnedImage<u8>,
        right_mask: &'a OwnedImage<u8>,
    ) -> TileInputs<'a> {
        TileInputs {
            left: PreFilter::Null.apply_region(left, Rect::full(left.width(), left.height())),
            right: PreFilter::Null.apply_region(right, Rect::full(right.width(), right.height())),
            left_mask: left_mask.view(),
            right_mask: right_mask.view(),
        }
    }

    #[test]
    fn finds_horizontal_shift() {
        let left = texture(24, 12);
        let right = shifted(&left, 2);
        let mask = OwnedImage::filled(24, 12, 1u8).unwrap();
        let tile = inputs(&left, &right, &mask, &mask);
        let config = CorrelatorConfig {
            kernel_size: KernelSize::square(5).unwrap(),
            search_range: SearchRange::horizontal(0, 4).unwrap(),
            ..CorrelatorConfig::default()
        };
        let mut scratch = Scratch::default();
        let d = match_pixel(&config, &tile, &mut scratch, 8, 6).unwrap();
        assert_eq!((d.dx, d.dy), (2.0, 0.0));
    }

    #[test]
    fn equal_costs_keep_first_candidate_in_scan_order() {
        let left = OwnedImage::filled(16, 16, 5.0f32).unwrap();
        let mask = OwnedImage::filled(16, 16, 1u8).unwrap();
        let tile = inputs(&left, &left, &mask, &mask);
        let config = CorrelatorConfig {
            kernel_size: KernelSize::square(3).unwrap(),
            search_range: SearchRange::new(-2, 2, -1, 1).unwrap(),
            metric: Metric::AbsDiff,
            ..CorrelatorConfig::default()
        };
        let mut scratch = Scratch::default();
        let d = match_pixel(&config, &tile, &mut scratch, 8, 8).unwrap();
        assert_eq!((d.dx, d.dy), (-2.0, -1.0));
    }

    #[test]
    fn masked_reference_or_border_is_invalid() {
        let left = texture(16, 16);
        let mut left_mask = OwnedImage::filled(16, 16, 1u8).unwrap();
        left_mask.set(8, 8, 0);
        let right_mask = OwnedImage::filled(16, 16, 1u8).unwrap();
        let tile = inputs(&left, &left, &left_mask, &right_mask);
        let config = CorrelatorConfig {
            kernel_size: KernelSize::square(5).unwrap(),
            search_range: SearchRange::new(-1, 1, -1, 1).unwrap(),
            ..CorrelatorConfig::default()
        };
        let mut scratch = Scratch::default();
        assert!(match_pixel(&config, &tile, &mut scratch, 8, 8).is_none());
        assert!(match_pixel(&config, &tile, &mut scratch, 1, 8).is_none());
        assert!(match_pixel(&config, &tile, &mut scratch, 9, 8).is_some());
    }

    #[test]
    fn masked_candidates_are_skipped() {
        let left = texture(20, 12);
        let right = shifted(&left, 2);
        let left_mask = OwnedImage::filled(20, 12, 1u8).unwrap();
        let mut right_mask = OwnedImage::filled(20, 12, 1u8).unwrap();
        right_mask.set(12, 6, 0);
        let tile = inputs(&left, &right, &left_mask, &right_mask);
        let config = CorrelatorConfig {
            kernel_size: KernelSize::square(5).unwrap(),
            search_range: SearchRange::horizontal(0, 4).unwrap(),
            ..CorrelatorConfig::default()
        };
        let mut scratch = Scratch::default();
        let d = match_pixel(&config, &tile, &mut scratch, 10, 6).unwrap();
        assert_ne!(d.dx, 2.0);
    }
}
