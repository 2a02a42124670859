//! Separable per-axis refinement of an integer disparity.

use crate::refine::quad1d::quad_min_offset_1d;

/// Costs around an integer winner: the center and its ±1 neighbors per axis.
///
/// A neighbor is `None` when it could not be evaluated (out of bounds,
/// masked, or undefined under the metric).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisCosts {
    pub center: f32,
    pub x_minus: Option<f32>,
    pub x_plus: Option<f32>,
    pub y_minus: Option<f32>,
    pub y_plus: Option<f32>,
}

/// Refines `(dx, dy)` independently along each axis.
///
/// Each axis moves to the fitted parabola vertex only when both of its
/// neighbors exist and the fit is well posed; otherwise it keeps the integer
/// value.
pub fn refine_disparity_2d(dx: i32, dy: i32, costs: AxisCosts) -> (f32, f32) {
    let fit = |minus: Option<f32>, plus: Option<f32>| match (minus, plus) {
        (Some(cm), Some(cp)) => quad_min_offset_1d(cm, costs.center, cp).unwrap_or(0.0),
        _ => 0.0,
    };
    let ox = fit(costs.x_minus, costs.x_plus);
    let oy = fit(costs.y_minus, costs.y_plus);
    (dx as f32 + ox, dy as f32 + oy)
}
