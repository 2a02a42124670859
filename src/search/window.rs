//! Window extraction from filtered patches.

use crate::image::Patch;
use crate::search::KernelSize;

/// Copies the window centered at `(x, y)` into `out` in row-major order.
///
/// Returns `false` (leaving `out` unspecified) when the window is not fully
/// covered by the patch. Callers check image bounds beforehand; this only
/// guards against a patch that was planned too small.
pub(crate) fn extract_window(
    patch: &Patch,
    kernel: KernelSize,
    x: usize,
    y: usize,
    out: &mut Vec<f32>,
) -> bool {
    let (rx, ry) = kernel.radius();
    if x < rx || y < ry {
        return false;
    }
    let x0 = x - rx;
    let y0 = y - ry;
    out.clear();
    for row in y0..y0 + kernel.height {
        match patch.segment(x0, row, kernel.width) {
            Some(segment) => out.extend_from_slice(segment),
            None => return false,
        }
    }
    true
}
