//! Quadratic 1D fitting for sub-pixel disparity refinement.

/// Estimates the sub-sample offset of a cost minimum from a parabola fit.
///
/// Given costs at `x = -1, 0, +1` (`cm`, `c0`, `cp`), this returns the vertex
/// offset `dx` in `[-1, 1]` when the fitted parabola opens upward (positive
/// curvature). Flat, downward, or non-finite fits return `None`.
pub fn quad_min_offset_1d(cm: f32, c0: f32, cp: f32) -> Option<f32> {
    if !cm.is_finite() || !c0.is_finite() || !cp.is_finite() {
        return None;
    }

    let curvature = cm - 2.0 * c0 + cp;
    let eps = 1e-6f32;
    if curvature <= eps {
        return None;
    }

    let dx = 0.5 * (cm - cp) / curvature;
    if dx.is_finite() && dx.abs() <= 1.0 {
        Some(dx)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::quad_min_offset_1d;

    #[test]
    fn quad_min_offset_symmetric() {
        let dx = quad_min_offset_1d(2.0, 1.0, 2.0).unwrap();
        assert!(dx.abs() < 1e-6);
    }

    #[test]
    fn quad_min_offset_shifted() {
        let f = |x: f32| 3.0 + 2.0 * (x + 0.3).powi(2);
        let dx = quad_min_offset_1d(f(-1.0), f(0.0), f(1.0)).unwrap();
        assert!((dx + 0.3).abs() < 1e-5);
    }

    #[test]
    fn quad_min_offset_rejects_non_convex() {
        assert!(quad_min_offset_1d(0.5, 1.0, 0.5).is_none());
        assert!(quad_min_offset_1d(1.0, 1.0, 1.0).is_none());
        assert!(quad_min_offset_1d(f32::NAN, 1.0, 2.0).is_none());
    }
}
