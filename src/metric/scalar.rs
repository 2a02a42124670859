//! Scalar reference kernels for cost evaluation.

use crate::metric::CostKernel;

/// Straightforward loops over flattened windows.
pub struct ScalarKernel;

impl CostKernel for ScalarKernel {
    #[inline]
    fn sum_abs_diff(left: &[f32], right: &[f32]) -> f32 {
        let mut acc = 0.0f32;
        for (&l, &r) in left.iter().zip(right) {
            acc += (l - r).abs();
        }
        acc
    }

    #[inline]
    fn sum_sqr_diff(left: &[f32], right: &[f32]) -> f32 {
        let mut acc = 0.0f32;
        for (&l, &r) in left.iter().zip(right) {
            let d = l - r;
            acc += d * d;
        }
        acc
    }

    #[inline]
    fn xcorr_terms(left_zero_mean: &[f32], right: &[f32]) -> (f32, f32) {
        let n = right.len() as f32;
        let mean_r = right.iter().sum::<f32>() / n;
        let mut dot = 0.0f32;
        let mut dev2 = 0.0f32;
        for (&l, &r) in left_zero_mean.iter().zip(right) {
            let d = r - mean_r;
            dot += l * d;
            dev2 += d * d;
        }
        (dot, dev2)
    }
}
