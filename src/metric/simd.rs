//! SIMD-accelerated cost kernels using the `wide` crate.
//!
//! Windows are processed 8 pixels at a time with `f32x8`, with a scalar
//! remainder loop. Summation order differs from the scalar kernels, so costs
//! agree to rounding, not bit for bit.

use crate::metric::CostKernel;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f32 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3] + arr[4] + arr[5] + arr[6] + arr[7]
}

/// `f32x8` kernels.
pub struct SimdKernel;

impl SimdKernel {
    #[inline]
    fn sum(values: &[f32]) -> f32 {
        let simd_end = values.len() / LANES * LANES;
        let mut acc = f32x8::ZERO;
        let mut i = 0;
        while i < simd_end {
            acc += load_f32x8(&values[i..]);
            i += LANES;
        }
        let mut tail = 0.0f32;
        for &v in &values[simd_end..] {
            tail += v;
        }
        hsum(acc) + tail
    }
}

impl CostKernel for SimdKernel {
    fn sum_abs_diff(left: &[f32], right: &[f32]) -> f32 {
        let len = left.len().min(right.len());
        let simd_end = len / LANES * LANES;
        let mut acc = f32x8::ZERO;
        let mut i = 0;
        while i < simd_end {
            let d = load_f32x8(&left[i..]) - load_f32x8(&right[i..]);
            acc += d.abs();
            i += LANES;
        }
        let mut tail = 0.0f32;
        for j in simd_end..len {
            tail += (left[j] - right[j]).abs();
        }
        hsum(acc) + tail
    }

    fn sum_sqr_diff(left: &[f32], right: &[f32]) -> f32 {
        let len = left.len().min(right.len());
        let simd_end = len / LANES * LANES;
        let mut acc = f32x8::ZERO;
        let mut i = 0;
        while i < simd_end {
            let d = load_f32x8(&left[i..]) - load_f32x8(&right[i..]);
            acc += d * d;
            i += LANES;
        }
        let mut tail = 0.0f32;
        for j in simd_end..len {
            let d = left[j] - right[j];
            tail += d * d;
        }
        hsum(acc) + tail
    }

    fn xcorr_terms(left_zero_mean: &[f32], right: &[f32]) -> (f32, f32) {
        let len = left_zero_mean.len().min(right.len());
        let n = right.len() as f32;
        let mean_r = Self::sum(right) / n;
        let mean_v = f32x8::splat(mean_r);

        let simd_end = len / LANES * LANES;
        let mut dot_v = f32x8::ZERO;
        let mut dev_v = f32x8::ZERO;
        let mut i = 0;
        while i < simd_end {
            let d = load_f32x8(&right[i..]) - mean_v;
            dot_v += load_f32x8(&left_zero_mean[i..]) * d;
            dev_v += d * d;
            i += LANES;
        }
        let mut dot_s = 0.0f32;
        let mut dev_s = 0.0f32;
        for j in simd_end..len {
            let d = right[j] - mean_r;
            dot_s += left_zero_mean[j] * d;
            dev_s += d * d;
        }
        (hsum(dot_v) + dot_s, hsum(dev_v) + dev_s)
    }
}

#[cfg(test)]
mod tests {
    use super::SimdKernel;
    use crate::metric::scalar::ScalarKernel;
    use crate::metric::CostKernel;

    fn window(n: usize, seed: usize) -> Vec<f32> {
        (0..n)
            .map(|i| ((i * 29 + seed * 53 + i * i * 7) % 211) as f32 * 0.5)
            .collect()
    }

    #[test]
    fn simd_kernels_match_scalar() {
        for n in [1usize, 7, 8, 25, 49, 81] {
            let l = window(n, 1);
            let r = window(n, 4);
            let a = SimdKernel::sum_abs_diff(&l, &r);
            let b = ScalarKernel::sum_abs_diff(&l, &r);
            assert!((a - b).abs() <= 1e-3 * b.max(1.0));
            let a = SimdKernel::sum_sqr_diff(&l, &r);
            let b = ScalarKernel::sum_sqr_diff(&l, &r);
            assert!((a - b).abs() <= 1e-3 * b.max(1.0));
            let (da, va) = SimdKernel::xcorr_terms(&l, &r);
            let (db, vb) = ScalarKernel::xcorr_terms(&l, &r);
            assert!((da - db).abs() <= 1e-2 * db.abs().max(1.0));
            assert!((va - vb).abs() <= 1e-2 * vb.max(1.0));
        }
    }
}
