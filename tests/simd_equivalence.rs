#![cfg(feature = "simd")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stereocorr::lowlevel::{CostKernel, ScalarKernel, SimdKernel};

fn window(rng: &mut StdRng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(0.0..255.0)).collect()
}

#[test]
fn simd_kernels_match_scalar() {
    let mut rng = StdRng::seed_from_u64(11);
    for len in [1, 7, 8, 9, 25, 49, 81, 121] {
        let left = window(&mut rng, len);
        let right = window(&mut rng, len);
        let mean = left.iter().sum::<f32>() / len as f32;
        let left_zm: Vec<f32> = left.iter().map(|v| v - mean).collect();

        let tol = 1e-3 * len as f32 * 255.0;
        let a = ScalarKernel::sum_abs_diff(&left, &right);
        let b = SimdKernel::sum_abs_diff(&left, &right);
        assert!((a - b).abs() <= tol, "sad len={len}: {a} vs {b}");

        let a = ScalarKernel::sum_sqr_diff(&left, &right);
        let b = SimdKernel::sum_sqr_diff(&left, &right);
        assert!((a - b).abs() <= tol * 255.0, "ssd len={len}: {a} vs {b}");

        let (dot_a, dev_a) = ScalarKernel::xcorr_terms(&left_zm, &right);
        let (dot_b, dev_b) = SimdKernel::xcorr_terms(&left_zm, &right);
        assert!((dot_a - dot_b).abs() <= tol * 255.0, "dot len={len}");
        assert!((dev_a - dev_b).abs() <= tol * 255.0, "dev len={len}");
    }
}
