//! Window similarity metrics expressed as costs (lower is better).
//!
//! The reference window is prepared once per pixel into a `WindowPlan`
//! (zero-mean values and spread for normalized cross-correlation), then scored
//! against every candidate window. Scalar kernels are always available; the
//! `simd` feature swaps in `wide::f32x8` kernels for the inner loops.

pub(crate) mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(not(feature = "simd"))]
use scalar::ScalarKernel as ActiveKernel;
#[cfg(feature = "simd")]
use simd::SimdKernel as ActiveKernel;

/// Windows whose standard deviation is at or below this value are treated as
/// flat; normalized cross-correlation is undefined for them.
pub const NCC_MIN_STDDEV: f32 = 1e-4;

/// Inner-loop kernels used to evaluate metrics over flattened windows.
pub trait CostKernel {
    /// Sum of absolute differences.
    fn sum_abs_diff(left: &[f32], right: &[f32]) -> f32;

    /// Sum of squared differences.
    fn sum_sqr_diff(left: &[f32], right: &[f32]) -> f32;

    /// Returns `(dot, dev2)` where `dot = sum(l' * (r - mean_r))` and
    /// `dev2 = sum((r - mean_r)^2)`, with `l'` the zero-mean reference.
    fn xcorr_terms(left_zero_mean: &[f32], right: &[f32]) -> (f32, f32);
}

/// Correlation metric used to score candidate windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Sum of `|l - r|`.
    #[default]
    AbsDiff,
    /// Sum of `(l - r)^2`.
    SqrDiff,
    /// `1 - ncc`, where `ncc` is the normalized cross-correlation in `[-1, 1]`.
    NormXCorr,
}

impl Metric {
    /// Short lowercase name, used in logs and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::AbsDiff => "abs_diff",
            Metric::SqrDiff => "sqr_diff",
            Metric::NormXCorr => "norm_xcorr",
        }
    }

    /// Prepares the reference window for repeated scoring.
    pub fn plan(&self, window: &[f32]) -> WindowPlan {
        WindowPlan::new(*self, window)
    }

    /// Cost of matching the planned reference window against `right`.
    ///
    /// Returns `None` when the metric is undefined for the pair (flat window
    /// under normalized cross-correlation, non-finite arithmetic, or a size
    /// mismatch).
    pub fn cost(&self, plan: &WindowPlan, right: &[f32]) -> Option<f32> {
        cost_with::<ActiveKernel>(*self, plan, right)
    }

    /// Convenience wrapper scoring two raw windows.
    pub fn cost_of(&self, left: &[f32], right: &[f32]) -> Option<f32> {
        self.cost(&self.plan(left), right)
    }
}

pub(crate) fn cost_with<K: CostKernel>(
    metric: Metric,
    plan: &WindowPlan,
    right: &[f32],
) -> Option<f32> {
    if right.len() != plan.values.len() || right.is_empty() {
        return None;
    }
    let cost = match metric {
        Metric::AbsDiff => K::sum_abs_diff(&plan.values, right),
        Metric::SqrDiff => K::sum_sqr_diff(&plan.values, right),
        Metric::NormXCorr => {
            if plan.stddev <= NCC_MIN_STDDEV {
                return None;
            }
            let (dot, dev2) = K::xcorr_terms(&plan.zero_mean, right);
            let n = right.len() as f32;
            if (dev2 / n).sqrt() <= NCC_MIN_STDDEV {
                return None;
            }
            let score = dot / (plan.dev2 * dev2).sqrt();
            1.0 - score
        }
    };
    cost.is_finite().then_some(cost)
}

/// Precomputed reference window.
#[derive(Clone, Debug, Default)]
pub struct WindowPlan {
    values: Vec<f32>,
    zero_mean: Vec<f32>,
    dev2: f32,
    stddev: f32,
}

impl WindowPlan {
    fn new(metric: Metric, window: &[f32]) -> Self {
        let mut plan = Self::default();
        plan.reset(metric, window);
        plan
    }

    /// Rebuilds the plan in place, reusing allocations.
    pub(crate) fn reset(&mut self, metric: Metric, window: &[f32]) {
        self.values.clear();
        self.values.extend_from_slice(window);
        self.zero_mean.clear();
        self.dev2 = 0.0;
        self.stddev = 0.0;
        if metric != Metric::NormXCorr || window.is_empty() {
            return;
        }
        let n = window.len() as f32;
        let mean = window.iter().sum::<f32>() / n;
        let mut dev2 = 0.0f32;
        for &v in window {
            let d = v - mean;
            self.zero_mean.push(d);
            dev2 += d * d;
        }
        self.dev2 = dev2;
        self.stddev = (dev2 / n).sqrt();
    }

    /// Raw reference values in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Standard deviation of the reference window (normalized
    /// cross-correlation plans only, zero otherwise).
    pub fn stddev(&self) -> f32 {
        self.stddev
    }
}
