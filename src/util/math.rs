//! Numeric helpers shared by filters and metrics.

/// Builds a normalized 1D Gaussian kernel with radius `ceil(3 * sigma)`.
///
/// The returned weights sum to one and are symmetric around the center tap.
/// A non-positive sigma yields the identity kernel `[1.0]`.
pub(crate) fn gaussian_weights(sigma: f32) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil() as isize;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let d = i as f32;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    weights
}

/// Clamps a signed coordinate into `[0, len - 1]`.
#[inline]
pub(crate) fn clamp_index(i: isize, len: usize) -> usize {
    if i <= 0 {
        0
    } else {
        (i as usize).min(len - 1)
    }
}
