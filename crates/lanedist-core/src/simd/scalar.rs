//! Scalar fallback implementations for the distance and normalization kernels.
//!
//! These functions serve as:
//! - Fallback on platforms without SIMD support
//! - Reference implementations for testing SIMD correctness
//! - The degenerate lane-width-1 case of the blocked/remainder pattern

/// Scalar dot product.
#[inline]
#[must_use]
pub fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scalar squared Euclidean (L2²) distance.
#[inline]
#[must_use]
pub fn squared_l2_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Scalar Manhattan (L1) distance.
#[inline]
#[must_use]
pub fn manhattan_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Scalar fused pass: dot product and both squared norms in one traversal.
///
/// Returns `(dot, norm_a_sq, norm_b_sq)`. The cosine and angular metrics
/// apply their post-transforms on top of these three sums.
#[inline]
#[must_use]
pub fn dot_norms_scalar(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    let mut dot = 0.0_f32;
    let mut norm_a_sq = 0.0_f32;
    let mut norm_b_sq = 0.0_f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }

    (dot, norm_a_sq, norm_b_sq)
}

/// Scalar sum of squares of a single vector.
#[inline]
#[must_use]
pub fn norm_sq_scalar(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum()
}

/// Scalar in-place normalization.
///
/// No-op when the Euclidean norm is zero, so the all-zero vector is left
/// unchanged rather than filled with NaN.
#[inline]
pub fn normalize_scalar(v: &mut [f32]) {
    let norm = norm_sq_scalar(v).sqrt();
    if norm == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
}
