//! Runtime SIMD level detection and dispatch wiring.
//!
//! This module provides:
//! - `SimdLevel` enum for representing detected SIMD capability
//! - `simd_level()` for cached runtime detection
//! - All public distance/normalization entry points, which route the
//!   accumulation to ISA-specific kernels and apply the per-metric
//!   post-transforms (sqrt, clamping, zero-norm fallbacks)

use super::scalar;
use crate::metric::Metric;
use rayon::prelude::*;

// =============================================================================
// Cached SIMD Level Detection
// =============================================================================

/// SIMD capability level detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// AVX2 + FMA available (x86_64 only).
    Avx2,
    /// NEON available (aarch64, always true).
    Neon,
    /// Scalar fallback.
    Scalar,
}

/// Cached SIMD level - detected once at first use.
static SIMD_LEVEL: std::sync::OnceLock<SimdLevel> = std::sync::OnceLock::new();

fn probe_simd_level() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            return SimdLevel::Avx2;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return SimdLevel::Neon;
    }

    #[allow(unreachable_code)]
    SimdLevel::Scalar
}

fn detect_simd_level() -> SimdLevel {
    let level = probe_simd_level();
    tracing::debug!(?level, "detected SIMD capability");
    level
}

/// Returns the cached SIMD capability level.
#[inline]
#[must_use]
pub fn simd_level() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(detect_simd_level)
}

// =============================================================================
// Accumulation dispatch (internal)
// =============================================================================

#[allow(clippy::inline_always)]
#[inline(always)]
fn dot_and_norms(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 8 => unsafe { super::dot_norms_avx2(a, b) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if a.len() >= 4 => super::dot_norms_neon(a, b),
        _ => scalar::dot_norms_scalar(a, b),
    }
}

#[allow(clippy::inline_always)]
#[inline(always)]
fn sum_squares(v: &[f32]) -> f32 {
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if v.len() >= 8 => unsafe { super::norm_sq_avx2(v) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if v.len() >= 4 => super::norm_sq_neon(v),
        _ => scalar::norm_sq_scalar(v),
    }
}

// =============================================================================
// Public API with cached dispatch
// =============================================================================

/// Dot product with automatic dispatch to the best available SIMD.
///
/// Not itself a distance metric; exposed because callers that pre-normalize
/// their vectors can rank by dot product alone.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 64 => unsafe { super::dot_product_avx2_2acc(a, b) },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 8 => unsafe { super::dot_product_avx2(a, b) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if a.len() >= 4 => super::dot_product_neon(a, b),
        _ => scalar::dot_scalar(a, b),
    }
}

/// Squared Euclidean (L2²) distance: `Σ (a[i]-b[i])²`.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 64 => unsafe { super::squared_l2_avx2_2acc(a, b) },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 8 => unsafe { super::squared_l2_avx2(a, b) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if a.len() >= 4 => super::squared_l2_neon(a, b),
        _ => scalar::squared_l2_scalar(a, b),
    }
}

/// Euclidean (L2) distance: the square root of [`squared_euclidean`].
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Manhattan (L1) distance: `Σ |a[i]-b[i]|`.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn manhattan(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 64 => unsafe { super::manhattan_avx2_2acc(a, b) },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if a.len() >= 8 => unsafe { super::manhattan_avx2(a, b) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if a.len() >= 4 => super::manhattan_neon(a, b),
        _ => scalar::manhattan_scalar(a, b),
    }
}

/// Cosine distance: `1 - cos(a, b)`, in `[0, 2]`.
///
/// Accumulates the dot product and both squared norms in one fused pass.
/// If either vector has zero norm, returns exactly `1.0` (maximum cosine
/// distance) instead of dividing by zero. The similarity is clamped to
/// `[-1, 1]` before subtraction to guard against floating-point overshoot.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let (dot, norm_a_sq, norm_b_sq) = dot_and_norms(a, b);

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let cosine = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    1.0 - cosine
}

/// Angular distance: `acos(cos(a, b))` in radians, in `[0, π]`.
///
/// Shares the fused dot+norms accumulation of [`cosine_distance`]. If either
/// vector has zero norm, returns exactly `π` (maximum angular separation).
/// The cosine is clamped to `[-1, 1]` and then snapped exactly to a bound
/// when within `1e-3` of it, so `acos` never sees a value perturbed just
/// outside its domain by rounding.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let (dot, norm_a_sq, norm_b_sq) = dot_and_norms(a, b);

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return std::f32::consts::PI;
    }

    let mut cosine = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);

    // Snap to the bound when rounding has left the cosine marginally inside
    // it; acos is extremely steep near ±1.
    if (1.0 - cosine).abs() < 1e-3 {
        cosine = 1.0;
    } else if (cosine + 1.0).abs() < 1e-3 {
        cosine = -1.0;
    }

    cosine.acos()
}

/// Dot-product distance: `1 - dot(a, b)`.
///
/// Larger dot product means smaller distance; for unit-norm inputs the
/// value coincides with [`cosine_distance`]. Unbounded below for
/// non-normalized inputs.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn dot_product_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - dot_product(a, b)
}

/// Euclidean norm of a vector.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    sum_squares(v).sqrt()
}

/// Normalizes a vector in place to unit Euclidean norm.
///
/// No-op when the norm is zero, so the all-zero vector is left unchanged
/// rather than filled with NaN.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn normalize(v: &mut [f32]) {
    match simd_level() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if v.len() >= 8 => unsafe { super::normalize_avx2(v) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if v.len() >= 4 => super::normalize_neon(v),
        _ => scalar::normalize_scalar(v),
    }
}

// =============================================================================
// Batch helpers
// =============================================================================

/// Distances from one query to many candidates, with software prefetching.
///
/// # Panics
///
/// Panics if any candidate's length differs from the query's.
#[inline]
#[must_use]
pub fn batch_distance(metric: Metric, query: &[f32], candidates: &[&[f32]]) -> Vec<f32> {
    let mut results = Vec::with_capacity(candidates.len());
    // The prefetch index is only consumed on x86_64.
    #[cfg_attr(not(target_arch = "x86_64"), allow(unused_variables))]
    for (i, candidate) in candidates.iter().enumerate() {
        #[cfg(target_arch = "x86_64")]
        if i + 4 < candidates.len() {
            // SAFETY: _mm_prefetch is a hint that cannot fault.
            unsafe {
                use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
                _mm_prefetch(candidates[i + 4].as_ptr().cast::<i8>(), _MM_HINT_T0);
            }
        }
        results.push(metric.distance(query, candidate));
    }
    results
}

/// Normalizes many vectors in place, in parallel.
pub fn normalize_batch(vectors: &mut [Vec<f32>]) {
    vectors.par_iter_mut().for_each(|v| normalize(v));
}
