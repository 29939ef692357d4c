//! AVX2+FMA kernel implementations for x86_64.
//!
//! Contains hand-tuned AVX2 SIMD kernels for the L2, L1, dot-product and
//! fused dot+norms accumulations, plus in-place normalization. The two-vector
//! accumulation kernels come in 1-acc and 2-acc variants; the 2-acc variants
//! use two independent accumulator registers to hide FMA latency on larger
//! vectors.
//!
//! All functions require runtime AVX2+FMA detection before calling.
//! Dispatch is handled by `dispatch.rs` after `simd_level()` confirms support.

#![allow(clippy::incompatible_msrv)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::similar_names)]
// Reason: remainder loops index both slices from a shared base offset.
#![allow(clippy::needless_range_loop)]

// =============================================================================
// Lane Reduction
// =============================================================================

/// Horizontal sum of an AVX2 256-bit register: collapses 8 f32 lanes to one
/// scalar via a pairwise extract/shuffle tree.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn hsum256_ps(v: std::arch::x86_64::__m256) -> f32 {
    use std::arch::x86_64::*;
    let low = _mm256_castps256_ps128(v);
    let high = _mm256_extractf128_ps(v, 1);
    let sum128 = _mm_add_ps(low, high);
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf2 = _mm_movehl_ps(sums, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf2))
}

// =============================================================================
// Dot Product
// =============================================================================

/// AVX2 dot product with a single accumulator for small/medium vectors.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2+FMA (enforced by `#[target_feature]` and runtime detection)
/// - `a.len() == b.len()` (enforced by public API assert)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: `_mm256_loadu_ps` handles unaligned loads; pointer arithmetic
    // stays within bounds because offset = i * 8 with i < len / 8.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 8;

    let mut sum = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let va = _mm256_loadu_ps(a_ptr.add(offset));
        let vb = _mm256_loadu_ps(b_ptr.add(offset));
        sum = _mm256_fmadd_ps(va, vb, sum);
    }

    let mut result = hsum256_ps(sum);

    // Remainder loop: at most 7 trailing elements
    for i in (simd_len * 8)..len {
        result += a[i] * b[i];
    }

    result
}

/// AVX2 dot product with 2 accumulators for ILP on large vectors.
///
/// # Safety
///
/// Same requirements as `dot_product_avx2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn dot_product_avx2_2acc(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: offsets stay within bounds: offset = i * 16 with i < len / 16,
    // and the post-loop 8-lane block is guarded by the remainder check.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 16;

    let mut sum0 = _mm256_setzero_ps();
    let mut sum1 = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va0 = _mm256_loadu_ps(a_ptr.add(offset));
        let vb0 = _mm256_loadu_ps(b_ptr.add(offset));
        sum0 = _mm256_fmadd_ps(va0, vb0, sum0);

        let va1 = _mm256_loadu_ps(a_ptr.add(offset + 8));
        let vb1 = _mm256_loadu_ps(b_ptr.add(offset + 8));
        sum1 = _mm256_fmadd_ps(va1, vb1, sum1);
    }

    let mut result = hsum256_ps(_mm256_add_ps(sum0, sum1));

    // One leftover full lane, then the scalar remainder loop
    let mut base = simd_len * 16;
    if len - base >= 8 {
        let va = _mm256_loadu_ps(a_ptr.add(base));
        let vb = _mm256_loadu_ps(b_ptr.add(base));
        result += hsum256_ps(_mm256_mul_ps(va, vb));
        base += 8;
    }
    for i in base..len {
        result += a[i] * b[i];
    }

    result
}

// =============================================================================
// Squared L2 Distance
// =============================================================================

/// AVX2 squared L2 distance with a single accumulator.
///
/// # Safety
///
/// Same requirements as `dot_product_avx2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn squared_l2_avx2(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: See dot_product_avx2 for the bounds argument.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 8;

    let mut sum = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let va = _mm256_loadu_ps(a_ptr.add(offset));
        let vb = _mm256_loadu_ps(b_ptr.add(offset));
        let diff = _mm256_sub_ps(va, vb);
        sum = _mm256_fmadd_ps(diff, diff, sum);
    }

    let mut result = hsum256_ps(sum);

    for i in (simd_len * 8)..len {
        let d = a[i] - b[i];
        result += d * d;
    }

    result
}

/// AVX2 squared L2 distance with 2 accumulators for large vectors.
///
/// # Safety
///
/// Same requirements as `dot_product_avx2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn squared_l2_avx2_2acc(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: See dot_product_avx2_2acc for the bounds argument.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 16;

    let mut sum0 = _mm256_setzero_ps();
    let mut sum1 = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va0 = _mm256_loadu_ps(a_ptr.add(offset));
        let vb0 = _mm256_loadu_ps(b_ptr.add(offset));
        let diff0 = _mm256_sub_ps(va0, vb0);
        sum0 = _mm256_fmadd_ps(diff0, diff0, sum0);

        let va1 = _mm256_loadu_ps(a_ptr.add(offset + 8));
        let vb1 = _mm256_loadu_ps(b_ptr.add(offset + 8));
        let diff1 = _mm256_sub_ps(va1, vb1);
        sum1 = _mm256_fmadd_ps(diff1, diff1, sum1);
    }

    let mut result = hsum256_ps(_mm256_add_ps(sum0, sum1));

    let mut base = simd_len * 16;
    if len - base >= 8 {
        let va = _mm256_loadu_ps(a_ptr.add(base));
        let vb = _mm256_loadu_ps(b_ptr.add(base));
        let diff = _mm256_sub_ps(va, vb);
        result += hsum256_ps(_mm256_mul_ps(diff, diff));
        base += 8;
    }
    for i in base..len {
        let d = a[i] - b[i];
        result += d * d;
    }

    result
}

// =============================================================================
// Manhattan (L1) Distance
// =============================================================================

/// AVX2 Manhattan distance with a single accumulator.
///
/// Computes the vectorized absolute value by clearing the sign bit of the
/// lane-wise difference with an `andnot` against `-0.0`.
///
/// # Safety
///
/// Same requirements as `dot_product_avx2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn manhattan_avx2(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: See dot_product_avx2 for the bounds argument.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 8;

    let sign_mask = _mm256_set1_ps(-0.0);
    let mut sum = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let va = _mm256_loadu_ps(a_ptr.add(offset));
        let vb = _mm256_loadu_ps(b_ptr.add(offset));
        let diff = _mm256_sub_ps(va, vb);
        sum = _mm256_add_ps(sum, _mm256_andnot_ps(sign_mask, diff));
    }

    let mut result = hsum256_ps(sum);

    for i in (simd_len * 8)..len {
        result += (a[i] - b[i]).abs();
    }

    result
}

/// AVX2 Manhattan distance with 2 accumulators for large vectors.
///
/// # Safety
///
/// Same requirements as `dot_product_avx2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn manhattan_avx2_2acc(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: See dot_product_avx2_2acc for the bounds argument.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 16;

    let sign_mask = _mm256_set1_ps(-0.0);
    let mut sum0 = _mm256_setzero_ps();
    let mut sum1 = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 16;
        let va0 = _mm256_loadu_ps(a_ptr.add(offset));
        let vb0 = _mm256_loadu_ps(b_ptr.add(offset));
        let diff0 = _mm256_sub_ps(va0, vb0);
        sum0 = _mm256_add_ps(sum0, _mm256_andnot_ps(sign_mask, diff0));

        let va1 = _mm256_loadu_ps(a_ptr.add(offset + 8));
        let vb1 = _mm256_loadu_ps(b_ptr.add(offset + 8));
        let diff1 = _mm256_sub_ps(va1, vb1);
        sum1 = _mm256_add_ps(sum1, _mm256_andnot_ps(sign_mask, diff1));
    }

    let mut result = hsum256_ps(_mm256_add_ps(sum0, sum1));

    let mut base = simd_len * 16;
    if len - base >= 8 {
        let va = _mm256_loadu_ps(a_ptr.add(base));
        let vb = _mm256_loadu_ps(b_ptr.add(base));
        let diff = _mm256_sub_ps(va, vb);
        result += hsum256_ps(_mm256_andnot_ps(sign_mask, diff));
        base += 8;
    }
    for i in base..len {
        result += (a[i] - b[i]).abs();
    }

    result
}

// =============================================================================
// Fused Dot + Norms (cosine / angular accumulation)
// =============================================================================

/// AVX2 fused pass computing the dot product and both squared norms in one
/// traversal with three parallel accumulators.
///
/// Returns `(dot, norm_a_sq, norm_b_sq)` without any post-transform; the
/// cosine and angular metrics apply sqrt/clamp/fallback on top.
///
/// # Safety
///
/// Same requirements as `dot_product_avx2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn dot_norms_avx2(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    // SAFETY: See dot_product_avx2 for the bounds argument.
    use std::arch::x86_64::*;

    let len = a.len();
    let simd_len = len / 8;

    let mut dot_acc = _mm256_setzero_ps();
    let mut na_acc = _mm256_setzero_ps();
    let mut nb_acc = _mm256_setzero_ps();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let va = _mm256_loadu_ps(a_ptr.add(offset));
        let vb = _mm256_loadu_ps(b_ptr.add(offset));
        dot_acc = _mm256_fmadd_ps(va, vb, dot_acc);
        na_acc = _mm256_fmadd_ps(va, va, na_acc);
        nb_acc = _mm256_fmadd_ps(vb, vb, nb_acc);
    }

    let mut dot = hsum256_ps(dot_acc);
    let mut norm_a_sq = hsum256_ps(na_acc);
    let mut norm_b_sq = hsum256_ps(nb_acc);

    for i in (simd_len * 8)..len {
        let x = a[i];
        let y = b[i];
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }

    (dot, norm_a_sq, norm_b_sq)
}

// =============================================================================
// Normalization
// =============================================================================

/// AVX2 sum of squares of a single vector.
///
/// # Safety
///
/// Caller must ensure CPU supports AVX2+FMA.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn norm_sq_avx2(v: &[f32]) -> f32 {
    // SAFETY: See dot_product_avx2 for the bounds argument.
    use std::arch::x86_64::*;

    let len = v.len();
    let simd_len = len / 8;

    let mut sum = _mm256_setzero_ps();
    let ptr = v.as_ptr();

    for i in 0..simd_len {
        let vv = _mm256_loadu_ps(ptr.add(i * 8));
        sum = _mm256_fmadd_ps(vv, vv, sum);
    }

    let mut result = hsum256_ps(sum);

    for i in (simd_len * 8)..len {
        result += v[i] * v[i];
    }

    result
}

/// AVX2 in-place normalization: divides every element by the Euclidean norm.
///
/// No-op when the norm is zero, leaving the buffer untouched.
///
/// # Safety
///
/// Caller must ensure CPU supports AVX2+FMA. The `&mut` borrow guarantees
/// exclusive access for the duration of the call.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn normalize_avx2(v: &mut [f32]) {
    // SAFETY: Offsets stay within bounds (offset = i * 8 with i < len / 8);
    // the read phase uses a const pointer, the write phase a fresh mut pointer.
    use std::arch::x86_64::*;

    let len = v.len();
    let simd_len = len / 8;

    let mut sum = _mm256_setzero_ps();
    let src = v.as_ptr();

    for i in 0..simd_len {
        let vv = _mm256_loadu_ps(src.add(i * 8));
        sum = _mm256_fmadd_ps(vv, vv, sum);
    }

    let mut total = hsum256_ps(sum);
    for i in (simd_len * 8)..len {
        total += v[i] * v[i];
    }

    let norm = total.sqrt();
    if norm == 0.0 {
        return;
    }

    let norm_vec = _mm256_set1_ps(norm);
    let dst = v.as_mut_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let vv = _mm256_loadu_ps(dst.add(offset));
        _mm256_storeu_ps(dst.add(offset), _mm256_div_ps(vv, norm_vec));
    }

    for x in v.iter_mut().skip(simd_len * 8) {
        *x /= norm;
    }
}
