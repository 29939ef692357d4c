//! ARM NEON kernel implementations for aarch64.
//!
//! Contains NEON SIMD kernels for the L2, L1, dot-product and fused
//! dot+norms accumulations, plus in-place normalization. NEON registers are
//! 128-bit, so the lane width is 4×f32 and the remainder loop handles up to
//! 3 trailing elements.
//!
//! NEON is always available on aarch64, so no runtime detection is needed.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::similar_names)]
// Reason: remainder loops index both slices from a shared base offset.
#![allow(clippy::needless_range_loop)]

// =============================================================================
// Dot Product
// =============================================================================

/// ARM NEON dot product.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn dot_product_neon(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::aarch64::*;

    let len = a.len();
    let simd_len = len / 4;

    // SAFETY: NEON intrinsics are always safe on aarch64.
    let mut sum = unsafe { vdupq_n_f32(0.0) };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len; vld1q_f32 handles unaligned loads.
        unsafe {
            let va = vld1q_f32(a_ptr.add(offset));
            let vb = vld1q_f32(b_ptr.add(offset));
            sum = vfmaq_f32(sum, va, vb);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    // Reason: Horizontal reduction to scalar result.
    let mut result = unsafe { vaddvq_f32(sum) };

    for i in (simd_len * 4)..len {
        result += a[i] * b[i];
    }

    result
}

// =============================================================================
// Squared L2 Distance
// =============================================================================

/// ARM NEON squared L2 distance.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn squared_l2_neon(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::aarch64::*;

    let len = a.len();
    let simd_len = len / 4;

    // SAFETY: NEON intrinsics are always safe on aarch64.
    let mut sum = unsafe { vdupq_n_f32(0.0) };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len; vld1q_f32 handles unaligned loads.
        unsafe {
            let va = vld1q_f32(a_ptr.add(offset));
            let vb = vld1q_f32(b_ptr.add(offset));
            let diff = vsubq_f32(va, vb);
            sum = vfmaq_f32(sum, diff, diff);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    let mut result = unsafe { vaddvq_f32(sum) };

    for i in (simd_len * 4)..len {
        let d = a[i] - b[i];
        result += d * d;
    }

    result
}

// =============================================================================
// Manhattan (L1) Distance
// =============================================================================

/// ARM NEON Manhattan distance using the lane-wise absolute value of the
/// difference.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn manhattan_neon(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::aarch64::*;

    let len = a.len();
    let simd_len = len / 4;

    // SAFETY: NEON intrinsics are always safe on aarch64.
    let mut sum = unsafe { vdupq_n_f32(0.0) };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len; vld1q_f32 handles unaligned loads.
        unsafe {
            let va = vld1q_f32(a_ptr.add(offset));
            let vb = vld1q_f32(b_ptr.add(offset));
            let abs_diff = vabsq_f32(vsubq_f32(va, vb));
            sum = vaddq_f32(sum, abs_diff);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    let mut result = unsafe { vaddvq_f32(sum) };

    for i in (simd_len * 4)..len {
        result += (a[i] - b[i]).abs();
    }

    result
}

// =============================================================================
// Fused Dot + Norms (cosine / angular accumulation)
// =============================================================================

/// ARM NEON fused pass computing the dot product and both squared norms in
/// one traversal. Returns `(dot, norm_a_sq, norm_b_sq)`.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn dot_norms_neon(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    use std::arch::aarch64::*;

    let len = a.len();
    let simd_len = len / 4;

    // SAFETY: NEON intrinsics are always safe on aarch64.
    let mut dot_acc = unsafe { vdupq_n_f32(0.0) };
    let mut na_acc = unsafe { vdupq_n_f32(0.0) };
    let mut nb_acc = unsafe { vdupq_n_f32(0.0) };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len; vld1q_f32 handles unaligned loads.
        unsafe {
            let va = vld1q_f32(a_ptr.add(offset));
            let vb = vld1q_f32(b_ptr.add(offset));
            dot_acc = vfmaq_f32(dot_acc, va, vb);
            na_acc = vfmaq_f32(na_acc, va, va);
            nb_acc = vfmaq_f32(nb_acc, vb, vb);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    let mut dot = unsafe { vaddvq_f32(dot_acc) };
    let mut norm_a_sq = unsafe { vaddvq_f32(na_acc) };
    let mut norm_b_sq = unsafe { vaddvq_f32(nb_acc) };

    for i in (simd_len * 4)..len {
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

/// ARM NEON sum of squares of a single vector.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn norm_sq_neon(v: &[f32]) -> f32 {
    use std::arch::aarch64::*;

    let len = v.len();
    let simd_len = len / 4;

    // SAFETY: NEON intrinsics are always safe on aarch64.
    let mut sum = unsafe { vdupq_n_f32(0.0) };
    let ptr = v.as_ptr();

    for i in 0..simd_len {
        // SAFETY: i * 4 + 4 <= len; vld1q_f32 handles unaligned loads.
        unsafe {
            let vv = vld1q_f32(ptr.add(i * 4));
            sum = vfmaq_f32(sum, vv, vv);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    let mut result = unsafe { vaddvq_f32(sum) };

    for i in (simd_len * 4)..len {
        result += v[i] * v[i];
    }

    result
}

/// ARM NEON in-place normalization. No-op when the norm is zero.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn normalize_neon(v: &mut [f32]) {
    use std::arch::aarch64::*;

    let norm = norm_sq_neon(v).sqrt();
    if norm == 0.0 {
        return;
    }

    let len = v.len();
    let simd_len = len / 4;

    // SAFETY: vdupq_n_f32 is always safe on aarch64.
    let norm_vec = unsafe { vdupq_n_f32(norm) };
    let ptr = v.as_mut_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len; vld1q/vst1q handle unaligned access, and
        // the &mut borrow guarantees exclusive access to the buffer.
        unsafe {
            let vv = vld1q_f32(ptr.add(offset));
            vst1q_f32(ptr.add(offset), vdivq_f32(vv, norm_vec));
        }
    }

    for x in v.iter_mut().skip(simd_len * 4) {
        *x /= norm;
    }
}
