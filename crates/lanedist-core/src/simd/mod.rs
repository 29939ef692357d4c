//! Native SIMD distance and normalization kernels.
//!
//! This module provides hand-tuned SIMD implementations using `core::arch`
//! intrinsics for AVX2+FMA and ARM NEON, with a portable scalar fallback.
//!
//! # Module Structure
//!
//! - `scalar` — Scalar fallback and reference implementations
//! - `x86_avx2` — AVX2+FMA kernel implementations (x86_64 only)
//! - `neon` — ARM NEON kernel implementations (aarch64 only)
//! - `dispatch` — Runtime SIMD level detection and dispatch wiring
//!
//! Every accumulating kernel follows the same two-phase shape: a blocked
//! loop over full SIMD lanes, a horizontal lane reduction, then a scalar
//! remainder loop for the `len % lane_width` trailing elements.

pub mod scalar;

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe blocks in this module tree.
// - Condition 1: All pointer arithmetic is derived from slice pointers with
//   loop bounds proving in-range access for each lane width.
// - Condition 2: Target-featured functions are called only after runtime
//   feature checks or on architectures where the feature is guaranteed.
// - Condition 3: Unaligned loads/stores use `*_loadu_*`/`*_storeu_*` or
//   `vld1q`/`vst1q`, which permit unaligned access.
// Reason: Intrinsics and pointer math are required for hot-path performance.

// =============================================================================
// ISA kernel submodules
// =============================================================================

#[cfg(target_arch = "x86_64")]
mod x86_avx2;

#[cfg(target_arch = "aarch64")]
mod neon;

// Re-export ISA kernels so dispatch.rs can access them via `super::`
#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx2::{
    dot_norms_avx2, dot_product_avx2, dot_product_avx2_2acc, manhattan_avx2, manhattan_avx2_2acc,
    norm_sq_avx2, normalize_avx2, squared_l2_avx2, squared_l2_avx2_2acc,
};

#[cfg(target_arch = "aarch64")]
pub(crate) use neon::{
    dot_norms_neon, dot_product_neon, manhattan_neon, norm_sq_neon, normalize_neon,
    squared_l2_neon,
};

// =============================================================================
// Dispatch module (public API)
// =============================================================================

mod dispatch;

pub use dispatch::{
    angular_distance, batch_distance, cosine_distance, dot_product, dot_product_distance,
    euclidean, manhattan, norm, normalize, normalize_batch, simd_level, squared_euclidean,
    SimdLevel,
};

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================

#[cfg(test)]
mod dispatch_tests;
