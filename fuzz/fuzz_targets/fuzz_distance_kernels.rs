//! Fuzz target for the SIMD distance and normalization kernels.
//!
//! This target feeds arbitrary vectors into every public entry point to find:
//! - Panics on edge cases (NaN, Inf, very large/small values)
//! - Numerical stability issues (out-of-range cosine/angular results)
//! - SIMD remainder-loop problems at odd lengths
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_distance_kernels
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lanedist_core::{
    angular_distance, cosine_distance, dot_product, euclidean, manhattan, norm, normalize,
    squared_euclidean,
};

/// Fuzzing input for distance calculations.
#[derive(Arbitrary, Debug)]
struct DistanceInput {
    /// First vector (limited to reasonable size)
    vec_a: Vec<f32>,
    /// Second vector (will be truncated/padded to match vec_a length)
    vec_b: Vec<f32>,
}

fuzz_target!(|input: DistanceInput| {
    // Limit vector size to prevent OOM
    let max_dim = 2048;
    let dim = input.vec_a.len().min(max_dim);

    let a: Vec<f32> = input.vec_a.into_iter().take(dim).collect();

    // Make vec_b the same dimension
    let mut b: Vec<f32> = input.vec_b.into_iter().take(dim).collect();
    b.resize(dim, 0.0);

    // No entry point may panic, whatever the values.
    let _ = squared_euclidean(&a, &b);
    let _ = euclidean(&a, &b);
    let _ = manhattan(&a, &b);
    let _ = dot_product(&a, &b);
    let cosine = cosine_distance(&a, &b);
    let angular = angular_distance(&a, &b);

    // Bounded metrics must stay bounded for finite inputs whose dot product
    // cannot overflow.
    let finite = a.iter().chain(b.iter()).all(|x| x.is_finite());
    if finite && norm(&a) < 1e17 && norm(&b) < 1e17 {
        assert!((0.0..=2.0).contains(&cosine), "cosine out of range: {cosine}");
        assert!(
            (0.0..=std::f32::consts::PI).contains(&angular),
            "angular out of range: {angular}"
        );
    }

    let mut v = a;
    normalize(&mut v);
});
