//! Tests for dispatch thresholds and the accumulating distance kernels.
//!
//! Sizes are chosen to cover every dispatch band (scalar, 1-acc SIMD, 2-acc
//! SIMD) and, inside each band, lengths that leave 0 to lane_width-1
//! elements for the remainder loop.

use super::scalar;
use super::{
    batch_distance, dot_product, dot_product_distance, euclidean, manhattan, squared_euclidean,
};
use crate::metric::Metric;

// Tolerance for f32 SIMD vs scalar comparison: SIMD uses a different
// accumulation order (lane-parallel vs sequential).
const EPSILON: f32 = 5e-3;

/// Lengths spanning sub-lane, one-block, block+tail and multi-block cases
/// for both the 8-wide AVX2 and 4-wide NEON lane widths.
const SWEEP_SIZES: &[usize] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 31, 32, 33, 63, 64, 65, 127, 128,
    129, 255, 256, 257, 768,
];

fn test_vectors(size: usize) -> (Vec<f32>, Vec<f32>) {
    let a: Vec<f32> = (0..size).map(|i| ((i * 7) % 100) as f32 * 0.01).collect();
    let b: Vec<f32> = (0..size)
        .map(|i| (((size - i) * 13) % 100) as f32 * 0.01 - 0.5)
        .collect();
    (a, b)
}

fn assert_close(metric: &str, size: usize, actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{} mismatch for size {}: got {}, expected {}",
        metric,
        size,
        actual,
        expected
    );
}

// ============================================================================
// Size sweep vs scalar references
// ============================================================================

#[test]
fn test_squared_euclidean_matches_scalar_across_sizes() {
    for &size in SWEEP_SIZES {
        let (a, b) = test_vectors(size);
        assert_close(
            "squared_euclidean",
            size,
            squared_euclidean(&a, &b),
            scalar::squared_l2_scalar(&a, &b),
        );
    }
}

#[test]
fn test_manhattan_matches_scalar_across_sizes() {
    for &size in SWEEP_SIZES {
        let (a, b) = test_vectors(size);
        assert_close(
            "manhattan",
            size,
            manhattan(&a, &b),
            scalar::manhattan_scalar(&a, &b),
        );
    }
}

#[test]
fn test_dot_product_matches_scalar_across_sizes() {
    for &size in SWEEP_SIZES {
        let (a, b) = test_vectors(size);
        assert_close(
            "dot_product",
            size,
            dot_product(&a, &b),
            scalar::dot_scalar(&a, &b),
        );
    }
}

// ============================================================================
// Algebraic properties
// ============================================================================

#[test]
fn test_euclidean_is_sqrt_of_squared() {
    for &size in SWEEP_SIZES {
        let (a, b) = test_vectors(size);
        let sq = squared_euclidean(&a, &b);
        assert!(
            (euclidean(&a, &b) - sq.sqrt()).abs() < 1e-5,
            "euclidean != sqrt(squared_euclidean) for size {}",
            size
        );
    }
}

#[test]
fn test_symmetry() {
    for size in [7, 16, 65, 256] {
        let (a, b) = test_vectors(size);
        assert_eq!(squared_euclidean(&a, &b), squared_euclidean(&b, &a));
        assert_eq!(euclidean(&a, &b), euclidean(&b, &a));
        assert_eq!(manhattan(&a, &b), manhattan(&b, &a));
    }
}

#[test]
fn test_self_distance_is_zero() {
    for &size in &[1, 8, 9, 64, 257] {
        let (a, _) = test_vectors(size);
        assert_eq!(squared_euclidean(&a, &a), 0.0, "size {}", size);
        assert_eq!(euclidean(&a, &a), 0.0, "size {}", size);
        assert_eq!(manhattan(&a, &a), 0.0, "size {}", size);
    }
}

#[test]
fn test_known_values() {
    let a: Vec<f32> = (1..=9).map(|i| i as f32).collect();
    let b: Vec<f32> = (1..=9).rev().map(|i| i as f32).collect();

    // sum of (a[i]-b[i])^2 = 64+36+16+4+0+4+16+36+64 = 240
    assert_eq!(squared_euclidean(&a, &b), 240.0);
    // sum of |a[i]-b[i]| = 8+6+4+2+0+2+4+6+8 = 40
    assert_eq!(manhattan(&a, &b), 40.0);
    assert!((euclidean(&a, &b) - 240.0_f32.sqrt()).abs() < 1e-5);
}

#[test]
fn test_empty_vectors() {
    let a: Vec<f32> = vec![];
    let b: Vec<f32> = vec![];
    assert_eq!(squared_euclidean(&a, &b), 0.0);
    assert_eq!(euclidean(&a, &b), 0.0);
    assert_eq!(manhattan(&a, &b), 0.0);
    assert_eq!(dot_product(&a, &b), 0.0);
}

#[test]
fn test_dot_product_distance_convention() {
    let (a, b) = test_vectors(96);
    assert_eq!(dot_product_distance(&a, &b), 1.0 - dot_product(&a, &b));

    // Unit-norm inputs: dot distance coincides with cosine distance.
    let e1 = [1.0_f32, 0.0, 0.0, 0.0];
    let e2 = [0.0_f32, 1.0, 0.0, 0.0];
    assert_eq!(dot_product_distance(&e1, &e2), 1.0);
}

#[test]
#[should_panic(expected = "Vector dimensions must match")]
fn test_length_mismatch_panics() {
    let _ = squared_euclidean(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
}

// ============================================================================
// Batch helper
// ============================================================================

#[test]
fn test_batch_distance_matches_single_calls() {
    let (query, _) = test_vectors(48);
    let stored: Vec<Vec<f32>> = (0..9_usize)
        .map(|s| (0..48).map(|i| ((i + s * 5) % 17) as f32 * 0.1).collect())
        .collect();
    let candidates: Vec<&[f32]> = stored.iter().map(Vec::as_slice).collect();

    for metric in Metric::ALL {
        let batch = batch_distance(metric, &query, &candidates);
        assert_eq!(batch.len(), candidates.len());
        for (d, candidate) in batch.iter().zip(&candidates) {
            assert_eq!(*d, metric.distance(&query, candidate));
        }
    }
}

#[test]
fn test_batch_distance_empty_candidates() {
    let (query, _) = test_vectors(16);
    let batch = batch_distance(Metric::Euclidean, &query, &[]);
    assert!(batch.is_empty());
}
