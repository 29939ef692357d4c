//! Property-based equivalence tests for the public distance primitives.
//!
//! These tests compare public SIMD entrypoints against scalar references over
//! randomized vectors and dimension boundaries to protect future refactors.

use proptest::{
    collection::vec,
    prelude::{prop_assert, prop_oneof, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};

use lanedist_core::simd::scalar;
use lanedist_core::{
    angular_distance, cosine_distance, dot_product, euclidean, manhattan, norm, normalize,
    squared_euclidean,
};

const PROP_CASES: u32 = 256;
const PROP_MAX_SHRINK_ITERS: u32 = 2048;

#[derive(Clone, Copy)]
struct Tolerance {
    abs: f32,
    rel: f32,
}

// Tolerance matrix: operation-specific envelopes for non-associative f32 math.
const DOT_TOLERANCE: Tolerance = Tolerance {
    abs: 1.0e-4,
    rel: 2.0e-4,
};
const SQUARED_L2_TOLERANCE: Tolerance = Tolerance {
    abs: 1.0e-4,
    rel: 2.0e-4,
};
const MANHATTAN_TOLERANCE: Tolerance = Tolerance {
    abs: 1.0e-4,
    rel: 2.0e-4,
};
const COSINE_TOLERANCE: Tolerance = Tolerance {
    abs: 2.0e-4,
    rel: 2.0e-4,
};

fn bounded_dimension_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0_usize),
        Just(1_usize),
        Just(2_usize),
        Just(3_usize),
        Just(4_usize),
        Just(5_usize),
        Just(7_usize),
        Just(8_usize),
        Just(9_usize),
        Just(15_usize),
        Just(16_usize),
        Just(17_usize),
        Just(31_usize),
        Just(32_usize),
        Just(33_usize),
        Just(63_usize),
        Just(64_usize),
        Just(65_usize),
        Just(127_usize),
        Just(128_usize),
        Just(129_usize),
        Just(255_usize),
        Just(256_usize),
        Just(257_usize),
        0_usize..=1536,
    ]
}

fn finite_vector_pair_strategy() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    bounded_dimension_strategy().prop_flat_map(|len| {
        let a = vec(-100.0_f32..100.0_f32, len);
        let b = vec(-100.0_f32..100.0_f32, len);
        (a, b)
    })
}

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: PROP_CASES,
        max_shrink_iters: PROP_MAX_SHRINK_ITERS,
        // Integration tests do not have a nearby lib.rs/main.rs, so set an
        // explicit persistence root for reproducible counterexamples.
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "distance-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn close(actual: f32, expected: f32, tolerance: Tolerance) -> bool {
    let delta = (actual - expected).abs();
    delta <= tolerance.abs || delta <= tolerance.rel * expected.abs()
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_dot_product_matches_scalar((a, b) in finite_vector_pair_strategy()) {
        let actual = dot_product(&a, &b);
        let expected = scalar::dot_scalar(&a, &b);
        prop_assert!(
            close(actual, expected, DOT_TOLERANCE),
            "dot: {actual} vs {expected} (len {})", a.len()
        );
    }

    #[test]
    fn prop_squared_euclidean_matches_scalar((a, b) in finite_vector_pair_strategy()) {
        let actual = squared_euclidean(&a, &b);
        let expected = scalar::squared_l2_scalar(&a, &b);
        prop_assert!(
            close(actual, expected, SQUARED_L2_TOLERANCE),
            "squared_euclidean: {actual} vs {expected} (len {})", a.len()
        );
        prop_assert!(actual >= 0.0);
    }

    #[test]
    fn prop_euclidean_is_sqrt_of_squared((a, b) in finite_vector_pair_strategy()) {
        let d = euclidean(&a, &b);
        let sq = squared_euclidean(&a, &b);
        prop_assert!(close(d, sq.sqrt(), SQUARED_L2_TOLERANCE));
        prop_assert!(d >= 0.0);
    }

    #[test]
    fn prop_manhattan_matches_scalar((a, b) in finite_vector_pair_strategy()) {
        let actual = manhattan(&a, &b);
        let expected = scalar::manhattan_scalar(&a, &b);
        prop_assert!(
            close(actual, expected, MANHATTAN_TOLERANCE),
            "manhattan: {actual} vs {expected} (len {})", a.len()
        );
        prop_assert!(actual >= 0.0);
    }

    #[test]
    fn prop_cosine_distance_in_range((a, b) in finite_vector_pair_strategy()) {
        let d = cosine_distance(&a, &b);
        prop_assert!((0.0..=2.0).contains(&d), "cosine out of range: {d}");

        let (dot, na_sq, nb_sq) = scalar::dot_norms_scalar(&a, &b);
        let (na, nb) = (na_sq.sqrt(), nb_sq.sqrt());
        let expected = if na == 0.0 || nb == 0.0 {
            1.0
        } else {
            1.0 - (dot / (na * nb)).clamp(-1.0, 1.0)
        };
        prop_assert!(
            close(d, expected, COSINE_TOLERANCE),
            "cosine: {d} vs {expected} (len {})", a.len()
        );
    }

    #[test]
    fn prop_angular_distance_in_range((a, b) in finite_vector_pair_strategy()) {
        let d = angular_distance(&a, &b);
        prop_assert!(
            (0.0..=std::f32::consts::PI).contains(&d),
            "angular out of range: {d}"
        );
    }

    #[test]
    fn prop_distances_are_symmetric((a, b) in finite_vector_pair_strategy()) {
        prop_assert!(close(
            squared_euclidean(&a, &b),
            squared_euclidean(&b, &a),
            SQUARED_L2_TOLERANCE
        ));
        prop_assert!(close(
            manhattan(&a, &b),
            manhattan(&b, &a),
            MANHATTAN_TOLERANCE
        ));
        prop_assert!(close(
            cosine_distance(&a, &b),
            cosine_distance(&b, &a),
            COSINE_TOLERANCE
        ));
    }

    #[test]
    fn prop_normalize_yields_unit_norm(mut v in bounded_dimension_strategy()
        .prop_flat_map(|len| vec(-100.0_f32..100.0_f32, len)))
    {
        let before = v.clone();
        normalize(&mut v);

        if scalar::norm_sq_scalar(&before).sqrt() == 0.0 {
            // Zero-norm input must be a no-op.
            prop_assert!(v == before);
        } else {
            let n = norm(&v);
            prop_assert!(
                (n - 1.0).abs() < 1e-3,
                "norm after normalize: {n} (len {})", v.len()
            );
        }
    }
}
