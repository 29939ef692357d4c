//! # Lanedist Core
//!
//! SIMD distance kernels and in-place normalization for dense `f32` vectors.
//!
//! Lanedist provides the single-pair numeric primitives that similarity
//! search engines are built on: each call takes caller-owned slices, runs a
//! blocked SIMD accumulation with a scalar remainder loop, and returns one
//! scalar (or mutates the buffer in place for normalization).
//!
//! ## Metrics
//!
//! - **Squared Euclidean / Euclidean** (L2)
//! - **Manhattan** (L1)
//! - **Cosine distance** (`1 - cosine similarity`, zero-norm fallback `1.0`)
//! - **Angular distance** (radians, zero-norm fallback `π`)
//! - **Dot-product distance** (`1 - dot`)
//!
//! ## Quick Start
//!
//! ```rust
//! use lanedist_core::{cosine_distance, euclidean, normalize, Metric};
//!
//! let a = vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
//! let b = vec![9.0_f32, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
//!
//! let d2 = euclidean(&a, &b);
//! let dc = cosine_distance(&a, &b);
//!
//! // Metrics can also be selected by name.
//! let metric: Metric = "euclidean".parse().unwrap();
//! assert_eq!(metric.distance(&a, &b), d2);
//! assert!(dc >= 0.0 && dc <= 2.0);
//!
//! let mut v = a.clone();
//! normalize(&mut v);
//! ```
//!
//! ## Contract
//!
//! Two-vector entry points panic if the slices differ in length; empty
//! slices are valid everywhere. Kernels never allocate, never retain the
//! input buffers, and hold no state between calls, so concurrent calls on
//! shared read-only buffers need no synchronization. `normalize` requires
//! the exclusive borrow its signature already enforces.

#![warn(missing_docs)]
// Clippy lints configured in [lints.clippy] of Cargo.toml
#![cfg_attr(
    test,
    allow(
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::uninlined_format_args
    )
)]

pub mod metric;
pub mod simd;

pub use metric::{Metric, MetricError};
pub use simd::{
    angular_distance, batch_distance, cosine_distance, dot_product, dot_product_distance,
    euclidean, manhattan, norm, normalize, normalize_batch, simd_level, squared_euclidean,
    SimdLevel,
};
