//! Metric selection by name.
//!
//! Callers that configure their distance metric from text (config files,
//! query parameters) parse it into a [`Metric`] and dispatch through
//! [`Metric::distance`]. The wire names are the lowercase snake_case forms
//! (`"euclidean"`, `"squared_euclidean"`, `"manhattan"`, `"cosine"`,
//! `"angular"`, `"dot"`).

use crate::simd;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A distance metric over dense f32 vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Euclidean (L2) distance.
    Euclidean,
    /// Squared Euclidean distance (no square root; same ordering as L2).
    SquaredEuclidean,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Cosine distance, `1 - cosine similarity`.
    Cosine,
    /// Angular distance in radians.
    Angular,
    /// Dot-product distance, `1 - dot` (not a true metric).
    Dot,
}

/// Error returned when a metric name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    /// The given name does not match any known metric.
    #[error("unknown metric: {0:?}")]
    Unknown(String),
}

impl Metric {
    /// All supported metrics, in registry order.
    pub const ALL: [Metric; 6] = [
        Metric::Euclidean,
        Metric::SquaredEuclidean,
        Metric::Manhattan,
        Metric::Cosine,
        Metric::Angular,
        Metric::Dot,
    ];

    /// The canonical lowercase name of this metric.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SquaredEuclidean => "squared_euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Cosine => "cosine",
            Metric::Angular => "angular",
            Metric::Dot => "dot",
        }
    }

    /// Computes the distance between `a` and `b` under this metric.
    ///
    /// # Panics
    ///
    /// Panics if `a.len() != b.len()`.
    #[must_use]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::Euclidean => simd::euclidean(a, b),
            Metric::SquaredEuclidean => simd::squared_euclidean(a, b),
            Metric::Manhattan => simd::manhattan(a, b),
            Metric::Cosine => simd::cosine_distance(a, b),
            Metric::Angular => simd::angular_distance(a, b),
            Metric::Dot => simd::dot_product_distance(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(Metric::Euclidean),
            "squared_euclidean" => Ok(Metric::SquaredEuclidean),
            "manhattan" => Ok(Metric::Manhattan),
            "cosine" => Ok(Metric::Cosine),
            "angular" => Ok(Metric::Angular),
            "dot" => Ok(Metric::Dot),
            other => Err(MetricError::Unknown(other.to_owned())),
        }
    }
}
