//! Similarity metrics between two users' rating vectors.
//!
//! Every metric only looks at the overlap: items both vectors rate.
//! Degenerate inputs (no overlap, zero variance) score 0 instead of failing.

use crate::models::UserRatings;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Pearson,
    Manhattan,
    Euclidean,
}

impl Metric {
    /// Resolve a metric by its exact lowercase name. Anything else, including
    /// other casings, falls back to Pearson.
    pub fn from_name(name: &str) -> Self {
        match name {
            "pearson" => Metric::Pearson,
            "manhattan" => Metric::Manhattan,
            "euclidean" => Metric::Euclidean,
            other => {
                warn!(metric = other, "Unrecognized metric, using pearson");
                Metric::Pearson
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Pearson => "pearson",
            Metric::Manhattan => "manhattan",
            Metric::Euclidean => "euclidean",
        }
    }

    pub fn score(&self, a: &UserRatings, b: &UserRatings) -> f64 {
        match self {
            Metric::Pearson => pearson(a, b),
            Metric::Manhattan => manhattan(a, b),
            Metric::Euclidean => euclidean(a, b),
        }
    }

    /// Pearson is a similarity (higher is closer), the others are distances.
    pub fn higher_is_closer(&self) -> bool {
        matches!(self, Metric::Pearson)
    }

    /// Order two scores so that the closer one comes first.
    pub fn closer_first(&self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        if self.higher_is_closer() {
            ord.reverse()
        } else {
            ord
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn overlap<'a>(a: &'a UserRatings, b: &'a UserRatings) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.iter()
        .filter_map(move |(item, x)| b.get(item).map(|y| (*x, *y)))
}

/// Sum of absolute differences over the overlap. No overlap scores 0.
pub fn manhattan(a: &UserRatings, b: &UserRatings) -> f64 {
    overlap(a, b).map(|(x, y)| (x - y).abs()).sum()
}

/// Euclidean distance over the overlap. No overlap scores 0.
pub fn euclidean(a: &UserRatings, b: &UserRatings) -> f64 {
    overlap(a, b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Single-pass approximation of the Pearson correlation coefficient.
///
/// Returns 0 when nothing overlaps or either side has zero variance.
pub fn pearson(a: &UserRatings, b: &UserRatings) -> f64 {
    let mut n = 0usize;
    let (mut sum_xy, mut sum_x, mut sum_y, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);

    for (x, y) in overlap(a, b) {
        n += 1;
        sum_xy += x * y;
        sum_x += x;
        sum_y += y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    if n == 0 {
        return 0.0;
    }

    let n = n as f64;
    let denominator = (sum_x2 - sum_x.powi(2) / n).sqrt() * (sum_y2 - sum_y.powi(2) / n).sqrt();
    // Rounding can push a zero variance slightly negative, giving NaN.
    if denominator == 0.0 || denominator.is_nan() {
        return 0.0;
    }

    (sum_xy - (sum_x * sum_y) / n) / denominator
}
