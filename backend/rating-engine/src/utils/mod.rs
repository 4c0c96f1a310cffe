// Utility functions for rating-engine

use crate::models::{ItemId, NameLookup, Recommendation, UserRatings};

/// Round to two decimal places
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Copy of `ratings` without NaN or infinite entries, which count as unrated.
pub fn known_ratings(ratings: &UserRatings) -> UserRatings {
    ratings
        .iter()
        .filter(|(_, rating)| rating.is_finite())
        .map(|(item, rating)| (item.clone(), *rating))
        .collect()
}

/// Attach display names, sort descending by score and keep the first `n`.
///
/// The sort is stable, so equal scores keep their input order.
pub fn top_n(scores: Vec<(ItemId, f64)>, n: usize, names: &NameLookup) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = scores
        .into_iter()
        .map(|(item_id, score)| Recommendation {
            name: names.display_name(&item_id),
            item_id,
            score,
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations.truncate(n);
    recommendations
}
