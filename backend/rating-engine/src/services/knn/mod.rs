use crate::error::{EngineError, Result};
use crate::models::{ItemId, NameLookup, Neighbor, RatingMatrix, Recommendation};
use crate::services::neighbors::nearest_neighbors;
use crate::services::similarity::Metric;
use crate::utils::{round_score, top_n};
use std::collections::BTreeMap;
use tracing::debug;

/// k-nearest-neighbor recommender.
///
/// Algorithm:
/// 1. Rank all other users by `metric` and keep the first `k`
/// 2. Weight each neighbor by its score over the sum of the k scores
/// 3. For every item a neighbor rated and `user` has not, add
///    `weight * neighbor_rating` to that item's prediction
/// 4. Round to two decimals, sort descending and keep the first `n`
///
/// The weight normalizer is the raw score sum, so distance metrics give
/// more weight to farther neighbors. A zero sum fails with
/// `ZeroNeighborWeight` rather than dividing by zero.
pub fn recommend(
    matrix: &RatingMatrix,
    metric: Metric,
    user: &str,
    k: usize,
    n: usize,
    names: &NameLookup,
) -> Result<Vec<Recommendation>> {
    let neighbors = nearest_neighbors(matrix, metric, user)?;
    recommend_from_neighbors(matrix, user, &neighbors, k, n, names)
}

/// KNN blend over an already ranked neighbor list, closest first.
pub fn recommend_from_neighbors(
    matrix: &RatingMatrix,
    user: &str,
    neighbors: &[Neighbor],
    k: usize,
    n: usize,
    names: &NameLookup,
) -> Result<Vec<Recommendation>> {
    let user_ratings = matrix.ratings_for(user)?;

    if k > neighbors.len() {
        return Err(EngineError::NotEnoughNeighbors {
            requested: k,
            available: neighbors.len(),
        });
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    let nearest = &neighbors[..k];
    let total_weight: f64 = nearest.iter().map(|neighbor| neighbor.score).sum();
    if total_weight == 0.0 {
        return Err(EngineError::ZeroNeighborWeight {
            user: user.to_string(),
            k,
        });
    }

    let mut predictions: BTreeMap<ItemId, f64> = BTreeMap::new();
    for neighbor in nearest {
        let weight = neighbor.score / total_weight;
        let neighbor_ratings = matrix.ratings_for(&neighbor.user_id)?;

        for (item, rating) in neighbor_ratings {
            if user_ratings.contains_key(item) {
                continue;
            }
            *predictions.entry(item.clone()).or_insert(0.0) += rating * weight;
        }
    }

    debug!(
        user = user,
        k = k,
        predicted = predictions.len(),
        "KNN predictions accumulated"
    );

    let scores = predictions
        .into_iter()
        .map(|(item, score)| (item, round_score(score)))
        .collect();

    Ok(top_n(scores, n, names))
}
