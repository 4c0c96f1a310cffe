use crate::error::{EngineError, Result};
use crate::models::{ItemId, RatingMatrix, UserId};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Mean rating per user.
pub type UserAverages = BTreeMap<UserId, f64>;

/// Symmetric item x item adjusted cosine similarities.
///
/// Only co-rated pairs have an entry. Each unordered pair is computed once
/// and stored in both directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSimilarityMatrix {
    similarities: BTreeMap<ItemId, BTreeMap<ItemId, f64>>,
}

impl ItemSimilarityMatrix {
    pub fn similarity(&self, item: &str, other: &str) -> Option<f64> {
        self.similarities.get(item)?.get(other).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ItemId, &BTreeMap<ItemId, f64>)> {
        self.similarities.iter()
    }

    pub fn item_count(&self) -> usize {
        self.similarities.len()
    }

    pub fn pair_count(&self) -> usize {
        self.similarities.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.similarities.is_empty()
    }

    fn insert_pair(&mut self, item: &ItemId, other: &ItemId, similarity: f64) {
        self.similarities
            .entry(item.clone())
            .or_default()
            .insert(other.clone(), similarity);
        self.similarities
            .entry(other.clone())
            .or_default()
            .insert(item.clone(), similarity);
    }
}

/// Mean rating of every user in the matrix.
///
/// A user without a single rating has no defined mean and fails with
/// `NoRatings`.
pub fn compute_averages(matrix: &RatingMatrix) -> Result<UserAverages> {
    matrix
        .users()
        .map(|(user, ratings)| {
            if ratings.is_empty() {
                return Err(EngineError::NoRatings(user.clone()));
            }
            let average = ratings.values().sum::<f64>() / ratings.len() as f64;
            Ok((user.clone(), average))
        })
        .collect()
}

/// Adjusted cosine similarity between two items: ratings are centered on
/// each rater's mean before taking the cosine over users who rated both.
///
/// Returns 0 when no user rated both or either centered vector is all zero.
pub fn cosine_similarity(
    matrix: &RatingMatrix,
    averages: &UserAverages,
    item: &str,
    other: &str,
) -> Result<f64> {
    let mut numerator = 0.0;
    let mut item_norm = 0.0;
    let mut other_norm = 0.0;

    for (user, ratings) in matrix.users() {
        let (Some(rating), Some(other_rating)) = (ratings.get(item), ratings.get(other)) else {
            continue;
        };
        let average = averages
            .get(user)
            .copied()
            .ok_or_else(|| EngineError::MissingAverage(user.clone()))?;

        let centered = rating - average;
        let other_centered = other_rating - average;
        numerator += centered * other_centered;
        item_norm += centered * centered;
        other_norm += other_centered * other_centered;
    }

    let denominator = item_norm.sqrt() * other_norm.sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }

    Ok(numerator / denominator)
}

/// Fill the similarity matrix for every item pair some user co-rated.
pub fn compute_similarity_matrix(
    matrix: &RatingMatrix,
    averages: &UserAverages,
) -> Result<ItemSimilarityMatrix> {
    let mut similarities = ItemSimilarityMatrix::default();

    for (_, ratings) in matrix.users() {
        for item in ratings.keys() {
            for other in ratings.keys() {
                if item == other || similarities.similarity(item, other).is_some() {
                    continue;
                }
                let similarity = cosine_similarity(matrix, averages, item, other)?;
                similarities.insert_pair(item, other, similarity);
            }
        }
    }

    if similarities.is_empty() {
        warn!(users = matrix.len(), "No co-rated item pairs, similarity matrix is empty");
    } else {
        info!(
            items = similarities.item_count(),
            pairs = similarities.pair_count(),
            "Item similarity matrix computed"
        );
    }

    Ok(similarities)
}
