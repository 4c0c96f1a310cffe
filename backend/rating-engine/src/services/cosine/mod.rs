//! Item-based prediction over an adjusted cosine similarity matrix.
//!
//! The user's ratings are mapped onto [-1, 1], blended through the item
//! similarities and mapped back onto the rating scale:
//!   P[j] = sum(sim[j][i] * norm_rating[i]) / sum(|sim[j][i]|)

mod similarity_matrix;

pub use similarity_matrix::{
    compute_averages, compute_similarity_matrix, cosine_similarity, ItemSimilarityMatrix,
    UserAverages,
};

use crate::error::Result;
use crate::models::{ItemId, NameLookup, RatingMatrix, RatingScale, Recommendation, UserRatings};
use crate::utils::{known_ratings, round_score, top_n};
use std::collections::BTreeMap;
use tracing::debug;

/// Precomputed artifacts for cosine prediction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CosineModel {
    pub averages: UserAverages,
    pub similarities: ItemSimilarityMatrix,
}

impl CosineModel {
    pub fn build(matrix: &RatingMatrix) -> Result<Self> {
        let averages = compute_averages(matrix)?;
        let similarities = compute_similarity_matrix(matrix, &averages)?;
        Ok(Self {
            averages,
            similarities,
        })
    }
}

/// Predict ratings for the items `user_ratings` lacks.
///
/// Normalization works on a private copy, so the caller's ratings are never
/// touched. NaN entries count as unrated. Items whose similarities to the rated items are all zero are
/// left out.
pub fn cosine_sim_predict(
    similarities: &ItemSimilarityMatrix,
    user_ratings: &UserRatings,
    scale: RatingScale,
    n: usize,
    names: &NameLookup,
) -> Vec<Recommendation> {
    let normalized: UserRatings = known_ratings(user_ratings)
        .into_iter()
        .map(|(item, rating)| (item, scale.normalize(rating)))
        .collect();

    // item -> (weighted sum, sum of |similarity|)
    let mut accumulated: BTreeMap<ItemId, (f64, f64)> = BTreeMap::new();

    for (rated_item, rating) in &normalized {
        for (diff_item, row) in similarities.rows() {
            if normalized.contains_key(diff_item) {
                continue;
            }
            let Some(similarity) = row.get(rated_item) else {
                continue;
            };

            let entry = accumulated.entry(diff_item.clone()).or_insert((0.0, 0.0));
            entry.0 += similarity * rating;
            entry.1 += similarity.abs();
        }
    }

    let scores: Vec<(ItemId, f64)> = accumulated
        .into_iter()
        .filter(|(_, (_, denominator))| *denominator != 0.0)
        .map(|(item, (sum, denominator))| {
            (item, round_score(scale.denormalize(sum / denominator)))
        })
        .collect();

    debug!(
        rated = normalized.len(),
        predicted = scores.len(),
        "Cosine predictions computed"
    );

    top_n(scores, n, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(pairs: &[(&str, f64)]) -> UserRatings {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn model() -> CosineModel {
        let matrix = RatingMatrix::new()
            .with_user("u1", [("a", 5.0), ("b", 1.0), ("c", 4.0)])
            .with_user("u2", [("a", 2.0), ("b", 4.0), ("c", 3.0)])
            .with_user("u3", [("a", 4.0), ("b", 2.0), ("d", 3.0)])
            .with_user("u4", [("d", 5.0), ("e", 2.0)]);
        CosineModel::build(&matrix).unwrap()
    }

    #[test]
    fn test_opposed_item_gets_inverse_rating() {
        let matrix = RatingMatrix::new()
            .with_user("u1", [("a", 5.0), ("b", 1.0)])
            .with_user("u2", [("a", 2.0), ("b", 4.0)]);
        let model = CosineModel::build(&matrix).unwrap();

        let loves_a = ratings(&[("a", 5.0)]);
        let recs = cosine_sim_predict(
            &model.similarities,
            &loves_a,
            RatingScale::default(),
            5,
            &NameLookup::new(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item_id, "b");
        assert_eq!(recs[0].score, 1.0);

        let likes_a = ratings(&[("a", 4.0)]);
        let recs = cosine_sim_predict(
            &model.similarities,
            &likes_a,
            RatingScale::default(),
            5,
            &NameLookup::new(),
        );
        assert_eq!(recs[0].score, 2.0);
    }

    #[test]
    fn test_nan_rating_counts_as_unrated() {
        let matrix = RatingMatrix::new()
            .with_user("u1", [("a", 5.0), ("b", 1.0)])
            .with_user("u2", [("a", 2.0), ("b", 4.0)]);
        let model = CosineModel::build(&matrix).unwrap();

        let user = ratings(&[("a", 5.0), ("b", f64::NAN)]);
        let recs = cosine_sim_predict(
            &model.similarities,
            &user,
            RatingScale::default(),
            5,
            &NameLookup::new(),
        );

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item_id, "b");
        assert_eq!(recs[0].score, 1.0);
        assert!(user["b"].is_nan());
    }

    #[test]
    fn test_caller_ratings_unchanged() {
        let model = model();
        let user = ratings(&[("a", 4.5), ("d", 2.0)]);
        let before = user.clone();

        let _ = cosine_sim_predict(
            &model.similarities,
            &user,
            RatingScale::default(),
            5,
            &NameLookup::new(),
        );

        assert_eq!(user.len(), before.len());
        for (item, rating) in &before {
            assert_eq!(user[item].to_bits(), rating.to_bits());
        }
    }

    #[test]
    fn test_excludes_rated_items_and_stays_in_scale() {
        let model = model();
        let user = ratings(&[("a", 4.0), ("d", 2.0)]);

        let recs = cosine_sim_predict(
            &model.similarities,
            &user,
            RatingScale::default(),
            5,
            &NameLookup::new(),
        );

        assert!(!recs.is_empty());
        for rec in &recs {
            assert!(!user.contains_key(&rec.item_id));
            assert!(rec.score >= 1.0 && rec.score <= 5.0);
        }
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_zero_similarity_items_are_skipped() {
        // x and y are co-rated only by a user whose ratings equal the mean
        let matrix = RatingMatrix::new().with_user("flat", [("x", 3.0), ("y", 3.0)]);
        let model = CosineModel::build(&matrix).unwrap();
        assert_eq!(model.similarities.similarity("x", "y"), Some(0.0));

        let recs = cosine_sim_predict(
            &model.similarities,
            &ratings(&[("x", 5.0)]),
            RatingScale::default(),
            5,
            &NameLookup::new(),
        );
        assert!(recs.is_empty());
    }

    #[test]
    fn test_truncates_to_n() {
        let model = model();
        let user = ratings(&[("a", 4.0), ("d", 2.0)]);

        let recs = cosine_sim_predict(
            &model.similarities,
            &user,
            RatingScale::default(),
            1,
            &NameLookup::new(),
        );
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_model_build_propagates_no_ratings() {
        let mut matrix = RatingMatrix::new().with_user("u1", [("a", 5.0)]);
        matrix.insert("empty", "a", None);

        assert!(CosineModel::build(&matrix).is_err());
    }
}
