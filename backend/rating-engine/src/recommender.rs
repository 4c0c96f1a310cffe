//! Recommender facade over a single rating matrix
//!
//! Holds the matrix, the configured metric/k/n and the display names, and
//! exposes every predictor:
//! - **KNN**: `recommend` blends the k nearest users' ratings
//! - **Slope-one**: `compute_deviations` then `slope_one`
//! - **Cosine**: `compute_cosine_model` then `cosine_predict`
//!
//! Precomputed tables are returned to the caller and passed back in
//! explicitly, so a predictor can never run against a table that was not
//! built. Tables are not invalidated: rebuild them after swapping the matrix.
//!
//! # Example
//!
//! ```rust
//! use rating_engine::{RatingMatrix, Recommender, RecommenderSettings};
//!
//! let matrix = RatingMatrix::new()
//!     .with_user("ann", [("a", 5.0), ("b", 1.0)])
//!     .with_user("ben", [("a", 5.0), ("b", 1.0), ("c", 4.0)]);
//!
//! let recommender = Recommender::new(matrix, RecommenderSettings::default());
//! let recs = recommender.recommend("ann").unwrap();
//! assert_eq!(recs[0].item_id, "c");
//! ```

use crate::error::Result;
use crate::models::{
    NameLookup, Neighbor, RatingMatrix, RatingScale, Recommendation, UserRatings,
};
use crate::services::cosine::{self, CosineModel, UserAverages};
use crate::services::knn;
use crate::services::neighbors::nearest_neighbors;
use crate::services::similarity::Metric;
use crate::services::slope_one::{self, DeviationTable};
use crate::utils::top_n;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderSettings {
    pub metric: Metric,
    pub k: usize,
    pub n: usize,
    pub scale: RatingScale,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            metric: Metric::Pearson,
            k: 1,
            n: 5,
            scale: RatingScale::default(),
        }
    }
}

pub struct Recommender {
    matrix: RatingMatrix,
    settings: RecommenderSettings,
    names: NameLookup,
}

impl Recommender {
    pub fn new(matrix: RatingMatrix, settings: RecommenderSettings) -> Self {
        if matrix.is_empty() {
            warn!("Recommender created over an empty rating matrix");
        }
        info!(
            users = matrix.len(),
            metric = %settings.metric,
            k = settings.k,
            n = settings.n,
            "Recommender created"
        );

        Self {
            matrix,
            settings,
            names: NameLookup::default(),
        }
    }

    /// Attach an item ID to display name table
    pub fn with_names(mut self, names: NameLookup) -> Self {
        self.names = names;
        self
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    pub fn metric(&self) -> Metric {
        self.settings.metric
    }

    /// Switch metric by name; unknown names fall back to Pearson.
    pub fn set_metric(&mut self, name: &str) -> Metric {
        self.settings.metric = Metric::from_name(name);
        self.settings.metric
    }

    pub fn nearest_neighbors(&self, user: &str) -> Result<Vec<Neighbor>> {
        nearest_neighbors(&self.matrix, self.settings.metric, user)
    }

    /// KNN recommendations for a user in the matrix
    pub fn recommend(&self, user: &str) -> Result<Vec<Recommendation>> {
        knn::recommend(
            &self.matrix,
            self.settings.metric,
            user,
            self.settings.k,
            self.settings.n,
            &self.names,
        )
    }

    /// KNN recommendations reusing a neighbor list from `nearest_neighbors`.
    pub fn recommend_with_neighbors(
        &self,
        user: &str,
        neighbors: &[Neighbor],
    ) -> Result<Vec<Recommendation>> {
        knn::recommend_from_neighbors(
            &self.matrix,
            user,
            neighbors,
            self.settings.k,
            self.settings.n,
            &self.names,
        )
    }

    pub fn compute_deviations(&self) -> DeviationTable {
        slope_one::compute_deviations(&self.matrix)
    }

    pub fn slope_one(&self, table: &DeviationTable, user_ratings: &UserRatings) -> Vec<Recommendation> {
        slope_one::weighted_slope_one(table, user_ratings, self.settings.n, &self.names)
    }

    pub fn compute_averages(&self) -> Result<UserAverages> {
        cosine::compute_averages(&self.matrix)
    }

    pub fn compute_cosine_model(&self) -> Result<CosineModel> {
        CosineModel::build(&self.matrix)
    }

    pub fn cosine_predict(&self, model: &CosineModel, user_ratings: &UserRatings) -> Vec<Recommendation> {
        cosine::cosine_sim_predict(
            &model.similarities,
            user_ratings,
            self.settings.scale,
            self.settings.n,
            &self.names,
        )
    }

    /// A user's own `n` highest ratings, best first.
    pub fn user_top_ratings(&self, user: &str, n: usize) -> Result<Vec<Recommendation>> {
        let ratings = self.matrix.ratings_for(user)?;
        let scores = ratings
            .iter()
            .map(|(item, rating)| (item.clone(), *rating))
            .collect();
        Ok(top_n(scores, n, &self.names))
    }
}
