use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type UserId = String;
pub type ItemId = String;

/// One user's known ratings. A missing rating is a missing key, never a
/// sentinel value.
pub type UserRatings = BTreeMap<ItemId, f64>;

/// Sparse user x item rating matrix.
///
/// Ordered maps keep iteration deterministic, so neighbor ties and
/// floating point accumulation come out the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<UserId, BTreeMap<ItemId, Option<f64>>>")]
pub struct RatingMatrix {
    users: BTreeMap<UserId, UserRatings>,
}

impl RatingMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating. `None` or a non-finite value registers the user
    /// without adding a rating.
    pub fn insert(&mut self, user: impl Into<UserId>, item: impl Into<ItemId>, rating: Option<f64>) {
        let ratings = self.users.entry(user.into()).or_default();
        if let Some(value) = rating.filter(|v| v.is_finite()) {
            ratings.insert(item.into(), value);
        }
    }

    /// Builder-style helper used heavily in tests and fixtures.
    pub fn with_user<U, K, I>(mut self, user: U, ratings: I) -> Self
    where
        U: Into<UserId>,
        K: Into<ItemId>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let user = user.into();
        self.users.entry(user.clone()).or_default();
        for (item, rating) in ratings {
            self.insert(user.clone(), item, Some(rating));
        }
        self
    }

    pub fn get(&self, user: &str) -> Option<&UserRatings> {
        self.users.get(user)
    }

    /// Ratings of `user`, failing with `UserNotFound` if absent.
    pub fn ratings_for(&self, user: &str) -> Result<&UserRatings> {
        self.users
            .get(user)
            .ok_or_else(|| EngineError::UserNotFound(user.to_string()))
    }

    pub fn users(&self) -> impl Iterator<Item = (&UserId, &UserRatings)> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Swap orientation: every `matrix[user][item]` becomes `[item][user]`.
    /// Ingestion adapters that read rows as items use this to hand the
    /// engine a user-major matrix.
    pub fn transpose(&self) -> Self {
        let mut transposed = RatingMatrix::new();
        for (user, ratings) in &self.users {
            for (item, rating) in ratings {
                transposed.insert(item.clone(), user.clone(), Some(*rating));
            }
        }
        transposed
    }
}

impl From<BTreeMap<UserId, BTreeMap<ItemId, Option<f64>>>> for RatingMatrix {
    fn from(raw: BTreeMap<UserId, BTreeMap<ItemId, Option<f64>>>) -> Self {
        let mut matrix = RatingMatrix::new();
        for (user, ratings) in raw {
            matrix.users.entry(user.clone()).or_default();
            for (item, rating) in ratings {
                matrix.insert(user.clone(), item, rating);
            }
        }
        matrix
    }
}

/// Item ID to display name table. Unknown IDs display as themselves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct NameLookup {
    names: HashMap<ItemId, String>,
}

impl NameLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }

    pub fn display_name(&self, id: &str) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

/// Another user ranked against a query user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: UserId,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub name: String,
    pub score: f64,
}

/// Bounds of the rating scale used by the cosine predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl RatingScale {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min < max) {
            return Err(EngineError::InvalidRatingScale { min, max });
        }
        Ok(Self { min, max })
    }

    /// Map a rating from `[min, max]` onto `[-1, 1]`.
    pub fn normalize(&self, rating: f64) -> f64 {
        let range = self.max - self.min;
        (2.0 * (rating - self.min) - range) / range
    }

    /// Inverse of [`RatingScale::normalize`].
    pub fn denormalize(&self, normalized: f64) -> f64 {
        0.5 * ((normalized + 1.0) * (self.max - self.min)) + self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_drops_missing_and_nan() {
        let mut matrix = RatingMatrix::new();
        matrix.insert("alice", "x", Some(4.0));
        matrix.insert("alice", "y", None);
        matrix.insert("alice", "z", Some(f64::NAN));
        matrix.insert("bob", "x", None);

        let alice = matrix.get("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice.get("x"), Some(&4.0));

        // bob is known but has no ratings
        assert!(matrix.get("bob").unwrap().is_empty());
    }

    #[test]
    fn test_with_user_accepts_owned_ids() {
        let items: Vec<(String, f64)> = vec![("x".to_string(), 2.0), ("y".to_string(), f64::NAN)];
        let matrix = RatingMatrix::new().with_user("alice".to_string(), items);

        let alice = matrix.get("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice.get("x"), Some(&2.0));
    }

    #[test]
    fn test_ratings_for_unknown_user() {
        let matrix = RatingMatrix::new().with_user("alice", [("x", 1.0)]);
        assert_eq!(
            matrix.ratings_for("carol"),
            Err(EngineError::UserNotFound("carol".to_string()))
        );
    }

    #[test]
    fn test_deserialize_with_nulls() {
        let json = r#"{"alice": {"x": 5.0, "y": null}, "bob": {"x": null}}"#;
        let matrix: RatingMatrix = serde_json::from_str(json).unwrap();

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get("alice").unwrap().len(), 1);
        assert!(matrix.get("bob").unwrap().is_empty());
    }

    #[test]
    fn test_transpose() {
        let matrix = RatingMatrix::new()
            .with_user("alice", [("x", 5.0), ("y", 3.0)])
            .with_user("bob", [("x", 4.0)]);

        let by_item = matrix.transpose();
        assert_eq!(by_item.len(), 2);
        assert_eq!(by_item.get("x").unwrap().get("bob"), Some(&4.0));
        assert_eq!(by_item.get("y").unwrap().get("alice"), Some(&3.0));
        assert_eq!(by_item.transpose(), matrix);
    }

    #[test]
    fn test_name_lookup_fallback() {
        let names = NameLookup::new().with_name("i1", "Blade Runner");
        assert_eq!(names.display_name("i1"), "Blade Runner");
        assert_eq!(names.display_name("i2"), "i2");
    }

    #[test]
    fn test_rating_scale_round_trip() {
        let scale = RatingScale::default();
        assert!((scale.normalize(1.0) + 1.0).abs() < 1e-12);
        assert!((scale.normalize(5.0) - 1.0).abs() < 1e-12);
        assert!(scale.normalize(3.0).abs() < 1e-12);

        for rating in [1.0, 2.5, 4.0, 5.0] {
            assert!((scale.denormalize(scale.normalize(rating)) - rating).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rating_scale_rejects_inverted_bounds() {
        assert!(RatingScale::new(5.0, 1.0).is_err());
        assert!(RatingScale::new(3.0, 3.0).is_err());
        assert!(RatingScale::new(0.0, 10.0).is_ok());
    }
}
