//! Weighted slope-one prediction.
//!
//! For every item the user rated and every unrated item with a deviation
//! entry against it:
//!   prediction[j] += (deviation[j][i] + rating[i]) * frequency[j][i]
//!   weight[j]     += frequency[j][i]
//! and the final score is prediction[j] / weight[j]. NaN entries in the
//! user's ratings count as unrated.

mod deviations;

pub use deviations::{compute_deviations, DeviationTable};

use crate::models::{ItemId, NameLookup, Recommendation, UserRatings};
use crate::utils::{known_ratings, top_n};
use std::collections::BTreeMap;
use tracing::debug;

pub fn weighted_slope_one(
    table: &DeviationTable,
    user_ratings: &UserRatings,
    n: usize,
    names: &NameLookup,
) -> Vec<Recommendation> {
    let user_ratings = known_ratings(user_ratings);

    // item -> (weighted sum, total frequency)
    let mut accumulated: BTreeMap<ItemId, (f64, u32)> = BTreeMap::new();

    for (rated_item, rating) in &user_ratings {
        for (diff_item, row) in table.rows() {
            if user_ratings.contains_key(diff_item) {
                continue;
            }
            let (Some(deviation), Some(frequency)) = (
                row.get(rated_item).copied(),
                table.frequency(diff_item, rated_item),
            ) else {
                continue;
            };

            let entry = accumulated.entry(diff_item.clone()).or_insert((0.0, 0));
            entry.0 += (deviation + rating) * f64::from(frequency);
            entry.1 += frequency;
        }
    }

    debug!(
        rated = user_ratings.len(),
        predicted = accumulated.len(),
        "Slope-one predictions accumulated"
    );

    // Entries only exist once a positive frequency was added.
    let scores = accumulated
        .into_iter()
        .map(|(item, (sum, weight))| (item, sum / f64::from(weight)))
        .collect();

    top_n(scores, n, names)
}
