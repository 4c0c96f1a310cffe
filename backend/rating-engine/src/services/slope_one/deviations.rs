use crate::models::{ItemId, RatingMatrix};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Pairwise average rating deviations and co-rating counts.
///
/// `deviation(i, j)` is the mean of `rating_i - rating_j` over users who
/// rated both. Both directions are computed from the same overlaps rather
/// than mirrored. A pair nobody co-rated has no entry at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviationTable {
    deviations: BTreeMap<ItemId, BTreeMap<ItemId, f64>>,
    frequencies: BTreeMap<ItemId, BTreeMap<ItemId, u32>>,
}

impl DeviationTable {
    pub fn deviation(&self, item: &str, other: &str) -> Option<f64> {
        self.deviations.get(item)?.get(other).copied()
    }

    pub fn frequency(&self, item: &str, other: &str) -> Option<u32> {
        self.frequencies.get(item)?.get(other).copied()
    }

    /// Items with at least one co-rated partner, with their deviation rows.
    pub fn rows(&self) -> impl Iterator<Item = (&ItemId, &BTreeMap<ItemId, f64>)> {
        self.deviations.iter()
    }

    pub fn item_count(&self) -> usize {
        self.deviations.len()
    }

    pub fn pair_count(&self) -> usize {
        self.deviations.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.deviations.is_empty()
    }
}

/// Build the slope-one deviation table from every user's co-rated pairs.
pub fn compute_deviations(matrix: &RatingMatrix) -> DeviationTable {
    // (sum of differences, co-rating count) per ordered pair
    let mut totals: BTreeMap<ItemId, BTreeMap<ItemId, (f64, u32)>> = BTreeMap::new();

    for (_, ratings) in matrix.users() {
        for (item, rating) in ratings {
            for (other, other_rating) in ratings {
                if item == other {
                    continue;
                }
                let entry = totals
                    .entry(item.clone())
                    .or_default()
                    .entry(other.clone())
                    .or_insert((0.0, 0));
                entry.0 += rating - other_rating;
                entry.1 += 1;
            }
        }
    }

    let mut deviations: BTreeMap<ItemId, BTreeMap<ItemId, f64>> = BTreeMap::new();
    let mut frequencies: BTreeMap<ItemId, BTreeMap<ItemId, u32>> = BTreeMap::new();
    for (item, row) in totals {
        let (deviation_row, frequency_row): (BTreeMap<ItemId, f64>, BTreeMap<ItemId, u32>) = row
            .into_iter()
            .map(|(other, (sum, count))| {
                ((other.clone(), sum / f64::from(count)), (other, count))
            })
            .unzip();
        deviations.insert(item.clone(), deviation_row);
        frequencies.insert(item, frequency_row);
    }

    let table = DeviationTable {
        deviations,
        frequencies,
    };

    if table.is_empty() {
        warn!(users = matrix.len(), "No co-rated item pairs, deviation table is empty");
    } else {
        info!(
            items = table.item_count(),
            pairs = table.pair_count(),
            users = matrix.len(),
            "Deviation table computed"
        );
    }

    table
}
