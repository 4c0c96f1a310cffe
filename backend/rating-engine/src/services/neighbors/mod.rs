use crate::error::Result;
use crate::models::{Neighbor, RatingMatrix};
use crate::services::similarity::Metric;
use tracing::debug;

/// Rank every other user in `matrix` by closeness to `user`.
///
/// Pearson ranks descending, the distance metrics ascending. The sort is
/// stable, so ties keep matrix order.
pub fn nearest_neighbors(matrix: &RatingMatrix, metric: Metric, user: &str) -> Result<Vec<Neighbor>> {
    let target = matrix.ratings_for(user)?;

    let mut neighbors: Vec<Neighbor> = matrix
        .users()
        .filter(|(other, _)| other.as_str() != user)
        .map(|(other, ratings)| Neighbor {
            user_id: other.clone(),
            score: metric.score(target, ratings),
        })
        .collect();

    neighbors.sort_by(|a, b| metric.closer_first(a.score, b.score));

    debug!(
        user = user,
        metric = %metric,
        candidates = neighbors.len(),
        "Ranked nearest neighbors"
    );

    Ok(neighbors)
}
