//! Prediction engine benchmarks - Criterion
//!
//! Coverage:
//! 1. Nearest-neighbor ranking per metric
//! 2. Slope-one deviation table build and prediction
//! 3. Cosine similarity matrix build and prediction
//!
//! Run: cargo bench --bench engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rating_engine::services::{cosine, neighbors, slope_one};
use rating_engine::{Metric, NameLookup, RatingMatrix, RatingScale};

/// Deterministic sparse matrix: each user rates roughly a third of the items.
fn synthetic_matrix(users: usize, items: usize) -> RatingMatrix {
    let mut matrix = RatingMatrix::new();
    for user in 0..users {
        for item in 0..items {
            if (user * 7 + item * 13) % 3 == 0 {
                let rating = 1.0 + ((user * 31 + item * 17) % 9) as f64 / 2.0;
                matrix.insert(format!("user{}", user), format!("item{}", item), Some(rating));
            }
        }
    }
    matrix
}

fn benchmark_nearest_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");
    let matrix = synthetic_matrix(500, 200);

    for metric in [Metric::Pearson, Metric::Manhattan, Metric::Euclidean] {
        group.bench_with_input(
            BenchmarkId::new("nearest_neighbors", metric.as_str()),
            &metric,
            |b, &metric| {
                b.iter(|| neighbors::nearest_neighbors(black_box(&matrix), metric, "user0"));
            },
        );
    }

    group.finish();
}

fn benchmark_slope_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("slope_one");

    for users in [50, 200] {
        let matrix = synthetic_matrix(users, 100);
        group.bench_with_input(
            BenchmarkId::new("compute_deviations", users),
            &matrix,
            |b, matrix| b.iter(|| slope_one::compute_deviations(black_box(matrix))),
        );
    }

    let matrix = synthetic_matrix(200, 100);
    let table = slope_one::compute_deviations(&matrix);
    let user_ratings = matrix.get("user1").cloned().unwrap_or_default();
    let names = NameLookup::new();
    group.bench_function("weighted_slope_one", |b| {
        b.iter(|| slope_one::weighted_slope_one(&table, black_box(&user_ratings), 10, &names))
    });

    group.finish();
}

fn benchmark_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine");
    group.sample_size(20);

    let matrix = synthetic_matrix(100, 60);
    group.bench_function("build_model", |b| {
        b.iter(|| cosine::CosineModel::build(black_box(&matrix)))
    });

    let model = cosine::CosineModel::build(&matrix).expect("synthetic users all have ratings");
    let user_ratings = matrix.get("user2").cloned().unwrap_or_default();
    let names = NameLookup::new();
    group.bench_function("cosine_sim_predict", |b| {
        b.iter(|| {
            cosine::cosine_sim_predict(
                &model.similarities,
                black_box(&user_ratings),
                RatingScale::default(),
                10,
                &names,
            )
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_nearest_neighbors,
    benchmark_slope_one,
    benchmark_cosine
);
criterion_main!(benches);
