use anyhow::{Context, Result};
use rating_engine::{Config, NameLookup, RatingMatrix, Recommender};
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env().context("Failed to load config")?;
    let settings = config.settings()?;

    let ratings_path = config
        .ratings_path
        .as_deref()
        .context("ENGINE_RATINGS_PATH must point to a JSON rating matrix")?;
    let matrix: RatingMatrix = read_json(ratings_path)?;

    let names: NameLookup = match config.names_path.as_deref() {
        Some(path) => read_json(path)?,
        None => NameLookup::default(),
    };

    info!(
        "Loaded {} users from {} (metric={}, k={}, n={})",
        matrix.len(),
        ratings_path,
        settings.metric,
        settings.k,
        settings.n
    );

    let recommender = Recommender::new(matrix, settings).with_names(names);

    let Some(user) = config.query_user.as_deref() else {
        warn!("ENGINE_QUERY_USER not set, nothing to predict");
        return Ok(());
    };

    let user_ratings = recommender.matrix().ratings_for(user)?.clone();

    let neighbors = recommender.nearest_neighbors(user)?;
    let knn = recommender
        .recommend_with_neighbors(user, &neighbors)
        .with_context(|| format!("KNN recommendation failed for {}", user))?;

    let deviations = recommender.compute_deviations();
    let slope_one = recommender.slope_one(&deviations, &user_ratings);

    let cosine_model = recommender
        .compute_cosine_model()
        .context("Failed to build item similarity matrix")?;
    let cosine = recommender.cosine_predict(&cosine_model, &user_ratings);

    let output = json!({
        "user": user,
        "neighbors": neighbors,
        "knn": knn,
        "slope_one": slope_one,
        "cosine": cosine,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
