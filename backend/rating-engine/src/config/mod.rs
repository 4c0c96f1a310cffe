use crate::error::{EngineError, Result};
use crate::models::RatingScale;
use crate::recommender::RecommenderSettings;
use crate::services::similarity::Metric;
use serde::Deserialize;

const ENV_PREFIX: &str = "ENGINE_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// pearson | manhattan | euclidean; anything else means pearson
    #[serde(default = "default_metric")]
    pub metric: String,
    /// Neighbors blended by the KNN predictor
    #[serde(default = "default_k")]
    pub k: usize,
    /// Maximum recommendations returned
    #[serde(default = "default_n")]
    pub n: usize,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    #[serde(default = "default_max_rating")]
    pub max_rating: f64,
    pub ratings_path: Option<String>,
    pub names_path: Option<String>,
    pub query_user: Option<String>,
}

fn default_metric() -> String {
    Metric::Pearson.as_str().to_string()
}

fn default_k() -> usize {
    1
}

fn default_n() -> usize {
    5
}

fn default_min_rating() -> f64 {
    1.0
}

fn default_max_rating() -> f64 {
    5.0
}

impl Config {
    /// Load `ENGINE_*` variables, reading `.env` first when present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config: Config = envy::prefixed(ENV_PREFIX).from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::from_env`] over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(EngineError::Configuration(
                "ENGINE_K must be greater than 0".to_string(),
            ));
        }

        if self.n == 0 {
            return Err(EngineError::Configuration(
                "ENGINE_N must be greater than 0".to_string(),
            ));
        }

        if !(self.min_rating < self.max_rating) {
            return Err(EngineError::Configuration(format!(
                "ENGINE_MIN_RATING ({}) must be below ENGINE_MAX_RATING ({})",
                self.min_rating, self.max_rating
            )));
        }

        Ok(())
    }

    /// Resolve into engine settings. An unknown metric falls back to
    /// Pearson with a warning.
    pub fn settings(&self) -> Result<RecommenderSettings> {
        Ok(RecommenderSettings {
            metric: Metric::from_name(&self.metric),
            k: self.k,
            n: self.n,
            scale: RatingScale::new(self.min_rating, self.max_rating)?,
        })
    }
}
