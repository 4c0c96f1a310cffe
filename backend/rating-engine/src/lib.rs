pub mod config;
pub mod error;
pub mod models;
pub mod recommender;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{EngineError, Result};
pub use models::{NameLookup, Neighbor, RatingMatrix, RatingScale, Recommendation, UserRatings};
pub use recommender::{Recommender, RecommenderSettings};
pub use services::{CosineModel, DeviationTable, ItemSimilarityMatrix, Metric, UserAverages};
