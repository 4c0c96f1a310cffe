use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Not enough neighbors: requested {requested}, available {available}")]
    NotEnoughNeighbors { requested: usize, available: usize },

    #[error("Neighbor weights sum to zero for user {user} (k = {k})")]
    ZeroNeighborWeight { user: String, k: usize },

    #[error("User has no ratings: {0}")]
    NoRatings(String),

    #[error("No rating average for user: {0}")]
    MissingAverage(String),

    #[error("Invalid rating scale: min {min} must be below max {max}")]
    InvalidRatingScale { min: f64, max: f64 },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<envy::Error> for EngineError {
    fn from(err: envy::Error) -> Self {
        EngineError::Configuration(err.to_string())
    }
}
