pub mod cosine;
pub mod knn;
pub mod neighbors;
pub mod similarity;
pub mod slope_one;

pub use cosine::{CosineModel, ItemSimilarityMatrix, UserAverages};
pub use similarity::Metric;
pub use slope_one::DeviationTable;
