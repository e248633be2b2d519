pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{
    Catalog, Dataset, DatasetInsights, HybridModel, ModelHandle, RecommendationPipeline,
};
