pub mod catalog;
pub mod features;
pub mod insights;
pub mod interactions;
pub mod ranking;
pub mod recommendation_log;
pub mod recommender;
pub mod rules;

pub use catalog::{Catalog, Dataset};
pub use features::{FeatureEncoder, FeatureVocabulary};
pub use insights::DatasetInsights;
pub use interactions::{InteractionMatrix, InteractionWeights};
pub use ranking::{HybridModel, ModelHandle, RankingError, TrainingConfig};
pub use recommendation_log::{
    InMemoryLogStore, JsonLinesLogStore, LogQuery, RecommendationLog, RecommendationLogStore,
};
pub use recommender::{PersonalizedServices, Recommendation, RecommendationPipeline};
pub use rules::{EventMapping, HistorySnapshot, RuleConfig, RuleError};
