/// Ranking Module
///
/// Hybrid collaborative / content-based ranking over the interaction matrix.
///
/// # Architecture
/// - **Model Layer**: latent-factor model whose user and item representations
///   are sums of identity and feature-token embeddings, trained with logistic
///   loss over observed positives and sampled negatives
/// - **Snapshot Layer**: trained models are immutable; retraining publishes a
///   new snapshot that readers pick up atomically
///
/// # Workflow
/// 1. Encode user/item features against the catalog vocabulary
/// 2. Build the weighted interaction matrix
/// 3. `HybridModel::fit` → immutable model
/// 4. `ModelHandle::publish` → served by `score` / `top_n`
pub mod model;
pub mod snapshot;

pub use model::{HybridModel, TrainingConfig};
pub use snapshot::{ModelHandle, ModelSnapshot};

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Shoe,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => f.write_str("user"),
            EntityKind::Shoe => f.write_str("shoe"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RankingError {
    /// Fatal: no model is produced
    #[error("Training failed: {0}")]
    Training(String),

    /// Recoverable: fall back to feature-only scoring
    #[error("Unknown {kind} {id}: not part of the catalog at training time")]
    UnknownEntity { kind: EntityKind, id: u64 },
}

pub type Result<T> = std::result::Result<T, RankingError>;
