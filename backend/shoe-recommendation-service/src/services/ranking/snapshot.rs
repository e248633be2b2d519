//! Published model snapshots
//!
//! Readers clone an `Arc` to the current snapshot and keep scoring against it
//! while a retrain publishes a replacement; they never observe a partially
//! trained model.

use super::HybridModel;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub model: Arc<HybridModel>,
    /// Monotonic, starts at 1 for the first published model
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Published {
    snapshot: Option<ModelSnapshot>,
    next_generation: u64,
}

/// Shared holder of the currently served model
#[derive(Debug, Default, Clone)]
pub struct ModelHandle {
    inner: Arc<RwLock<Published>>,
}

impl ModelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the served model; returns the new generation
    pub fn publish(&self, model: HybridModel) -> u64 {
        let mut published = self.inner.write();
        published.next_generation += 1;
        let generation = published.next_generation;
        published.snapshot = Some(ModelSnapshot {
            model: Arc::new(model),
            generation,
        });
        drop(published);

        info!(generation = generation, "Published model snapshot");
        generation
    }

    /// Snapshot currently served, `None` before the first publish
    pub fn current(&self) -> Option<ModelSnapshot> {
        self.inner.read().snapshot.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner
            .read()
            .snapshot
            .as_ref()
            .map(|s| s.generation)
            .unwrap_or(0)
    }
}
