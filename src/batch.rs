//! Batch processor: whole-batch rating with upfront wave planning
//!
//! Unlike the `Ladder`, the processor sees the entire game list at once, so
//! the partitioner builds the full conflict plan before any strategy runs.
//! Each call starts from a fresh store seeded with the supplied initial
//! ratings; the final ratings come back as a plain mapping.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::model::RatingModel;
use crate::store::BackingStore;
use crate::types::{BatchSummary, EntityId, Game};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation for a running batch.
///
/// Cancelling aborts the remaining waves; writes from already-applied
/// waves are retained (no rollback). Callers needing atomicity should
/// snapshot the ratings beforehand.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn flag(&self) -> &AtomicBool {
        &self.flag
    }
}

/// Result of a full batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Final `id -> (mu, sigma)` for every participant in the batch.
    pub ratings: HashMap<EntityId, (f64, f64)>,
    pub summary: BatchSummary,
}

pub struct BatchProcessor {
    model: Arc<dyn RatingModel>,
    config: EngineConfig,
    cancel: CancelHandle,
}

impl BatchProcessor {
    pub fn new(model: Arc<dyn RatingModel>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            config,
            cancel: CancelHandle::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for aborting a run in progress from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Process all games and return the final ratings.
    ///
    /// Every participant referenced by the batch is registered before
    /// execution starts; `initial_ratings` seed the store for participants
    /// with history, everyone else starts from the configured defaults.
    pub fn process(
        &self,
        games: &[Game],
        initial_ratings: Option<&HashMap<EntityId, (f64, f64)>>,
    ) -> Result<BatchOutcome> {
        let mut store = BackingStore::new(self.config.default_mu, self.config.default_sigma);
        for game in games {
            for id in game.participants() {
                store.register(id);
            }
        }
        if let Some(initial) = initial_ratings {
            for (id, &(mu, sigma)) in initial {
                if store.contains(id) {
                    store.register_with(id, Some(mu), Some(sigma));
                }
            }
        }

        let summary = Executor::new(self.model.as_ref(), &self.config).run(
            games,
            &mut store,
            Some(self.cancel.flag()),
        )?;

        Ok(BatchOutcome {
            ratings: store.export(),
            summary,
        })
    }
}
