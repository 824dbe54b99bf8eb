//! Ladder: a persistent rating registry with incremental and bulk rating
//!
//! A `Ladder` owns the backing store and keeps it across calls, so games
//! can be rated one at a time as they arrive or scheduled in bulk with
//! wave partitioning. Both paths flow through the same normalization and
//! the same `RatingModel::compute` contract; there is no second
//! implementation of the math anywhere.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::model::{PlackettLuce, RatingModel};
use crate::store::{BackingStore, RatingView};
use crate::types::{BatchSummary, EntityId, Game};
use std::collections::HashMap;
use std::sync::Arc;

pub struct Ladder {
    store: BackingStore,
    model: Arc<dyn RatingModel>,
    config: EngineConfig,
}

impl Ladder {
    pub fn new(model: Arc<dyn RatingModel>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let store = BackingStore::new(config.default_mu, config.default_sigma);
        Ok(Self {
            store,
            model,
            config,
        })
    }

    /// A ladder with the default configuration and the Plackett-Luce model.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(PlackettLuce::default()), EngineConfig::default())
            .expect("default configuration is valid")
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &dyn RatingModel {
        self.model.as_ref()
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.contains(id)
    }

    /// Register a participant with default initial values; idempotent.
    pub fn register(&mut self, id: &str) -> usize {
        self.store.register(id)
    }

    /// Register a participant, optionally overriding the initial mean and
    /// spread. For an existing participant the supplied values overwrite
    /// its current rating.
    pub fn register_with(&mut self, id: &str, mu: Option<f64>, sigma: Option<f64>) -> usize {
        self.store.register_with(id, mu, sigma)
    }

    /// A read handle for one participant, or `None` if unknown.
    pub fn view(&self, id: &str) -> Option<RatingView<'_>> {
        self.store.view(id)
    }

    /// Conservative skill estimate for one participant, using the
    /// configured z.
    pub fn ordinal(&self, id: &str) -> Option<f64> {
        self.view(id).map(|view| view.ordinal(self.config.ordinal_z))
    }

    /// Rate a single game immediately (a one-game wave), updating the
    /// store in place.
    pub fn rate(&mut self, game: &Game) -> Result<()> {
        if self.config.auto_register {
            for id in game.participants() {
                self.store.register(id);
            }
        }
        Executor::new(self.model.as_ref(), &self.config).rate_single(game, &mut self.store)
    }

    /// Rate a batch of games under wave scheduling with the configured
    /// execution strategy. Failing games are skipped and reported in the
    /// summary; the registry persists across calls.
    pub fn rate_batch(&mut self, games: &[Game]) -> Result<BatchSummary> {
        if self.config.auto_register {
            for game in games {
                for id in game.participants() {
                    self.store.register(id);
                }
            }
        }
        Executor::new(self.model.as_ref(), &self.config).run(games, &mut self.store, None)
    }

    /// Export all ratings as `id -> (mu, sigma)`.
    pub fn export(&self) -> HashMap<EntityId, (f64, f64)> {
        self.store.export()
    }
}
