//! Backing store and entity registry
//!
//! All participant ratings live in two parallel growable `f64` buffers
//! indexed by a dense position. Positions are stable for the lifetime of the
//! registry: slots are appended on first reference and never removed or
//! compacted, so a position handed out once stays valid across growth.
//!
//! The store deliberately carries no locking. Concurrent reads are always
//! safe; concurrent writes are made safe by the wave partitioner upstream
//! (no two games in a wave share a participant), and parallel workers hand
//! their updates back to the coordinating thread for write-back between
//! waves.

use crate::types::EntityId;
use std::collections::HashMap;

/// Bidirectional mapping between participant ids and store positions.
///
/// Append-only and insertion-ordered; identifiers are unique.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    index: HashMap<EntityId, usize>,
    ids: Vec<EntityId>,
}

impl EntityRegistry {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id_at(&self, position: usize) -> &str {
        &self.ids[position]
    }

    /// Participant ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }

    /// Insert an id, returning its position. Idempotent: an already known
    /// id returns its existing position.
    fn insert(&mut self, id: &str) -> (usize, bool) {
        if let Some(&position) = self.index.get(id) {
            return (position, false);
        }
        let position = self.ids.len();
        self.index.insert(id.to_string(), position);
        self.ids.push(id.to_string());
        (position, true)
    }
}

/// Update to a single slot, produced by rating a game and applied by the
/// coordinating thread.
#[derive(Debug, Clone, Copy)]
pub struct SlotUpdate {
    pub position: usize,
    pub mu: f64,
    pub sigma: f64,
}

/// Grow-only arena of participant ratings.
#[derive(Debug)]
pub struct BackingStore {
    registry: EntityRegistry,
    mus: Vec<f64>,
    sigmas: Vec<f64>,
    default_mu: f64,
    default_sigma: f64,
}

impl BackingStore {
    pub fn new(default_mu: f64, default_sigma: f64) -> Self {
        Self {
            registry: EntityRegistry::default(),
            mus: Vec::new(),
            sigmas: Vec::new(),
            default_mu,
            default_sigma,
        }
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.registry.position_of(id)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Register a participant with default initial values, returning its
    /// position. Registering a known id returns the existing position and
    /// leaves its rating untouched.
    pub fn register(&mut self, id: &str) -> usize {
        let (position, created) = self.registry.insert(id);
        if created {
            self.mus.push(self.default_mu);
            self.sigmas.push(self.default_sigma);
        }
        position
    }

    /// Register a participant, optionally overriding the initial values.
    /// For a known id the provided values overwrite the current rating.
    pub fn register_with(&mut self, id: &str, mu: Option<f64>, sigma: Option<f64>) -> usize {
        let position = self.register(id);
        if let Some(mu) = mu {
            self.mus[position] = mu;
        }
        if let Some(sigma) = sigma {
            self.sigmas[position] = sigma;
        }
        position
    }

    pub fn read(&self, position: usize) -> (f64, f64) {
        (self.mus[position], self.sigmas[position])
    }

    pub fn write(&mut self, position: usize, mu: f64, sigma: f64) {
        self.mus[position] = mu;
        self.sigmas[position] = sigma;
    }

    /// Apply a batch of slot updates.
    pub fn apply(&mut self, updates: &[SlotUpdate]) {
        for update in updates {
            self.mus[update.position] = update.mu;
            self.sigmas[update.position] = update.sigma;
        }
    }

    /// A read handle for one participant, or `None` if unknown.
    pub fn view(&self, id: &str) -> Option<RatingView<'_>> {
        self.registry.position_of(id).map(|position| RatingView {
            store: self,
            position,
        })
    }

    /// Export all ratings as `id -> (mu, sigma)`.
    pub fn export(&self) -> HashMap<EntityId, (f64, f64)> {
        self.registry
            .ids()
            .enumerate()
            .map(|(position, id)| (id.clone(), (self.mus[position], self.sigmas[position])))
            .collect()
    }
}

/// Lightweight read handle into the backing store for one participant.
///
/// Holds no data of its own; every access goes straight to the store's
/// buffers, so a view always reflects the latest applied ratings.
#[derive(Debug, Clone, Copy)]
pub struct RatingView<'a> {
    store: &'a BackingStore,
    position: usize,
}

impl<'a> RatingView<'a> {
    pub fn id(&self) -> &'a str {
        self.store.registry.id_at(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn mu(&self) -> f64 {
        self.store.mus[self.position]
    }

    pub fn sigma(&self) -> f64 {
        self.store.sigmas[self.position]
    }

    /// Conservative skill estimate (`mu - z * sigma`).
    pub fn ordinal(&self, z: f64) -> f64 {
        self.mu() - z * self.sigma()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> BackingStore {
        BackingStore::new(25.0, 25.0 / 3.0)
    }

    #[test]
    fn test_register_assigns_dense_positions() {
        let mut store = test_store();
        assert_eq!(store.register("alice"), 0);
        assert_eq!(store.register("bob"), 1);
        assert_eq!(store.register("carol"), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut store = test_store();
        let position = store.register("alice");
        store.write(position, 30.0, 5.0);

        // A second registration keeps the position and the rating.
        assert_eq!(store.register("alice"), position);
        assert_eq!(store.read(position), (30.0, 5.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_register_with_overrides() {
        let mut store = test_store();
        let position = store.register_with("alice", Some(30.0), None);
        assert_eq!(store.read(position), (30.0, 25.0 / 3.0));

        // Overwrites an existing slot when values are supplied.
        store.register_with("alice", None, Some(4.0));
        assert_eq!(store.read(position), (30.0, 4.0));
    }

    #[test]
    fn test_positions_survive_growth() {
        let mut store = test_store();
        let alice = store.register("alice");
        store.write(alice, 31.0, 6.0);
        for i in 0..1000 {
            store.register(&format!("player-{i}"));
        }
        assert_eq!(store.read(alice), (31.0, 6.0));
        assert_eq!(store.registry().id_at(alice), "alice");
    }

    #[test]
    fn test_view_reflects_writes() {
        let mut store = test_store();
        let position = store.register("alice");
        store.write(position, 28.0, 4.0);

        let view = store.view("alice").unwrap();
        assert_eq!(view.id(), "alice");
        assert_eq!(view.mu(), 28.0);
        assert_eq!(view.sigma(), 4.0);
        assert!((view.ordinal(3.0) - 16.0).abs() < 1e-12);

        assert!(store.view("nobody").is_none());
    }

    #[test]
    fn test_apply_updates() {
        let mut store = test_store();
        let alice = store.register("alice");
        let bob = store.register("bob");
        store.apply(&[
            SlotUpdate {
                position: alice,
                mu: 27.0,
                sigma: 7.5,
            },
            SlotUpdate {
                position: bob,
                mu: 23.0,
                sigma: 7.5,
            },
        ]);
        assert_eq!(store.read(alice), (27.0, 7.5));
        assert_eq!(store.read(bob), (23.0, 7.5));
    }

    #[test]
    fn test_export() {
        let mut store = test_store();
        store.register("alice");
        store.register_with("bob", Some(30.0), Some(5.0));

        let exported = store.export();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported["bob"], (30.0, 5.0));
        assert_eq!(exported["alice"], (25.0, 25.0 / 3.0));
    }
}
