//! Executor strategies
//!
//! All strategies consume the same wave plan and produce identical store
//! contents; they differ only in scheduling:
//!
//! - **Sequential**: waves in order, games in list order, one thread.
//! - **Parallel**: games within a wave fan out over a rayon worker pool.
//!   Workers read the pre-wave store and return their slot updates; the
//!   coordinator applies them before the next wave starts, which is the
//!   only synchronization point. Waves of one or two games are rated
//!   inline, skipping the fan-out overhead.
//! - **Pipelined**: a background thread partitions the batch and streams
//!   waves over a bounded channel while the consumer executes them; the
//!   inter-wave write barrier is unchanged.
//!
//! A failing game is marked `Failed` and skipped; sibling games and later
//! waves proceed. Nothing is written to the store for a game unless its
//! normalization and compute both succeeded.

use crate::config::{EngineConfig, ExecutionStrategy};
use crate::error::{RatingError, Result};
use crate::model::RatingModel;
use crate::normalize::{collect_updates, normalize_game};
use crate::partition::{partition_waves, WavePlan};
use crate::store::{BackingStore, SlotUpdate};
use crate::types::{BatchSummary, Game, GameReport, GameState};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Waves buffered ahead of the consumer in pipelined mode.
const PIPELINE_DEPTH: usize = 4;

/// Below this wave size the parallel strategies rate games inline.
const INLINE_WAVE_LIMIT: usize = 2;

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |flag| flag.load(Ordering::Relaxed))
}

pub(crate) struct Executor<'a> {
    model: &'a dyn RatingModel,
    config: &'a EngineConfig,
}

impl<'a> Executor<'a> {
    pub fn new(model: &'a dyn RatingModel, config: &'a EngineConfig) -> Self {
        Self { model, config }
    }

    /// Rate a single game immediately, as a one-game wave.
    pub fn rate_single(&self, game: &Game, store: &mut BackingStore) -> Result<()> {
        let updates = self.rate_game(0, game, store)?;
        store.apply(&updates);
        Ok(())
    }

    /// Run a batch under the configured strategy.
    pub fn run(
        &self,
        games: &[Game],
        store: &mut BackingStore,
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchSummary> {
        info!(
            games = games.len(),
            strategy = %self.config.execution_strategy,
            "starting batch run"
        );
        match self.config.execution_strategy {
            ExecutionStrategy::Sequential | ExecutionStrategy::Parallel => {
                let plan = partition_waves(games);
                debug!(waves = plan.wave_count(), "partitioned batch");
                self.in_worker_pool(|| self.execute_plan(&plan, games, store, cancel))
            }
            ExecutionStrategy::Pipelined => {
                self.in_worker_pool(|| self.run_pipelined(games, store, cancel))
            }
        }
    }

    /// Run a batch against a caller-supplied wave plan.
    ///
    /// The plan is validated up front; a violated wave invariant is fatal
    /// and aborts the run before anything executes.
    pub fn run_plan(
        &self,
        plan: &WavePlan,
        games: &[Game],
        store: &mut BackingStore,
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchSummary> {
        plan.validate(games)?;
        self.in_worker_pool(|| self.execute_plan(plan, games, store, cancel))
    }

    /// Scope `op` to a dedicated rayon pool when a worker count is
    /// configured; otherwise the global pool serves.
    fn in_worker_pool<T: Send>(&self, op: impl FnOnce() -> Result<T> + Send) -> Result<T> {
        if self.parallel_enabled() && self.config.worker_count > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.worker_count)
                .build()
                .map_err(|e| RatingError::ConfigurationError {
                    message: format!("failed to build worker pool: {e}"),
                })?;
            pool.install(op)
        } else {
            op()
        }
    }

    fn parallel_enabled(&self) -> bool {
        matches!(
            self.config.execution_strategy,
            ExecutionStrategy::Parallel | ExecutionStrategy::Pipelined
        )
    }

    fn execute_plan(
        &self,
        plan: &WavePlan,
        games: &[Game],
        store: &mut BackingStore,
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchSummary> {
        let mut reports = initial_reports(games.len());
        let mut waves_executed = 0;
        let mut cancelled = false;

        for wave in plan.waves() {
            if is_cancelled(cancel) {
                cancelled = true;
                break;
            }
            self.execute_wave(wave, games, store, &mut reports);
            waves_executed += 1;
        }

        Ok(BatchSummary {
            reports,
            waves: waves_executed,
            cancelled,
        })
    }

    fn run_pipelined(
        &self,
        games: &[Game],
        store: &mut BackingStore,
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchSummary> {
        let (sender, receiver) = crossbeam_channel::bounded::<Vec<usize>>(PIPELINE_DEPTH);
        let mut reports = initial_reports(games.len());
        let mut waves_executed = 0;
        let mut cancelled = false;

        std::thread::scope(|scope| {
            // Wave planning depends only on participant ids, never on
            // numeric results, so it can run ahead of the compute.
            scope.spawn(move || {
                let plan = partition_waves(games);
                for wave in plan.into_waves() {
                    if sender.send(wave).is_err() {
                        // Consumer hung up (cancellation); stop planning.
                        break;
                    }
                }
            });

            loop {
                if is_cancelled(cancel) {
                    cancelled = true;
                    break;
                }
                match receiver.recv() {
                    Ok(wave) => {
                        self.execute_wave(&wave, games, store, &mut reports);
                        waves_executed += 1;
                    }
                    Err(_) => break,
                }
            }
            drop(receiver);
        });

        Ok(BatchSummary {
            reports,
            waves: waves_executed,
            cancelled,
        })
    }

    /// Execute one wave; its writes are fully applied on return, which is
    /// the inter-wave barrier.
    fn execute_wave(
        &self,
        wave: &[usize],
        games: &[Game],
        store: &mut BackingStore,
        reports: &mut [GameReport],
    ) {
        debug!(games = wave.len(), "executing wave");
        if self.parallel_enabled() && wave.len() > INLINE_WAVE_LIMIT {
            // Games in a wave are participant-disjoint, so workers read the
            // pre-wave store concurrently and no write-back can clobber a
            // sibling's read.
            let shared: &BackingStore = store;
            let results: Vec<(usize, std::result::Result<Vec<SlotUpdate>, RatingError>)> = wave
                .par_iter()
                .map(|&game_index| {
                    (
                        game_index,
                        self.rate_game(game_index, &games[game_index], shared),
                    )
                })
                .collect();

            for (game_index, result) in results {
                match result {
                    Ok(updates) => {
                        store.apply(&updates);
                        reports[game_index].state = GameState::Applied;
                    }
                    Err(error) => fail_game(&mut reports[game_index], error),
                }
            }
        } else {
            for &game_index in wave {
                self.execute_game_sequential(game_index, &games[game_index], store, reports);
            }
        }
    }

    /// The fully narrated per-game state machine, used on the sequential
    /// path: Pending -> Normalized -> Computed -> Applied.
    fn execute_game_sequential(
        &self,
        game_index: usize,
        game: &Game,
        store: &mut BackingStore,
        reports: &mut [GameReport],
    ) {
        let report = &mut reports[game_index];
        let normalized = match normalize_game(game, game_index, store, self.config) {
            Ok(normalized) => normalized,
            Err(error) => return fail_game(report, error),
        };
        report.state = GameState::Normalized;

        let rated = self.model.compute(
            &normalized.teams,
            normalized.ranks.as_deref(),
            normalized.scores.as_deref(),
            normalized.weights.as_deref(),
        );
        report.state = GameState::Computed;

        match collect_updates(&normalized, &rated, self.config.limit_sigma_growth) {
            Ok(updates) => {
                store.apply(&updates);
                report.state = GameState::Applied;
            }
            Err(error) => fail_game(report, error),
        }
    }

    /// Normalize and compute one game against a read-only store, returning
    /// the slot updates for write-back.
    fn rate_game(
        &self,
        game_index: usize,
        game: &Game,
        store: &BackingStore,
    ) -> std::result::Result<Vec<SlotUpdate>, RatingError> {
        let normalized = normalize_game(game, game_index, store, self.config)?;
        let rated = self.model.compute(
            &normalized.teams,
            normalized.ranks.as_deref(),
            normalized.scores.as_deref(),
            normalized.weights.as_deref(),
        );
        collect_updates(&normalized, &rated, self.config.limit_sigma_growth)
    }
}

fn initial_reports(count: usize) -> Vec<GameReport> {
    (0..count)
        .map(|game_index| GameReport {
            game_index,
            state: GameState::Pending,
            error: None,
        })
        .collect()
}

fn fail_game(report: &mut GameReport, error: RatingError) {
    warn!(game = report.game_index, %error, "game failed; skipping");
    report.state = GameState::Failed;
    report.error = Some(error.to_string());
}
