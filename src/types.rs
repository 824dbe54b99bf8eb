//! Common types used throughout the rating engine

use serde::{Deserialize, Serialize};

/// Unique identifier for participants
pub type EntityId = String;

/// Minimal value-type rating used as input/output of the compute contract.
///
/// Unlike a registry slot it has no identity and no back-reference into the
/// backing store; instances exist only for the duration of one game's
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FastRating {
    pub mu: f64,
    pub sigma: f64,
}

impl FastRating {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }

    /// Conservative skill estimate: `mu - z * sigma`.
    pub fn ordinal(&self, z: f64) -> f64 {
        self.mu - z * self.sigma
    }
}

/// Descriptor for a single game.
///
/// Teams are ordered lists of participant ids. Ranks (lower = better) take
/// precedence over scores (higher = better); scores are converted to ranks
/// with ties preserved before any computation. Weights are per-participant
/// contribution weights, parallel in shape to `teams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub teams: Vec<Vec<EntityId>>,
    pub ranks: Option<Vec<f64>>,
    pub scores: Option<Vec<f64>>,
    pub weights: Option<Vec<Vec<f64>>>,
}

impl Game {
    /// Create a game from teams only; team order determines placement
    /// (first team is the winner).
    pub fn new<T, P>(teams: T) -> Self
    where
        T: IntoIterator<Item = P>,
        P: IntoIterator<Item = EntityId>,
    {
        Self {
            teams: teams
                .into_iter()
                .map(|team| team.into_iter().collect())
                .collect(),
            ranks: None,
            scores: None,
            weights: None,
        }
    }

    pub fn with_ranks(mut self, ranks: Vec<f64>) -> Self {
        self.ranks = Some(ranks);
        self
    }

    pub fn with_scores(mut self, scores: Vec<f64>) -> Self {
        self.scores = Some(scores);
        self
    }

    pub fn with_weights(mut self, weights: Vec<Vec<f64>>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Iterate over every participant id referenced by this game.
    pub fn participants(&self) -> impl Iterator<Item = &EntityId> {
        self.teams.iter().flatten()
    }

    /// Total participant count across all teams.
    pub fn participant_count(&self) -> usize {
        self.teams.iter().map(|team| team.len()).sum()
    }
}

/// Lifecycle of a game inside an executor run.
///
/// `Pending -> Normalized -> Computed -> Applied`, with `Failed` terminal on
/// any normalization or compute error. Games left `Pending` at the end of a
/// run were never reached (e.g. the run was cancelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Pending,
    Normalized,
    Computed,
    Applied,
    Failed,
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Pending => write!(f, "pending"),
            GameState::Normalized => write!(f, "normalized"),
            GameState::Computed => write!(f, "computed"),
            GameState::Applied => write!(f, "applied"),
            GameState::Failed => write!(f, "failed"),
        }
    }
}

/// Final status of a single game after a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub game_index: usize,
    pub state: GameState,
    /// Present only when `state` is `Failed`.
    pub error: Option<String>,
}

/// Outcome summary of a batch run.
///
/// A failing game never aborts the batch; it is reported here and the
/// remaining games proceed. `cancelled` is set when the run was aborted
/// between waves; games of unprocessed waves stay `Pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub reports: Vec<GameReport>,
    pub waves: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn applied_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.state == GameState::Applied)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &GameReport> {
        self.reports.iter().filter(|r| r.state == GameState::Failed)
    }

    /// True when every game was applied.
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.reports.iter().all(|r| r.state == GameState::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_rating_ordinal() {
        let rating = FastRating::new(25.0, 25.0 / 3.0);
        assert!((rating.ordinal(3.0) - 0.0).abs() < 1e-12);
        assert!((rating.ordinal(2.0) - (25.0 - 50.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_ordinal_monotonic_in_mu() {
        let lower = FastRating::new(20.0, 5.0);
        let higher = FastRating::new(30.0, 5.0);
        assert!(higher.ordinal(3.0) > lower.ordinal(3.0));
    }

    #[test]
    fn test_ordinal_anti_monotonic_in_sigma() {
        let certain = FastRating::new(25.0, 2.0);
        let uncertain = FastRating::new(25.0, 8.0);
        assert!(certain.ordinal(3.0) > uncertain.ordinal(3.0));
    }

    #[test]
    fn test_game_builder() {
        let game = Game::new(vec![
            vec!["alice".to_string()],
            vec!["bob".to_string(), "carol".to_string()],
        ])
        .with_scores(vec![3.0, 7.0]);

        assert_eq!(game.teams.len(), 2);
        assert_eq!(game.participant_count(), 3);
        assert_eq!(game.scores, Some(vec![3.0, 7.0]));
        assert!(game.ranks.is_none());

        let ids: Vec<&EntityId> = game.participants().collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], "alice");
    }

    #[test]
    fn test_batch_summary_accounting() {
        let summary = BatchSummary {
            reports: vec![
                GameReport {
                    game_index: 0,
                    state: GameState::Applied,
                    error: None,
                },
                GameReport {
                    game_index: 1,
                    state: GameState::Failed,
                    error: Some("boom".to_string()),
                },
            ],
            waves: 2,
            cancelled: false,
        };

        assert_eq!(summary.applied_count(), 1);
        assert_eq!(summary.failures().count(), 1);
        assert!(!summary.is_clean());
    }
}
