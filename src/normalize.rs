//! Game normalization: the fast path between the store and the models
//!
//! Turns a `Game` descriptor into the exact shape `RatingModel::compute`
//! expects: positions resolved, spreads tau-inflated, scores converted to
//! ranks, weights normalized, and teams sorted into ascending-rank order.
//! Original team positions ride along so results can be scattered back to
//! the right slots regardless of the sort. Both the single-game and the
//! bulk path go through here, so there is exactly one implementation of
//! these rules.

use crate::config::EngineConfig;
use crate::error::RatingError;
use crate::model::common::normalize_weights;
use crate::store::{BackingStore, SlotUpdate};
use crate::types::{FastRating, Game};

/// A game in compute-ready form.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedGame {
    pub game_index: usize,
    /// Teams in ascending-rank order, spreads tau-inflated.
    pub teams: Vec<Vec<FastRating>>,
    /// Store position of every player, parallel to `teams`.
    pub positions: Vec<Vec<usize>>,
    /// Spreads as read from the store (pre-inflation), for the
    /// limit-spread-growth clamp.
    pub pre_sigmas: Vec<Vec<f64>>,
    /// Sorted rank values (original or score-derived).
    pub ranks: Option<Vec<f64>>,
    pub scores: Option<Vec<f64>>,
    /// Per-team weights normalized into `[1, 2]`.
    pub weights: Option<Vec<Vec<f64>>>,
}

/// Derive rank values from scores: higher score means a better (lower)
/// rank, and equal scores share a rank.
pub(crate) fn ranks_from_scores(scores: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; scores.len()];
    let mut current = 0usize;
    for (position, &team) in order.iter().enumerate() {
        if position > 0 && scores[order[position - 1]] > scores[team] {
            current = position;
        }
        ranks[team] = current as f64;
    }
    ranks
}

fn permute<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i].clone()).collect()
}

/// Validate a game's shape and produce its compute-ready form.
///
/// Fails without touching the store: `UnknownParticipant` when an id is
/// missing from the registry (auto-registration happens upstream, before
/// any wave executes), `EmptyTeam` for missing teams or players,
/// `ShapeMismatch` for rank/score/weight arrays that do not line up.
pub(crate) fn normalize_game(
    game: &Game,
    game_index: usize,
    store: &BackingStore,
    config: &EngineConfig,
) -> Result<NormalizedGame, RatingError> {
    let team_count = game.teams.len();
    if team_count == 0 {
        return Err(RatingError::EmptyTeam { game_index });
    }
    if game.teams.iter().any(|team| team.is_empty()) {
        return Err(RatingError::EmptyTeam { game_index });
    }

    if let Some(ranks) = &game.ranks {
        if ranks.len() != team_count {
            return Err(RatingError::ShapeMismatch {
                game_index,
                what: "ranks",
                expected: team_count,
                actual: ranks.len(),
            });
        }
    }
    if let Some(scores) = &game.scores {
        if scores.len() != team_count {
            return Err(RatingError::ShapeMismatch {
                game_index,
                what: "scores",
                expected: team_count,
                actual: scores.len(),
            });
        }
    }
    if let Some(weights) = &game.weights {
        if weights.len() != team_count {
            return Err(RatingError::ShapeMismatch {
                game_index,
                what: "weights",
                expected: team_count,
                actual: weights.len(),
            });
        }
        for (team, team_weights) in game.teams.iter().zip(weights) {
            if team_weights.len() != team.len() {
                return Err(RatingError::ShapeMismatch {
                    game_index,
                    what: "weights",
                    expected: team.len(),
                    actual: team_weights.len(),
                });
            }
        }
    }

    // Build fast ratings and position lists from the store.
    let tau = config.tau;
    let mut teams = Vec::with_capacity(team_count);
    let mut positions = Vec::with_capacity(team_count);
    let mut pre_sigmas = Vec::with_capacity(team_count);
    for team_ids in &game.teams {
        let mut team = Vec::with_capacity(team_ids.len());
        let mut team_positions = Vec::with_capacity(team_ids.len());
        let mut team_sigmas = Vec::with_capacity(team_ids.len());
        for id in team_ids {
            let position =
                store
                    .position_of(id)
                    .ok_or_else(|| RatingError::UnknownParticipant {
                        id: id.clone(),
                        game_index,
                    })?;
            let (mu, sigma) = store.read(position);
            let inflated = if tau > 0.0 {
                (sigma * sigma + tau * tau).sqrt()
            } else {
                sigma
            };
            team.push(FastRating::new(mu, inflated));
            team_positions.push(position);
            team_sigmas.push(sigma);
        }
        teams.push(team);
        positions.push(team_positions);
        pre_sigmas.push(team_sigmas);
    }

    // Ranks take precedence; scores fill in when ranks are absent.
    let ranks: Option<Vec<f64>> = match (&game.ranks, &game.scores) {
        (Some(ranks), _) => Some(ranks.clone()),
        (None, Some(scores)) => Some(ranks_from_scores(scores)),
        (None, None) => None,
    };

    let mut scores = game.scores.clone();
    let mut weights = game
        .weights
        .as_ref()
        .map(|all| all.iter().map(|team| normalize_weights(team)).collect::<Vec<_>>());

    // Sort teams into ascending-rank order; the sort is stable so tied
    // teams keep their submission order. Positions and pre-game spreads
    // travel with their teams.
    let ranks = match ranks {
        Some(rank_values) => {
            let mut order: Vec<usize> = (0..team_count).collect();
            order.sort_by(|&a, &b| {
                rank_values[a]
                    .partial_cmp(&rank_values[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            teams = permute(&teams, &order);
            let sorted_positions = permute(&positions, &order);
            let sorted_sigmas = permute(&pre_sigmas, &order);
            positions = sorted_positions;
            pre_sigmas = sorted_sigmas;
            scores = scores.map(|values| permute(&values, &order));
            weights = weights.map(|values| permute(&values, &order));
            let mut sorted_ranks = rank_values;
            sorted_ranks.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            Some(sorted_ranks)
        }
        None => None,
    };

    Ok(NormalizedGame {
        game_index,
        teams,
        positions,
        pre_sigmas,
        ranks,
        scores,
        weights,
    })
}

/// Turn a model result into slot updates against the original positions.
///
/// With `limit_sigma_growth`, a spread may shrink freely but never exceeds
/// the value read from the store before the game.
pub(crate) fn collect_updates(
    normalized: &NormalizedGame,
    rated: &[Vec<FastRating>],
    limit_sigma_growth: bool,
) -> Result<Vec<SlotUpdate>, RatingError> {
    if rated.len() != normalized.teams.len()
        || rated
            .iter()
            .zip(&normalized.teams)
            .any(|(out, team)| out.len() != team.len())
    {
        return Err(RatingError::WorkerFailure {
            game_index: normalized.game_index,
            message: "model returned a result of mismatched shape".to_string(),
        });
    }

    let mut updates = Vec::with_capacity(normalized.teams.iter().map(Vec::len).sum());
    for (team_index, team_result) in rated.iter().enumerate() {
        for (player_index, player) in team_result.iter().enumerate() {
            let mut sigma = player.sigma;
            if limit_sigma_growth {
                sigma = sigma.min(normalized.pre_sigmas[team_index][player_index]);
            }
            updates.push(SlotUpdate {
                position: normalized.positions[team_index][player_index],
                mu: player.mu,
                sigma,
            });
        }
    }
    Ok(updates)
}
