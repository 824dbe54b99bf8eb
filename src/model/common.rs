//! Shared pieces of the Weng-Lin model family
//!
//! Every model reduces each team to a `TeamSummary` (summed mean, summed
//! variance, dense rank), accumulates a per-team `(omega, delta)` pair, and
//! then applies the same per-player update. Only the accumulation differs
//! between variants, so everything else lives here.

use crate::types::FastRating;

/// Collective rating of one team within a game.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TeamSummary {
    pub mu: f64,
    pub sigma_sq: f64,
    /// Dense 0-based rank; tied teams share a rank.
    pub rank: usize,
}

/// Dense 0-based ranks for rank values sorted in ascending order: a team's
/// rank is the index of the first team with an equal value.
pub(crate) fn dense_ranks(sorted_values: &[f64]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(sorted_values.len());
    let mut current = 0usize;
    for (index, _) in sorted_values.iter().enumerate() {
        if index > 0 && sorted_values[index - 1] < sorted_values[index] {
            current = index;
        }
        ranks.push(current);
    }
    ranks
}

/// Summarize rank-ordered teams. `ranks`, when given, must be sorted
/// ascending (the normalization pipeline guarantees this); without ranks
/// the list order is the placement order.
pub(crate) fn team_summaries(teams: &[Vec<FastRating>], ranks: Option<&[f64]>) -> Vec<TeamSummary> {
    let rank_values: Vec<f64> = match ranks {
        Some(values) => values.to_vec(),
        None => (0..teams.len()).map(|i| i as f64).collect(),
    };
    let dense = dense_ranks(&rank_values);

    teams
        .iter()
        .zip(dense)
        .map(|(team, rank)| TeamSummary {
            mu: team.iter().map(|p| p.mu).sum(),
            sigma_sq: team.iter().map(|p| p.sigma * p.sigma).sum(),
            rank,
        })
        .collect()
}

/// Square root of the collective team variance plus one beta² per team.
pub(crate) fn c_value(summaries: &[TeamSummary], beta: f64) -> f64 {
    let beta_sq = beta * beta;
    summaries
        .iter()
        .map(|s| s.sigma_sq + beta_sq)
        .sum::<f64>()
        .sqrt()
}

/// For each team, the indices of its rank-adjacent neighbors. Used by the
/// partial-pairing variants, which couple each team only to the teams
/// directly above and below it in the standings.
pub(crate) fn ladder_pairs(count: usize) -> Vec<Vec<usize>> {
    (0..count)
        .map(|i| {
            let mut neighbors = Vec::with_capacity(2);
            if i > 0 {
                neighbors.push(i - 1);
            }
            if i + 1 < count {
                neighbors.push(i + 1);
            }
            neighbors
        })
        .collect()
}

/// Scale a team's weights into `[1, 2]`. A single weight maps to the top of
/// the range; a constant vector degenerates to a near-zero source range.
pub(crate) fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    if weights.len() == 1 {
        return vec![2.0];
    }

    let source_min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let source_max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut source_range = source_max - source_min;
    if source_range == 0.0 {
        source_range = 0.0001;
    }

    weights
        .iter()
        .map(|value| (value - source_min) / source_range + 1.0)
        .collect()
}

/// Apply a team's accumulated `(omega, delta)` to its players.
///
/// A player's share of the team update scales with their own variance; a
/// weight amplifies gains (`omega > 0`) and dampens losses. The variance
/// shrink factor is floored at `kappa` so sigma can never collapse to zero
/// or go negative.
pub(crate) fn update_team(
    team: &[FastRating],
    team_sigma_sq: f64,
    omega: f64,
    delta: f64,
    weights: Option<&[f64]>,
    kappa: f64,
) -> Vec<FastRating> {
    team.iter()
        .enumerate()
        .map(|(j, player)| {
            let weight = weights.map_or(1.0, |w| w[j]);
            let share = player.sigma * player.sigma / team_sigma_sq;
            let (mu, shrink) = if omega > 0.0 {
                (
                    player.mu + share * omega * weight,
                    (1.0 - share * delta * weight).max(kappa),
                )
            } else {
                (
                    player.mu + share * omega / weight,
                    (1.0 - share * delta / weight).max(kappa),
                )
            };
            FastRating::new(mu, player.sigma * shrink.sqrt())
        })
        .collect()
}
