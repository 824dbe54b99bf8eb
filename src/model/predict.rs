//! Outcome prediction over current ratings
//!
//! Pairwise win/draw odds from team aggregates. These read ratings only;
//! they never mutate the store and are shared by every model variant
//! through `ModelParams`.

use crate::model::common::team_summaries;
use crate::model::statistics::{phi_major, phi_major_inverse};
use crate::model::ModelParams;
use crate::types::FastRating;

fn total_player_count(teams: &[Vec<FastRating>]) -> f64 {
    teams.iter().map(|team| team.len()).sum::<usize>() as f64
}

/// Odds of each team winning, in team order. Sums to 1.
pub fn predict_win(teams: &[Vec<FastRating>], params: &ModelParams) -> Vec<f64> {
    let n = teams.len();
    if n < 2 {
        return vec![1.0; n];
    }

    let summaries = team_summaries(teams, None);
    let beta_sq = params.beta * params.beta;
    let total_count = total_player_count(teams);

    if n == 2 {
        let a = &summaries[0];
        let b = &summaries[1];
        let probability = phi_major(
            (a.mu - b.mu) / (total_count * beta_sq + a.sigma_sq + b.sigma_sq).sqrt(),
        );
        return vec![probability, 1.0 - probability];
    }

    let mut win_probabilities = vec![0.0f64; n];
    for (i, team_i) in summaries.iter().enumerate() {
        for (j, team_j) in summaries.iter().enumerate() {
            if i == j {
                continue;
            }
            let denominator =
                (total_count * beta_sq + team_i.sigma_sq + team_j.sigma_sq).sqrt();
            win_probabilities[i] += phi_major((team_i.mu - team_j.mu) / denominator);
        }
        win_probabilities[i] /= (n - 1) as f64;
    }

    let total: f64 = win_probabilities.iter().sum();
    win_probabilities
        .into_iter()
        .map(|probability| probability / total)
        .collect()
}

/// Odds that the whole match ends in a draw.
pub fn predict_draw(teams: &[Vec<FastRating>], params: &ModelParams) -> f64 {
    let n = teams.len();
    if n < 2 {
        return 1.0;
    }

    let summaries = team_summaries(teams, None);
    let beta_sq = params.beta * params.beta;
    let total_count = total_player_count(teams);
    let draw_probability = 1.0 / total_count;
    let draw_margin =
        total_count.sqrt() * params.beta * phi_major_inverse((1.0 + draw_probability) / 2.0);

    let mut pairwise_sum = 0.0;
    for (i, team_i) in summaries.iter().enumerate() {
        for (j, team_j) in summaries.iter().enumerate() {
            if i == j {
                continue;
            }
            let denominator =
                (total_count * beta_sq + team_i.sigma_sq + team_j.sigma_sq).sqrt();
            pairwise_sum += phi_major((draw_margin - team_i.mu + team_j.mu) / denominator)
                - phi_major((team_i.mu - team_j.mu - draw_margin) / denominator);
        }
    }

    let denominator = if n > 2 { (n * (n - 1)) as f64 } else { 1.0 };
    (pairwise_sum / denominator).abs()
}

/// Predicted placement for each team as `(rank, win_probability)`, in team
/// order. Rank 1 is the most likely winner; tied probabilities share a rank.
pub fn predict_rank(teams: &[Vec<FastRating>], params: &ModelParams) -> Vec<(usize, f64)> {
    let n = teams.len();
    if n < 2 {
        return vec![(1, 1.0); n];
    }

    let summaries = team_summaries(teams, None);
    let beta_sq = params.beta * params.beta;
    let total_count = total_player_count(teams);
    let draw_probability = 1.0 / total_count;
    let draw_margin =
        total_count.sqrt() * params.beta * phi_major_inverse((1.0 + draw_probability) / 2.0);
    let pair_denominator = (n * (n - 1)) as f64 / 2.0;

    let mut win_probabilities = vec![0.0f64; n];
    for (i, team_i) in summaries.iter().enumerate() {
        for (j, team_j) in summaries.iter().enumerate() {
            if i == j {
                continue;
            }
            let denominator =
                (total_count * beta_sq + team_i.sigma_sq + team_j.sigma_sq).sqrt();
            win_probabilities[i] +=
                phi_major((team_i.mu - team_j.mu - draw_margin) / denominator);
        }
        win_probabilities[i] = (win_probabilities[i] / pair_denominator).abs();
    }

    // Dense competition ranks: highest probability takes rank 1.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        win_probabilities[b]
            .partial_cmp(&win_probabilities[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0usize; n];
    let mut current_rank = 1;
    for (position, &team) in order.iter().enumerate() {
        if position > 0 {
            let previous = order[position - 1];
            if win_probabilities[previous] > win_probabilities[team] {
                current_rank = position + 1;
            }
        }
        ranks[team] = current_rank;
    }

    ranks.into_iter().zip(win_probabilities).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solo(mu: f64, sigma: f64) -> Vec<FastRating> {
        vec![FastRating::new(mu, sigma)]
    }

    #[test]
    fn test_predict_win_two_teams() {
        let params = ModelParams::default();
        let odds = predict_win(&[solo(30.0, 5.0), solo(20.0, 5.0)], &params);

        assert_eq!(odds.len(), 2);
        assert!(odds[0] > 0.7);
        assert!((odds[0] + odds[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_win_equal_teams_is_even() {
        let params = ModelParams::default();
        let odds = predict_win(
            &[solo(25.0, 25.0 / 3.0), solo(25.0, 25.0 / 3.0)],
            &params,
        );
        assert!((odds[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_predict_win_many_teams_sums_to_one() {
        let params = ModelParams::default();
        let odds = predict_win(
            &[solo(28.0, 6.0), solo(25.0, 7.0), solo(22.0, 8.0), solo(30.0, 5.0)],
            &params,
        );
        assert_eq!(odds.len(), 4);
        assert!((odds.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // Strongest team is most likely to win.
        let best = odds
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(best, 3);
    }

    #[test]
    fn test_predict_draw_higher_for_even_matches() {
        let params = ModelParams::default();
        let even = predict_draw(
            &[solo(25.0, 25.0 / 3.0), solo(25.0, 25.0 / 3.0)],
            &params,
        );
        let lopsided = predict_draw(&[solo(40.0, 3.0), solo(10.0, 3.0)], &params);
        assert!(even > lopsided);
        assert!((0.0..=1.0).contains(&even));
    }

    #[test]
    fn test_predict_rank_orders_by_strength() {
        let params = ModelParams::default();
        let predictions = predict_rank(
            &[solo(20.0, 5.0), solo(30.0, 5.0), solo(25.0, 5.0)],
            &params,
        );

        assert_eq!(predictions[1].0, 1);
        assert_eq!(predictions[2].0, 2);
        assert_eq!(predictions[0].0, 3);
    }

    #[test]
    fn test_predict_rank_ties_share_rank() {
        let params = ModelParams::default();
        let predictions = predict_rank(
            &[solo(25.0, 5.0), solo(25.0, 5.0), solo(20.0, 5.0)],
            &params,
        );

        assert_eq!(predictions[0].0, 1);
        assert_eq!(predictions[1].0, 1);
        assert_eq!(predictions[2].0, 3);
    }
}
