//! Rating models
//!
//! Five Weng-Lin variants implement the one compute contract the scheduler
//! is written against. The engine never special-cases a variant: both the
//! single-game path and the bulk path call `RatingModel::compute` with
//! rank-ordered, tau-inflated teams and scatter the result back themselves.

pub mod bradley_terry_full;
pub mod bradley_terry_part;
pub(crate) mod common;
pub mod plackett_luce;
pub mod predict;
pub mod statistics;
pub mod thurstone_mosteller_full;
pub mod thurstone_mosteller_part;

pub use bradley_terry_full::BradleyTerryFull;
pub use bradley_terry_part::BradleyTerryPart;
pub use plackett_luce::PlackettLuce;
pub use thurstone_mosteller_full::ThurstoneMostellerFull;
pub use thurstone_mosteller_part::ThurstoneMostellerPart;

use crate::types::FastRating;
use serde::{Deserialize, Serialize};

/// Parameters shared by every model variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelParams {
    /// Variability of performance around skill.
    pub beta: f64,
    /// Floor for the variance shrink factor; keeps sigma strictly positive.
    pub kappa: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            beta: 25.0 / 6.0,
            kappa: 0.0001,
        }
    }
}

/// The compute contract between the scheduler and a rating model.
///
/// `compute` is pure and deterministic: given rank-ordered teams (best team
/// first) it returns updated ratings with the same team and player
/// cardinality. `ranks` must be sorted ascending when present; tied values
/// mark drawn teams. `scores` are informational for variants that use
/// outcome margins; the Weng-Lin family ignores them. `weights`, when
/// present, are per-player contribution weights already normalized into
/// `[1, 2]`.
pub trait RatingModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn params(&self) -> ModelParams;

    fn compute(
        &self,
        teams: &[Vec<FastRating>],
        ranks: Option<&[f64]>,
        scores: Option<&[f64]>,
        weights: Option<&[Vec<f64>]>,
    ) -> Vec<Vec<FastRating>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solo(mu: f64, sigma: f64) -> Vec<FastRating> {
        vec![FastRating::new(mu, sigma)]
    }

    fn default_teams(count: usize) -> Vec<Vec<FastRating>> {
        (0..count).map(|_| solo(25.0, 25.0 / 3.0)).collect()
    }

    fn all_models() -> Vec<Box<dyn RatingModel>> {
        vec![
            Box::new(PlackettLuce::default()),
            Box::new(BradleyTerryFull::default()),
            Box::new(BradleyTerryPart::default()),
            Box::new(ThurstoneMostellerFull::default()),
            Box::new(ThurstoneMostellerPart::default()),
        ]
    }

    #[test]
    fn test_every_model_preserves_cardinality() {
        let teams = vec![
            solo(25.0, 25.0 / 3.0),
            vec![
                FastRating::new(24.0, 8.0),
                FastRating::new(26.0, 7.0),
                FastRating::new(25.0, 6.0),
            ],
            solo(27.0, 5.0),
        ];
        for model in all_models() {
            let result = model.compute(&teams, None, None, None);
            assert_eq!(result.len(), teams.len(), "{}", model.name());
            for (team_in, team_out) in teams.iter().zip(&result) {
                assert_eq!(team_in.len(), team_out.len(), "{}", model.name());
            }
        }
    }

    #[test]
    fn test_every_model_rewards_the_winner() {
        for model in all_models() {
            let result = model.compute(&default_teams(2), None, None, None);
            assert!(
                result[0][0].mu > 25.0,
                "{} winner should gain mean",
                model.name()
            );
            assert!(
                result[1][0].mu < 25.0,
                "{} loser should lose mean",
                model.name()
            );
            assert!(
                result[0][0].sigma < 25.0 / 3.0,
                "{} winner spread should shrink",
                model.name()
            );
            assert!(
                result[1][0].sigma < 25.0 / 3.0,
                "{} loser spread should shrink",
                model.name()
            );
        }
    }

    #[test]
    fn test_every_model_is_deterministic() {
        let teams = default_teams(4);
        let ranks = [0.0, 1.0, 1.0, 3.0];
        for model in all_models() {
            let first = model.compute(&teams, Some(&ranks), None, None);
            let second = model.compute(&teams, Some(&ranks), None, None);
            assert_eq!(first, second, "{}", model.name());
        }
    }

    #[test]
    fn test_single_team_is_a_no_op() {
        for model in all_models() {
            let result = model.compute(&default_teams(1), None, None, None);
            assert!((result[0][0].mu - 25.0).abs() < 1e-9, "{}", model.name());
            assert!(
                (result[0][0].sigma - 25.0 / 3.0).abs() < 1e-9,
                "{}",
                model.name()
            );
        }
    }

    #[test]
    fn test_weights_change_the_outcome() {
        let teams = vec![
            vec![FastRating::new(25.0, 25.0 / 3.0), FastRating::new(25.0, 25.0 / 3.0)],
            vec![FastRating::new(25.0, 25.0 / 3.0), FastRating::new(25.0, 25.0 / 3.0)],
        ];
        let weights = vec![vec![2.0, 1.0], vec![1.0, 2.0]];
        for model in all_models() {
            let plain = model.compute(&teams, None, None, None);
            let weighted = model.compute(&teams, None, None, Some(&weights));
            assert_ne!(plain, weighted, "{}", model.name());
        }
    }
}
