//! Bradley-Terry rating model, partial pairing
//!
//! Like the full-pairing variant but each team is compared only against its
//! rank-adjacent neighbors (Weng-Lin Algorithm 2), trading some information
//! for O(k) pairings per game.

use crate::model::common::{ladder_pairs, team_summaries, update_team};
use crate::model::{ModelParams, RatingModel};
use crate::types::FastRating;

#[derive(Debug, Clone, Default)]
pub struct BradleyTerryPart {
    params: ModelParams,
}

impl BradleyTerryPart {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }
}

impl RatingModel for BradleyTerryPart {
    fn name(&self) -> &'static str {
        "bradley_terry_part"
    }

    fn params(&self) -> ModelParams {
        self.params
    }

    fn compute(
        &self,
        teams: &[Vec<FastRating>],
        ranks: Option<&[f64]>,
        _scores: Option<&[f64]>,
        weights: Option<&[Vec<f64>]>,
    ) -> Vec<Vec<FastRating>> {
        let summaries = team_summaries(teams, ranks);
        let adjacent = ladder_pairs(summaries.len());
        let two_beta_sq = 2.0 * self.params.beta * self.params.beta;

        summaries
            .iter()
            .enumerate()
            .map(|(i, team_i)| {
                let mut omega = 0.0;
                let mut delta = 0.0;

                for &q in &adjacent[i] {
                    let team_q = &summaries[q];
                    let c_iq = (team_i.sigma_sq + team_q.sigma_sq + two_beta_sq).sqrt();
                    let p_iq = 1.0 / (1.0 + ((team_q.mu - team_i.mu) / c_iq).exp());
                    let sigma_sq_to_ciq = team_i.sigma_sq / c_iq;

                    let outcome = if team_q.rank > team_i.rank {
                        1.0
                    } else if team_q.rank == team_i.rank {
                        0.5
                    } else {
                        0.0
                    };

                    omega += sigma_sq_to_ciq * (outcome - p_iq);
                    let gamma = team_i.sigma_sq.sqrt() / c_iq;
                    delta += (gamma * sigma_sq_to_ciq / c_iq) * p_iq * (1.0 - p_iq);
                }

                update_team(
                    &teams[i],
                    team_i.sigma_sq,
                    omega,
                    delta,
                    weights.map(|w| w[i].as_slice()),
                    self.params.kappa,
                )
            })
            .collect()
    }
}
