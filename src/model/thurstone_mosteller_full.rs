//! Thurstone-Mosteller rating model, full pairing
//!
//! Gaussian pairwise comparisons with truncated-moment corrections for
//! wins, losses, and draws (Weng-Lin Algorithm 3).

use crate::model::common::{team_summaries, update_team};
use crate::model::statistics::{v, vt, w, wt};
use crate::model::{ModelParams, RatingModel};
use crate::types::FastRating;

#[derive(Debug, Clone, Default)]
pub struct ThurstoneMostellerFull {
    params: ModelParams,
}

impl ThurstoneMostellerFull {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }
}

impl RatingModel for ThurstoneMostellerFull {
    fn name(&self) -> &'static str {
        "thurstone_mosteller_full"
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
        let two_beta_sq = 2.0 * self.params.beta * self.params.beta;
        let kappa = self.params.kappa;

        summaries
            .iter()
            .enumerate()
            .map(|(i, team_i)| {
                let mut omega = 0.0;
                let mut delta = 0.0;

                for (q, team_q) in summaries.iter().enumerate() {
                    if q == i {
                        continue;
                    }

                    let c_iq = (team_i.sigma_sq + team_q.sigma_sq + two_beta_sq).sqrt();
                    let delta_mu = (team_i.mu - team_q.mu) / c_iq;
                    let sigma_sq_to_ciq = team_i.sigma_sq / c_iq;
                    let gamma = team_i.sigma_sq.sqrt() / c_iq;
                    let margin = kappa / c_iq;

                    if team_q.rank > team_i.rank {
                        omega += sigma_sq_to_ciq * v(delta_mu, margin);
                        delta += gamma * sigma_sq_to_ciq / c_iq * w(delta_mu, margin);
                    } else if team_q.rank < team_i.rank {
                        omega += -sigma_sq_to_ciq * v(-delta_mu, margin);
                        delta += gamma * sigma_sq_to_ciq / c_iq * w(-delta_mu, margin);
                    } else {
                        omega += sigma_sq_to_ciq * vt(delta_mu, margin);
                        delta += gamma * sigma_sq_to_ciq / c_iq * wt(delta_mu, margin);
                    }
                }

                update_team(
                    &teams[i],
                    team_i.sigma_sq,
                    omega,
                    delta,
                    weights.map(|w| w[i].as_slice()),
                    kappa,
                )
            })
            .collect()
    }
}
