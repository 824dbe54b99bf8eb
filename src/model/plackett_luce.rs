//! Plackett-Luce rating model
//!
//! Generalized Bradley-Terry over full orderings (Weng-Lin Algorithm 4):
//! each team's update weighs its expected share of every outcome at or
//! below its own rank.

use crate::model::common::{c_value, team_summaries, update_team};
use crate::model::{ModelParams, RatingModel};
use crate::types::FastRating;

#[derive(Debug, Clone, Default)]
pub struct PlackettLuce {
    params: ModelParams,
}

impl PlackettLuce {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }
}

impl RatingModel for PlackettLuce {
    fn name(&self) -> &'static str {
        "plackett_luce"
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
        let c = c_value(&summaries, self.params.beta);

        // sum_q[q] accumulates exp(mu_i / c) over all teams i ranked at or
        // below team q (i.e. r(i) >= r(q)).
        let mut sum_q = vec![0.0f64; summaries.len()];
        for team_i in &summaries {
            let summed = (team_i.mu / c).exp();
            for (q, team_q) in summaries.iter().enumerate() {
                if team_i.rank >= team_q.rank {
                    sum_q[q] += summed;
                }
            }
        }

        // Multiplicity of each team's rank (ties share the denominator).
        let rank_count: Vec<f64> = summaries
            .iter()
            .map(|team_i| {
                summaries.iter().filter(|team_q| team_q.rank == team_i.rank).count() as f64
            })
            .collect();

        summaries
            .iter()
            .enumerate()
            .map(|(i, team_i)| {
                let mut omega = 0.0;
                let mut delta = 0.0;
                let i_mu_over_c = (team_i.mu / c).exp();

                for (q, team_q) in summaries.iter().enumerate() {
                    if team_q.rank <= team_i.rank {
                        let quotient = i_mu_over_c / sum_q[q];
                        delta += quotient * (1.0 - quotient) / rank_count[q];
                        if q == i {
                            omega += (1.0 - quotient) / rank_count[q];
                        } else {
                            omega -= quotient / rank_count[q];
                        }
                    }
                }

                omega *= team_i.sigma_sq / c;
                delta *= team_i.sigma_sq / (c * c);
                let gamma = team_i.sigma_sq.sqrt() / c;
                delta *= gamma;

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
