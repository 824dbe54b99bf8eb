//! Thurstone-Mosteller rating model, partial pairing
//!
//! Gaussian comparisons restricted to rank-adjacent neighbors, with a
//! doubled pairwise deviation to compensate for the reduced coupling.

use crate::model::common::{ladder_pairs, team_summaries, update_team};
use crate::model::statistics::{v, vt, w, wt};
use crate::model::{ModelParams, RatingModel};
use crate::types::FastRating;

#[derive(Debug, Clone, Default)]
pub struct ThurstoneMostellerPart {
    params: ModelParams,
}

impl ThurstoneMostellerPart {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }
}

impl RatingModel for ThurstoneMostellerPart {
    fn name(&self) -> &'static str {
        "thurstone_mosteller_part"
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
        let kappa = self.params.kappa;

        summaries
            .iter()
            .enumerate()
            .map(|(i, team_i)| {
                let mut omega = 0.0;
                let mut delta = 0.0;

                for &q in &adjacent[i] {
                    let team_q = &summaries[q];
                    let c_iq = 2.0 * (team_i.sigma_sq + team_q.sigma_sq + two_beta_sq).sqrt();
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

#[cfg(test)]
mod tests {
    use super::*;

    fn default_solo() -> Vec<FastRating> {
        vec![FastRating::new(25.0, 25.0 / 3.0)]
    }

    #[test]
    fn test_two_player_free_for_all() {
        let model = ThurstoneMostellerPart::default();
        let result = model.compute(&[default_solo(), default_solo()], None, None, None);

        assert!((result[0][0].mu - 27.10261680121866).abs() < 1e-5);
        assert!((result[0][0].sigma - 8.249024727693394).abs() < 1e-5);
        assert!((result[1][0].mu - 22.89738319878134).abs() < 1e-5);
    }

    #[test]
    fn test_five_player_free_for_all() {
        let model = ThurstoneMostellerPart::default();
        let teams: Vec<Vec<FastRating>> = (0..5).map(|_| default_solo()).collect();
        let result = model.compute(&teams, None, None, None);

        // Only the extremes move; middle placements are balanced.
        assert!((result[0][0].mu - 27.10261680121866).abs() < 1e-5);
        for middle in &result[1..4] {
            assert!((middle[0].mu - 25.0).abs() < 1e-5);
            assert!((middle[0].sigma - 8.163845507587077).abs() < 1e-5);
        }
        assert!((result[4][0].mu - 22.89738319878134).abs() < 1e-5);
    }

    #[test]
    fn test_three_different_sized_teams() {
        let model = ThurstoneMostellerPart::default();
        let trio = vec![
            FastRating::new(25.0, 25.0 / 3.0),
            FastRating::new(25.0, 25.0 / 3.0),
            FastRating::new(25.0, 25.0 / 3.0),
        ];
        let duo = vec![
            FastRating::new(25.0, 25.0 / 3.0),
            FastRating::new(25.0, 25.0 / 3.0),
        ];
        let result = model.compute(&[trio, default_solo(), duo], None, None, None);

        assert!((result[0][0].mu - 25.312878118346458).abs() < 1e-5);
        assert!((result[1][0].mu - 27.735657070878023).abs() < 1e-5);
        assert!((result[2][0].mu - 21.95146481077552).abs() < 1e-5);
        assert!((result[2][0].sigma - 8.245567442404347).abs() < 1e-5);
    }
}
