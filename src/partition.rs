//! Wave partitioning
//!
//! Games are grouped into ordered "waves" such that no two games in the same
//! wave reference a common participant. Two invariants hold for every plan:
//!
//! 1. **Safety**: games within a wave are participant-disjoint, so they can
//!    execute concurrently without write conflicts.
//! 2. **Ordering**: if game *i* precedes game *j* in the input and they
//!    share a participant, *i*'s wave is strictly earlier than *j*'s.
//!
//! Together these guarantee that parallel execution within a wave produces
//! the same ratings as fully sequential processing.

use crate::error::RatingError;
use crate::types::Game;
use std::collections::{HashMap, HashSet};

/// Ordered list of waves; each wave is a list of game indices into the
/// submitted batch, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavePlan {
    waves: Vec<Vec<usize>>,
}

impl WavePlan {
    /// Build a plan from pre-assembled waves. Callers are responsible for
    /// the wave invariants; `validate` checks them.
    pub fn from_waves(waves: Vec<Vec<usize>>) -> Self {
        Self { waves }
    }

    pub fn waves(&self) -> &[Vec<usize>] {
        &self.waves
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn game_count(&self) -> usize {
        self.waves.iter().map(|wave| wave.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn into_waves(self) -> Vec<Vec<usize>> {
        self.waves
    }

    /// Check the wave invariants against the games the plan refers to:
    /// every game appears exactly once, indices are in range, and no two
    /// games within a wave share a participant.
    pub fn validate(&self, games: &[Game]) -> Result<(), RatingError> {
        let mut seen = vec![false; games.len()];
        for wave in &self.waves {
            let mut wave_participants: HashSet<&str> = HashSet::new();
            for &game_index in wave {
                if game_index >= games.len() {
                    return Err(RatingError::PartitionInvariantViolated {
                        detail: format!(
                            "game index {} out of range ({} games)",
                            game_index,
                            games.len()
                        ),
                    });
                }
                if seen[game_index] {
                    return Err(RatingError::PartitionInvariantViolated {
                        detail: format!("game {} appears in more than one wave", game_index),
                    });
                }
                seen[game_index] = true;
                // Dedupe within the game: only cross-game overlap breaks
                // the wave invariant.
                let game_participants: HashSet<&str> = games[game_index]
                    .participants()
                    .map(|id| id.as_str())
                    .collect();
                for id in game_participants {
                    if !wave_participants.insert(id) {
                        return Err(RatingError::PartitionInvariantViolated {
                            detail: format!(
                                "participant '{}' appears twice in wave (game {})",
                                id, game_index
                            ),
                        });
                    }
                }
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(RatingError::PartitionInvariantViolated {
                detail: format!("game {} missing from the plan", missing),
            });
        }
        Ok(())
    }
}

/// Partition games into conflict-free waves that respect submission order.
///
/// Greedy "next free wave" coloring: each game lands in wave
/// `1 + max(last_wave[p])` over its participants (default -1), which is
/// optimal for this online, order-respecting variant. Runs in
/// O(total participant references) with amortized O(1) map operations.
pub fn partition_waves(games: &[Game]) -> WavePlan {
    let mut waves: Vec<Vec<usize>> = Vec::new();
    // Latest wave each participant has been placed in.
    let mut last_wave: HashMap<&str, usize> = HashMap::new();

    for (game_index, game) in games.iter().enumerate() {
        let mut wave_index = 0usize;
        for id in game.participants() {
            if let Some(&previous) = last_wave.get(id.as_str()) {
                wave_index = wave_index.max(previous + 1);
            }
        }

        if wave_index == waves.len() {
            waves.push(Vec::new());
        }
        waves[wave_index].push(game_index);
        for id in game.participants() {
            last_wave.insert(id.as_str(), wave_index);
        }
    }

    let plan = WavePlan { waves };
    debug_assert!(plan.validate(games).is_ok());
    plan
}
