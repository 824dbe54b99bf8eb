//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error
//! handling throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("unknown participant '{id}' referenced by game {game_index}")]
    UnknownParticipant { id: String, game_index: usize },

    #[error("game {game_index} contains a team with no participants")]
    EmptyTeam { game_index: usize },

    #[error("game {game_index}: '{what}' has {actual} entries, expected {expected}")]
    ShapeMismatch {
        game_index: usize,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("wave plan invariant violated: {detail}")]
    PartitionInvariantViolated { detail: String },

    #[error("worker failed while rating game {game_index}: {message}")]
    WorkerFailure { game_index: usize, message: String },

    #[error("configuration error: {message}")]
    ConfigurationError { message: String },
}
