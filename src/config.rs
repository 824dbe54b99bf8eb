//! Configuration for the rating engine
//!
//! This module handles engine configuration with environment variable
//! overrides, validation, and default values.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// How a batch of games is scheduled across waves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Waves in order, games in list order, single thread of control.
    Sequential,
    /// Waves in order; games within a wave distributed over a worker pool.
    Parallel,
    /// Like `Parallel`, but wave planning runs in a background thread and
    /// streams waves to the workers as they become available.
    Pipelined,
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        ExecutionStrategy::Sequential
    }
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStrategy::Sequential => write!(f, "sequential"),
            ExecutionStrategy::Parallel => write!(f, "parallel"),
            ExecutionStrategy::Pipelined => write!(f, "pipelined"),
        }
    }
}

impl std::str::FromStr for ExecutionStrategy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "sequential" => Ok(ExecutionStrategy::Sequential),
            "parallel" => Ok(ExecutionStrategy::Parallel),
            "pipelined" => Ok(ExecutionStrategy::Pipelined),
            other => Err(anyhow!("invalid execution strategy: {}", other)),
        }
    }
}

/// Engine-level configuration shared by the ladder and batch processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial mean for newly registered participants.
    pub default_mu: f64,
    /// Initial spread for newly registered participants.
    pub default_sigma: f64,
    /// z factor used when deriving ordinals (`mu - z * sigma`).
    pub ordinal_z: f64,
    /// Additive dynamics parameter; inflates spread as
    /// `sqrt(sigma^2 + tau^2)` before every update so spread never
    /// collapses to zero over long histories.
    pub tau: f64,
    /// When set, a participant's spread never exceeds its pre-game value.
    pub limit_sigma_growth: bool,
    /// Register unknown participants on first appearance in a game.
    pub auto_register: bool,
    pub execution_strategy: ExecutionStrategy,
    /// Worker pool size for parallel/pipelined strategies.
    /// 0 means "use available parallelism".
    pub worker_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_mu: 25.0,
            default_sigma: 25.0 / 3.0,
            ordinal_z: 3.0,
            tau: 0.0,
            limit_sigma_growth: false,
            auto_register: true,
            execution_strategy: ExecutionStrategy::default(),
            worker_count: 0,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with fallback to
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(mu) = env::var("RATING_DEFAULT_MU") {
            config.default_mu = mu
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_DEFAULT_MU value: {}", mu))?;
        }
        if let Ok(sigma) = env::var("RATING_DEFAULT_SIGMA") {
            config.default_sigma = sigma
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_DEFAULT_SIGMA value: {}", sigma))?;
        }
        if let Ok(z) = env::var("RATING_ORDINAL_Z") {
            config.ordinal_z = z
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_ORDINAL_Z value: {}", z))?;
        }
        if let Ok(tau) = env::var("RATING_TAU") {
            config.tau = tau
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_TAU value: {}", tau))?;
        }
        if let Ok(limit) = env::var("RATING_LIMIT_SIGMA_GROWTH") {
            config.limit_sigma_growth = limit
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_LIMIT_SIGMA_GROWTH value: {}", limit))?;
        }
        if let Ok(auto) = env::var("RATING_AUTO_REGISTER") {
            config.auto_register = auto
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_AUTO_REGISTER value: {}", auto))?;
        }
        if let Ok(strategy) = env::var("RATING_EXECUTION_STRATEGY") {
            config.execution_strategy = strategy.parse()?;
        }
        if let Ok(workers) = env::var("RATING_WORKER_COUNT") {
            config.worker_count = workers
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_WORKER_COUNT value: {}", workers))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.default_mu.is_finite() {
            return Err(anyhow!("default_mu must be finite"));
        }
        if !(self.default_sigma.is_finite() && self.default_sigma > 0.0) {
            return Err(anyhow!("default_sigma must be positive"));
        }
        if !(self.ordinal_z.is_finite() && self.ordinal_z > 0.0) {
            return Err(anyhow!("ordinal_z must be positive"));
        }
        if !(self.tau.is_finite() && self.tau >= 0.0) {
            return Err(anyhow!("tau must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_mu, 25.0);
        assert!((config.default_sigma - 25.0 / 3.0).abs() < 1e-12);
        assert_eq!(config.tau, 0.0);
        assert!(!config.limit_sigma_growth);
        assert!(config.auto_register);
        assert_eq!(config.execution_strategy, ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());

        config.default_sigma = 0.0;
        assert!(config.validate().is_err());

        config = EngineConfig::default();
        config.tau = -1.0;
        assert!(config.validate().is_err());

        config = EngineConfig::default();
        config.ordinal_z = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "parallel".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::Parallel
        );
        assert_eq!(
            "Pipelined".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::Pipelined
        );
        assert!("threads".parse::<ExecutionStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display_round_trip() {
        for strategy in [
            ExecutionStrategy::Sequential,
            ExecutionStrategy::Parallel,
            ExecutionStrategy::Pipelined,
        ] {
            let parsed: ExecutionStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
    }
}
