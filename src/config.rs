//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables, plus the per-contest scoring configuration that is passed
//! explicitly into every aggregator and builder call.

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_EVENT_QUEUE, DEFAULT_LOCK_TIMEOUT_SECONDS,
    DEFAULT_PENALTY_TIME_MINUTES, DEFAULT_WORKER_CONCURRENCY,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub worker: WorkerConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration for the judgement event queue
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub event_queue: String,
}

/// Scoring worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of concurrent event consumers
    pub concurrency: u32,
    /// Bound on aggregate lock acquisition
    pub lock_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            worker: WorkerConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            event_queue: env::var("EVENT_QUEUE").unwrap_or_else(|_| DEFAULT_EVENT_QUEUE.to_string()),
        })
    }
}

impl WorkerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let lock_timeout_seconds: u64 = env::var("LOCK_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| DEFAULT_LOCK_TIMEOUT_SECONDS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LOCK_TIMEOUT_SECONDS".to_string()))?;

        Ok(Self {
            concurrency: env::var("WORKER_CONCURRENCY")
                .unwrap_or_else(|_| DEFAULT_WORKER_CONCURRENCY.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("WORKER_CONCURRENCY".to_string()))?,
            lock_timeout: Duration::from_secs(lock_timeout_seconds),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Per-contest scoring configuration.
///
/// Loaded from the contest's settings row and passed explicitly into every
/// aggregator and builder call; there is no hidden global scoring state.
#[derive(Debug, Clone, Copy, FromRow, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Penalty per counted non-correct submission on a solved problem,
    /// in minutes (converted to seconds when `score_in_seconds` is set)
    pub penalty_time: i64,
    /// Score with second resolution instead of truncated minutes
    pub score_in_seconds: bool,
    /// Judgements only count once verified by a jury member
    pub verification_required: bool,
    /// Count compile-error submissions towards the penalty
    pub compile_penalty: bool,
    /// Rank by fastest total runtime instead of total solve time
    pub runtime_as_tiebreak: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            penalty_time: DEFAULT_PENALTY_TIME_MINUTES,
            score_in_seconds: false,
            verification_required: false,
            compile_penalty: true,
            runtime_as_tiebreak: false,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_defaults() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.penalty_time, 20);
        assert!(!scoring.score_in_seconds);
        assert!(!scoring.verification_required);
        assert!(scoring.compile_penalty);
        assert!(!scoring.runtime_as_tiebreak);
    }
}
