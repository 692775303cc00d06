//! Custom error types and handling
//!
//! This module defines the application's error types. Errors are scoped to
//! the single recompute or build call that raised them; committed cache rows
//! are never left half-written.

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Aggregate recomputation errors
    #[error("Failed to obtain aggregate lock '{key}' within the timeout")]
    LockTimeout { key: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // External service errors
    #[error("Redis error: {0}")]
    Redis(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Redis(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
