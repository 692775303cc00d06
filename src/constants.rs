//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// WORKER DEFAULTS
// =============================================================================

/// Default number of concurrent judgement event workers
pub const DEFAULT_WORKER_CONCURRENCY: u32 = 2;

/// Default bound on aggregate lock acquisition, in seconds
pub const DEFAULT_LOCK_TIMEOUT_SECONDS: u64 = 3;

/// Default Redis list the judge pushes judgement-completed events onto
pub const DEFAULT_EVENT_QUEUE: &str = "laurel:judgements";

/// Blocking pop timeout for the event queue, in seconds.
/// Short enough that shutdown stays responsive.
pub const EVENT_POP_TIMEOUT_SECONDS: u64 = 5;

// =============================================================================
// SCORING DEFAULTS
// =============================================================================

/// Default penalty per non-correct counted submission, in minutes
pub const DEFAULT_PENALTY_TIME_MINUTES: i64 = 20;
