//! Score and rank cache models
//!
//! These are the only mutable tables this crate owns. Every field exists
//! twice: once for the restricted (jury-true) perspective and once for the
//! public perspective, which hides results submitted during the freeze.
//! Rows are always rewritten whole by the aggregators, never patched.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which side of the freeze a reader is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    /// The jury-true view: every judged result counts immediately
    Restricted,
    /// The spectator view: results submitted during the freeze stay pending
    Public,
}

/// Cached score aggregate for one (contest, team, problem) cell
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreCacheEntry {
    pub contest_id: Uuid,
    pub team_id: Uuid,
    pub problem_id: Uuid,

    pub submissions_restricted: i32,
    pub pending_restricted: i32,
    /// Contest-relative solve time in seconds; 0 when unsolved
    pub solve_time_restricted: i64,
    /// Fastest correct runtime in milliseconds; 0 when no correct run
    pub runtime_restricted: i64,
    pub is_correct_restricted: bool,

    pub submissions_public: i32,
    pub pending_public: i32,
    pub solve_time_public: i64,
    pub runtime_public: i64,
    pub is_correct_public: bool,

    /// Earliest correct submission for the problem within the team's
    /// category sort order. Perspective-independent.
    pub is_first_to_solve: bool,
}

impl ScoreCacheEntry {
    pub fn submissions(&self, perspective: Perspective) -> i32 {
        match perspective {
            Perspective::Restricted => self.submissions_restricted,
            Perspective::Public => self.submissions_public,
        }
    }

    pub fn pending(&self, perspective: Perspective) -> i32 {
        match perspective {
            Perspective::Restricted => self.pending_restricted,
            Perspective::Public => self.pending_public,
        }
    }

    pub fn solve_time(&self, perspective: Perspective) -> i64 {
        match perspective {
            Perspective::Restricted => self.solve_time_restricted,
            Perspective::Public => self.solve_time_public,
        }
    }

    pub fn runtime(&self, perspective: Perspective) -> i64 {
        match perspective {
            Perspective::Restricted => self.runtime_restricted,
            Perspective::Public => self.runtime_public,
        }
    }

    pub fn is_correct(&self, perspective: Perspective) -> bool {
        match perspective {
            Perspective::Restricted => self.is_correct_restricted,
            Perspective::Public => self.is_correct_public,
        }
    }
}

/// Cached ranking totals for one (contest, team) pair.
///
/// A deterministic function of the team's score cache rows; recomputed
/// whenever one of them changes correctness state.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RankCacheEntry {
    pub contest_id: Uuid,
    pub team_id: Uuid,

    pub points_restricted: i64,
    pub total_time_restricted: i64,
    pub total_runtime_restricted: i64,

    pub points_public: i64,
    pub total_time_public: i64,
    pub total_runtime_public: i64,
}

impl RankCacheEntry {
    pub fn points(&self, perspective: Perspective) -> i64 {
        match perspective {
            Perspective::Restricted => self.points_restricted,
            Perspective::Public => self.points_public,
        }
    }

    pub fn total_time(&self, perspective: Perspective) -> i64 {
        match perspective {
            Perspective::Restricted => self.total_time_restricted,
            Perspective::Public => self.total_time_public,
        }
    }

    pub fn total_runtime(&self, perspective: Perspective) -> i64 {
        match perspective {
            Perspective::Restricted => self.total_runtime_restricted,
            Perspective::Public => self.total_runtime_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_accessors() {
        let entry = ScoreCacheEntry {
            contest_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            problem_id: Uuid::new_v4(),
            submissions_restricted: 3,
            pending_restricted: 0,
            solve_time_restricted: 1800,
            runtime_restricted: 250,
            is_correct_restricted: true,
            submissions_public: 2,
            pending_public: 1,
            solve_time_public: 0,
            runtime_public: 0,
            is_correct_public: false,
            is_first_to_solve: true,
        };

        assert_eq!(entry.submissions(Perspective::Restricted), 3);
        assert_eq!(entry.submissions(Perspective::Public), 2);
        assert!(entry.is_correct(Perspective::Restricted));
        assert!(!entry.is_correct(Perspective::Public));
        // The jury never sees fewer submissions than the public.
        assert!(entry.submissions_restricted >= entry.submissions_public);
    }
}
