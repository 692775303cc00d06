//! Submission and judgement models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Judgement verdict enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    WrongAnswer,
    TimeLimit,
    RunError,
    CompilerError,
    MemoryLimit,
    OutputLimit,
    NoOutput,
}

impl Verdict {
    /// Get verdict as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::WrongAnswer => "wrong_answer",
            Self::TimeLimit => "time_limit",
            Self::RunError => "run_error",
            Self::CompilerError => "compiler_error",
            Self::MemoryLimit => "memory_limit",
            Self::OutputLimit => "output_limit",
            Self::NoOutput => "no_output",
        }
    }

    /// Parse verdict from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Self::Correct),
            "wrong_answer" => Some(Self::WrongAnswer),
            "time_limit" => Some(Self::TimeLimit),
            "run_error" => Some(Self::RunError),
            "compiler_error" => Some(Self::CompilerError),
            "memory_limit" => Some(Self::MemoryLimit),
            "output_limit" => Some(Self::OutputLimit),
            "no_output" => Some(Self::NoOutput),
            _ => None,
        }
    }

    /// Check if this verdict means the solution was accepted
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Row returned by the submission + valid-judgement lookup for one
/// scoreboard cell
#[derive(Debug, Clone, FromRow)]
pub struct JudgedSubmissionRow {
    pub submitted_at: DateTime<Utc>,
    pub result: Option<String>,
    pub verified: Option<bool>,
    pub max_runtime_ms: Option<i64>,
}

/// One submission as seen by the score aggregator, with contest-relative
/// timing and freeze placement already resolved
#[derive(Debug, Clone)]
pub struct JudgedSubmission {
    /// Absolute submit time, used for the first-to-solve lookup
    pub submitted_at: DateTime<Utc>,
    /// Contest-relative submit time in seconds, clamped to the start
    pub relative_seconds: i64,
    /// Submitted inside the freeze window
    pub after_freeze: bool,
    /// Verdict of the valid judgement, if one has completed
    pub result: Option<Verdict>,
    /// Whether that judgement has been verified by the jury
    pub verified: bool,
    /// Slowest test-case runtime of the valid judgement, in milliseconds
    pub runtime_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_round_trip() {
        for verdict in [
            Verdict::Correct,
            Verdict::WrongAnswer,
            Verdict::TimeLimit,
            Verdict::RunError,
            Verdict::CompilerError,
            Verdict::MemoryLimit,
            Verdict::OutputLimit,
            Verdict::NoOutput,
        ] {
            assert_eq!(Verdict::from_str(verdict.as_str()), Some(verdict));
        }
        assert_eq!(Verdict::from_str("judging"), None);
    }
}
