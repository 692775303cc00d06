//! Score aggregation service
//!
//! Recomputes one (contest, team, problem) score cache row from scratch on
//! every triggering judgement. The walk over the team's submissions keeps
//! two tallies at once: the restricted one sees every judged result, the
//! public one keeps anything submitted during the freeze pending.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::ScoringConfig,
    db::repositories::{ScoreCacheRepository, SubmissionRepository},
    error::AppResult,
    models::{Contest, JudgedSubmission, ScoreCacheEntry, Team, TeamCategory, Verdict},
    services::locks::{LockCoordinator, LockKey},
    services::RankService,
};

/// Outcome of one tally walk over a cell's submissions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTally {
    pub submissions_restricted: i32,
    pub pending_restricted: i32,
    pub solve_time_restricted: i64,
    pub runtime_restricted: Option<i64>,
    pub is_correct_restricted: bool,

    pub submissions_public: i32,
    pub pending_public: i32,
    pub solve_time_public: i64,
    pub runtime_public: Option<i64>,
    pub is_correct_public: bool,

    /// Absolute time of the restricted-correct submission, input to the
    /// first-to-solve lookup
    pub solved_at: Option<DateTime<Utc>>,
}

/// Score aggregation service
pub struct ScoreService;

impl ScoreService {
    /// Recompute the score cache row for one cell.
    ///
    /// Holds the cell's lock for the whole derivation and write. When a
    /// perspective is correct, the team's rank cache is recomputed
    /// afterwards (unless `update_rank` is unset, as during a bulk
    /// refresh).
    pub async fn recompute(
        pool: &PgPool,
        locks: &LockCoordinator,
        contest: &Contest,
        team: &Team,
        category: &TeamCategory,
        problem_id: &Uuid,
        settings: &ScoringConfig,
        update_rank: bool,
    ) -> AppResult<ScoreCacheEntry> {
        tracing::debug!(
            contest_id = %contest.id,
            team_id = %team.id,
            problem_id = %problem_id,
            "recomputing score cell"
        );

        let guard = locks
            .acquire(LockKey::Score {
                contest_id: contest.id,
                team_id: team.id,
                problem_id: *problem_id,
            })
            .await?;

        let rows =
            SubmissionRepository::judged_for_cell(pool, &contest.id, &team.id, problem_id, contest.end_time)
                .await?;
        let submissions: Vec<JudgedSubmission> = rows
            .into_iter()
            .map(|row| JudgedSubmission {
                submitted_at: row.submitted_at,
                relative_seconds: contest.relative_seconds(row.submitted_at),
                after_freeze: contest.is_after_freeze(row.submitted_at),
                result: row.result.as_deref().and_then(Verdict::from_str),
                verified: row.verified.unwrap_or(false),
                runtime_ms: row.max_runtime_ms,
            })
            .collect();

        let tally = tally_submissions(&submissions, settings);

        let is_first_to_solve = match tally.solved_at {
            Some(solved_at) => {
                SubmissionRepository::count_earlier_potential_solves(
                    pool,
                    &contest.id,
                    problem_id,
                    category.sort_order,
                    solved_at,
                    settings.verification_required,
                )
                .await?
                    == 0
            }
            None => false,
        };

        let entry = ScoreCacheEntry {
            contest_id: contest.id,
            team_id: team.id,
            problem_id: *problem_id,
            submissions_restricted: tally.submissions_restricted,
            pending_restricted: tally.pending_restricted,
            solve_time_restricted: tally.solve_time_restricted,
            runtime_restricted: tally.runtime_restricted.unwrap_or(0),
            is_correct_restricted: tally.is_correct_restricted,
            submissions_public: tally.submissions_public,
            pending_public: tally.pending_public,
            solve_time_public: tally.solve_time_public,
            runtime_public: tally.runtime_public.unwrap_or(0),
            is_correct_public: tally.is_correct_public,
            is_first_to_solve,
        };
        ScoreCacheRepository::upsert(pool, &entry).await?;
        drop(guard);

        // A solved cell changes the team's totals.
        if update_rank && (entry.is_correct_restricted || entry.is_correct_public) {
            RankService::recompute(pool, locks, contest, team, settings).await?;
        }

        Ok(entry)
    }
}

/// Walk a cell's submissions in submit order and derive both tallies.
///
/// Counting stops independently per perspective at its first correct
/// submission; a solved problem is closed. Only the fastest-runtime
/// tracking keeps going, since later correct submissions may still be
/// faster.
pub(crate) fn tally_submissions(
    submissions: &[JudgedSubmission],
    settings: &ScoringConfig,
) -> ScoreTally {
    let mut tally = ScoreTally::default();

    for submission in submissions {
        if submission.result == Some(Verdict::Correct) {
            if let Some(runtime) = submission.runtime_ms {
                tally.runtime_restricted =
                    Some(tally.runtime_restricted.map_or(runtime, |best| best.min(runtime)));
                if !submission.after_freeze {
                    tally.runtime_public =
                        Some(tally.runtime_public.map_or(runtime, |best| best.min(runtime)));
                }
            }
        }

        // Once the public view has its correct submission, nothing later
        // counts anywhere.
        if tally.is_correct_public {
            continue;
        }

        let result = match submission.result {
            Some(result) if !(settings.verification_required && !submission.verified) => result,
            _ => {
                // No visible judgement yet: pending in both tallies. The
                // jury stops counting pending once it has its solve, the
                // public keeps counting so the frozen board leaks nothing.
                if !tally.is_correct_restricted {
                    tally.pending_restricted += 1;
                }
                tally.pending_public += 1;
                continue;
            }
        };

        let counted = settings.compile_penalty || result != Verdict::CompilerError;

        if !tally.is_correct_restricted && counted {
            tally.submissions_restricted += 1;
        }
        if submission.after_freeze {
            // Frozen results stay pending for the public, compile errors
            // included, to not leak anything.
            tally.pending_public += 1;
        } else if counted {
            tally.submissions_public += 1;
        }

        if tally.is_correct_restricted {
            continue;
        }

        if result.is_correct() {
            tally.is_correct_restricted = true;
            tally.solve_time_restricted = submission.relative_seconds;
            tally.solved_at = Some(submission.submitted_at);
            if !submission.after_freeze {
                tally.is_correct_public = true;
                tally.solve_time_public = submission.relative_seconds;
            }
        }
    }

    tally
}
