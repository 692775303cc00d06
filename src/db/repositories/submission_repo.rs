//! Submission repository
//!
//! Read-only access to the judge's submission and judgement tables, shaped
//! for the score aggregator.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::JudgedSubmissionRow};

/// Repository for submission database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Valid submissions for one (contest, team, problem) cell joined to
    /// their valid judgement, ordered by submit time.
    ///
    /// Submissions at or after the contest end are excluded: they can never
    /// count as pending or solved on the scoreboard.
    pub async fn judged_for_cell(
        pool: &PgPool,
        contest_id: &Uuid,
        team_id: &Uuid,
        problem_id: &Uuid,
        end_time: DateTime<Utc>,
    ) -> AppResult<Vec<JudgedSubmissionRow>> {
        let rows = sqlx::query_as::<_, JudgedSubmissionRow>(
            r#"
            SELECT s.submitted_at, j.result, j.verified, j.max_runtime_ms
            FROM submissions s
            LEFT JOIN judgements j ON j.submission_id = s.id AND j.valid = TRUE
            WHERE s.contest_id = $1
              AND s.team_id = $2
              AND s.problem_id = $3
              AND s.valid = TRUE
              AND s.submitted_at < $4
            ORDER BY s.submitted_at
            "#,
        )
        .bind(contest_id)
        .bind(team_id)
        .bind(problem_id)
        .bind(end_time)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Count submissions to a problem from teams in the given sort-order
    /// group, earlier than `solved_at`, that are correct or could still
    /// become correct (unjudged, or unverified while verification is
    /// required).
    ///
    /// Zero means the submission at `solved_at` was the first to solve.
    pub async fn count_earlier_potential_solves(
        pool: &PgPool,
        contest_id: &Uuid,
        problem_id: &Uuid,
        sort_order: i32,
        solved_at: DateTime<Utc>,
        verification_required: bool,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM submissions s
            LEFT JOIN judgements j ON j.submission_id = s.id AND j.valid = TRUE
            JOIN teams t ON t.id = s.team_id
            JOIN team_categories tc ON tc.id = t.category_id
            WHERE s.contest_id = $1
              AND s.problem_id = $2
              AND s.valid = TRUE
              AND tc.sort_order = $3
              AND s.submitted_at < $4
              AND (
                  j.id IS NULL
                  OR j.result IS NULL
                  OR j.result = 'correct'
                  OR ($5 AND j.verified = FALSE)
              )
            "#,
        )
        .bind(contest_id)
        .bind(problem_id)
        .bind(sort_order)
        .bind(solved_at)
        .bind(verification_required)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
