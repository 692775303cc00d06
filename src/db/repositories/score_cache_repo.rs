//! Score cache repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::ScoreCacheEntry};

/// Repository for score cache database operations
pub struct ScoreCacheRepository;

impl ScoreCacheRepository {
    /// Write a whole score cache row, replacing any previous version
    pub async fn upsert(pool: &PgPool, entry: &ScoreCacheEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO score_cache (
                contest_id, team_id, problem_id,
                submissions_restricted, pending_restricted, solve_time_restricted,
                runtime_restricted, is_correct_restricted,
                submissions_public, pending_public, solve_time_public,
                runtime_public, is_correct_public, is_first_to_solve
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (contest_id, team_id, problem_id) DO UPDATE SET
                submissions_restricted = EXCLUDED.submissions_restricted,
                pending_restricted = EXCLUDED.pending_restricted,
                solve_time_restricted = EXCLUDED.solve_time_restricted,
                runtime_restricted = EXCLUDED.runtime_restricted,
                is_correct_restricted = EXCLUDED.is_correct_restricted,
                submissions_public = EXCLUDED.submissions_public,
                pending_public = EXCLUDED.pending_public,
                solve_time_public = EXCLUDED.solve_time_public,
                runtime_public = EXCLUDED.runtime_public,
                is_correct_public = EXCLUDED.is_correct_public,
                is_first_to_solve = EXCLUDED.is_first_to_solve
            "#,
        )
        .bind(entry.contest_id)
        .bind(entry.team_id)
        .bind(entry.problem_id)
        .bind(entry.submissions_restricted)
        .bind(entry.pending_restricted)
        .bind(entry.solve_time_restricted)
        .bind(entry.runtime_restricted)
        .bind(entry.is_correct_restricted)
        .bind(entry.submissions_public)
        .bind(entry.pending_public)
        .bind(entry.solve_time_public)
        .bind(entry.runtime_public)
        .bind(entry.is_correct_public)
        .bind(entry.is_first_to_solve)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// All score cache rows of a contest
    pub async fn for_contest(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<ScoreCacheEntry>> {
        let rows = sqlx::query_as::<_, ScoreCacheEntry>(
            r#"SELECT * FROM score_cache WHERE contest_id = $1"#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Score cache rows of one team in a contest
    pub async fn for_team(
        pool: &PgPool,
        contest_id: &Uuid,
        team_id: &Uuid,
    ) -> AppResult<Vec<ScoreCacheEntry>> {
        let rows = sqlx::query_as::<_, ScoreCacheEntry>(
            r#"SELECT * FROM score_cache WHERE contest_id = $1 AND team_id = $2"#,
        )
        .bind(contest_id)
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Delete rows whose team or problem is no longer part of the contest
    pub async fn prune(
        pool: &PgPool,
        contest_id: &Uuid,
        team_ids: &[Uuid],
        problem_ids: &[Uuid],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM score_cache
            WHERE contest_id = $1
              AND (team_id <> ALL($2) OR problem_id <> ALL($3))
            "#,
        )
        .bind(contest_id)
        .bind(team_ids)
        .bind(problem_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
