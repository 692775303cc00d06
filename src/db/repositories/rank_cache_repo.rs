//! Rank cache repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::RankCacheEntry};

/// Repository for rank cache database operations
pub struct RankCacheRepository;

impl RankCacheRepository {
    /// Write a whole rank cache row, replacing any previous version
    pub async fn upsert(pool: &PgPool, entry: &RankCacheEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rank_cache (
                contest_id, team_id,
                points_restricted, total_time_restricted, total_runtime_restricted,
                points_public, total_time_public, total_runtime_public
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (contest_id, team_id) DO UPDATE SET
                points_restricted = EXCLUDED.points_restricted,
                total_time_restricted = EXCLUDED.total_time_restricted,
                total_runtime_restricted = EXCLUDED.total_runtime_restricted,
                points_public = EXCLUDED.points_public,
                total_time_public = EXCLUDED.total_time_public,
                total_runtime_public = EXCLUDED.total_runtime_public
            "#,
        )
        .bind(entry.contest_id)
        .bind(entry.team_id)
        .bind(entry.points_restricted)
        .bind(entry.total_time_restricted)
        .bind(entry.total_runtime_restricted)
        .bind(entry.points_public)
        .bind(entry.total_time_public)
        .bind(entry.total_runtime_public)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// All rank cache rows of a contest
    pub async fn for_contest(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<RankCacheEntry>> {
        let rows = sqlx::query_as::<_, RankCacheEntry>(
            r#"SELECT * FROM rank_cache WHERE contest_id = $1"#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Delete rows whose team is no longer part of the contest
    pub async fn prune(pool: &PgPool, contest_id: &Uuid, team_ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query(
            r#"DELETE FROM rank_cache WHERE contest_id = $1 AND team_id <> ALL($2)"#,
        )
        .bind(contest_id)
        .bind(team_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
