//! Scoring settings repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::ScoringConfig,
    error::{AppError, AppResult},
};

/// Repository for per-contest scoring settings
pub struct SettingsRepository;

impl SettingsRepository {
    /// Load the scoring settings of a contest.
    ///
    /// Settings must exist before any aggregate or snapshot can be
    /// produced; a missing row is a configuration error.
    pub async fn for_contest(pool: &PgPool, contest_id: &Uuid) -> AppResult<ScoringConfig> {
        let settings = sqlx::query_as::<_, ScoringConfig>(
            r#"
            SELECT penalty_time, score_in_seconds, verification_required,
                   compile_penalty, runtime_as_tiebreak
            FROM contest_scoring_settings
            WHERE contest_id = $1
            "#,
        )
        .bind(contest_id)
        .fetch_optional(pool)
        .await?;

        settings.ok_or_else(|| {
            AppError::Configuration(format!("No scoring settings for contest {contest_id}"))
        })
    }
}
