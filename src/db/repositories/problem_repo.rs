//! Contest problem repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::ContestProblem};

/// Repository for contest problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// List the submittable problems of a contest, in scoreboard column order
    pub async fn for_contest(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<ContestProblem>> {
        let problems = sqlx::query_as::<_, ContestProblem>(
            r#"
            SELECT contest_id, problem_id, label, points
            FROM contest_problems
            WHERE contest_id = $1 AND allow_submit = TRUE
            ORDER BY label
            "#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }
}
