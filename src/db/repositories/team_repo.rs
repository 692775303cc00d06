//! Team repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Team, TeamAffiliation, TeamCategory},
    scoreboard::Filter,
};

/// Repository for team, category and affiliation database operations
pub struct TeamRepository;

impl TeamRepository {
    /// Find a team together with its category
    pub async fn find_with_category(
        pool: &PgPool,
        id: &Uuid,
    ) -> AppResult<Option<(Team, TeamCategory)>> {
        let Some(team) = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, display_name, category_id, affiliation_id, penalty, enabled
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let category = sqlx::query_as::<_, TeamCategory>(
            r#"
            SELECT id, name, sort_order, visible
            FROM team_categories
            WHERE id = $1
            "#,
        )
        .bind(team.category_id)
        .fetch_optional(pool)
        .await?;

        Ok(category.map(|category| (team, category)))
    }

    /// Teams in scope for a contest scoreboard.
    ///
    /// Hidden categories are excluded unless `include_hidden` is set (the
    /// jury view); the filter narrows the scope further.
    pub async fn for_scoreboard(
        pool: &PgPool,
        contest_id: &Uuid,
        include_hidden: bool,
        filter: &Filter,
    ) -> AppResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.name, t.display_name, t.category_id, t.affiliation_id,
                   t.penalty, t.enabled
            FROM teams t
            JOIN team_categories tc ON tc.id = t.category_id
            LEFT JOIN team_affiliations ta ON ta.id = t.affiliation_id
            WHERE t.enabled = TRUE
              AND EXISTS (
                  SELECT 1 FROM contest_teams ct
                  WHERE ct.contest_id = $1 AND ct.team_id = t.id
              )
              AND ($2 OR tc.visible = TRUE)
              AND (cardinality($3::uuid[]) = 0 OR t.category_id = ANY($3))
              AND (cardinality($4::uuid[]) = 0 OR t.affiliation_id = ANY($4))
              AND (cardinality($5::text[]) = 0 OR ta.country = ANY($5))
              AND (cardinality($6::uuid[]) = 0 OR t.id = ANY($6))
            ORDER BY t.id
            "#,
        )
        .bind(contest_id)
        .bind(include_hidden)
        .bind(&filter.categories)
        .bind(&filter.affiliations)
        .bind(&filter.countries)
        .bind(&filter.teams)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Team categories, ordered by sort order then name
    pub async fn categories(pool: &PgPool, include_hidden: bool) -> AppResult<Vec<TeamCategory>> {
        let categories = sqlx::query_as::<_, TeamCategory>(
            r#"
            SELECT id, name, sort_order, visible
            FROM team_categories
            WHERE $1 OR visible = TRUE
            ORDER BY sort_order, name, id
            "#,
        )
        .bind(include_hidden)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// All team affiliations
    pub async fn affiliations(pool: &PgPool) -> AppResult<Vec<TeamAffiliation>> {
        let affiliations = sqlx::query_as::<_, TeamAffiliation>(
            r#"
            SELECT id, name, country
            FROM team_affiliations
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(affiliations)
    }
}
