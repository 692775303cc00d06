//! Scoreboard service
//!
//! The read path: assembles ranked snapshots from the cache tables, and
//! offers the full cache refresh used after configuration changes or
//! rejudging sweeps. Snapshot assembly never takes aggregate locks; it
//! reads whatever rows are committed and relies on the next build for
//! anything that is mid-update.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{
        ProblemRepository, RankCacheRepository, ScoreCacheRepository, SettingsRepository,
        TeamRepository,
    },
    error::AppResult,
    models::{Contest, Perspective, TeamCategory},
    scoreboard::{Filter, Scoreboard},
    services::locks::LockCoordinator,
    services::{RankService, ScoreService},
};

/// Scoreboard service
pub struct ScoreboardService;

impl ScoreboardService {
    /// Build a scoreboard snapshot for a contest.
    ///
    /// The jury always sees current (restricted) results; everyone else
    /// sees the public perspective until the freeze is lifted. Returns
    /// `None` for non-jury callers before the contest starts, to not leak
    /// anything.
    pub async fn scoreboard(
        pool: &PgPool,
        contest: &Contest,
        jury: bool,
        include_hidden: bool,
        filter: &Filter,
    ) -> AppResult<Option<Scoreboard>> {
        let freeze = contest.freeze_state(Utc::now());
        if !freeze.started && !jury {
            return Ok(None);
        }

        let restricted = jury || freeze.show_final;
        let perspective = if restricted {
            Perspective::Restricted
        } else {
            Perspective::Public
        };

        let settings = SettingsRepository::for_contest(pool, &contest.id).await?;
        let show_hidden = jury && include_hidden;
        let (teams, categories, affiliations, problems, score_rows, rank_rows) = futures::try_join!(
            TeamRepository::for_scoreboard(pool, &contest.id, show_hidden, filter),
            TeamRepository::categories(pool, show_hidden),
            TeamRepository::affiliations(pool),
            ProblemRepository::for_contest(pool, &contest.id),
            ScoreCacheRepository::for_contest(pool, &contest.id),
            RankCacheRepository::for_contest(pool, &contest.id),
        )?;

        Ok(Some(Scoreboard::build(
            &teams,
            &categories,
            &affiliations,
            problems,
            score_rows,
            rank_rows,
            freeze,
            perspective,
            &settings,
        )))
    }

    /// Recompute every score and rank aggregate of a contest, then prune
    /// cache rows whose team or problem left the contest.
    pub async fn refresh_cache(
        pool: &PgPool,
        locks: &LockCoordinator,
        contest: &Contest,
    ) -> AppResult<()> {
        tracing::info!(contest_id = %contest.id, "refreshing scoreboard cache");

        let settings = SettingsRepository::for_contest(pool, &contest.id).await?;
        let teams = TeamRepository::for_scoreboard(pool, &contest.id, true, &Filter::none()).await?;
        let categories = TeamRepository::categories(pool, true).await?;
        let problems = ProblemRepository::for_contest(pool, &contest.id).await?;

        if teams.is_empty() || problems.is_empty() {
            tracing::info!(contest_id = %contest.id, "no teams or problems, nothing to refresh");
            return Ok(());
        }

        let categories_by_id: HashMap<Uuid, &TeamCategory> =
            categories.iter().map(|c| (c.id, c)).collect();

        for team in &teams {
            let Some(category) = categories_by_id.get(&team.category_id) else {
                tracing::warn!(team_id = %team.id, "team references unknown category, skipping");
                continue;
            };
            for problem in &problems {
                ScoreService::recompute(
                    pool,
                    locks,
                    contest,
                    team,
                    category,
                    &problem.problem_id,
                    &settings,
                    false,
                )
                .await?;
            }
            RankService::recompute(pool, locks, contest, team, &settings).await?;
        }

        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let problem_ids: Vec<Uuid> = problems.iter().map(|p| p.problem_id).collect();
        let pruned_scores = ScoreCacheRepository::prune(pool, &contest.id, &team_ids, &problem_ids).await?;
        let pruned_ranks = RankCacheRepository::prune(pool, &contest.id, &team_ids).await?;
        if pruned_scores + pruned_ranks > 0 {
            tracing::info!(
                contest_id = %contest.id,
                pruned_scores,
                pruned_ranks,
                "pruned out-of-scope cache rows"
            );
        }

        Ok(())
    }
}
