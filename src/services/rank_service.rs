//! Rank aggregation service
//!
//! Recomputes one team's ranking totals from its score cache rows. Each
//! perspective is summed independently, so a team can hold different totals
//! on the jury and public boards during a freeze.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::ScoringConfig,
    db::repositories::{ProblemRepository, RankCacheRepository, ScoreCacheRepository},
    error::AppResult,
    models::{Contest, Perspective, RankCacheEntry, ScoreCacheEntry, Team},
    services::locks::{LockCoordinator, LockKey},
    utils::{calc_penalty_time, score_time},
};

/// Summed totals for one perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerspectiveTotals {
    pub points: i64,
    pub total_time: i64,
    pub total_runtime: i64,
}

/// Rank aggregation service
pub struct RankService;

impl RankService {
    /// Recompute the rank cache row for one team
    pub async fn recompute(
        pool: &PgPool,
        locks: &LockCoordinator,
        contest: &Contest,
        team: &Team,
        settings: &ScoringConfig,
    ) -> AppResult<RankCacheEntry> {
        tracing::debug!(contest_id = %contest.id, team_id = %team.id, "recomputing rank totals");

        let guard = locks
            .acquire(LockKey::Rank {
                contest_id: contest.id,
                team_id: team.id,
            })
            .await?;

        let problems = ProblemRepository::for_contest(pool, &contest.id).await?;
        let points_by_problem: HashMap<Uuid, i32> = problems
            .into_iter()
            .map(|p| (p.problem_id, p.points))
            .collect();
        let cells = ScoreCacheRepository::for_team(pool, &contest.id, &team.id).await?;

        let restricted = perspective_totals(
            &cells,
            &points_by_problem,
            team.penalty,
            settings,
            Perspective::Restricted,
        );
        let public = perspective_totals(
            &cells,
            &points_by_problem,
            team.penalty,
            settings,
            Perspective::Public,
        );

        let entry = RankCacheEntry {
            contest_id: contest.id,
            team_id: team.id,
            points_restricted: restricted.points,
            total_time_restricted: restricted.total_time,
            total_runtime_restricted: restricted.total_runtime,
            points_public: public.points,
            total_time_public: public.total_time,
            total_runtime_public: public.total_runtime,
        };
        RankCacheRepository::upsert(pool, &entry).await?;
        drop(guard);

        Ok(entry)
    }
}

/// Sum one perspective's totals over a team's score cache rows.
///
/// Rows for problems no longer in the contest contribute nothing; the next
/// cache refresh prunes them.
pub(crate) fn perspective_totals(
    cells: &[ScoreCacheEntry],
    points_by_problem: &HashMap<Uuid, i32>,
    team_penalty: i64,
    settings: &ScoringConfig,
    perspective: Perspective,
) -> PerspectiveTotals {
    let mut totals = PerspectiveTotals {
        total_time: team_penalty,
        ..PerspectiveTotals::default()
    };

    for cell in cells {
        let Some(&points) = points_by_problem.get(&cell.problem_id) else {
            continue;
        };
        if !cell.is_correct(perspective) {
            continue;
        }

        let solve_time = score_time(cell.solve_time(perspective), settings.score_in_seconds);
        let penalty = calc_penalty_time(
            true,
            cell.submissions(perspective),
            settings.penalty_time,
            settings.score_in_seconds,
        );

        totals.points += points as i64;
        totals.total_time += solve_time + penalty;
        totals.total_runtime += cell.runtime(perspective);
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(
        problem_id: Uuid,
        submissions: i32,
        solve_time: i64,
        runtime: i64,
        correct_restricted: bool,
        correct_public: bool,
    ) -> ScoreCacheEntry {
        ScoreCacheEntry {
            contest_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            problem_id,
            submissions_restricted: submissions,
            pending_restricted: 0,
            solve_time_restricted: solve_time,
            runtime_restricted: runtime,
            is_correct_restricted: correct_restricted,
            submissions_public: submissions,
            pending_public: 0,
            solve_time_public: solve_time,
            runtime_public: runtime,
            is_correct_public: correct_public,
            is_first_to_solve: false,
        }
    }

    #[test]
    fn test_totals_in_seconds_mode() {
        // One wrong try, solved at t=300s: 300 + 1200 penalty = 1500.
        let problem = Uuid::new_v4();
        let points: HashMap<Uuid, i32> = [(problem, 1)].into();
        let cells = vec![cell(problem, 2, 300, 450, true, true)];
        let settings = ScoringConfig {
            score_in_seconds: true,
            ..ScoringConfig::default()
        };

        let totals = perspective_totals(&cells, &points, 0, &settings, Perspective::Restricted);
        assert_eq!(totals.points, 1);
        assert_eq!(totals.total_time, 1500);
        assert_eq!(totals.total_runtime, 450);
    }

    #[test]
    fn test_totals_in_minutes_mode() {
        // Solved at 300s = minute 5, one wrong try = 20 penalty minutes.
        let problem = Uuid::new_v4();
        let points: HashMap<Uuid, i32> = [(problem, 1)].into();
        let cells = vec![cell(problem, 2, 300, 450, true, true)];

        let totals = perspective_totals(
            &cells,
            &points,
            0,
            &ScoringConfig::default(),
            Perspective::Restricted,
        );
        assert_eq!(totals.total_time, 25);
    }

    #[test]
    fn test_unsolved_cells_contribute_nothing() {
        let problem = Uuid::new_v4();
        let points: HashMap<Uuid, i32> = [(problem, 1)].into();
        let cells = vec![cell(problem, 4, 0, 0, false, false)];

        let totals = perspective_totals(
            &cells,
            &points,
            0,
            &ScoringConfig::default(),
            Perspective::Restricted,
        );
        assert_eq!(totals, PerspectiveTotals::default());
    }

    #[test]
    fn test_perspectives_diverge_during_freeze() {
        // Restricted-correct, public still pending.
        let problem = Uuid::new_v4();
        let points: HashMap<Uuid, i32> = [(problem, 3)].into();
        let mut frozen = cell(problem, 1, 14_700, 800, true, false);
        frozen.submissions_public = 0;
        frozen.solve_time_public = 0;
        frozen.runtime_public = 0;
        let cells = vec![frozen];
        let settings = ScoringConfig {
            score_in_seconds: true,
            ..ScoringConfig::default()
        };

        let restricted = perspective_totals(&cells, &points, 0, &settings, Perspective::Restricted);
        let public = perspective_totals(&cells, &points, 0, &settings, Perspective::Public);
        assert_eq!(restricted.points, 3);
        assert_eq!(restricted.total_time, 14_700);
        assert_eq!(public.points, 0);
        assert_eq!(public.total_time, 0);
    }

    #[test]
    fn test_team_penalty_offset_and_multiple_problems() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let points: HashMap<Uuid, i32> = [(p1, 1), (p2, 1)].into();
        let cells = vec![
            cell(p1, 1, 600, 100, true, true),
            cell(p2, 3, 1200, 200, true, true),
        ];

        // 10 + (20 + 40 penalty) + 15 offset = 85.
        let totals = perspective_totals(
            &cells,
            &points,
            15,
            &ScoringConfig::default(),
            Perspective::Restricted,
        );
        assert_eq!(totals.points, 2);
        assert_eq!(totals.total_time, 85);
        assert_eq!(totals.total_runtime, 300);
    }

    #[test]
    fn test_unknown_problem_is_ignored() {
        let known = Uuid::new_v4();
        let points: HashMap<Uuid, i32> = [(known, 1)].into();
        let cells = vec![
            cell(known, 1, 60, 50, true, true),
            cell(Uuid::new_v4(), 1, 60, 50, true, true),
        ];

        let totals = perspective_totals(
            &cells,
            &points,
            0,
            &ScoringConfig::default(),
            Perspective::Restricted,
        );
        assert_eq!(totals.points, 1);
        assert_eq!(totals.total_runtime, 50);
    }
}
