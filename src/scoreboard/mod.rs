//! Scoreboard read model
//!
//! A [`Scoreboard`] is a fully sorted, tie-broken snapshot assembled on
//! demand from the current cache rows for one perspective. It is never
//! persisted; readers build one, query it and throw it away. Building never
//! takes locks; a row that is mid-rewrite simply shows up in the next
//! build.

pub mod comparator;
pub mod filter;
pub mod summary;

use std::collections::{HashMap, HashSet};

use tracing::warn;
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::{
    ContestProblem, FreezeState, Perspective, RankCacheEntry, ScoreCacheEntry, Team, TeamAffiliation,
    TeamCategory,
};
use crate::utils::{calc_penalty_time, score_time};

pub use filter::Filter;
pub use summary::{ProblemStats, ProblemSummary, Summary};

/// One scoreboard cell for a (team, problem) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixItem {
    pub is_correct: bool,
    /// Correct and first to solve the problem in the team's sort-order group
    pub is_first: bool,
    pub num_submissions: i32,
    pub num_pending: i32,
    /// Contest-relative solve time in seconds; 0 when unsolved
    pub solve_time: i64,
    /// Penalty incurred on this problem, in scoreboard time units
    pub penalty_time: i64,
    /// Fastest correct runtime in milliseconds; 0 when no correct run
    pub runtime: i64,
}

impl MatrixItem {
    /// Cell for a team that has not touched the problem
    fn not_attempted() -> Self {
        Self {
            is_correct: false,
            is_first: false,
            num_submissions: 0,
            num_pending: 0,
            solve_time: 0,
            penalty_time: 0,
            runtime: 0,
        }
    }
}

/// One row of the ranked team list
#[derive(Debug, Clone)]
pub struct TeamScore {
    pub team_id: Uuid,
    pub team_name: String,
    pub category_id: Uuid,
    pub sort_order: i32,
    pub affiliation_id: Option<Uuid>,
    pub num_points: i64,
    /// Total solve time plus penalties, in scoreboard time units
    pub total_time: i64,
    /// Summed fastest correct runtimes, in milliseconds
    pub total_runtime: i64,
    /// Scoreboard-unit solve times of the team's correct problems, used by
    /// the tie-breaker
    pub solve_times: Vec<i64>,
    /// 1-based rank within the team's sort-order group
    pub rank: u32,
}

/// A ranked scoreboard snapshot for one perspective
#[derive(Debug, Clone)]
pub struct Scoreboard {
    perspective: Perspective,
    freeze: FreezeState,
    runtime_as_tiebreak: bool,
    problems: Vec<ContestProblem>,
    matrix: HashMap<Uuid, HashMap<Uuid, MatrixItem>>,
    scores: Vec<TeamScore>,
    summary: Summary,
    best_rank_by_category: HashMap<Uuid, u32>,
}

impl Scoreboard {
    /// Assemble a snapshot from the supplied scope and cache rows.
    ///
    /// Cache rows referencing a team or problem outside the scope are
    /// skipped with a warning; missing (team, problem) pairs become
    /// not-attempted cells.
    pub fn build(
        teams: &[Team],
        categories: &[TeamCategory],
        affiliations: &[TeamAffiliation],
        problems: Vec<ContestProblem>,
        score_rows: Vec<ScoreCacheEntry>,
        rank_rows: Vec<RankCacheEntry>,
        freeze: FreezeState,
        perspective: Perspective,
        settings: &ScoringConfig,
    ) -> Self {
        let categories_by_id: HashMap<Uuid, &TeamCategory> =
            categories.iter().map(|c| (c.id, c)).collect();
        let affiliations_by_id: HashMap<Uuid, &TeamAffiliation> =
            affiliations.iter().map(|a| (a.id, a)).collect();
        let rank_by_team: HashMap<Uuid, &RankCacheEntry> =
            rank_rows.iter().map(|r| (r.team_id, r)).collect();

        // Seed one TeamScore per in-scope team from its persisted totals.
        let mut scores: Vec<TeamScore> = teams
            .iter()
            .filter_map(|team| {
                let Some(category) = categories_by_id.get(&team.category_id) else {
                    warn!(team_id = %team.id, "team references unknown category, skipping");
                    return None;
                };
                let rank_row = rank_by_team.get(&team.id);
                Some(TeamScore {
                    team_id: team.id,
                    team_name: team.effective_name().to_string(),
                    category_id: team.category_id,
                    sort_order: category.sort_order,
                    affiliation_id: team.affiliation_id,
                    num_points: rank_row.map_or(0, |r| r.points(perspective)),
                    total_time: rank_row.map_or(team.penalty, |r| r.total_time(perspective)),
                    total_runtime: rank_row.map_or(0, |r| r.total_runtime(perspective)),
                    solve_times: Vec::new(),
                    rank: 0,
                })
            })
            .collect();

        let known_teams: HashSet<Uuid> = scores.iter().map(|s| s.team_id).collect();
        let known_problems: HashSet<Uuid> = problems.iter().map(|p| p.problem_id).collect();

        // Fill the matrix from the score cache.
        let mut matrix: HashMap<Uuid, HashMap<Uuid, MatrixItem>> = HashMap::new();
        for row in score_rows {
            if !known_teams.contains(&row.team_id) || !known_problems.contains(&row.problem_id) {
                warn!(
                    team_id = %row.team_id,
                    problem_id = %row.problem_id,
                    "score cache row references unknown team or problem, skipping"
                );
                continue;
            }
            let is_correct = row.is_correct(perspective);
            let item = MatrixItem {
                is_correct,
                is_first: is_correct && row.is_first_to_solve,
                num_submissions: row.submissions(perspective),
                num_pending: row.pending(perspective),
                solve_time: row.solve_time(perspective),
                penalty_time: calc_penalty_time(
                    is_correct,
                    row.submissions(perspective),
                    settings.penalty_time,
                    settings.score_in_seconds,
                ),
                runtime: row.runtime(perspective),
            };
            matrix.entry(row.team_id).or_default().insert(row.problem_id, item);
        }

        // Complete each team's row and collect its solve times for the
        // tie-breaker.
        for score in &mut scores {
            let row = matrix.entry(score.team_id).or_default();
            for problem in &problems {
                let item = row
                    .entry(problem.problem_id)
                    .or_insert_with(MatrixItem::not_attempted);
                if item.is_correct {
                    score
                        .solve_times
                        .push(score_time(item.solve_time, settings.score_in_seconds));
                }
            }
        }

        scores.sort_by(|a, b| comparator::display_compare(a, b, settings.runtime_as_tiebreak));

        // Assign ranks and accumulate the summary in one walk over the
        // sorted list. The position counter resets on every sort-order
        // change; true ties share the preceding team's rank.
        let mut summary = Summary::new(&problems);
        let mut prev_sort_order: Option<i32> = None;
        let mut position = 0u32;
        for i in 0..scores.len() {
            if prev_sort_order != Some(scores[i].sort_order) {
                prev_sort_order = Some(scores[i].sort_order);
                position = 0;
            }
            position += 1;

            let tied_with_previous = position > 1
                && comparator::rank_compare(
                    &scores[i - 1],
                    &scores[i],
                    settings.runtime_as_tiebreak,
                )
                .is_eq();
            let rank = if tied_with_previous {
                scores[i - 1].rank
            } else {
                position
            };
            scores[i].rank = rank;

            let score = &scores[i];
            summary.add_points(score.sort_order, score.num_points);
            if let Some(affiliation_id) = score.affiliation_id {
                summary.increment_affiliation(affiliation_id);
                if let Some(country) = affiliations_by_id
                    .get(&affiliation_id)
                    .and_then(|a| a.country.clone())
                {
                    summary.increment_country(country);
                }
            }

            for problem in &problems {
                let item = matrix[&score.team_id][&problem.problem_id];
                let Some(problem_summary) = summary.problem_mut(problem.problem_id) else {
                    continue;
                };
                problem_summary.add_submission_counts(
                    score.sort_order,
                    item.num_submissions,
                    item.num_pending,
                    item.is_correct,
                );
                if item.is_first {
                    problem_summary.update_best_time(score.sort_order, item.solve_time);
                }
                if item.is_correct {
                    problem_summary.update_best_runtime(score.sort_order, item.runtime);
                }
            }
        }

        // First-seen rank per category, for the best-in-category accessor.
        let mut best_rank_by_category = HashMap::new();
        for score in &scores {
            best_rank_by_category.entry(score.category_id).or_insert(score.rank);
        }

        Self {
            perspective,
            freeze,
            runtime_as_tiebreak: settings.runtime_as_tiebreak,
            problems,
            matrix,
            scores,
            summary,
            best_rank_by_category,
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn freeze_state(&self) -> FreezeState {
        self.freeze
    }

    /// Problems shown as scoreboard columns, in display order
    pub fn problems(&self) -> &[ContestProblem] {
        &self.problems
    }

    /// The ranked team list, best first
    pub fn scores(&self) -> &[TeamScore] {
        &self.scores
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Cell for the given team and problem, if both are in scope
    pub fn matrix_item(&self, team_id: Uuid, problem_id: Uuid) -> Option<&MatrixItem> {
        self.matrix.get(&team_id)?.get(&problem_id)
    }

    /// The team's rank within its sort-order group
    pub fn team_rank(&self, team_id: Uuid) -> Option<u32> {
        self.team_score(team_id).map(|s| s.rank)
    }

    /// Whether the team shares the best rank of its category and has scored
    pub fn is_best_in_category(&self, team_id: Uuid) -> bool {
        let Some(score) = self.team_score(team_id) else {
            return false;
        };
        score.num_points > 0
            && self.best_rank_by_category.get(&score.category_id) == Some(&score.rank)
    }

    /// Whether the team was the first to solve the problem
    pub fn solved_first(&self, team_id: Uuid, problem_id: Uuid) -> bool {
        self.matrix_item(team_id, problem_id).is_some_and(|item| item.is_first)
    }

    /// Whether the team has the fastest correct runtime for the problem
    /// within its sort-order group
    pub fn has_fastest_runtime(&self, team_id: Uuid, problem_id: Uuid) -> bool {
        let Some(score) = self.team_score(team_id) else {
            return false;
        };
        let Some(item) = self.matrix_item(team_id, problem_id) else {
            return false;
        };
        item.is_correct
            && self
                .summary
                .problem(problem_id)
                .and_then(|p| p.best_runtime(score.sort_order))
                == Some(item.runtime)
    }

    /// Whether teams are ranked by total runtime instead of total time
    pub fn runtime_as_tiebreak(&self) -> bool {
        self.runtime_as_tiebreak
    }

    fn team_score(&self, team_id: Uuid) -> Option<&TeamScore> {
        self.scores.iter().find(|s| s.team_id == team_id)
    }
}
