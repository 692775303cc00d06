//! Scoreboard summary statistics
//!
//! Accumulated in a single pass over the sorted team list: point totals per
//! sort-order group, team counts per affiliation and country, and per-problem
//! submission statistics with the best solve time and best correct runtime.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::ContestProblem;

/// Bottom-row statistics for a scoreboard snapshot
#[derive(Debug, Clone, Default)]
pub struct Summary {
    points_per_sort_order: HashMap<i32, i64>,
    affiliation_teams: HashMap<Uuid, u32>,
    country_teams: HashMap<String, u32>,
    problems: HashMap<Uuid, ProblemSummary>,
}

impl Summary {
    /// Create a summary with an empty entry for every scoreboard problem
    pub(crate) fn new(problems: &[ContestProblem]) -> Self {
        Self {
            problems: problems
                .iter()
                .map(|p| (p.problem_id, ProblemSummary::default()))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn add_points(&mut self, sort_order: i32, points: i64) {
        *self.points_per_sort_order.entry(sort_order).or_default() += points;
    }

    pub(crate) fn increment_affiliation(&mut self, affiliation_id: Uuid) {
        *self.affiliation_teams.entry(affiliation_id).or_default() += 1;
    }

    pub(crate) fn increment_country(&mut self, country: String) {
        *self.country_teams.entry(country).or_default() += 1;
    }

    pub(crate) fn problem_mut(&mut self, problem_id: Uuid) -> Option<&mut ProblemSummary> {
        self.problems.get_mut(&problem_id)
    }

    /// Total points scored by teams in the given sort-order group
    pub fn points(&self, sort_order: i32) -> i64 {
        self.points_per_sort_order.get(&sort_order).copied().unwrap_or(0)
    }

    /// Number of scoreboard teams with the given affiliation
    pub fn affiliation_teams(&self, affiliation_id: Uuid) -> u32 {
        self.affiliation_teams.get(&affiliation_id).copied().unwrap_or(0)
    }

    /// Number of scoreboard teams from the given country
    pub fn country_teams(&self, country: &str) -> u32 {
        self.country_teams.get(country).copied().unwrap_or(0)
    }

    pub fn problem(&self, problem_id: Uuid) -> Option<&ProblemSummary> {
        self.problems.get(&problem_id)
    }
}

/// Per-problem statistics, kept separately per sort-order group
#[derive(Debug, Clone, Default)]
pub struct ProblemSummary {
    stats: HashMap<i32, ProblemStats>,
}

/// Submission counters and best results for one problem in one sort-order
/// group
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemStats {
    pub num_submissions: i64,
    pub num_pending: i64,
    pub num_correct: i64,
    /// Solve time of the first-to-solve submission, in seconds
    pub best_time: Option<i64>,
    /// Fastest correct runtime, in milliseconds
    pub best_runtime: Option<i64>,
}

impl ProblemSummary {
    pub(crate) fn add_submission_counts(
        &mut self,
        sort_order: i32,
        num_submissions: i32,
        num_pending: i32,
        correct: bool,
    ) {
        let stats = self.stats.entry(sort_order).or_default();
        stats.num_submissions += num_submissions as i64;
        stats.num_pending += num_pending as i64;
        if correct {
            stats.num_correct += 1;
        }
    }

    pub(crate) fn update_best_time(&mut self, sort_order: i32, time: i64) {
        let stats = self.stats.entry(sort_order).or_default();
        stats.best_time = Some(stats.best_time.map_or(time, |best| best.min(time)));
    }

    pub(crate) fn update_best_runtime(&mut self, sort_order: i32, runtime: i64) {
        let stats = self.stats.entry(sort_order).or_default();
        stats.best_runtime = Some(stats.best_runtime.map_or(runtime, |best| best.min(runtime)));
    }

    pub fn stats(&self, sort_order: i32) -> Option<&ProblemStats> {
        self.stats.get(&sort_order)
    }

    pub fn best_time(&self, sort_order: i32) -> Option<i64> {
        self.stats.get(&sort_order).and_then(|s| s.best_time)
    }

    pub fn best_runtime(&self, sort_order: i32) -> Option<i64> {
        self.stats.get(&sort_order).and_then(|s| s.best_runtime)
    }
}
