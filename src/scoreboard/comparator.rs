//! Team ordering and tie-break rules
//!
//! Ranking compares teams level by level: category sort order, points,
//! total time (or total runtime when the contest ranks by runtime), then the
//! latest solve time. Name only ever decides display order between true
//! ties; it never influences the numeric rank.

use std::cmp::Ordering;

use super::TeamScore;

/// Rank-relevant comparison of two teams on the same scoreboard.
///
/// `Ordering::Less` means `a` ranks above `b`. Teams in different sort-order
/// groups compare on the group alone; their relative outcome carries no
/// ranking meaning.
pub fn rank_compare(a: &TeamScore, b: &TeamScore, runtime_as_tiebreak: bool) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| b.num_points.cmp(&a.num_points))
        .then_with(|| {
            if runtime_as_tiebreak {
                a.total_runtime.cmp(&b.total_runtime)
            } else {
                a.total_time.cmp(&b.total_time)
            }
        })
        .then_with(|| solve_time_tie_breaker(a, b))
}

/// Final tie-break on the latest recorded solve time.
///
/// The team whose most recent solve came earlier wins. A team without any
/// solve ranks below a team with at least one; two teams without solves are
/// equal here (the degenerate tie).
pub fn solve_time_tie_breaker(a: &TeamScore, b: &TeamScore) -> Ordering {
    match (a.solve_times.iter().max(), b.solve_times.iter().max()) {
        (Some(a_latest), Some(b_latest)) => a_latest.cmp(b_latest),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Full display ordering: rank comparison, then case-insensitive name.
///
/// Only used to fix the visual order among teams that share a rank.
pub fn display_compare(a: &TeamScore, b: &TeamScore, runtime_as_tiebreak: bool) -> Ordering {
    rank_compare(a, b, runtime_as_tiebreak)
        .then_with(|| a.team_name.to_lowercase().cmp(&b.team_name.to_lowercase()))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn score(sort_order: i32, points: i64, total_time: i64, solve_times: Vec<i64>) -> TeamScore {
        TeamScore {
            team_id: Uuid::new_v4(),
            team_name: "team".to_string(),
            category_id: Uuid::new_v4(),
            sort_order,
            affiliation_id: None,
            num_points: points,
            total_time,
            total_runtime: 0,
            solve_times,
            rank: 0,
        }
    }

    #[test]
    fn test_sort_order_dominates() {
        let contestant = score(0, 1, 100, vec![100]);
        let spectator = score(1, 10, 10, vec![1, 2, 3]);
        assert_eq!(rank_compare(&contestant, &spectator, false), Ordering::Less);
        assert_eq!(rank_compare(&spectator, &contestant, false), Ordering::Greater);
    }

    #[test]
    fn test_more_points_wins() {
        let a = score(0, 3, 500, vec![100, 200, 200]);
        let b = score(0, 2, 100, vec![40, 60]);
        assert_eq!(rank_compare(&a, &b, false), Ordering::Less);
    }

    #[test]
    fn test_lower_total_time_wins() {
        let a = score(0, 1, 250, vec![250]);
        let b = score(0, 1, 1500, vec![300]);
        assert_eq!(rank_compare(&a, &b, false), Ordering::Less);
        assert_eq!(rank_compare(&b, &a, false), Ordering::Greater);
    }

    #[test]
    fn test_runtime_tiebreak_replaces_total_time() {
        let mut fast = score(0, 2, 900, vec![100, 200]);
        fast.total_runtime = 350;
        let mut slow = score(0, 2, 100, vec![40, 60]);
        slow.total_runtime = 800;

        // With runtime ranking the higher total time no longer matters.
        assert_eq!(rank_compare(&fast, &slow, true), Ordering::Less);
        assert_eq!(rank_compare(&fast, &slow, false), Ordering::Greater);
    }

    #[test]
    fn test_latest_solve_time_breaks_ties() {
        let a = score(0, 2, 300, vec![100, 200]);
        let b = score(0, 2, 300, vec![50, 250]);
        assert_eq!(rank_compare(&a, &b, false), Ordering::Less);
        assert_eq!(rank_compare(&b, &a, false), Ordering::Greater);
    }

    #[test]
    fn test_equal_latest_solve_times_are_equal() {
        // Different solve histories, same maximum: a true tie.
        let a = score(0, 4, 475, vec![6, 367, 2, 100]);
        let b = score(0, 4, 475, vec![100, 6, 2, 367]);
        assert_eq!(solve_time_tie_breaker(&a, &b), Ordering::Equal);
        assert_eq!(solve_time_tie_breaker(&b, &a), Ordering::Equal);
    }

    #[test]
    fn test_team_without_solves_ranks_below() {
        let solved = score(0, 0, 0, vec![42]);
        let unsolved = score(0, 0, 0, vec![]);
        assert_eq!(solve_time_tie_breaker(&solved, &unsolved), Ordering::Less);
        assert_eq!(solve_time_tie_breaker(&unsolved, &solved), Ordering::Greater);
    }

    #[test]
    fn test_degenerate_tie_is_equal() {
        let a = score(0, 0, 0, vec![]);
        let b = score(0, 0, 0, vec![]);
        assert_eq!(rank_compare(&a, &b, false), Ordering::Equal);
        assert_eq!(rank_compare(&b, &a, false), Ordering::Equal);
    }

    #[test]
    fn test_name_only_affects_display_order() {
        let mut a = score(0, 1, 100, vec![100]);
        a.team_name = "Bravo".to_string();
        let mut b = score(0, 1, 100, vec![100]);
        b.team_name = "alpha".to_string();

        assert_eq!(rank_compare(&a, &b, false), Ordering::Equal);
        assert_eq!(display_compare(&b, &a, false), Ordering::Less);
    }
}
