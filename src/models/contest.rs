//! Contest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Start of the scoreboard freeze window, if any
    pub freeze_time: Option<DateTime<Utc>>,
    /// When frozen results are revealed again, if scheduled
    pub unfreeze_time: Option<DateTime<Utc>>,
}

impl Contest {
    /// Contest-relative time in whole seconds, clamped to the contest start.
    ///
    /// Negative times don't make sense on a scoreboard, so submissions dated
    /// before the start count as submitted at the start.
    pub fn relative_seconds(&self, at: DateTime<Utc>) -> i64 {
        let at = at.max(self.start_time);
        (at - self.start_time).num_seconds()
    }

    /// Whether a submission at the given time falls inside the freeze window
    pub fn is_after_freeze(&self, at: DateTime<Utc>) -> bool {
        match self.freeze_time {
            Some(freeze) => at >= freeze,
            None => false,
        }
    }

    /// Derive the freeze state of this contest at the given wall-clock time
    pub fn freeze_state(&self, now: DateTime<Utc>) -> FreezeState {
        let started = now >= self.start_time;
        let ended = now >= self.end_time;

        // Frozen between freeze time and unfreeze time (or indefinitely when
        // no unfreeze is scheduled).
        let frozen = match self.freeze_time {
            Some(freeze) => {
                now >= freeze && self.unfreeze_time.map_or(true, |unfreeze| now < unfreeze)
            }
            None => false,
        };

        // Final results show once the contest is over and either no freeze was
        // configured or the unfreeze time has passed.
        let show_final = (self.freeze_time.is_none() && ended)
            || self.unfreeze_time.is_some_and(|unfreeze| now >= unfreeze);

        FreezeState {
            started,
            ended,
            frozen,
            show_final,
        }
    }
}

/// Snapshot of a contest's freeze window at one point in time.
///
/// Computed once per operation and passed along explicitly, so a build never
/// observes the clock moving underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeState {
    pub started: bool,
    pub ended: bool,
    /// The public scoreboard currently hides fresh results
    pub frozen: bool,
    /// Final (unfrozen) results may be shown to everyone
    pub show_final: bool,
}

/// Contest problem association
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContestProblem {
    pub contest_id: Uuid,
    pub problem_id: Uuid,
    /// Short label shown as the scoreboard column header, e.g. "A"
    pub label: String,
    pub points: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn contest() -> Contest {
        Contest {
            id: Uuid::new_v4(),
            title: "Test Contest".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap(),
            freeze_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap()),
            unfreeze_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_relative_seconds_clamps_to_start() {
        let contest = contest();
        let before_start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 59, 0).unwrap();
        assert_eq!(contest.relative_seconds(before_start), 0);

        let five_minutes_in = Utc.with_ymd_and_hms(2024, 6, 1, 10, 5, 0).unwrap();
        assert_eq!(contest.relative_seconds(five_minutes_in), 300);
    }

    #[test]
    fn test_after_freeze() {
        let contest = contest();
        let before = Utc.with_ymd_and_hms(2024, 6, 1, 13, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        assert!(!contest.is_after_freeze(before));
        assert!(contest.is_after_freeze(after));
    }

    #[test]
    fn test_freeze_state_transitions() {
        let contest = contest();

        let before = contest.freeze_state(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        assert!(!before.started && !before.frozen && !before.show_final);

        let running = contest.freeze_state(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        assert!(running.started && !running.frozen && !running.show_final);

        let frozen = contest.freeze_state(Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap());
        assert!(frozen.frozen && !frozen.show_final);

        // Still frozen between contest end and unfreeze.
        let ended = contest.freeze_state(Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap());
        assert!(ended.ended && ended.frozen && !ended.show_final);

        let unfrozen = contest.freeze_state(Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap());
        assert!(!unfrozen.frozen && unfrozen.show_final);
    }

    #[test]
    fn test_no_freeze_shows_final_after_end() {
        let mut contest = contest();
        contest.freeze_time = None;
        contest.unfreeze_time = None;

        let state = contest.freeze_state(Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap());
        assert!(state.ended && state.show_final);
        assert!(!contest.is_after_freeze(Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap()));
    }
}
