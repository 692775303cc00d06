//! Judgement event consumer
//!
//! Workers pop judgement-completed events from a Redis list and trigger the
//! score recompute for the affected cell. Several workers may run at once;
//! the lock coordinator serializes the ones that land on the same cell. A
//! recompute that fails (for example on lock timeout) is logged and
//! abandoned: the next event for that cell recomputes from scratch anyway,
//! so staleness is self-correcting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::EVENT_POP_TIMEOUT_SECONDS;
use crate::db::repositories::{ContestRepository, SettingsRepository, TeamRepository};
use crate::error::AppResult;
use crate::services::ScoreService;
use crate::state::AppState;

/// Judgement-completed event pushed by the judging pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgementEvent {
    pub contest_id: Uuid,
    pub team_id: Uuid,
    pub problem_id: Uuid,
}

/// Scoring worker that consumes judgement events
pub struct ScoringConsumer {
    state: AppState,
    worker_id: u32,
    shutdown: Arc<AtomicBool>,
}

impl ScoringConsumer {
    /// Create a new scoring consumer
    pub fn new(state: AppState, worker_id: u32, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            state,
            worker_id,
            shutdown,
        }
    }

    /// Run the consumer loop until shutdown is requested
    pub async fn run(&self) -> AppResult<()> {
        tracing::info!(worker = self.worker_id, "starting scoring consumer");

        let mut redis = self.state.redis();
        let queue = self.state.config().redis.event_queue.clone();

        while !self.shutdown.load(Ordering::Relaxed) {
            let popped: Option<(String, String)> =
                match redis.blpop(&queue, EVENT_POP_TIMEOUT_SECONDS as f64).await {
                    Ok(popped) => popped,
                    Err(err) => {
                        tracing::error!(
                            worker = self.worker_id,
                            error = %err,
                            "failed to pop from event queue"
                        );
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                };

            let Some((_, payload)) = popped else {
                continue;
            };
            if let Err(err) = self.handle_payload(&payload).await {
                tracing::error!(
                    worker = self.worker_id,
                    error = %err,
                    "failed to process judgement event"
                );
            }
        }

        tracing::info!(worker = self.worker_id, "scoring consumer stopped");
        Ok(())
    }

    async fn handle_payload(&self, payload: &str) -> AppResult<()> {
        let event: JudgementEvent = match serde_json::from_str(payload) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed judgement event");
                return Ok(());
            }
        };
        self.handle_event(event).await
    }

    async fn handle_event(&self, event: JudgementEvent) -> AppResult<()> {
        tracing::debug!(
            contest_id = %event.contest_id,
            team_id = %event.team_id,
            problem_id = %event.problem_id,
            "handling judgement event"
        );

        let pool = self.state.db();
        let Some(contest) = ContestRepository::find_by_id(pool, &event.contest_id).await? else {
            tracing::warn!(contest_id = %event.contest_id, "event references unknown contest, skipping");
            return Ok(());
        };
        let settings = SettingsRepository::for_contest(pool, &event.contest_id).await?;
        let Some((team, category)) = TeamRepository::find_with_category(pool, &event.team_id).await?
        else {
            tracing::warn!(team_id = %event.team_id, "event references unknown team or category, skipping");
            return Ok(());
        };

        ScoreService::recompute(
            pool,
            self.state.locks(),
            &contest,
            &team,
            &category,
            &event.problem_id,
            &settings,
            true,
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization() {
        let payload = r#"{
            "contest_id": "00000000-0000-0000-0000-000000000001",
            "team_id": "00000000-0000-0000-0000-000000000002",
            "problem_id": "00000000-0000-0000-0000-000000000003"
        }"#;
        let event: JudgementEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.contest_id.to_string(), "00000000-0000-0000-0000-000000000001");

        let malformed: Result<JudgementEvent, _> = serde_json::from_str("{\"contest_id\": 7}");
        assert!(malformed.is_err());
    }
}
