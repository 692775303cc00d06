//! Aggregate lock coordinator
//!
//! Serializes concurrent recomputation of the same aggregate row with an
//! in-process keyed mutex map. Acquisition is bounded: a worker that cannot
//! get the key within the timeout fails its recompute instead of silently
//! skipping it, so an aggregate is never left stale without a logged error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Composite key of one lockable aggregate row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// A score cache row
    Score {
        contest_id: Uuid,
        team_id: Uuid,
        problem_id: Uuid,
    },
    /// A rank cache row
    Rank { contest_id: Uuid, team_id: Uuid },
}

impl std::fmt::Display for LockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score {
                contest_id,
                team_id,
                problem_id,
            } => write!(f, "score.{contest_id}.{team_id}.{problem_id}"),
            Self::Rank { contest_id, team_id } => write!(f, "rank.{contest_id}.{team_id}"),
        }
    }
}

/// Keyed mutex map with bounded acquisition
#[derive(Debug, Clone)]
pub struct LockCoordinator {
    locks: Arc<Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>,
    timeout: Duration,
}

/// Held lock; the key is released when this is dropped
#[derive(Debug)]
pub struct LockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl LockCoordinator {
    /// Create a coordinator with the given acquisition bound
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// Acquire the lock for one aggregate key, waiting at most the
    /// configured timeout.
    ///
    /// Returns [`AppError::LockTimeout`] when the bound is exceeded; the
    /// caller must abandon the recompute without writing.
    pub async fn acquire(&self, key: LockKey) -> AppResult<LockGuard> {
        let entry = {
            let mut locks = self.locks.lock().await;
            // Entries nobody else holds a handle to are stale; drop them so
            // the map does not grow with every contest ever scored.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(key.clone()).or_default().clone()
        };

        match tokio::time::timeout(self.timeout, entry.lock_owned()).await {
            Ok(guard) => Ok(LockGuard { _guard: guard }),
            Err(_) => {
                tracing::warn!(key = %key, "aggregate lock acquisition timed out");
                Err(AppError::LockTimeout {
                    key: key.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_key() -> LockKey {
        LockKey::Score {
            contest_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            problem_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let coordinator = LockCoordinator::new(Duration::from_secs(1));
        let key = score_key();

        let counter = Arc::new(std::sync::Mutex::new(0i32));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            let key = key.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = coordinator.acquire(key).await.unwrap();
                // While the guard is held no other task may be inside.
                {
                    let mut value = counter.lock().unwrap();
                    *value += 1;
                    assert_eq!(*value, 1);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                *counter.lock().unwrap() -= 1;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let coordinator = LockCoordinator::new(Duration::from_millis(100));
        let _first = coordinator.acquire(score_key()).await.unwrap();
        // A different key acquires immediately even while the first is held.
        let second = coordinator.acquire(score_key()).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_timeout_fails_the_acquisition() {
        let coordinator = LockCoordinator::new(Duration::from_millis(20));
        let key = score_key();

        let _held = coordinator.acquire(key.clone()).await.unwrap();
        let result = coordinator.acquire(key.clone()).await;
        match result {
            Err(AppError::LockTimeout { key: reported }) => {
                assert_eq!(reported, key.to_string());
            }
            other => panic!("expected LockTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_release_allows_reacquisition() {
        let coordinator = LockCoordinator::new(Duration::from_millis(50));
        let key = score_key();

        drop(coordinator.acquire(key.clone()).await.unwrap());
        assert!(coordinator.acquire(key).await.is_ok());
    }

    #[test]
    fn test_key_display() {
        let contest_id = Uuid::nil();
        let team_id = Uuid::nil();
        let key = LockKey::Rank { contest_id, team_id };
        assert_eq!(
            key.to_string(),
            format!("rank.{contest_id}.{team_id}")
        );
    }
}
