//! Laurel - Application Entry Point
//!
//! Starts the scoring workers that keep the scoreboard caches current.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use redis::Client as RedisClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use laurel::{
    config::CONFIG,
    consumer::ScoringConsumer,
    db,
    services::LockCoordinator,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.worker.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Laurel scoring engine...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;
    db::test_connection(&db_pool).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Initialize Redis connection
    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    // Create application state
    let locks = LockCoordinator::new(CONFIG.worker.lock_timeout);
    let state = AppState::new(db_pool, redis_conn, locks, CONFIG.clone());

    // Spawn the scoring workers
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut workers = Vec::new();
    for worker_id in 0..CONFIG.worker.concurrency {
        let consumer = ScoringConsumer::new(state.clone(), worker_id, shutdown.clone());
        workers.push(tokio::spawn(async move {
            if let Err(err) = consumer.run().await {
                tracing::error!(worker = worker_id, error = %err, "scoring consumer terminated");
            }
        }));
    }
    tracing::info!(workers = CONFIG.worker.concurrency, "Scoring workers running");

    // Wait for shutdown signal, then drain the workers
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, draining workers...");
    shutdown.store(true, Ordering::Relaxed);
    for worker in workers {
        let _ = worker.await;
    }

    tracing::info!("Laurel stopped");
    Ok(())
}
