//! Business logic services

pub mod locks;
pub mod rank_service;
pub mod score_service;
pub mod scoreboard_service;

pub use locks::{LockCoordinator, LockKey};
pub use rank_service::RankService;
pub use score_service::ScoreService;
pub use scoreboard_service::ScoreboardService;
