//! Database repositories
//!
//! Repositories handle all direct database interactions. The submission,
//! team, problem and contest tables belong to the judge and are read-only
//! here; only the score cache, rank cache and scoring settings tables are
//! written by this crate.

pub mod contest_repo;
pub mod problem_repo;
pub mod rank_cache_repo;
pub mod score_cache_repo;
pub mod settings_repo;
pub mod submission_repo;
pub mod team_repo;

pub use contest_repo::ContestRepository;
pub use problem_repo::ProblemRepository;
pub use rank_cache_repo::RankCacheRepository;
pub use score_cache_repo::ScoreCacheRepository;
pub use settings_repo::SettingsRepository;
pub use submission_repo::SubmissionRepository;
pub use team_repo::TeamRepository;
