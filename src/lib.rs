/// Line commands read by the CLI (UPSERT, RANK, RANGE, NEIGHBORS, STATS).
pub mod command;
/// Settings loading (defaults, TOML file, environment).
pub mod config;
/// Leaderboard data structures: score records, identity index, ranked skip
/// list and the lock-guarded ranked score index.
pub mod database;
/// Logging setup on top of `tracing-subscriber`.
pub mod logging;
/// Request validation and response envelopes.
pub mod service;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use config::Settings;
/// Ranked index and its building blocks.
pub use database::{
    CustomerId, IdentityIndex, RankKey, RankedEntry, RankedScoreIndex, Score, ScoreRecord,
    SkipList, DEFAULT_MAX_ENTRIES,
};
/// Leaderboard errors and result alias.
pub use scorerank_error::{LeaderboardError, ScoreRankResult, StackError};
/// Service layer.
pub use service::{ApiResponse, CustomerRank, CustomerScore, LeaderboardService, Reply};
