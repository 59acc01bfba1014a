//! Сервисный слой: проверка параметров запросов и конверты ответов поверх
//! [`RankedScoreIndex`](crate::database::RankedScoreIndex).

pub mod leaderboard;
pub mod response;

pub use leaderboard::*;
pub use response::*;
