//! Error handling shared by the ScoreRank crates: status codes, the
//! [`ErrorExt`] trait, [`StackError`] and the domain error enums.

pub mod ext;
pub mod macros;
pub mod stack;
pub mod status_code;
pub mod types;

pub use ext::*;
pub use macros::*;
pub use stack::*;
pub use status_code::*;
pub use types::*;

pub type ScoreRankResult<T> = Result<T, StackError>;
