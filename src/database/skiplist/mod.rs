//! SkipList с подсчётом рангов для ScoreRank.
//!
//! # Модули
//!
//! - `skiplist_base`: однопоточный список на арене со span'ами.
//! - `safety`: валидация и статистика.

pub mod safety;
pub mod skiplist_base;

// Publicly re-export all error types and functions from the submodules to
// simplify access from external code.
pub use safety::*;
pub use skiplist_base::*;
