//! Строчные команды CLI.
//!
//! - `parse`: разбор строки в [`Command`].
//! - `execute`: выполнение через сервисный слой и сериализация ответа.

pub mod execute;
pub mod parse;

pub use execute::*;
pub use parse::*;

use rust_decimal::Decimal;

use crate::database::CustomerId;

/// Команда, прочитанная из одной строки ввода.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `UPSERT <id> <delta>`
    Upsert {
        customer_id: CustomerId,
        delta: Decimal,
    },
    /// `RANK <id>`
    Rank { customer_id: CustomerId },
    /// `RANGE <start> <end>`
    Range { start: i64, end: i64 },
    /// `NEIGHBORS <id> [high] [low]`
    Neighbors {
        customer_id: CustomerId,
        high: Option<i64>,
        low: Option<i64>,
    },
    /// `STATS`
    Stats,
    /// `QUIT`
    Quit,
}
