use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки индекса рейтинга и сервисного слоя над ним.
///
/// Отсутствие клиента ошибкой не является: запросы возвращают `None` или
/// пустой список.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    /// Новый клиент не помещается: достигнута максимальная ёмкость.
    #[error("Leaderboard has reached its maximum capacity of {capacity} entries")]
    CapacityExceeded { capacity: usize },

    /// Накопленный счёт вышел за пределы десятичного типа.
    #[error("Score overflow for customer {customer_id}")]
    ScoreOverflow { customer_id: i64 },

    /// Параметры запроса не прошли валидацию.
    #[error("Invalid parameters: {}", .errors.join(", "))]
    InvalidArgument { errors: Vec<String> },

    /// Нарушен структурный инвариант skip list. Восстановлению не подлежит.
    #[error("Ranked index invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl ErrorExt for LeaderboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CapacityExceeded { .. } => StatusCode::CapacityExceeded,
            Self::ScoreOverflow { .. } => StatusCode::ValueOverflow,
            Self::InvalidArgument { .. } => StatusCode::InvalidArgs,
            Self::InvariantViolation { .. } => StatusCode::Internal,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
