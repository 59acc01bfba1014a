//! Конверт ответа сервисного слоя и строки рейтинга.

use serde::{Deserialize, Serialize};

use crate::database::{CustomerId, RankedEntry, Score};

/// Общий конверт ответа для всех операций.
///
/// `data` заполняется только при успехе, `errors` только при ошибке.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
}

/// Ответ вместе с HTTP-подобным статусом.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub status: u16,
    pub body: ApiResponse<T>,
}

/// Счёт клиента в ответе.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerScore {
    pub customer_id: CustomerId,
    pub score: Score,
}

/// Строка рейтинга: `{ "customer_score": {...}, "rank": n }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRank {
    pub customer_score: CustomerScore,
    pub rank: usize,
}

impl<T> ApiResponse<T> {
    pub fn ok(
        data: Option<T>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
            errors: None,
        }
    }

    pub fn failure(
        message: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: Some(errors),
        }
    }
}

impl<T> Reply<T> {
    pub fn new(
        status: u16,
        body: ApiResponse<T>,
    ) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.body.success
    }

    pub fn into_body(self) -> ApiResponse<T> {
        self.body
    }
}

impl From<RankedEntry> for CustomerRank {
    fn from(entry: RankedEntry) -> Self {
        Self {
            customer_score: CustomerScore {
                customer_id: entry.customer_id,
                score: entry.score,
            },
            rank: entry.rank,
        }
    }
}
