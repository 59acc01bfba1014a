use rust_decimal::Decimal;
use scorerank_error::{ErrorExt, LeaderboardError, LogLevel, StackError, StatusCode};
use tracing::{debug, error, info, warn};

use super::{ApiResponse, CustomerRank, Reply};
use crate::database::{CustomerId, RankedScoreIndex, Score};

/// Допустимый модуль изменения счёта за один запрос.
pub const MAX_SCORE_DELTA: Decimal = Decimal::ONE_THOUSAND;

const INVALID_PARAMETERS: &str = "Invalid parameters.";

/// Операции над рейтингом с проверкой параметров и конвертом ответа.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardService {
    index: RankedScoreIndex,
}

/// Накопитель ошибок валидации одного запроса.
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check(
        &mut self,
        ok: bool,
        message: &str,
    ) {
        if !ok {
            self.0.push(message.to_string());
        }
    }

    fn into_reply<T>(
        self,
        operation: &str,
    ) -> Option<Reply<T>> {
        if self.0.is_empty() {
            return None;
        }

        warn!(operation, errors = %self.0.join(", "), "validation failed");

        let status = LeaderboardError::InvalidArgument {
            errors: self.0.clone(),
        }
        .status_code()
        .http_status();

        Some(Reply::new(
            status,
            ApiResponse::failure(INVALID_PARAMETERS, self.0),
        ))
    }
}

fn failure<T>(
    operation: &str,
    err: impl Into<StackError>,
) -> Reply<T> {
    let err = err.into();

    match err.log_level() {
        LogLevel::Error => error!(operation, error = %err, "operation failed"),
        LogLevel::Warn => warn!(operation, error = %err, "operation rejected"),
        _ => debug!(operation, error = %err, "operation rejected"),
    }

    let message = err.client_message();
    Reply::new(
        err.status_code().http_status(),
        ApiResponse::failure(message.clone(), vec![message]),
    )
}

fn success<T>(
    data: Option<T>,
    message: impl Into<String>,
) -> Reply<T> {
    Reply::new(
        StatusCode::Success.http_status(),
        ApiResponse::ok(data, message),
    )
}

impl LeaderboardService {
    pub fn new(index: RankedScoreIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &RankedScoreIndex {
        &self.index
    }

    /// Изменяет счёт клиента (создавая его при необходимости).
    ///
    /// `data` успешного ответа содержит новый счёт.
    pub fn update_score(
        &self,
        customer_id: CustomerId,
        delta: Score,
    ) -> Reply<Score> {
        let mut violations = Violations::default();
        violations.check(customer_id > 0, "Customer ID must be a positive integer.");
        violations.check(
            (-MAX_SCORE_DELTA..=MAX_SCORE_DELTA).contains(&delta),
            "Score must be between -1000 and 1000.",
        );
        if let Some(reply) = violations.into_reply("update_score") {
            return reply;
        }

        match self.index.upsert(customer_id, delta) {
            Ok(score) => {
                info!(customer_id, %delta, %score, "customer score updated");
                success(
                    Some(score),
                    format!("Customer {customer_id} score updated successfully"),
                )
            }
            Err(e) => failure("update_score", e),
        }
    }

    /// Клиенты с рангами `start..=end`.
    pub fn customers_by_rank(
        &self,
        start: i64,
        end: i64,
    ) -> Reply<Vec<CustomerRank>> {
        let mut violations = Violations::default();
        violations.check(start >= 1, "Start rank must be a positive integer.");
        violations.check(end >= 1, "End rank must be a positive integer.");
        violations.check(start <= end, "Start rank cannot be greater than end rank.");
        if let Some(reply) = violations.into_reply("customers_by_rank") {
            return reply;
        }

        match self.index.range(to_rank(start), to_rank(end)) {
            Ok(entries) => success(
                Some(entries.into_iter().map(CustomerRank::from).collect()),
                "Customers retrieved successfully",
            ),
            Err(e) => failure("customers_by_rank", e),
        }
    }

    /// Клиент и его соседи. Неизвестный клиент даёт пустой список.
    pub fn customer_with_neighbors(
        &self,
        customer_id: CustomerId,
        high: Option<i64>,
        low: Option<i64>,
    ) -> Reply<Vec<CustomerRank>> {
        let high = high.unwrap_or(0);
        let low = low.unwrap_or(0);

        let mut violations = Violations::default();
        violations.check(customer_id > 0, "Customer ID must be a positive integer.");
        violations.check(high >= 0, "High parameter must be non-negative.");
        violations.check(low >= 0, "Low parameter must be non-negative.");
        if let Some(reply) = violations.into_reply("customer_with_neighbors") {
            return reply;
        }

        match self.index.neighbors(customer_id, to_rank(high), to_rank(low)) {
            Ok(entries) => success(
                Some(entries.into_iter().map(CustomerRank::from).collect()),
                "Customer and neighbors retrieved successfully",
            ),
            Err(e) => failure("customer_with_neighbors", e),
        }
    }

    /// Ранг и счёт одного клиента; `data == None`, если клиент неизвестен.
    pub fn customer_rank(
        &self,
        customer_id: CustomerId,
    ) -> Reply<CustomerRank> {
        let mut violations = Violations::default();
        violations.check(customer_id > 0, "Customer ID must be a positive integer.");
        if let Some(reply) = violations.into_reply("customer_rank") {
            return reply;
        }

        match self.index.neighbors(customer_id, 0, 0) {
            Ok(entries) => match entries.into_iter().next() {
                Some(entry) => success(
                    Some(CustomerRank::from(entry)),
                    "Customer rank retrieved successfully",
                ),
                None => success(None, format!("Customer {customer_id} not found")),
            },
            Err(e) => failure("customer_rank", e),
        }
    }
}

/// Проверенное неотрицательное значение как ранг или смещение.
fn to_rank(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
