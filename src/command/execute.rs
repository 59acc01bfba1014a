use scorerank_error::{GenericError, ScoreRankResult, StackError, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::{parse_line, Command};
use crate::service::{ApiResponse, LeaderboardService};

/// Результат обработки строки ввода.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Строка пустая или комментарий.
    Skip,
    /// JSON-ответ; обработка продолжается.
    Reply(String),
    /// JSON-ответ на `QUIT`; цикл должен завершиться.
    Quit(String),
}

/// Сводка по индексу для команды `STATS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub capacity: usize,
    pub active_levels: usize,
    pub average_height: f64,
    pub free_slots: usize,
    pub read_locks: usize,
    pub write_locks: usize,
    pub avg_lock_wait_us: f64,
}

fn render<T: Serialize>(body: &ApiResponse<T>) -> ScoreRankResult<String> {
    serde_json::to_string(body)
        .map_err(|e| StackError::new(GenericError::new(StatusCode::Internal, e.to_string())))
}

fn render_error(err: &StackError) -> ScoreRankResult<String> {
    let message = err.client_message();
    render(&ApiResponse::<()>::failure(message.clone(), vec![message]))
}

fn stats(service: &LeaderboardService) -> IndexStats {
    let index = service.index();
    let structure = index.statistics();
    let metrics = index.metrics();

    IndexStats {
        entries: structure.node_count,
        capacity: index.capacity(),
        active_levels: structure.current_max_level,
        average_height: structure.average_level,
        free_slots: structure.free_slots,
        read_locks: metrics.read_locks,
        write_locks: metrics.write_locks,
        avg_lock_wait_us: metrics.avg_wait_time_us(),
    }
}

/// Выполняет разобранную команду и сериализует конверт ответа.
pub fn execute(
    service: &LeaderboardService,
    command: &Command,
) -> ScoreRankResult<String> {
    match command {
        Command::Upsert { customer_id, delta } => {
            render(&service.update_score(*customer_id, *delta).into_body())
        }
        Command::Rank { customer_id } => render(&service.customer_rank(*customer_id).into_body()),
        Command::Range { start, end } => {
            render(&service.customers_by_rank(*start, *end).into_body())
        }
        Command::Neighbors {
            customer_id,
            high,
            low,
        } => render(
            &service
                .customer_with_neighbors(*customer_id, *high, *low)
                .into_body(),
        ),
        Command::Stats => render(&ApiResponse::ok(
            Some(stats(service)),
            "Statistics retrieved successfully",
        )),
        Command::Quit => render(&ApiResponse::<()>::ok(None, "Bye")),
    }
}

/// Разбирает и выполняет одну строку. Ошибка разбора становится
/// конвертом-отказом, а не ошибкой функции.
pub fn handle_line(
    service: &LeaderboardService,
    line: &str,
) -> ScoreRankResult<Step> {
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(Step::Skip),
        Err(err) => {
            debug!(line, error = %err, "rejected input line");
            return Ok(Step::Reply(render_error(&err)?));
        }
    };

    let json = execute(service, &command)?;

    Ok(match command {
        Command::Quit => Step::Quit(json),
        _ => Step::Reply(json),
    })
}
