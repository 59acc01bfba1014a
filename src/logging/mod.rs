pub mod config;
mod filters;
mod formatter;

pub use config::{ConsoleConfig, LogFormat, LoggingConfig};
pub use filters::FilterSource;
use scorerank_error::{GenericError, ScoreRankResult, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Устанавливает глобальный subscriber: фильтр плюс консольный слой в stderr.
///
/// Повторный вызов в том же процессе вернёт ошибку.
pub fn init_logging(config: &LoggingConfig) -> ScoreRankResult<()> {
    config.validate()?;

    let (env_filter, source) = filters::build_filter_from_config(config);
    let console_layer = formatter::build_formatter_from_config(config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| GenericError::new(StatusCode::Internal, e.to_string()))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        filter_source = ?source,
        format = %config.console_format(),
        "Logging system initialized"
    );

    Ok(())
}
