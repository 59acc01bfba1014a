use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Откуда взят действующий фильтр.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// Переменная `RUST_LOG`.
    Env,
    /// Поле `logging.level`.
    Config,
    /// Директива конфигурации не разобралась, используется `info`.
    Fallback,
}

/// Фильтр событий: `RUST_LOG`, затем директива из конфигурации, затем `info`.
pub fn build_filter_from_config(config: &LoggingConfig) -> (EnvFilter, FilterSource) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, FilterSource::Env);
    }

    let directive = config.build_filter_directive();
    match EnvFilter::try_new(&directive) {
        Ok(filter) => (filter, FilterSource::Config),
        Err(_) => (EnvFilter::new("info"), FilterSource::Fallback),
    }
}
