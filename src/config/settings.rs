use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use scorerank_error::SettingsError;
use serde::{Deserialize, Serialize};

use crate::{
    database::{DEFAULT_MAX_ENTRIES, MAX_NODES},
    logging::LoggingConfig,
};

/// Префикс переменных окружения (`SCORERANK_MAX_ENTRIES`,
/// `SCORERANK_LOGGING__LEVEL`).
pub const ENV_PREFIX: &str = "SCORERANK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Максимальное число клиентов в рейтинге.
    pub max_entries: usize,
    pub logging: LoggingConfig,
}

fn load_error(e: ConfigError) -> SettingsError {
    SettingsError::Load {
        reason: e.to_string(),
    }
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем TOML-файл (если
    /// указан), затем переменные окружения.
    ///
    /// Значения не проверяются: вызывающий сначала накладывает флаги CLI, а
    /// потом вызывает [`Settings::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            // Значения по умолчанию
            .set_default("max_entries", DEFAULT_MAX_ENTRIES as u64)
            .map_err(load_error)?
            .set_default("logging.level", "info")
            .map_err(load_error)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(load_error)?;

        cfg.try_deserialize().map_err(load_error)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_entries == 0 {
            return Err(SettingsError::Invalid {
                field: "max_entries".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if self.max_entries > MAX_NODES {
            return Err(SettingsError::Invalid {
                field: "max_entries".to_string(),
                reason: format!("must not exceed {MAX_NODES}"),
            });
        }

        self.logging.validate()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            logging: LoggingConfig::default(),
        }
    }
}
