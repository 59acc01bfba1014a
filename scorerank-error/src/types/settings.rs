use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки загрузки и проверки настроек.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Источник конфигурации не удалось прочитать или разобрать.
    #[error("Failed to load settings: {reason}")]
    Load { reason: String },

    /// Значение поля недопустимо.
    #[error("Invalid setting '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ErrorExt for SettingsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Load { .. } => StatusCode::ConfigUnavailable,
            Self::Invalid { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
