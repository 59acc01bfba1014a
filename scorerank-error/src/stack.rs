use std::{fmt, panic::Location, sync::Arc};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{ErrorExt, LogLevel, StatusCode};

/// Ошибка с цепочкой пометок, накопленных при подъёме по стеку вызовов.
///
/// Корневая ошибка хранится за `Arc`, поэтому клонирование дешёвое.
#[derive(Clone)]
pub struct StackError {
    root: Arc<dyn ErrorExt>,
    trail: Vec<Frame>,
}

/// Одна пометка: текст и место, где она добавлена.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub note: String,
    pub location: &'static Location<'static>,
}

/// Тело ошибки для машинно-читаемого ответа.
#[cfg(feature = "serde")]
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u32,
    pub status: u16,
    pub message: String,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StackError {
    pub fn new<E: ErrorExt>(err: E) -> Self {
        Self {
            root: Arc::new(err),
            trail: Vec::new(),
        }
    }

    /// Добавляет пометку; место вызова запоминается.
    #[track_caller]
    pub fn context(
        mut self,
        note: impl Into<String>,
    ) -> Self {
        self.trail.push(Frame {
            note: note.into(),
            location: Location::caller(),
        });
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.root.status_code()
    }

    /// Сообщение, которое можно показать клиенту.
    pub fn client_message(&self) -> String {
        self.root.client_message()
    }

    pub fn log_level(&self) -> LogLevel {
        self.root.log_level()
    }

    pub fn is_critical(&self) -> bool {
        self.status_code().is_critical()
    }

    pub fn root(&self) -> &dyn ErrorExt {
        self.root.as_ref()
    }

    /// Пометки в порядке добавления (от внутренней к внешней).
    pub fn trail(&self) -> &[Frame] {
        &self.trail
    }

    pub fn downcast_ref<T: ErrorExt>(&self) -> Option<&T> {
        self.root.as_any().downcast_ref::<T>()
    }

    #[cfg(feature = "serde")]
    pub fn to_body(&self) -> ErrorBody {
        let code = self.status_code();
        ErrorBody {
            code: code.code(),
            status: code.http_status(),
            message: self.client_message(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StackError
////////////////////////////////////////////////////////////////////////////////

impl fmt::Debug for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let trail: Vec<String> = self
            .trail
            .iter()
            .map(|frame| format!("{} at {}", frame.note, frame.location))
            .collect();

        f.debug_struct("StackError")
            .field("root", &self.root.to_string())
            .field("status_code", &self.status_code())
            .field("trail", &trail)
            .finish()
    }
}

impl fmt::Display for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        // Внешняя пометка первой: "upsert: apply delta: <root>".
        for frame in self.trail.iter().rev() {
            write!(f, "{}: ", frame.note)?;
        }
        write!(f, "{}", self.root)
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.root.as_ref())
    }
}

impl<E: ErrorExt> From<E> for StackError {
    fn from(e: E) -> Self {
        StackError::new(e)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
