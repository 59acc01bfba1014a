use std::{any::Any, error::Error};

use crate::{LogLevel, StatusCode};

/// Общий интерфейс ошибок ScoreRank (object-safe).
///
/// Каждая ошибка знает свой [`StatusCode`]; из него выводятся HTTP-статус,
/// уровень логирования и то, что можно показать клиенту.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// По умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Для downcast к конкретному типу.
    fn as_any(&self) -> &dyn Any;

    /// Внутренние ошибки скрываются за `"Internal server error"`.
    fn client_message(&self) -> String {
        let code = self.status_code();
        if code.is_critical() || code == StatusCode::Unknown {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    fn log_level(&self) -> LogLevel {
        self.status_code().log_level()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug)]
    struct Opaque;

    impl fmt::Display for Opaque {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "arena slot 3 is dangling")
        }
    }

    impl Error for Opaque {}

    impl ErrorExt for Opaque {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct BadRange(u32);

    impl fmt::Display for BadRange {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "bad range {}", self.0)
        }
    }

    impl Error for BadRange {}

    impl ErrorExt for BadRange {
        fn status_code(&self) -> StatusCode {
            StatusCode::InvalidArgs
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_defaults_hide_internal_details() {
        let e = Opaque;
        assert_eq!(e.status_code(), StatusCode::Internal);
        assert_eq!(e.client_message(), "Internal server error");
        assert_eq!(e.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_client_error_is_shown_as_is() {
        let e = BadRange(7);
        assert_eq!(e.client_message(), "bad range 7");
        assert_eq!(e.log_level(), LogLevel::Info);
        assert_eq!(e.as_any().downcast_ref::<BadRange>().map(|b| b.0), Some(7));
    }
}
