/// Макрос для валидации условий с возвратом ошибки.
#[macro_export]
macro_rules! validate {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Нарушения структурных инвариантов ранжирующего skip list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Высота узла или число активных уровней вне `1..=max_level`
    InvalidLevel { node_level: usize, max_level: usize },
    /// Нарушен порядок сортировки
    SortOrderViolation { message: String },
    /// Длина списка не соответствует реальному кол-ву узлов
    LengthMismatch { expected: usize, actual: usize },
    /// Сумма span'ов на уровне не совпадает с длиной списка
    SpanMismatch {
        level: usize,
        expected: usize,
        actual: usize,
    },
    /// Ключ уже присутствует в списке
    DuplicateKey { message: String },
    /// Учёт слотов арены (живые + свободные) разошёлся
    FreeListCorrupted { message: String },
    /// Арена исчерпала адресуемые слоты
    ArenaExhausted { capacity: usize },
    /// Индекс идентичности и ранжирование разошлись
    IndexMismatch { message: String },
}

/// Статистика структуры SkipList.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipListStatistics {
    /// Количество узлов
    pub node_count: usize,
    /// Распределение по высотам узлов
    pub level_distribution: Vec<usize>,
    /// Число активных уровней
    pub current_max_level: usize,
    /// Максимально возможный уровень
    pub max_possible_level: usize,
    /// Средняя высота узла
    pub average_level: f64,
    /// Слоты арены, ожидающие повторного использования
    pub free_slots: usize,
}

impl SkipListStatistics {
    /// Создает пустую статистику.
    pub fn empty(max_level: usize) -> Self {
        Self {
            node_count: 0,
            level_distribution: vec![0; max_level],
            current_max_level: 1,
            max_possible_level: max_level,
            average_level: 0.0,
            free_slots: 0,
        }
    }

    /// Вычисляет среднюю высоту.
    pub fn compute_average_level(&mut self) {
        if self.node_count == 0 {
            self.average_level = 0.0;
            return;
        }

        let total_levels: usize = self
            .level_distribution
            .iter()
            .enumerate()
            .map(|(level, &count)| (level + 1) * count)
            .sum();

        self.average_level = total_levels as f64 / self.node_count as f64;
    }

    /// Форматирует статистику для вывода.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("Ranked SkipList Statistics:\n");
        report.push_str(&format!("  Total nodes: {}\n", self.node_count));
        report.push_str(&format!("  Free slots: {}\n", self.free_slots));
        report.push_str(&format!(
            "  Active levels: {} of {}\n",
            self.current_max_level, self.max_possible_level
        ));
        report.push_str(&format!("  Average height: {:.2}\n", self.average_level));
        report.push_str("  Height distribution:\n");

        for (level, &count) in self.level_distribution.iter().enumerate() {
            if count > 0 {
                let percentage = (count as f64 / self.node_count as f64) * 100.0;
                report.push_str(&format!(
                    "    Height {}: {} nodes ({:.1}%)\n",
                    level + 1,
                    count,
                    percentage
                ));
            }
        }

        report
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ValidationError::InvalidLevel {
                node_level,
                max_level,
            } => {
                write!(
                    f,
                    "Node level {node_level} is outside of 1..={max_level}"
                )
            }
            ValidationError::SortOrderViolation { message } => {
                write!(f, "Sort order violation: {message}")
            }
            ValidationError::LengthMismatch { expected, actual } => {
                write!(f, "Length mismatch: expected {expected}, got {actual}")
            }
            ValidationError::SpanMismatch {
                level,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Span mismatch on level {level}: expected {expected}, got {actual}"
                )
            }
            ValidationError::DuplicateKey { message } => {
                write!(f, "Duplicate key: {message}")
            }
            ValidationError::FreeListCorrupted { message } => {
                write!(f, "Free list corrupted: {message}")
            }
            ValidationError::ArenaExhausted { capacity } => {
                write!(f, "Node arena exhausted at {capacity} slots")
            }
            ValidationError::IndexMismatch { message } => {
                write!(f, "Index mismatch: {message}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_empty() {
        let stats = SkipListStatistics::empty(32);

        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.current_max_level, 1);
        assert_eq!(stats.level_distribution.len(), 32);
        assert_eq!(stats.average_level, 0.0);
    }

    #[test]
    fn test_statistics_compute_average() {
        let mut stats = SkipListStatistics {
            node_count: 4,
            level_distribution: vec![3, 0, 1, 0],
            current_max_level: 3,
            max_possible_level: 4,
            average_level: 0.0,
            free_slots: 0,
        };

        stats.compute_average_level();
        assert_eq!(stats.average_level, 1.5); // (3*1 + 1*3) / 4
    }

    #[test]
    fn test_report_skips_empty_heights() {
        let mut stats = SkipListStatistics::empty(4);
        stats.node_count = 2;
        stats.level_distribution = vec![2, 0, 0, 0];

        let report = stats.format_report();
        assert!(report.contains("Height 1: 2 nodes (100.0%)"));
        assert!(!report.contains("Height 2"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::SpanMismatch {
            level: 2,
            expected: 10,
            actual: 9,
        };
        assert!(err.to_string().contains("level 2"));

        let err = ValidationError::InvalidLevel {
            node_level: 40,
            max_level: 32,
        };
        assert!(err.to_string().contains("outside of 1..=32"));
    }
}
