//! Счёт клиента и порядок ранжирования.
//!
//! Ранг 1 получает наибольший счёт; при равенстве счетов выше стоит клиент с
//! меньшим идентификатором. Этот порядок задаётся реализацией [`Ord`] для
//! [`RankKey`] и используется skip list'ом напрямую.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Идентификатор клиента (положительный в рабочих данных).
pub type CustomerId = i64;

/// Точный десятичный счёт. Двоичная плавающая точка не используется:
/// равенство счетов решает порядок при tie-break.
pub type Score = Decimal;

/// Запись о счёте клиента. Владелец: [`IdentityIndex`](super::IdentityIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub customer_id: CustomerId,
    pub score: Score,
}

/// Ключ ранжирования, хранимый в узле skip list.
///
/// `a < b` означает, что `a` стоит выше в рейтинге.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankKey {
    pub score: Score,
    pub customer_id: CustomerId,
}

/// Строка результата запроса: клиент, его счёт и текущий ранг.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub customer_id: CustomerId,
    pub score: Score,
    pub rank: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ScoreRecord {
    pub fn new(
        customer_id: CustomerId,
        score: Score,
    ) -> Self {
        Self { customer_id, score }
    }

    /// Ключ, под которым запись стоит в skip list.
    #[inline]
    pub fn key(&self) -> RankKey {
        RankKey::new(self.score, self.customer_id)
    }
}

impl RankKey {
    pub fn new(
        score: Score,
        customer_id: CustomerId,
    ) -> Self {
        Self { score, customer_id }
    }

    /// Стоит ли `self` строго выше `other` в рейтинге.
    #[inline]
    pub fn precedes(
        &self,
        other: &Self,
    ) -> bool {
        self < other
    }
}

impl RankedEntry {
    pub fn new(
        key: &RankKey,
        rank: usize,
    ) -> Self {
        Self {
            customer_id: key.customer_id,
            score: key.score,
            rank,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Ord for RankKey {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        // Счёт по убыванию, затем id по возрастанию.
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.customer_id.cmp(&other.customer_id))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<ScoreRecord> for RankKey {
    fn from(record: ScoreRecord) -> Self {
        record.key()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn key(
        score: i64,
        id: CustomerId,
    ) -> RankKey {
        RankKey::new(Decimal::from(score), id)
    }

    #[rstest]
    #[case(key(300, 8), key(200, 2))]
    #[case(key(50, 4), key(50, 5))]
    #[case(key(0, 10), key(-100, 6))]
    #[case(key(-1, 1), key(-2, 1))]
    fn test_higher_score_or_lower_id_precedes(
        #[case] better: RankKey,
        #[case] worse: RankKey,
    ) {
        assert!(better.precedes(&worse));
        assert!(!worse.precedes(&better));
        assert_eq!(better.cmp(&worse), Ordering::Less);
    }

    #[test]
    fn test_equal_only_for_same_customer_and_score() {
        assert_eq!(key(10, 1).cmp(&key(10, 1)), Ordering::Equal);
        assert_ne!(key(10, 1), key(10, 2));
    }

    /// Тест проверяет, что масштаб десятичного числа не влияет на порядок:
    /// 1.50 и 1.5 равны, и решает идентификатор.
    #[test]
    fn test_decimal_scale_does_not_affect_order() {
        let a = RankKey::new("1.50".parse().unwrap(), 2);
        let b = RankKey::new("1.5".parse().unwrap(), 3);

        assert!(a.precedes(&b));
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_sorting_matches_ranking_rule() {
        let mut keys = vec![key(100, 1), key(50, 5), key(200, 2), key(50, 4), key(-100, 6)];
        keys.sort();

        let ids: Vec<_> = keys.iter().map(|k| k.customer_id).collect();
        assert_eq!(ids, vec![2, 1, 4, 5, 6]);
    }

    #[test]
    fn test_record_key_and_entry() {
        let record = ScoreRecord::new(7, Decimal::from(75));
        let entry = RankedEntry::new(&record.key(), 5);

        assert_eq!(RankKey::from(record), key(75, 7));
        assert_eq!(entry.customer_id, 7);
        assert_eq!(entry.score, Decimal::from(75));
        assert_eq!(entry.rank, 5);
    }
}
