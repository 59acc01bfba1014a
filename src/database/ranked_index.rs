use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use scorerank_error::LeaderboardError;
use tracing::{debug, error, trace};

use super::{
    CustomerId, IdentityIndex, RankKey, RankedEntry, Score, ScoreRecord, SkipList,
    SkipListStatistics, ValidationError,
};
use crate::validate;

/// Ёмкость по умолчанию.
pub const DEFAULT_MAX_ENTRIES: usize = 1_000_000;

/// Ранжированный индекс счетов: индекс идентичности + skip list под одним
/// `RwLock`.
///
/// Дешёвый `Clone`: все клоны разделяют одно состояние, так что каждому
/// потоку можно отдать свой дескриптор.
#[derive(Debug, Clone)]
pub struct RankedScoreIndex {
    inner: Arc<RwLock<Leaderboard>>,
    metrics: Arc<ContentionMetrics>,
}

/// Состояние, защищаемое блокировкой. Методы не синхронизированы.
#[derive(Debug)]
struct Leaderboard {
    identity: IdentityIndex,
    ranking: SkipList<RankKey>,
    max_entries: usize,
}

#[derive(Debug, Default)]
pub struct ContentionMetrics {
    pub read_locks: AtomicUsize,
    pub write_locks: AtomicUsize,
    pub total_wait_time_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionSnapshot {
    pub read_locks: usize,
    pub write_locks: usize,
    pub total_wait_time_ns: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

fn invariant_violation(message: impl Into<String>) -> LeaderboardError {
    let message = message.into();
    error!(%message, "ranked index invariant violated");
    LeaderboardError::InvariantViolation { message }
}

impl Leaderboard {
    fn new(
        max_entries: usize,
        ranking: SkipList<RankKey>,
    ) -> Self {
        Self {
            identity: IdentityIndex::new(),
            ranking,
            max_entries,
        }
    }

    fn upsert(
        &mut self,
        customer_id: CustomerId,
        delta: Score,
    ) -> Result<Score, LeaderboardError> {
        let Some(record) = self.identity.find_mut(customer_id) else {
            return self.insert_new(customer_id, delta);
        };

        let old_key = record.key();
        let new_score = record
            .score
            .checked_add(delta)
            .ok_or(LeaderboardError::ScoreOverflow { customer_id })?;

        if self.ranking.remove(&old_key).is_none() {
            return Err(invariant_violation(format!(
                "customer {customer_id} is indexed but missing from the ranking"
            )));
        }

        // Ключ изменился: снятый узел возвращается на новую позицию.
        self.ranking
            .insert(RankKey::new(new_score, customer_id))
            .map_err(|e| invariant_violation(e.to_string()))?;
        record.score = new_score;

        trace!(customer_id, %delta, score = %new_score, "score updated");
        Ok(new_score)
    }

    fn insert_new(
        &mut self,
        customer_id: CustomerId,
        delta: Score,
    ) -> Result<Score, LeaderboardError> {
        if self.identity.len() >= self.max_entries {
            debug!(
                customer_id,
                capacity = self.max_entries,
                "leaderboard full, new customer rejected"
            );
            return Err(LeaderboardError::CapacityExceeded {
                capacity: self.max_entries,
            });
        }

        let record = ScoreRecord::new(customer_id, delta);

        self.ranking
            .insert(record.key())
            .map_err(|e| invariant_violation(e.to_string()))?;
        self.identity.insert(record);

        trace!(customer_id, score = %record.score, "customer added");
        Ok(record.score)
    }

    fn rank(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<usize>, LeaderboardError> {
        let Some(record) = self.identity.find(customer_id) else {
            return Ok(None);
        };

        match self.ranking.rank_of(&record.key()) {
            Some(rank) => Ok(Some(rank)),
            None => Err(invariant_violation(format!(
                "customer {customer_id} is indexed but has no rank"
            ))),
        }
    }

    fn range(
        &self,
        start: usize,
        end: usize,
    ) -> Vec<RankedEntry> {
        self.ranking
            .range(start, end)
            .map(|(rank, key)| RankedEntry::new(key, rank))
            .collect()
    }

    fn neighbors(
        &self,
        customer_id: CustomerId,
        high: usize,
        low: usize,
    ) -> Result<Vec<RankedEntry>, LeaderboardError> {
        let Some(rank) = self.rank(customer_id)? else {
            return Ok(Vec::new());
        };

        let start = rank.saturating_sub(high).max(1);
        let end = rank.saturating_add(low);

        Ok(self.range(start, end))
    }

    fn validate_invariants(&self) -> Result<(), ValidationError> {
        self.ranking.validate_invariants()?;

        validate!(
            self.identity.len() == self.ranking.len(),
            ValidationError::IndexMismatch {
                message: format!(
                    "{} records indexed, {} ranked",
                    self.identity.len(),
                    self.ranking.len()
                )
            }
        );

        validate!(
            self.identity.len() <= self.max_entries,
            ValidationError::IndexMismatch {
                message: format!(
                    "{} records exceed capacity {}",
                    self.identity.len(),
                    self.max_entries
                )
            }
        );

        for record in self.identity.iter() {
            validate!(
                self.ranking.contains(&record.key()),
                ValidationError::IndexMismatch {
                    message: format!("customer {} is not ranked", record.customer_id)
                }
            );
        }

        Ok(())
    }
}

impl RankedScoreIndex {
    /// Пустой индекс с заданной ёмкостью.
    pub fn new(max_entries: usize) -> Self {
        Self::from_state(Leaderboard::new(max_entries, SkipList::new()))
    }

    /// Индекс с детерминированным генератором уровней (тесты, бенчмарки).
    pub fn with_seed(
        max_entries: usize,
        seed: u64,
    ) -> Self {
        Self::from_state(Leaderboard::new(max_entries, SkipList::with_seed(seed)))
    }

    fn from_state(state: Leaderboard) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
            metrics: Arc::new(ContentionMetrics::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Leaderboard> {
        let start = Instant::now();
        let guard = self.inner.read();
        self.metrics.inc_read(start.elapsed().as_nanos() as u64);
        guard
    }

    fn write(&self) -> RwLockWriteGuard<'_, Leaderboard> {
        let start = Instant::now();
        let guard = self.inner.write();
        self.metrics.inc_write(start.elapsed().as_nanos() as u64);
        guard
    }

    /// Прибавляет `delta` к счёту клиента и возвращает новый счёт.
    ///
    /// Неизвестный клиент создаётся со счётом 0 (если есть место). Проверка
    /// ёмкости выполняется под блокировкой записи.
    pub fn upsert(
        &self,
        customer_id: CustomerId,
        delta: Score,
    ) -> Result<Score, LeaderboardError> {
        self.write().upsert(customer_id, delta)
    }

    /// Текущий ранг клиента; `Ok(None)`, если клиент неизвестен.
    pub fn rank(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<usize>, LeaderboardError> {
        self.read().rank(customer_id)
    }

    /// Записи с рангами `start..=end`. Неподходящие границы дают пустой
    /// результат.
    pub fn range(
        &self,
        start: usize,
        end: usize,
    ) -> Result<Vec<RankedEntry>, LeaderboardError> {
        Ok(self.read().range(start, end))
    }

    /// Клиент вместе с `high` записями выше и `low` ниже.
    ///
    /// Ранг и отрезок читаются в одной критической секции.
    pub fn neighbors(
        &self,
        customer_id: CustomerId,
        high: usize,
        low: usize,
    ) -> Result<Vec<RankedEntry>, LeaderboardError> {
        self.read().neighbors(customer_id, high, low)
    }

    pub fn score(
        &self,
        customer_id: CustomerId,
    ) -> Option<Score> {
        self.read().identity.find(customer_id).map(|r| r.score)
    }

    pub fn len(&self) -> usize {
        self.read().identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.read().max_entries
    }

    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        self.read().validate_invariants()
    }

    pub fn statistics(&self) -> SkipListStatistics {
        self.read().ranking.statistics()
    }

    pub fn metrics(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            read_locks: self.metrics.read_locks.load(Ordering::Relaxed),
            write_locks: self.metrics.write_locks.load(Ordering::Relaxed),
            total_wait_time_ns: self.metrics.total_wait_time_ns.load(Ordering::Relaxed),
        }
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

impl ContentionSnapshot {
    pub fn total_locks(&self) -> usize {
        self.read_locks + self.write_locks
    }

    pub fn average_wait_time_ns(&self) -> f64 {
        let total_locks = self.total_locks();

        if total_locks == 0 {
            0.0
        } else {
            self.total_wait_time_ns as f64 / total_locks as f64
        }
    }

    pub fn read_write_ratio(&self) -> f64 {
        if self.write_locks == 0 {
            f64::INFINITY
        } else {
            self.read_locks as f64 / self.write_locks as f64
        }
    }

    pub fn avg_wait_time_us(&self) -> f64 {
        self.average_wait_time_ns() / 1000.0
    }

    pub fn average_wait_duration(&self) -> Duration {
        Duration::from_nanos(self.average_wait_time_ns() as u64)
    }

    pub fn format_report(&self) -> String {
        format!(
            "Contention Metrics:\n\
                 Read locks: {}\n\
                 Write locks: {}\n\
                 R/W ratio: {:.2}\n\
                 Avg wait time: {:.2} µs\n",
            self.read_locks,
            self.write_locks,
            self.read_write_ratio(),
            self.avg_wait_time_us(),
        )
    }
}

impl ContentionMetrics {
    pub fn reset(&self) {
        self.read_locks.store(0, Ordering::Relaxed);
        self.write_locks.store(0, Ordering::Relaxed);
        self.total_wait_time_ns.store(0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_read(
        &self,
        duration_ns: u64,
    ) {
        self.read_locks.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_ns
            .fetch_add(duration_ns, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_write(
        &self,
        duration_ns: u64,
    ) {
        self.write_locks.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_ns
            .fetch_add(duration_ns, Ordering::Relaxed);
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для RankedScoreIndex
////////////////////////////////////////////////////////////////////////////////

impl Default for RankedScoreIndex {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn dec(v: i64) -> Score {
        Score::from(v)
    }

    fn ids(entries: &[RankedEntry]) -> Vec<CustomerId> {
        entries.iter().map(|e| e.customer_id).collect()
    }

    #[test]
    fn test_upsert_creates_and_accumulates() {
        let index = RankedScoreIndex::with_seed(10, 1);

        assert_eq!(index.upsert(1, dec(100)).unwrap(), dec(100));
        assert_eq!(index.upsert(1, dec(-30)).unwrap(), dec(70));
        assert_eq!(index.score(1), Some(dec(70)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_zero_delta_creates_customer_with_zero_score() {
        let index = RankedScoreIndex::with_seed(10, 1);
        index.upsert(2, dec(5)).unwrap();

        assert_eq!(index.upsert(1, Score::ZERO).unwrap(), Score::ZERO);
        assert_eq!(index.rank(1).unwrap(), Some(2));
        index.validate_invariants().unwrap();
    }

    #[test]
    fn test_update_repositions_customer() {
        let index = RankedScoreIndex::with_seed(10, 3);
        index.upsert(1, dec(10)).unwrap();
        index.upsert(2, dec(20)).unwrap();
        index.upsert(3, dec(30)).unwrap();

        assert_eq!(index.rank(1).unwrap(), Some(3));

        index.upsert(1, dec(25)).unwrap();

        assert_eq!(index.rank(1).unwrap(), Some(1));
        assert_eq!(index.rank(3).unwrap(), Some(2));
        assert_eq!(index.rank(2).unwrap(), Some(3));
        index.validate_invariants().unwrap();
    }

    #[test]
    fn test_capacity_guard_rejects_only_new_customers() {
        let index = RankedScoreIndex::with_seed(2, 1);
        index.upsert(1, dec(1)).unwrap();
        index.upsert(2, dec(2)).unwrap();

        let err = index.upsert(3, dec(3)).unwrap_err();
        assert_eq!(err, LeaderboardError::CapacityExceeded { capacity: 2 });
        assert_eq!(index.rank(3).unwrap(), None);

        // Существующий клиент обновляется даже при заполненном индексе.
        assert_eq!(index.upsert(1, dec(5)).unwrap(), dec(6));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_overflow_leaves_state_untouched() {
        let index = RankedScoreIndex::with_seed(10, 1);
        index.upsert(1, Score::MAX).unwrap();

        let err = index.upsert(1, dec(1)).unwrap_err();

        assert_eq!(err, LeaderboardError::ScoreOverflow { customer_id: 1 });
        assert_eq!(index.score(1), Some(Score::MAX));
        index.validate_invariants().unwrap();
    }

    #[test]
    fn test_unknown_customer_is_not_found() {
        let index = RankedScoreIndex::default();

        assert_eq!(index.rank(42).unwrap(), None);
        assert!(index.neighbors(42, 5, 5).unwrap().is_empty());
        assert_eq!(index.score(42), None);
        assert_eq!(index.capacity(), DEFAULT_MAX_ENTRIES);
        assert!(index.is_empty());
    }

    #[test]
    fn test_neighbors_clamp_at_both_ends() {
        let index = RankedScoreIndex::with_seed(10, 5);
        for id in 1..=5 {
            index.upsert(id, dec(100 - id)).unwrap();
        }

        let top = index.neighbors(1, 3, 1).unwrap();
        assert_eq!(ids(&top), vec![1, 2]);

        let bottom = index.neighbors(5, 1, 10).unwrap();
        assert_eq!(ids(&bottom), vec![4, 5]);

        let alone = index.neighbors(3, 0, 0).unwrap();
        assert_eq!(alone.len(), 1);
        assert_eq!(alone[0].rank, 3);

        let everything = index.neighbors(3, usize::MAX, usize::MAX).unwrap();
        assert_eq!(everything.len(), 5);
    }

    #[test]
    fn test_metrics_count_locks() {
        let index = RankedScoreIndex::with_seed(10, 1);

        index.upsert(1, dec(1)).unwrap();
        index.rank(1).unwrap();
        index.range(1, 10).unwrap();

        let metrics = index.metrics();
        assert_eq!(metrics.write_locks, 1);
        assert_eq!(metrics.read_locks, 2);
        assert!(metrics.format_report().contains("Write locks: 1"));

        index.reset_metrics();
        assert_eq!(index.metrics().total_locks(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let index = RankedScoreIndex::with_seed(100, 1);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let index = index.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        index.upsert(t * 10 + i + 1, dec(i)).unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(index.len(), 40);
        index.validate_invariants().unwrap();
    }

    #[test]
    fn test_statistics_reflect_population() {
        let index = RankedScoreIndex::with_seed(1000, 9);
        for id in 1..=200 {
            index.upsert(id, dec(id % 17)).unwrap();
        }

        let stats = index.statistics();
        assert_eq!(stats.node_count, 200);
        assert_eq!(stats.free_slots, 0);
    }
}
