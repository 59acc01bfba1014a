//! Индекс идентичности: `customer_id` → запись о счёте.
//!
//! Единственный владелец [`ScoreRecord`]. Порядком не занимается, это работа
//! skip list.

use ahash::AHashMap;

use super::{CustomerId, ScoreRecord};

#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    records: AHashMap<CustomerId, ScoreRecord>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ищет запись клиента, O(1) в среднем.
    pub fn find(
        &self,
        customer_id: CustomerId,
    ) -> Option<&ScoreRecord> {
        self.records.get(&customer_id)
    }

    pub fn find_mut(
        &mut self,
        customer_id: CustomerId,
    ) -> Option<&mut ScoreRecord> {
        self.records.get_mut(&customer_id)
    }

    /// Вставляет запись, возвращая предыдущую, если она была.
    pub fn insert(
        &mut self,
        record: ScoreRecord,
    ) -> Option<ScoreRecord> {
        self.records.insert(record.customer_id, record)
    }

    /// Удаляет запись. Вызывается только владеющим агрегатом.
    pub fn remove(
        &mut self,
        customer_id: CustomerId,
    ) -> Option<ScoreRecord> {
        self.records.remove(&customer_id)
    }

    pub fn contains(
        &self,
        customer_id: CustomerId,
    ) -> bool {
        self.records.contains_key(&customer_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Итератор по записям в произвольном порядке.
    pub fn iter(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.values()
    }
}
