use std::{fmt::Debug, num::NonZeroU32};

use super::{SkipListStatistics, ValidationError};
use crate::validate;

/// Максимальный уровень пропускного списка.
pub const MAX_LEVEL: usize = 32;

/// Число адресуемых слотов арены (дескриптор хранит индекс + 1 в `u32`).
pub const MAX_NODES: usize = u32::MAX as usize - 1;

/// Узел поднимается на следующий уровень, когда два младших бита равны нулю
/// (вероятность 1/4).
const PROMOTE_MASK: u32 = 0b11;

/// Дескриптор узла в арене.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeHandle(NonZeroU32);

/// Позиция обхода: голова списка или узел арены.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeHandle),
}

/// Ссылка уровня: следующий узел и число позиций нижнего уровня, которые она
/// перепрыгивает. Для пустой ссылки `span` равен числу узлов после владельца.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Level {
    forward: Option<NodeHandle>,
    span: u32,
}

/// Узел пропускного списка.
#[derive(Debug, Clone)]
struct Node<K> {
    key: K,
    height: usize,
    levels: [Level; MAX_LEVEL],
}

/// Пропускной список с подсчётом рангов.
///
/// Узлы живут в арене (`Vec`) и адресуются дескрипторами; освобождённые
/// слоты попадают в free list и переиспользуются. Каждая ссылка хранит
/// `span`, поэтому ранг ключа и ключ по рангу находятся за O(log n).
/// Ранги начинаются с 1.
#[derive(Debug, Clone)]
pub struct SkipList<K> {
    head: [Level; MAX_LEVEL],
    nodes: Vec<Node<K>>,
    free: Vec<NodeHandle>,
    level: usize,
    length: usize,
    rng: fastrand::Rng,
}

/// Итератор по ключам в порядке ранжирования.
pub struct SkipListIter<'a, K> {
    list: &'a SkipList<K>,
    current: Option<NodeHandle>,
    remaining: usize,
}

/// Итератор по отрезку рангов, выдаёт пары `(rank, &key)`.
pub struct RankRangeIter<'a, K> {
    list: &'a SkipList<K>,
    current: Option<NodeHandle>,
    rank: usize,
    end: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl NodeHandle {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index as u32))
    }

    #[inline]
    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl<K> SkipList<K>
where
    K: Ord + Clone + Debug,
{
    /// Создаёт новый пустой SkipList.
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Создаёт список с детерминированным генератором уровней.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            head: [Level::default(); MAX_LEVEL],
            nodes: Vec::new(),
            free: Vec::new(),
            level: 1,
            length: 0,
            rng,
        }
    }

    /// Генерирует высоту для нового узла: 1 + число успешных повышений.
    #[inline(always)]
    fn random_level(&mut self) -> usize {
        let mut lvl = 1;

        while lvl < MAX_LEVEL && self.rng.u32(..) & PROMOTE_MASK == 0 {
            lvl += 1;
        }

        lvl
    }

    #[inline]
    fn levels(
        &self,
        at: Cursor,
    ) -> &[Level; MAX_LEVEL] {
        match at {
            Cursor::Head => &self.head,
            Cursor::Node(handle) => &self.nodes[handle.index()].levels,
        }
    }

    #[inline]
    fn levels_mut(
        &mut self,
        at: Cursor,
    ) -> &mut [Level; MAX_LEVEL] {
        match at {
            Cursor::Head => &mut self.head,
            Cursor::Node(handle) => &mut self.nodes[handle.index()].levels,
        }
    }

    #[inline]
    fn key_of(
        &self,
        handle: NodeHandle,
    ) -> &K {
        &self.nodes[handle.index()].key
    }

    /// Размещает узел в арене, предпочитая свободный слот.
    fn alloc(
        &mut self,
        key: K,
        height: usize,
    ) -> Result<NodeHandle, ValidationError> {
        if let Some(handle) = self.free.pop() {
            let node = &mut self.nodes[handle.index()];
            node.key = key;
            node.height = height;
            node.levels = [Level::default(); MAX_LEVEL];
            return Ok(handle);
        }

        validate!(
            self.nodes.len() < MAX_NODES,
            ValidationError::ArenaExhausted {
                capacity: MAX_NODES
            }
        );

        let handle = NodeHandle::from_index(self.nodes.len());
        self.nodes.push(Node {
            key,
            height,
            levels: [Level::default(); MAX_LEVEL],
        });
        Ok(handle)
    }

    /// Поиск предшественников ключа на каждом активном уровне.
    ///
    /// Возвращает предшественников и ранг каждого из них (голова = 0).
    fn find_update(
        &self,
        key: &K,
    ) -> ([Cursor; MAX_LEVEL], [usize; MAX_LEVEL]) {
        let mut update = [Cursor::Head; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };

            while let Some(next) = self.levels(current)[i].forward {
                if self.key_of(next) < key {
                    rank[i] += self.levels(current)[i].span as usize;
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }
            update[i] = current;
        }

        (update, rank)
    }

    /// Вставляет ключ. Повторная вставка равного ключа отклоняется.
    pub fn insert(
        &mut self,
        key: K,
    ) -> Result<(), ValidationError> {
        let (mut update, mut rank) = self.find_update(&key);

        if let Some(next) = self.levels(update[0])[0].forward {
            validate!(
                self.key_of(next) != &key,
                ValidationError::DuplicateKey {
                    message: format!("{key:?}")
                }
            );
        }

        let height = self.random_level();
        let handle = self.alloc(key, height)?;

        if height > self.level {
            for i in self.level..height {
                rank[i] = 0;
                update[i] = Cursor::Head;
                self.head[i] = Level {
                    forward: None,
                    span: self.length as u32,
                };
            }
            self.level = height;
        }

        for i in 0..height {
            let pred = self.levels(update[i])[i];
            let skipped = (rank[0] - rank[i]) as u32;

            self.nodes[handle.index()].levels[i] = Level {
                forward: pred.forward,
                span: pred.span - skipped,
            };
            self.levels_mut(update[i])[i] = Level {
                forward: Some(handle),
                span: skipped + 1,
            };
        }

        for (i, pred) in update.iter().enumerate().take(self.level).skip(height) {
            self.levels_mut(*pred)[i].span += 1;
        }

        self.length += 1;
        Ok(())
    }

    /// Удаляет ключ, возвращая его, если он был в списке.
    pub fn remove(
        &mut self,
        key: &K,
    ) -> Option<K> {
        let (update, _) = self.find_update(key);
        let target = self.levels(update[0])[0]
            .forward
            .filter(|next| self.key_of(*next) == key)?;

        let removed = self.nodes[target.index()].levels;

        for (i, pred) in update.iter().enumerate().take(self.level) {
            let link = &mut self.levels_mut(*pred)[i];
            if link.forward == Some(target) {
                link.span = link.span + removed[i].span - 1;
                link.forward = removed[i].forward;
            } else {
                link.span -= 1;
            }
        }

        while self.level > 1 && self.head[self.level - 1].forward.is_none() {
            self.level -= 1;
        }

        self.free.push(target);
        self.length -= 1;

        Some(self.key_of(target).clone())
    }

    /// Ранг ключа (с 1) или `None`, если ключа нет.
    pub fn rank_of(
        &self,
        key: &K,
    ) -> Option<usize> {
        let mut traversed = 0;
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            while let Some(next) = self.levels(current)[i].forward {
                if self.key_of(next) < key {
                    traversed += self.levels(current)[i].span as usize;
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }
        }

        match self.levels(current)[0].forward {
            Some(next) if self.key_of(next) == key => Some(traversed + 1),
            _ => None,
        }
    }

    fn node_at_rank(
        &self,
        rank: usize,
    ) -> Option<NodeHandle> {
        if rank == 0 || rank > self.length {
            return None;
        }

        let mut traversed = 0;
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            while let Some(next) = self.levels(current)[i].forward {
                let span = self.levels(current)[i].span as usize;
                if traversed + span <= rank {
                    traversed += span;
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }

            if traversed == rank {
                if let Cursor::Node(handle) = current {
                    return Some(handle);
                }
            }
        }

        None
    }

    /// Ключ на позиции `rank` (с 1).
    pub fn key_at_rank(
        &self,
        rank: usize,
    ) -> Option<&K> {
        self.node_at_rank(rank).map(|handle| self.key_of(handle))
    }

    /// Ключи с рангами `start..=end`, обрезанными по длине списка.
    ///
    /// Пустой итератор, если `start == 0`, `start > end` или `start`
    /// больше длины.
    pub fn range(
        &self,
        start: usize,
        end: usize,
    ) -> RankRangeIter<'_, K> {
        let current = if start > end {
            None
        } else {
            self.node_at_rank(start)
        };

        RankRangeIter {
            list: self,
            current,
            rank: start,
            end,
        }
    }

    pub fn contains(
        &self,
        key: &K,
    ) -> bool {
        self.rank_of(key).is_some()
    }

    /// Возвращает количество элементов в списке.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Первый (лучший) ключ.
    pub fn first(&self) -> Option<&K> {
        self.head[0].forward.map(|handle| self.key_of(handle))
    }

    /// Последний (худший) ключ.
    pub fn last(&self) -> Option<&K> {
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            while let Some(next) = self.levels(current)[i].forward {
                current = Cursor::Node(next);
            }
        }

        match current {
            Cursor::Head => None,
            Cursor::Node(handle) => Some(self.key_of(handle)),
        }
    }

    /// Итератор в порядке ранжирования.
    pub fn iter(&self) -> SkipListIter<'_, K> {
        SkipListIter {
            list: self,
            current: self.head[0].forward,
            remaining: self.length,
        }
    }

    /// Удаляет все элементы и освобождает арену.
    pub fn clear(&mut self) {
        self.head = [Level::default(); MAX_LEVEL];
        self.nodes.clear();
        self.free.clear();
        self.level = 1;
        self.length = 0;
    }

    /// Число активных уровней.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Собирает статистику по высотам узлов.
    pub fn statistics(&self) -> SkipListStatistics {
        let mut stats = SkipListStatistics::empty(MAX_LEVEL);
        stats.current_max_level = self.level;
        stats.free_slots = self.free.len();

        let mut current = self.head[0].forward;
        while let Some(handle) = current {
            let node = &self.nodes[handle.index()];
            if let Some(slot) = stats
                .level_distribution
                .get_mut(node.height.saturating_sub(1))
            {
                *slot += 1;
            }
            stats.node_count += 1;
            current = node.levels[0].forward;
        }

        stats.compute_average_level();
        stats
    }

    /// Полная проверка структуры: порядок, длина, span'ы на каждом активном
    /// уровне и учёт слотов арены. O(n · level).
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        validate!(
            (1..=MAX_LEVEL).contains(&self.level),
            ValidationError::InvalidLevel {
                node_level: self.level,
                max_level: MAX_LEVEL
            }
        );

        validate!(
            self.head[self.level..].iter().all(|l| l.forward.is_none()),
            ValidationError::InvalidLevel {
                node_level: self.level + 1,
                max_level: self.level
            }
        );

        // Позиция каждого живого узла на нижнем уровне; 0 = слот свободен.
        let mut position = vec![0usize; self.nodes.len()];
        let mut count = 0;
        let mut prev_key: Option<&K> = None;
        let mut current = self.head[0].forward;

        while let Some(handle) = current {
            validate!(
                count < self.nodes.len(),
                ValidationError::LengthMismatch {
                    expected: self.length,
                    actual: count + 1
                }
            );

            let node = &self.nodes[handle.index()];

            validate!(
                (1..=self.level).contains(&node.height),
                ValidationError::InvalidLevel {
                    node_level: node.height,
                    max_level: self.level
                }
            );

            if let Some(prev) = prev_key {
                validate!(
                    prev < &node.key,
                    ValidationError::SortOrderViolation {
                        message: format!("{:?} >= {:?}", prev, node.key)
                    }
                );
            }

            prev_key = Some(&node.key);
            count += 1;
            position[handle.index()] = count;
            current = node.levels[0].forward;
        }

        validate!(
            count == self.length,
            ValidationError::LengthMismatch {
                expected: self.length,
                actual: count
            }
        );

        for level in 0..self.level {
            let mut current = Cursor::Head;
            let mut pos = 0;

            loop {
                let link = self.levels(current)[level];
                let target = match link.forward {
                    Some(next) => {
                        let target = position[next.index()];
                        validate!(
                            target > pos,
                            ValidationError::SortOrderViolation {
                                message: format!(
                                    "level {level} links backwards or to a vacant slot"
                                )
                            }
                        );
                        validate!(
                            self.nodes[next.index()].height > level,
                            ValidationError::InvalidLevel {
                                node_level: self.nodes[next.index()].height,
                                max_level: level
                            }
                        );
                        target
                    }
                    None => self.length,
                };

                validate!(
                    pos + link.span as usize == target,
                    ValidationError::SpanMismatch {
                        level,
                        expected: target,
                        actual: pos + link.span as usize
                    }
                );

                match link.forward {
                    Some(next) => {
                        pos = target;
                        current = Cursor::Node(next);
                    }
                    None => break,
                }
            }
        }

        validate!(
            self.nodes.len() == self.length + self.free.len(),
            ValidationError::FreeListCorrupted {
                message: format!(
                    "{} slots, {} live, {} free",
                    self.nodes.len(),
                    self.length,
                    self.free.len()
                )
            }
        );

        validate!(
            self.free.iter().all(|handle| position[handle.index()] == 0),
            ValidationError::FreeListCorrupted {
                message: "free list holds a live node".to_string()
            }
        );

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для SkipList
////////////////////////////////////////////////////////////////////////////////

impl<K> Default for SkipList<K>
where
    K: Ord + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K> IntoIterator for &'a SkipList<K>
where
    K: Ord + Clone + Debug,
{
    type Item = &'a K;
    type IntoIter = SkipListIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K> Iterator for SkipListIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.current?;
        let node = &self.list.nodes[handle.index()];
        self.current = node.levels[0].forward;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for SkipListIter<'_, K> {}

impl<'a, K> Iterator for RankRangeIter<'a, K> {
    type Item = (usize, &'a K);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rank > self.end {
            return None;
        }

        let handle = self.current?;
        let node = &self.list.nodes[handle.index()];
        let item = (self.rank, &node.key);

        self.current = node.levels[0].forward;
        self.rank += 1;
        Some(item)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
