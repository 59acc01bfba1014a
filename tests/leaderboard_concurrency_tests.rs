use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Barrier,
    },
    thread,
};

use scorerank::{LeaderboardError, RankedScoreIndex, Score};

/// Кол-во потоков-писателей
const WRITERS: usize = 8;

/// Кол-во обновлений на поток
const UPDATES_PER_WRITER: usize = 500;

#[test]
fn test_concurrent_upserts_sum_up() {
    let index = RankedScoreIndex::with_seed(1_000, 1);
    let barrier = Arc::new(Barrier::new(WRITERS));
    let mut handles = vec![];

    for _ in 0..WRITERS {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..UPDATES_PER_WRITER {
                // Все потоки пишут в одних и тех же 50 клиентов.
                let id = (i % 50) as i64 + 1;
                index.upsert(id, Score::ONE).unwrap();
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(index.len(), 50);
    let per_customer = (WRITERS * UPDATES_PER_WRITER / 50) as i64;
    for id in 1..=50 {
        assert_eq!(index.score(id), Some(Score::from(per_customer)));
    }
    index.validate_invariants().unwrap();
}

#[test]
fn test_readers_always_see_dense_ranks() {
    let index = RankedScoreIndex::with_seed(10_000, 2);
    for id in 1..=200 {
        index.upsert(id, Score::from(id)).unwrap();
    }

    let stop = Arc::new(AtomicBool::new(false));
    let barrier = Arc::new(Barrier::new(5));
    let mut readers = vec![];

    for _ in 0..4 {
        let index = index.clone();
        let stop = Arc::clone(&stop);
        let barrier = Arc::clone(&barrier);
        readers.push(thread::spawn(move || {
            barrier.wait();
            while !stop.load(Ordering::Relaxed) {
                let page = index.range(1, 50).unwrap();
                for (i, entry) in page.iter().enumerate() {
                    assert_eq!(entry.rank, i + 1);
                }
                for pair in page.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                }

                let around = index.neighbors(100, 3, 3).unwrap();
                for pair in around.windows(2) {
                    assert_eq!(pair[0].rank + 1, pair[1].rank);
                }
            }
        }));
    }

    let writer = {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for round in 0..2_000i64 {
                let id = round % 200 + 1;
                let delta = if round % 2 == 0 { 7 } else { -5 };
                index.upsert(id, Score::from(delta)).unwrap();
            }
        })
    };

    writer.join().unwrap();
    stop.store(true, Ordering::Relaxed);
    for h in readers {
        h.join().unwrap();
    }

    assert_eq!(index.len(), 200);
    index.validate_invariants().unwrap();
}

#[test]
fn test_capacity_holds_under_contention() {
    let index = RankedScoreIndex::with_seed(100, 3);
    let barrier = Arc::new(Barrier::new(4));
    let mut handles = vec![];

    for t in 0..4i64 {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let mut rejected = 0;
            for i in 0..50 {
                match index.upsert(t * 1_000 + i + 1, Score::ONE) {
                    Ok(_) => {}
                    Err(LeaderboardError::CapacityExceeded { capacity }) => {
                        assert_eq!(capacity, 100);
                        rejected += 1;
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            rejected
        }));
    }

    let rejected: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(index.len(), 100);
    assert_eq!(rejected, 100);
    index.validate_invariants().unwrap();
}

#[test]
fn test_lock_metrics_are_counted() {
    let index = RankedScoreIndex::with_seed(10, 4);
    index.upsert(1, Score::ONE).unwrap();
    index.upsert(2, Score::TWO).unwrap();
    let _ = index.rank(1).unwrap();
    let _ = index.range(1, 2).unwrap();

    let snapshot = index.metrics();
    assert_eq!(snapshot.write_locks, 2);
    assert_eq!(snapshot.read_locks, 2);
    assert_eq!(snapshot.total_locks(), 4);

    index.reset_metrics();
    assert_eq!(index.metrics().total_locks(), 0);
}
