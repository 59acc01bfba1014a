use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rust_decimal::Decimal;
use scorerank::{RankedScoreIndex, SkipList};

fn make_updates(
    n: usize,
    customers: i64,
    seed: u64,
) -> Vec<(i64, Decimal)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let id = rng.gen_range(1..=customers);
            let delta = Decimal::new(rng.gen_range(-100_000..=100_000), 2);
            (id, delta)
        })
        .collect()
}

fn filled_index(customers: i64) -> RankedScoreIndex {
    let index = RankedScoreIndex::with_seed(customers as usize, 42);
    for (id, delta) in make_updates(customers as usize, customers, 7) {
        let _ = index.upsert(id, delta);
    }
    for id in 1..=customers {
        let _ = index.upsert(id, Decimal::ONE);
    }
    index
}

fn bench_skiplist_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("skiplist_insert");
    for &n in &[1_000usize, 10_000, 100_000] {
        let mut rng = StdRng::seed_from_u64(2024);
        let keys: Vec<i64> = (0..n).map(|_| rng.gen()).collect();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &keys, |b, keys| {
            b.iter(|| {
                let mut sl = SkipList::with_seed(1);
                for k in keys {
                    // Дубликаты отклоняются, это ожидаемо.
                    let _ = black_box(sl.insert(*k));
                }
                sl
            })
        });
    }
    group.finish();
}

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_upsert");
    for &customers in &[1_000i64, 100_000] {
        let index = filled_index(customers);
        let updates = make_updates(10_000, customers, 99);

        group.throughput(Throughput::Elements(updates.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(customers),
            &updates,
            |b, updates| {
                b.iter(|| {
                    for (id, delta) in updates {
                        black_box(index.upsert(*id, *delta).ok());
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_reads");
    for &customers in &[1_000i64, 100_000] {
        let index = filled_index(customers);
        let mut rng = StdRng::seed_from_u64(5);
        let ids: Vec<i64> = (0..1_000).map(|_| rng.gen_range(1..=customers)).collect();

        group.bench_with_input(BenchmarkId::new("rank", customers), &ids, |b, ids| {
            b.iter(|| {
                for id in ids {
                    black_box(index.rank(*id).ok());
                }
            })
        });

        group.bench_with_input(
            BenchmarkId::new("range_100", customers),
            &customers,
            |b, &customers| {
                let middle = (customers / 2) as usize;
                b.iter(|| black_box(index.range(middle, middle + 99).ok()))
            },
        );

        group.bench_with_input(BenchmarkId::new("neighbors_5", customers), &ids, |b, ids| {
            b.iter(|| {
                for id in ids.iter().take(100) {
                    black_box(index.neighbors(*id, 5, 5).ok());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_skiplist_insert, bench_upsert, bench_reads);
criterion_main!(benches);
