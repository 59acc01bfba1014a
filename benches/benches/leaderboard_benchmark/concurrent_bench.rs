use std::{
    hint::black_box,
    sync::{Arc, Barrier},
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rust_decimal::Decimal;
use scorerank::RankedScoreIndex;

const CUSTOMERS: i64 = 10_000;

fn seeded_index() -> RankedScoreIndex {
    let index = RankedScoreIndex::with_seed(CUSTOMERS as usize, 42);
    for id in 1..=CUSTOMERS {
        let _ = index.upsert(id, Decimal::from(id % 997));
    }
    index
}

/// Смешанная нагрузка: `writers` потоков обновляют счета, остальные читают
/// ранги и страницы рейтинга.
fn run_mixed(
    index: &RankedScoreIndex,
    threads: usize,
    writers: usize,
    ops_per_thread: usize,
) {
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = vec![];

    for tid in 0..threads {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let mut rng = SmallRng::seed_from_u64(tid as u64 * 31 + 1);
            barrier.wait();

            for _ in 0..ops_per_thread {
                let id = rng.gen_range(1..=CUSTOMERS);
                if tid < writers {
                    let delta = Decimal::from(rng.gen_range(-50i64..=50));
                    black_box(index.upsert(id, delta).ok());
                } else if rng.gen_bool(0.5) {
                    black_box(index.rank(id).ok());
                } else {
                    black_box(index.neighbors(id, 3, 3).ok());
                }
            }
        }));
    }

    for h in handles {
        let _ = h.join();
    }
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");
    let ops_per_thread = 2_000;

    for &threads in &[2usize, 4, 8] {
        let mut writer_counts = vec![1usize];
        if threads / 2 > 1 {
            writer_counts.push(threads / 2);
        }

        for writers in writer_counts {
            group.throughput(Throughput::Elements((threads * ops_per_thread) as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{writers}w"), format!("{threads}t")),
                &(threads, writers),
                |b, &(threads, writers)| {
                    let index = seeded_index();
                    b.iter(|| run_mixed(&index, threads, writers, ops_per_thread))
                },
            );
        }
    }
    group.finish();
}

fn bench_contention_report(c: &mut Criterion) {
    let index = seeded_index();

    c.bench_function("mixed_4t_contention", |b| {
        b.iter(|| run_mixed(&index, 4, 1, 1_000))
    });

    println!("{}", index.metrics().format_report());
}

criterion_group!(benches, bench_mixed_workload, bench_contention_report);
criterion_main!(benches);
