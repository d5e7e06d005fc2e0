//! Benchmark for deferred effects: building, running and replaying IO trees.
//!
//! Measures the overhead of the node tree against the work the effects do.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use deferio::effect::{IO, ReplayList, call, test_io};
use deferio::value::{Value, structurally_equal};
use futures::executor::block_on;
use std::hint::black_box;

fn increment(value: i64) -> Result<i64, String> {
    Ok(value + 1)
}

fn effect_chain(length: i64) -> IO<i64, String> {
    (0..length).fold(IO::pure(0), |io, _| io.flat_map(|x| call(increment, (x,))))
}

fn recorded_chain(length: i64) -> ReplayList {
    (0..length).fold(ReplayList::new(), |replay, x| {
        replay.record(&call(increment, (x,)), x + 1)
    })
}

// =============================================================================
// Run Benchmarks
// =============================================================================

fn benchmark_io_pure(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("io_pure");

    group.bench_function("block_on", |bencher| {
        bencher.iter(|| {
            let io: IO<i32, String> = IO::pure(black_box(42));
            black_box(block_on(io.run()))
        });
    });

    let runtime = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("tokio", |bencher| {
        bencher.iter(|| {
            let io: IO<i32, String> = IO::pure(black_box(42));
            black_box(runtime.block_on(io.run()))
        });
    });

    group.finish();
}

fn benchmark_io_map_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("io_map_chain");

    group.bench_function("map_5", |bencher| {
        bencher.iter(|| {
            let io: IO<i32, String> = IO::pure(1)
                .fmap(|x| x + 1)
                .fmap(|x| x * 2)
                .fmap(|x| x + 3)
                .fmap(|x| x * 4)
                .fmap(|x| x + 5);
            black_box(block_on(io.run()))
        });
    });

    group.finish();
}

fn benchmark_io_effect_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("io_effect_chain");

    for length in [1, 10, 100] {
        let io = effect_chain(length);
        group.bench_with_input(BenchmarkId::new("run", length), &io, |bencher, io| {
            bencher.iter(|| black_box(block_on(io.run())));
        });
    }

    group.finish();
}

// =============================================================================
// Replay Benchmarks
// =============================================================================

fn benchmark_io_replay(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("io_replay");

    for length in [1, 10, 100] {
        let io = effect_chain(length);
        let replay = recorded_chain(length);
        group.bench_with_input(
            BenchmarkId::new("test_io", length),
            &(io, replay),
            |bencher, (io, replay)| {
                bencher.iter(|| black_box(test_io(io, replay, length)));
            },
        );
    }

    group.finish();
}

fn benchmark_structural_equality(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("structural_equality");

    let left = Value::map([
        ("effect", Value::callable("fetch")),
        ("arguments", Value::list((0..32).collect::<Vec<i64>>())),
    ]);
    let right = left.clone();

    group.bench_function("call_shape", |bencher| {
        bencher.iter(|| black_box(structurally_equal(black_box(&left), black_box(&right))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_io_pure,
    benchmark_io_map_chain,
    benchmark_io_effect_chain,
    benchmark_io_replay,
    benchmark_structural_equality
);

criterion_main!(benches);
