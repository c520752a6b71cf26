//! Criterion benchmarks for full solver steps on the reference pipe.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeflow_bench::{reference_profile, stress_profile};
use pipeflow_engine::Driver;

fn bench_step_1k(c: &mut Criterion) {
    let mut driver = Driver::from_config(&reference_profile(true)).unwrap();

    // Warm up: run one step so initial allocation is done
    driver.step().unwrap();

    c.bench_function("step_1k", |b| {
        b.iter(|| {
            let metrics = driver.step().unwrap();
            black_box(metrics.total_us);
        });
    });
}

fn bench_step_1k_sequential(c: &mut Criterion) {
    let mut driver = Driver::from_config(&reference_profile(false)).unwrap();
    driver.step().unwrap();

    c.bench_function("step_1k_sequential", |b| {
        b.iter(|| {
            let metrics = driver.step().unwrap();
            black_box(metrics.total_us);
        });
    });
}

fn bench_step_100k(c: &mut Criterion) {
    let mut driver = Driver::from_config(&stress_profile(true)).unwrap();
    driver.step().unwrap();

    c.bench_function("step_100k", |b| {
        b.iter(|| {
            let metrics = driver.step().unwrap();
            black_box(metrics.total_us);
        });
    });
}

fn bench_1000_steps_1k(c: &mut Criterion) {
    c.bench_function("1000_steps_1k", |b| {
        b.iter(|| {
            let mut driver = Driver::from_config(&reference_profile(true)).unwrap();
            for _ in 0..1000 {
                let metrics = driver.step().unwrap();
                black_box(metrics.total_us);
            }
            black_box(driver.state().total_density());
        });
    });
}

criterion_group!(
    benches,
    bench_step_1k,
    bench_step_1k_sequential,
    bench_step_100k,
    bench_1000_steps_1k
);
criterion_main!(benches);
