//! Per-step benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pwm_engine::*;

fn benchmark_complementary_step(c: &mut Criterion) {
    let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
    let dt = 10e-9;

    c.bench_function("complementary_step_10000", |b| {
        b.iter(|| {
            pwm.reset();
            for i in 1..=10_000 {
                black_box(pwm.step(i as f64 * dt, false));
            }
        })
    });
}

fn benchmark_complementary_phase_shift(c: &mut Criterion) {
    let mut pwm = ComplementaryPwm::new(ComplementaryParams::default()).unwrap();
    let dt = 10e-9;

    c.bench_function("complementary_step_with_updates_10000", |b| {
        b.iter(|| {
            pwm.reset();
            for i in 1..=10_000 {
                if i % 1000 == 0 {
                    pwm.set_phase_offset(i as f64 * 1e-10);
                    pwm.set_duty((i % 7) as f64 / 7.0);
                }
                black_box(pwm.step(i as f64 * dt, false));
            }
        })
    });
}

fn benchmark_enhanced_step(c: &mut Criterion) {
    let mut pwm = EnhancedPwm::new(EnhancedParams::default()).unwrap();
    let dt = 10e-9;

    c.bench_function("enhanced_step_10000", |b| {
        b.iter(|| {
            pwm.reset();
            for i in 1..=10_000 {
                black_box(pwm.step(i as f64 * dt, 0.4, 0.6, false));
            }
        })
    });
}

fn benchmark_basic_step(c: &mut Criterion) {
    let mut pwm = BasicPwm::new(BasicParams::default()).unwrap();
    let dt = 10e-9;

    c.bench_function("basic_step_10000", |b| {
        b.iter(|| {
            for i in 1..=10_000 {
                black_box(pwm.step(i as f64 * dt, 0.5, 0.0));
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_complementary_step,
    benchmark_complementary_phase_shift,
    benchmark_enhanced_step,
    benchmark_basic_step
);
criterion_main!(benches);
