//! Benchmarks for pattern detection, anomaly scoring and correlation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dataproc::{PatternAnalyzer, PatternType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Seasonal signal with a slow drift, noise and occasional spikes
fn generate_series(size: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size)
        .map(|i| {
            let base = (2.0 * PI * i as f64 / 24.0).sin() * 10.0 + i as f64 * 0.01;
            let spike = if rng.gen_bool(0.01) { 50.0 } else { 0.0 };
            base + spike + rng.gen_range(-1.0..1.0)
        })
        .collect()
}

fn bench_analyze_time_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_time_series");
    let analyzer = PatternAnalyzer::new();

    for size in [256usize, 1024, 4096] {
        let data = generate_series(size, 7);
        let timestamps: Vec<u64> = (0..size as u64).map(|i| i * 60).collect();

        for pattern_type in PatternType::ALL {
            group.bench_with_input(
                BenchmarkId::new(pattern_type.to_string(), size),
                &(&data, &timestamps),
                |b, (data, timestamps)| {
                    b.iter(|| {
                        black_box(
                            analyzer
                                .analyze_time_series(data, timestamps, &[pattern_type])
                                .unwrap(),
                        )
                    });
                },
            );
        }

        group.bench_with_input(
            BenchmarkId::new("all", size),
            &(&data, &timestamps),
            |b, (data, timestamps)| {
                b.iter(|| {
                    black_box(
                        analyzer
                            .analyze_time_series(data, timestamps, &PatternType::ALL)
                            .unwrap(),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_detect_anomalies(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_anomalies");
    let analyzer = PatternAnalyzer::new();

    for size in [1_000usize, 10_000, 100_000] {
        let data = generate_series(size, 11);
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(analyzer.detect_anomalies(data, 0.95).unwrap()));
        });
    }

    group.finish();
}

fn bench_correlation_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix");
    let analyzer = PatternAnalyzer::new();

    for variables in [4usize, 16, 64] {
        let data: Vec<Vec<f64>> = (0..variables)
            .map(|v| generate_series(1_000, v as u64))
            .collect();
        group.bench_with_input(
            BenchmarkId::new("variables", variables),
            &data,
            |b, data| {
                b.iter(|| black_box(analyzer.compute_correlation_matrix(data).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analyze_time_series,
    bench_detect_anomalies,
    bench_correlation_matrix
);
criterion_main!(benches);
