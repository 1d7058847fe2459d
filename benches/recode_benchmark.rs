//! Benchmark for sentinel normalization and category collapsing
//!
//! Run with: cargo bench --bench recode_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use recoda::pipeline::{
    apply_collapse, normalize_sentinel, CollapseGroup, CollapseRule, SurveyFrame,
};

/// Generate survey-shaped data: integer codes with a sprinkling of -1
/// sentinels
fn generate_survey_dataframe(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let grades: Vec<i64> = (0..n_rows)
        .map(|_| {
            if rng.gen::<f64>() < 0.05 {
                -1
            } else {
                rng.gen_range(1..=15)
            }
        })
        .collect();
    let hours: Vec<i64> = (0..n_rows)
        .map(|_| {
            if rng.gen::<f64>() < 0.10 {
                -1
            } else {
                rng.gen_range(0..=30)
            }
        })
        .collect();
    let segrades: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(1..=5)).collect();

    DataFrame::new(vec![
        Column::new("ALLGRADEX".into(), grades),
        Column::new("FHWKHRS".into(), hours),
        Column::new("SEGRADES".into(), segrades),
    ])
    .expect("Failed to create DataFrame")
}

fn grade_rule() -> CollapseRule {
    let group = |name: &str, codes: &[&str]| CollapseGroup {
        name: name.to_string(),
        codes: codes.iter().map(|c| c.to_string()).collect(),
    };
    CollapseRule {
        source: "ALLGRADEX".to_string(),
        target: "gradelevel".to_string(),
        groups: vec![
            group("Elementary", &["1", "2", "3", "4", "5"]),
            group("Middle", &["6", "7", "8"]),
            group("High", &["9", "10", "11", "12"]),
            group("College", &["13", "14", "15"]),
        ],
    }
}

fn benchmark_normalize_sentinel(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_sentinel");

    for &size in &[10_000usize, 100_000] {
        let df = generate_survey_dataframe(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &df, |b, df| {
            b.iter(|| {
                let frame = SurveyFrame::new(df.clone()).unwrap();
                black_box(normalize_sentinel(frame, -1).unwrap())
            })
        });
    }

    group.finish();
}

fn benchmark_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_collapse");
    let rule = grade_rule();

    for &size in &[10_000usize, 100_000] {
        let df = generate_survey_dataframe(size, 42);
        let frame = SurveyFrame::new(df).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &frame, |b, frame| {
            b.iter(|| black_box(apply_collapse(frame, &rule).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_normalize_sentinel,
    benchmark_collapse
);
criterion_main!(benches);
