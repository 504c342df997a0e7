//! Metrics pipeline benchmarks
//!
//! Text-log extraction, summary parsing, and series statistics over
//! synthetic runs of increasing length.
//!
//! Run with: cargo bench --bench metrics_pipeline

use std::fmt::Write as _;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runscope::parse::{parse_summary_str, parse_text_log_str, BASELINE_KEYWORDS};
use runscope::stats::SeriesStats;

const SIZES: &[usize] = &[1_000, 10_000, 100_000];

/// Synthetic baseline log: one line per iteration carrying every keyword
fn synthetic_log(lines: usize, rng: &mut StdRng) -> String {
    let mut log = String::with_capacity(lines * 256);
    for i in 0..lines {
        let _ = write!(log, "iter {i}");
        for key in BASELINE_KEYWORDS {
            let _ = write!(log, " | {key}: {:.6}", rng.gen_range(-5.0..5.0));
        }
        log.push('\n');
    }
    log
}

/// Synthetic summary document with `points` triplets per key
fn synthetic_summary(points: usize, rng: &mut StdRng) -> String {
    let keys = [
        "run/agent0/dist_entropy",
        "run/agent1/dist_entropy",
        "run/critic/value_loss",
        "run/train_episode_rewards/aver_rewards",
    ];
    let mut doc = String::from("{");
    for (k, key) in keys.iter().enumerate() {
        if k > 0 {
            doc.push(',');
        }
        let _ = write!(doc, "\"{key}\": [");
        for step in 0..points {
            if step > 0 {
                doc.push(',');
            }
            let _ = write!(doc, "[0.0, {step}, {:.6}]", rng.gen_range(-1.0..1.0));
        }
        doc.push(']');
    }
    doc.push('}');
    doc
}

fn bench_text_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_log_parse");
    let mut rng = StdRng::seed_from_u64(42);

    for &lines in &SIZES[..2] {
        let log = synthetic_log(lines, &mut rng);
        group.throughput(Throughput::Bytes(log.len() as u64));
        group.bench_with_input(BenchmarkId::new("baseline_keywords", lines), &log, |b, log| {
            b.iter(|| parse_text_log_str(black_box(log), BASELINE_KEYWORDS));
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary_parse");
    let mut rng = StdRng::seed_from_u64(7);

    for &points in &SIZES[..2] {
        let doc = synthetic_summary(points, &mut rng);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("four_namespaces", points), &doc, |b, doc| {
            b.iter(|| parse_summary_str(black_box(doc)));
        });
    }

    group.finish();
}

fn bench_series_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("series_stats");
    let mut rng = StdRng::seed_from_u64(1);

    for &len in SIZES {
        let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-100.0..100.0)).collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("compute", len), &values, |b, values| {
            b.iter(|| SeriesStats::compute(black_box(values)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_text_log, bench_summary, bench_series_stats);
criterion_main!(benches);
