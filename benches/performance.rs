//! Performance benchmarks for ranking, the rank-sum test and report rendering

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use http_mwu::{
    cli::Cli,
    config::parser::ConfigParser,
    models::{LatencySample, SamplePair},
    output::{OutputCoordinator, OutputFormatterFactory},
    stats::{rank_all, rank_all_averaged, LatencySummary, MannWhitneyTest},
    types::{OutputFormat, Side, TieMode},
    ComparisonReport, Config, RequestSpec,
};
use chrono::Utc;
use clap::Parser;
use std::hint::black_box;
use std::time::Duration;

/// Deterministic latencies in microseconds with a tunable tie rate
fn create_latencies(count: usize, offset_us: u64, modulus: u64) -> Vec<Duration> {
    (0..count as u64)
        .map(|i| Duration::from_micros(offset_us + (i * 7919) % modulus))
        .collect()
}

fn create_pair(count: usize) -> SamplePair {
    SamplePair::new(
        LatencySample::from_durations(Side::X, create_latencies(count, 10_000, 5_000)),
        LatencySample::from_durations(Side::Y, create_latencies(count, 11_000, 5_000)),
    )
    .unwrap()
}

fn benchmark_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for size in [20, 200, 2_000] {
        let pair = create_pair(size);

        group.bench_with_input(BenchmarkId::new("insertion_order", size), &pair, |b, pair| {
            b.iter(|| black_box(rank_all(pair.x.as_slice(), pair.y.as_slice())));
        });

        group.bench_with_input(BenchmarkId::new("averaged", size), &pair, |b, pair| {
            b.iter(|| black_box(rank_all_averaged(pair.x.as_slice(), pair.y.as_slice())));
        });
    }

    group.finish();
}

fn benchmark_mann_whitney(c: &mut Criterion) {
    let mut group = c.benchmark_group("mann_whitney");

    for size in [20, 200, 2_000] {
        let pair = create_pair(size);
        for mode in [TieMode::InsertionOrder, TieMode::Average] {
            let test = MannWhitneyTest::new(mode);
            group.bench_with_input(BenchmarkId::new(mode.as_str(), size), &pair, |b, pair| {
                b.iter(|| black_box(test.run(pair.x.as_slice(), pair.y.as_slice()).unwrap()));
            });
        }
    }

    // Heavy ties exercise the correction term
    let tied = SamplePair::new(
        LatencySample::from_durations(Side::X, create_latencies(2_000, 1_000, 8)),
        LatencySample::from_durations(Side::Y, create_latencies(2_000, 1_000, 8)),
    )
    .unwrap();
    group.bench_function("average_heavy_ties", |b| {
        let test = MannWhitneyTest::new(TieMode::Average);
        b.iter(|| black_box(test.run(tied.x.as_slice(), tied.y.as_slice()).unwrap()));
    });

    group.finish();
}

fn benchmark_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    let pair = create_pair(200);
    let result = MannWhitneyTest::default()
        .run(pair.x.as_slice(), pair.y.as_slice())
        .unwrap();

    let mut config = Config::default();
    config.x_request = RequestSpec::get("http://x.test/");
    config.y_request = RequestSpec::get("http://y.test/");

    group.bench_function("summaries", |b| {
        b.iter(|| black_box(LatencySummary::from_sample(&pair.x)));
    });

    let report = ComparisonReport::new("bench".to_string(), Utc::now(), &config, pair, result);
    for format in [OutputFormat::Text, OutputFormat::Json] {
        let coordinator = OutputCoordinator::new(OutputFormatterFactory::create_plain_formatter(), format);
        group.bench_function(format!("render_{:?}", format).to_lowercase(), |b| {
            b.iter(|| black_box(coordinator.render(&report).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_config_parsing(c: &mut Criterion) {
    let args = [
        "http-mwu",
        "--x-url",
        "https://a.example/",
        "--y-url",
        "https://b.example/",
        "--sample-size",
        "50",
    ];

    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let cli = Cli::try_parse_from(black_box(&args)).unwrap();
            black_box(ConfigParser::new(cli).parse().unwrap())
        });
    });
}

criterion_group!(
    benches,
    benchmark_ranking,
    benchmark_mann_whitney,
    benchmark_report,
    benchmark_config_parsing
);

criterion_main!(benches);
