//! Benchmarks for complaint classification

use cityfix_core::config::FallbackPolicy;
use cityfix_triage::KeywordClassifier;
use cityfix_triage::classifier::{match_department, priority_signal};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const DESCRIPTIONS: [&str; 6] = [
    "Garbage has not been collected for a week",
    "urgent pothole on MG Road",
    "Water pipe leak flooding the lane",
    "Street light flickering near the school, this is a concern",
    "The park bench is wobbly and nobody has fixed it",
    "Emergency: stray dogs attacking pedestrians near the market",
];

/// Benchmark the pure keyword lookups
fn bench_keyword_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyword_lookup");

    for text in DESCRIPTIONS {
        group.bench_with_input(BenchmarkId::new("department", text), text, |b, text| {
            b.iter(|| match_department(black_box(text)));
        });
    }

    group.throughput(Throughput::Elements(DESCRIPTIONS.len() as u64));
    group.bench_function("priority_batch", |b| {
        b.iter(|| {
            DESCRIPTIONS
                .iter()
                .map(|text| priority_signal(black_box(text)))
                .collect::<Vec<_>>()
        });
    });

    group.finish();
}

/// Benchmark full classification including RNG and stats bookkeeping
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let classifier = KeywordClassifier::default()
        .with_fallback(FallbackPolicy::Random)
        .with_seed(42);

    // Long descriptions close to the form limit
    let long_text = format!("{} transformer", "lorem ipsum ".repeat(32));

    group.bench_function("short", |b| {
        b.iter(|| classifier.classify_text(black_box("urgent pothole on MG Road")));
    });
    group.bench_function("fallback", |b| {
        b.iter(|| classifier.classify_text(black_box("The park bench is wobbly")));
    });
    group.bench_function("long", |b| {
        b.iter(|| classifier.classify_text(black_box(&long_text)));
    });

    group.finish();
}

criterion_group!(benches, bench_keyword_lookup, bench_classify);
criterion_main!(benches);
