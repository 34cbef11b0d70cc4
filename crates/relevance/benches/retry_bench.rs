//! Benchmarks for the model call path that does not touch the network
//!
//! Run with: cargo bench -p relevance --bench retry_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use newsrel_core::RelevanceConfig;
use relevance::http::truncate_chars;
use relevance::{RelevanceError, RetryConfig, is_retryable_error};
use std::hint::black_box;

fn bench_backoff(c: &mut Criterion) {
  let mut group = c.benchmark_group("backoff");

  for (name, config) in [
    ("default", RetryConfig::default()),
    ("local", RetryConfig::for_local()),
    ("from_config", RetryConfig::from_relevance_config(&RelevanceConfig::default())),
  ] {
    group.bench_with_input(BenchmarkId::new("config", name), &config, |b, config| {
      b.iter(|| {
        for attempt in 0..6 {
          black_box(config.backoff_for_attempt(attempt));
        }
      });
    });
  }

  group.finish();
}

fn bench_is_retryable_error(c: &mut Criterion) {
  let mut group = c.benchmark_group("is_retryable_error");

  let errors = [
    ("network", RelevanceError::Network("connection reset".to_string())),
    ("timeout", RelevanceError::Timeout),
    (
      "rate_limited",
      RelevanceError::ProviderError("Inference server returned 429 Too Many Requests".to_string()),
    ),
    ("invalid_score", RelevanceError::InvalidScore(f32::NAN)),
    (
      "bad_request",
      RelevanceError::ProviderError("Inference server returned 400 Bad Request".to_string()),
    ),
  ];

  for (name, error) in errors.iter() {
    group.bench_with_input(BenchmarkId::from_parameter(name), error, |b, error| {
      b.iter(|| is_retryable_error(black_box(error)));
    });
  }

  group.finish();
}

fn bench_truncate(c: &mut Criterion) {
  let mut group = c.benchmark_group("truncate_chars");

  let ascii = "Apple reported record quarterly revenue driven by services growth. ".repeat(40);
  let multibyte = "Nestlé und Société Générale berichten über Gewinne. ".repeat(40);

  for (name, text) in [("ascii", &ascii), ("multibyte", &multibyte)] {
    group.bench_with_input(BenchmarkId::new("400_chars", name), text, |b, text| {
      b.iter(|| black_box(truncate_chars(black_box(text), 400)));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_backoff, bench_is_retryable_error, bench_truncate);
criterion_main!(benches);
