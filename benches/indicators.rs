//! Benchmarks for indicator computation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use indikit::prelude::*;

/// Simple test bar structure
#[derive(Debug, Clone, Copy)]
struct TestBar {
  o: f64,
  h: f64,
  l: f64,
  c: f64,
}

impl OHLCV for TestBar {
  fn open(&self) -> f64 {
    self.o
  }

  fn high(&self) -> f64 {
    self.h
  }

  fn low(&self) -> f64 {
    self.l
  }

  fn close(&self) -> f64 {
    self.c
  }

  fn volume(&self) -> f64 {
    1000.0
  }
}

/// Generate realistic random bars
fn generate_bars(n: usize) -> Vec<TestBar> {
  let mut bars = Vec::with_capacity(n);
  let mut price = 100.0;

  for i in 0..n {
    let change = ((i * 7 + 13) % 100) as f64 / 50.0 - 1.0; // Deterministic "random"
    let volatility = 2.0 + ((i * 3) % 10) as f64 / 5.0;

    let o = price;
    let c = price + change;
    let h = o.max(c) + volatility * 0.5;
    let l = o.min(c) - volatility * 0.5;

    bars.push(TestBar { o, h, l, c });
    price = c;
  }

  bars
}

fn closes(bars: &[TestBar]) -> Vec<f64> {
  bars.iter().map(|b| b.close()).collect()
}

fn bench_single_indicators(c: &mut Criterion) {
  let bars = generate_bars(1000);
  let prices = closes(&bars);

  let mut group = c.benchmark_group("single_indicator");

  group.bench_function("sma_20", |b| {
    let sma = Sma::default();
    b.iter(|| sma.compute(black_box(&prices)))
  });

  group.bench_function("ema_20", |b| {
    let ema = Ema::default();
    b.iter(|| ema.compute(black_box(&prices)))
  });

  group.bench_function("rsi_14", |b| {
    let rsi = Rsi::default();
    b.iter(|| rsi.compute(black_box(&prices)))
  });

  group.bench_function("stoch_rsi_14_3_3", |b| {
    let stoch = StochRsi::default();
    b.iter(|| stoch.compute(black_box(&prices)))
  });

  group.bench_function("bollinger_20_2", |b| {
    let bollinger = Bollinger::default();
    b.iter(|| bollinger.compute(black_box(&prices)))
  });

  group.bench_function("macd_12_26_9", |b| {
    let macd = Macd::default();
    b.iter(|| macd.compute(black_box(&prices)))
  });

  group.bench_function("atr_14", |b| {
    let atr = Atr::default();
    b.iter(|| atr.compute(black_box(&bars)))
  });

  group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
  let engine = SnapshotBuilder::new().with_all_defaults().build().unwrap();

  let mut group = c.benchmark_group("snapshot");

  for size in [100, 500, 1000] {
    let bars = generate_bars(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &bars, |b, bars| {
      b.iter(|| engine.snapshot(black_box(bars)))
    });
  }

  group.finish();
}

fn bench_parallel_snapshots(c: &mut Criterion) {
  let engine = SnapshotBuilder::new().with_all_defaults().build().unwrap();
  let bars: Vec<Vec<TestBar>> = (0..16).map(|_| generate_bars(500)).collect();
  let symbols: Vec<String> = (0..16).map(|i| format!("SYM{i}")).collect();

  c.bench_function("parallel_16_instruments", |b| {
    b.iter(|| {
      let instruments: Vec<(&str, &[TestBar])> = symbols
        .iter()
        .zip(&bars)
        .map(|(s, b)| (s.as_str(), b.as_slice()))
        .collect();
      snapshot_parallel(&engine, instruments)
    })
  });
}

criterion_group!(
  benches,
  bench_single_indicators,
  bench_snapshot,
  bench_parallel_snapshots
);
criterion_main!(benches);
