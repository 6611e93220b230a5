//! Criterion benchmarks for CrisisLab hot paths.
//!
//! Benchmarks:
//! 1. Full analysis pipeline (filter, group, resilience, pulse, trajectory, insight)
//! 2. Per-ticker grouping of a filtered universe
//! 3. Market breadth and volatility over the full history
//! 4. Trajectory normalization of one stock against its index

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use crisislab_core::domain::{CompanyRecord, DailyRecord, Selection};
use crisislab_core::{
    analyze, normalize_trajectory, BenchmarkData, MarketMetrics, TickerSeries, TimeSeriesStore,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_index(n: usize) -> Vec<DailyRecord> {
    let base = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let close = 10_000.0 + (i as f64 * 0.05).sin() * 1_500.0;
            DailyRecord::from_close(base + Duration::days(i as i64), close)
        })
        .collect()
}

fn make_universe(tickers: usize, n: usize) -> Vec<CompanyRecord> {
    let base = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let mut out = Vec::with_capacity(tickers * n);
    for t in 0..tickers {
        let ticker = format!("T{t:02}.NS");
        for i in 0..n {
            let phase = t as f64 * 0.3;
            let close = 100.0 + ((i as f64 * 0.07) + phase).sin() * 20.0;
            let mut day = DailyRecord::from_close(base + Duration::days(i as i64), close);
            day.sma50 = Some(100.0);
            day.rsi14 = Some(50.0 + ((i as f64 * 0.11) + phase).cos() * 25.0);
            out.push(CompanyRecord::new(ticker.clone(), day));
        }
    }
    out
}

fn make_store(tickers: usize, n: usize) -> TimeSeriesStore {
    let mut universe = make_universe(tickers, n);
    for rec in universe.iter_mut().filter(|r| r.ticker == "T00.NS") {
        rec.ticker = "RELIANCE.NS".to_string();
    }
    TimeSeriesStore::new(
        BenchmarkData::new(make_index(n), universe),
        BenchmarkData::default(),
    )
}

// ── 1. Full pipeline ─────────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for &(tickers, days) in &[(10usize, 500usize), (50, 1500)] {
        let store = make_store(tickers, days);
        let windowed = Selection::default();
        let full = Selection::default().clear_crisis();

        group.bench_with_input(
            BenchmarkId::new("covid_window", format!("{tickers}x{days}")),
            &store,
            |b, store| b.iter(|| analyze(black_box(store), black_box(&windowed))),
        );
        group.bench_with_input(
            BenchmarkId::new("all_history", format!("{tickers}x{days}")),
            &store,
            |b, store| b.iter(|| analyze(black_box(store), black_box(&full))),
        );
    }

    group.finish();
}

// ── 2. Grouping ──────────────────────────────────────────────────────

fn bench_grouping(c: &mut Criterion) {
    let universe = make_universe(50, 1500);
    c.bench_function("ticker_series_50x1500", |b| {
        b.iter(|| TickerSeries::from_records(black_box(&universe)))
    });
}

// ── 3. Market pulse ──────────────────────────────────────────────────

fn bench_market(c: &mut Criterion) {
    let index = make_index(1500);
    let universe = make_universe(50, 1500);
    c.bench_function("market_metrics_50x1500", |b| {
        b.iter(|| MarketMetrics::compute(black_box(&index), black_box(&universe)))
    });
}

// ── 4. Trajectory ────────────────────────────────────────────────────

fn bench_trajectory(c: &mut Criterion) {
    let index = make_index(1500);
    let stock = make_universe(1, 1500);
    c.bench_function("normalize_trajectory_1500", |b| {
        b.iter(|| normalize_trajectory(black_box(&stock), black_box(&index)))
    });
}

criterion_group!(
    benches,
    bench_analyze,
    bench_grouping,
    bench_market,
    bench_trajectory,
);
criterion_main!(benches);
