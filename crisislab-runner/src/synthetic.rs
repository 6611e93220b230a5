//! Synthetic dataset for development and demos.
//!
//! Produces both benchmarks over 2019-2021 with a crash in Feb-Mar 2020 and a
//! staggered recovery, so every analytics path has something to chew on.
//! Each series is a seeded random walk (seed = BLAKE3 of the series name), so
//! the same build always produces the same dataset.
//!
//! Indicators are derived from the generated closes: SMA-20, SMA-50,
//! RSI-14 (simple average of gains and losses), MACD 12/26 with a 9-day
//! signal line and 20-day Bollinger bands at two standard deviations.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use crisislab_core::domain::{Benchmark, CompanyRecord, DailyRecord};
use crisislab_core::store::{BenchmarkData, TimeSeriesStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NIFTY_TICKERS: [&str; 8] = [
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "INFY.NS",
    "ICICIBANK.NS",
    "HINDUNILVR.NS",
    "ITC.NS",
    "SBIN.NS",
];

const SENSEX_TICKERS: [&str; 6] = [
    "RELIANCE.BO",
    "TCS.BO",
    "HDFCBANK.BO",
    "INFY.BO",
    "LT.BO",
    "MARUTI.BO",
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn rng_for(name: &str) -> StdRng {
    let seed: [u8; 32] = *blake3::hash(name.as_bytes()).as_bytes();
    StdRng::from_seed(seed)
}

/// Trading days (Mon-Fri) between `start` and `end`, inclusive.
fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
        current += Duration::days(1);
    }
    days
}

/// Daily drift for the market regime a date falls in.
fn regime_drift(day: NaiveDate) -> f64 {
    if day >= date(2020, 2, 20) && day <= date(2020, 3, 23) {
        -0.018
    } else if day > date(2020, 3, 23) && day <= date(2020, 12, 31) {
        0.0035
    } else {
        0.0004
    }
}

/// Random-walk closes. `beta` scales exposure to the market regime and
/// `start` is the opening price level.
fn walk(rng: &mut StdRng, days: &[NaiveDate], start: f64, beta: f64) -> Vec<f64> {
    let mut price = start;
    days.iter()
        .map(|&day| {
            let noise: f64 = rng.gen_range(-0.015..0.015);
            price *= 1.0 + regime_drift(day) * beta + noise;
            price = price.max(0.01);
            price
        })
        .collect()
}

fn sma(closes: &[f64], i: usize, period: usize) -> Option<f64> {
    if i + 1 < period {
        return None;
    }
    let window = &closes[i + 1 - period..=i];
    Some(window.iter().sum::<f64>() / period as f64)
}

fn rsi(closes: &[f64], i: usize, period: usize) -> Option<f64> {
    if i < period {
        return None;
    }
    let (mut gains, mut losses) = (0.0, 0.0);
    for w in closes[i - period..=i].windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }
    if losses == 0.0 {
        return Some(100.0);
    }
    let rs = gains / losses;
    Some(100.0 - 100.0 / (1.0 + rs))
}

fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

fn bollinger(closes: &[f64], i: usize, period: usize) -> Option<(f64, f64)> {
    let mid = sma(closes, i, period)?;
    let window = &closes[i + 1 - period..=i];
    let var = window.iter().map(|c| (c - mid).powi(2)).sum::<f64>() / period as f64;
    let sd = var.sqrt();
    Some((mid + 2.0 * sd, mid - 2.0 * sd))
}

/// Build daily records with indicators from a close series.
fn build_records(rng: &mut StdRng, days: &[NaiveDate], closes: &[f64]) -> Vec<DailyRecord> {
    let ema12 = ema(closes, 12);
    let ema26 = ema(closes, 26);
    let macd: Vec<f64> = ema12.iter().zip(&ema26).map(|(a, b)| a - b).collect();
    let signal = ema(&macd, 9);

    days.iter()
        .zip(closes)
        .enumerate()
        .map(|(i, (&day, &close))| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let bands = bollinger(closes, i, 20);
            let warm = i + 1 >= 26;
            DailyRecord {
                date: day,
                open,
                high: open.max(close) * (1.0 + rng.gen_range(0.0..0.01)),
                low: open.min(close) * (1.0 - rng.gen_range(0.0..0.01)),
                close,
                volume: rng.gen_range(100_000.0..5_000_000.0_f64).round(),
                sma20: sma(closes, i, 20),
                sma50: sma(closes, i, 50),
                macd: warm.then(|| macd[i]),
                signal_line: warm.then(|| signal[i]),
                rsi14: rsi(closes, i, 14),
                bb_upper: bands.map(|b| b.0),
                bb_lower: bands.map(|b| b.1),
            }
        })
        .collect()
}

fn synthetic_index(name: &str, days: &[NaiveDate], level: f64) -> Vec<DailyRecord> {
    let mut rng = rng_for(name);
    let closes = walk(&mut rng, days, level, 1.0);
    build_records(&mut rng, days, &closes)
}

fn synthetic_companies(tickers: &[&str], days: &[NaiveDate]) -> Vec<CompanyRecord> {
    let mut out = Vec::with_capacity(tickers.len() * days.len());
    for ticker in tickers {
        let mut rng = rng_for(ticker);
        let beta = rng.gen_range(0.5..1.6);
        let start = rng.gen_range(200.0..3_000.0);
        let closes = walk(&mut rng, days, start, beta);
        out.extend(
            build_records(&mut rng, days, &closes)
                .into_iter()
                .map(|day| CompanyRecord::new(*ticker, day)),
        );
    }
    out
}

/// Deterministic synthetic dataset covering both benchmarks.
pub fn generate_synthetic_dataset() -> TimeSeriesStore {
    let days = trading_days(date(2019, 1, 1), date(2021, 12, 31));
    let nifty = BenchmarkData::new(
        synthetic_index(Benchmark::Nifty.label(), &days, 12_000.0),
        synthetic_companies(&NIFTY_TICKERS, &days),
    );
    let sensex = BenchmarkData::new(
        synthetic_index(Benchmark::Sensex.label(), &days, 41_000.0),
        synthetic_companies(&SENSEX_TICKERS, &days),
    );
    TimeSeriesStore::new(nifty, sensex)
}
