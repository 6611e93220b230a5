//! Resilience metrics — drawdown, recovery and momentum status per ticker.
//!
//! Every function here is pure: a date-sorted slice of records in, a value out.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{CompanyRecord, PricePoint};
use crate::store::TickerSeries;

/// Momentum classification of a ticker at the end of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Above the 50-day SMA with RSI above 50.
    Leading,
    /// Not leading, but reclaimed its pre-drawdown peak inside the window.
    Recovered,
    Lagging,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Leading => "Leading",
            Status::Recovered => "Recovered",
            Status::Lagging => "Lagging",
        };
        f.write_str(s)
    }
}

/// How a single ticker behaved over a crisis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceMetrics {
    pub ticker: String,
    /// Deepest peak-to-close decline, in percent (>= 0).
    pub max_drawdown_pct: f64,
    /// Gain from the trough close to the latest close, in percent (signed).
    pub total_recovery_pct: f64,
    /// Records elapsed between the trough and the first close at or above
    /// the pre-drawdown peak. `None` if the peak was never reclaimed.
    pub recovery_days: Option<usize>,
    pub current_price: f64,
    pub latest_rsi: Option<f64>,
    pub status: Status,
}

impl ResilienceMetrics {
    /// Placeholder for a ticker with no records in the window.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            max_drawdown_pct: 0.0,
            total_recovery_pct: 0.0,
            recovery_days: None,
            current_price: 0.0,
            latest_rsi: None,
            status: Status::Lagging,
        }
    }
}

/// Where and how deep the maximum peak-relative drawdown occurred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownProfile {
    pub max_drawdown_pct: f64,
    pub trough_idx: usize,
    pub trough_price: f64,
}

/// Track the running peak and record the deepest decline from it.
///
/// The peak starts at the first close. Ties keep the first occurrence.
/// Returns `None` for an empty series. A monotonically rising series yields
/// zero drawdown with the trough pinned at index 0.
pub fn drawdown_profile<T: PricePoint>(series: &[T]) -> Option<DrawdownProfile> {
    let first = series.first()?.close();
    let mut peak = first;
    let mut profile = DrawdownProfile {
        max_drawdown_pct: 0.0,
        trough_idx: 0,
        trough_price: first,
    };

    for (i, point) in series.iter().enumerate() {
        let close = point.close();
        if close > peak {
            peak = close;
        }
        if peak > 0.0 {
            let dd = (peak - close) / peak * 100.0;
            if dd > profile.max_drawdown_pct {
                profile = DrawdownProfile {
                    max_drawdown_pct: dd,
                    trough_idx: i,
                    trough_price: close,
                };
            }
        }
    }
    Some(profile)
}

/// Maximum peak-relative drawdown in percent; 0 for an empty series.
pub fn max_drawdown_pct<T: PricePoint>(series: &[T]) -> f64 {
    drawdown_profile(series).map_or(0.0, |p| p.max_drawdown_pct)
}

/// Records between the trough and the first close that reclaims the highest
/// close seen up to (and including) the trough.
pub fn recovery_days<T: PricePoint>(series: &[T], trough_idx: usize) -> Option<usize> {
    let pre_crisis_peak = series
        .iter()
        .take(trough_idx + 1)
        .map(PricePoint::close)
        .fold(f64::NEG_INFINITY, f64::max);

    series
        .iter()
        .enumerate()
        .skip(trough_idx + 1)
        .find(|(_, p)| p.close() >= pre_crisis_peak)
        .map(|(i, _)| i - trough_idx)
}

fn classify(latest: &CompanyRecord, current_price: f64, recovery: Option<usize>) -> Status {
    let (Some(rsi), Some(sma50)) = (latest.day.rsi14, latest.day.sma50) else {
        return Status::Lagging;
    };
    if current_price > sma50 && rsi > 50.0 {
        Status::Leading
    } else if recovery.is_some() {
        Status::Recovered
    } else {
        Status::Lagging
    }
}

/// Compute resilience metrics for one ticker's records over a window.
///
/// Records are sorted by date here; callers need not pre-sort.
pub fn compute_resilience(ticker: &str, records: &[CompanyRecord]) -> ResilienceMetrics {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.day.date);
    resilience_from_sorted(ticker, &sorted)
}

fn resilience_from_sorted(ticker: &str, records: &[CompanyRecord]) -> ResilienceMetrics {
    let (Some(profile), Some(latest)) = (drawdown_profile(records), records.last()) else {
        return ResilienceMetrics::empty(ticker);
    };

    let current_price = latest.day.close;
    let total_recovery_pct = if profile.trough_price > 0.0 {
        (current_price - profile.trough_price) / profile.trough_price * 100.0
    } else {
        0.0
    };
    // Nothing fell, so there is nothing to recover from.
    let recovery = if profile.max_drawdown_pct > 0.0 {
        recovery_days(records, profile.trough_idx)
    } else {
        None
    };

    ResilienceMetrics {
        ticker: ticker.to_string(),
        max_drawdown_pct: profile.max_drawdown_pct,
        total_recovery_pct,
        recovery_days: recovery,
        current_price,
        latest_rsi: latest.day.rsi14,
        status: classify(latest, current_price, recovery),
    }
}

/// Resilience metrics for every ticker in the series, in ticker order.
pub fn compute_all(series: &TickerSeries) -> Vec<ResilienceMetrics> {
    series
        .iter()
        .map(|(ticker, records)| resilience_from_sorted(ticker, records))
        .collect()
}
