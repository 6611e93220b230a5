//! Market-wide metrics — breadth and volatility pulse.
//!
//! These always run on the full, unfiltered universe: they describe the market
//! as of the latest data, independent of whichever crisis window is selected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{CompanyRecord, PricePoint};

/// Trailing index window used for volatility (one trading year).
pub const VOLATILITY_LOOKBACK: usize = 252;

/// Most recent returns that make up "current" volatility.
pub const CURRENT_VOLATILITY_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    /// Share of tickers whose latest close is above their 50-day SMA, 0–100.
    pub market_breadth_pct: f64,
    pub current_volatility: f64,
    pub historical_volatility: f64,
    /// current / historical, or 1.0 when historical volatility is zero.
    pub volatility_ratio: f64,
}

impl MarketMetrics {
    pub fn compute<I: PricePoint>(index: &[I], universe: &[CompanyRecord]) -> Self {
        let vol = Volatility::compute(index);
        Self {
            market_breadth_pct: market_breadth(universe),
            current_volatility: vol.current,
            historical_volatility: vol.historical,
            volatility_ratio: vol.ratio(),
        }
    }
}

/// Percentage of tickers whose latest record closes above its SMA-50.
///
/// The denominator is every ticker with at least one record, including those
/// whose latest SMA-50 is unknown; they simply never count as "above".
/// On a date tie the later record in input order wins.
pub fn market_breadth(universe: &[CompanyRecord]) -> f64 {
    let mut latest: HashMap<&str, &CompanyRecord> = HashMap::new();
    for record in universe.iter().filter(|r| !r.ticker.is_empty()) {
        latest
            .entry(record.ticker.as_str())
            .and_modify(|current| {
                if record.day.date >= current.day.date {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    if latest.is_empty() {
        return 0.0;
    }
    let above = latest.values().filter(|r| r.day.is_above_sma50()).count();
    above as f64 / latest.len() as f64 * 100.0
}

/// Daily percentage returns: (close[i] - close[i-1]) / close[i-1] * 100.
///
/// A zero previous close contributes a zero return instead of infinity.
pub fn pct_returns<T: PricePoint>(series: &[T]) -> Vec<f64> {
    series
        .windows(2)
        .map(|w| {
            let prev = w[0].close();
            if prev != 0.0 {
                (w[1].close() - prev) / prev * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Root mean square; 0 for an empty slice.
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Short-term versus trailing-year index volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volatility {
    pub current: f64,
    pub historical: f64,
}

impl Volatility {
    pub fn compute<T: PricePoint>(index: &[T]) -> Self {
        let start = index.len().saturating_sub(VOLATILITY_LOOKBACK);
        let returns = pct_returns(&index[start..]);
        let recent_start = returns.len().saturating_sub(CURRENT_VOLATILITY_WINDOW);
        Self {
            current: rms(&returns[recent_start..]),
            historical: rms(&returns),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.historical > 0.0 {
            self.current / self.historical
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;
    use chrono::{Duration, NaiveDate};

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn index(closes: &[f64]) -> Vec<DailyRecord> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| DailyRecord::from_close(base() + Duration::days(i as i64), c))
            .collect()
    }

    fn latest(ticker: &str, day: i64, close: f64, sma50: Option<f64>) -> CompanyRecord {
        let mut rec = DailyRecord::from_close(base() + Duration::days(day), close);
        rec.sma50 = sma50;
        CompanyRecord::new(ticker, rec)
    }

    // ── Breadth ──

    #[test]
    fn breadth_counts_unknown_sma_in_denominator() {
        let universe = vec![
            latest("T1", 5, 110.0, Some(100.0)),
            latest("T2", 5, 55.0, Some(50.0)),
            latest("T3", 5, 40.0, Some(50.0)),
            latest("T4", 5, 80.0, None),
        ];
        assert!((market_breadth(&universe) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn breadth_uses_latest_record_per_ticker() {
        let universe = vec![
            latest("T1", 9, 90.0, Some(100.0)),
            latest("T1", 2, 150.0, Some(100.0)),
            latest("T2", 1, 120.0, Some(100.0)),
        ];
        assert!((market_breadth(&universe) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn breadth_same_day_tie_takes_later_row() {
        let universe = vec![
            latest("T1", 3, 90.0, Some(100.0)),
            latest("T1", 3, 110.0, Some(100.0)),
        ];
        assert_eq!(market_breadth(&universe), 100.0);
    }

    #[test]
    fn breadth_empty_universe_is_zero() {
        assert_eq!(market_breadth(&[]), 0.0);
    }

    // ── Volatility ──

    #[test]
    fn fewer_than_two_records_gives_unit_ratio() {
        for closes in [vec![], vec![100.0]] {
            let m = MarketMetrics::compute(&index(&closes), &[]);
            assert_eq!(m.current_volatility, 0.0);
            assert_eq!(m.historical_volatility, 0.0);
            assert_eq!(m.volatility_ratio, 1.0);
        }
    }

    #[test]
    fn flat_index_gives_unit_ratio() {
        let m = MarketMetrics::compute(&index(&[100.0; 30]), &[]);
        assert_eq!(m.volatility_ratio, 1.0);
    }

    #[test]
    fn short_history_uses_available_returns() {
        // Returns: +10%, -10% → RMS = 10 for both windows.
        let vol = Volatility::compute(&index(&[100.0, 110.0, 99.0]));
        assert!((vol.current - 10.0).abs() < 1e-10);
        assert!((vol.historical - 10.0).abs() < 1e-10);
        assert!((vol.ratio() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn recent_turbulence_raises_ratio() {
        // 280 calm days (+0.1%) followed by 20 days alternating ±3%.
        let mut closes = vec![100.0];
        for _ in 0..280 {
            let last = *closes.last().unwrap();
            closes.push(last * 1.001);
        }
        for i in 0..20 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last * 1.03 } else { last * 0.97 });
        }
        let vol = Volatility::compute(&index(&closes));
        assert!((vol.current - 3.0).abs() < 1e-9, "current = {}", vol.current);
        assert!(vol.ratio() > 2.0, "ratio = {}", vol.ratio());
    }

    #[test]
    fn lookback_ignores_older_records() {
        // A crash outside the trailing 252-record window must not register.
        let mut closes = vec![100.0, 50.0];
        closes.extend(std::iter::repeat(50.0).take(VOLATILITY_LOOKBACK));
        let vol = Volatility::compute(&index(&closes));
        assert_eq!(vol.historical, 0.0);
    }

    #[test]
    fn pct_returns_known_values() {
        let r = pct_returns(&index(&[100.0, 110.0, 99.0]));
        assert_eq!(r.len(), 2);
        assert!((r[0] - 10.0).abs() < 1e-10);
        assert!((r[1] + 10.0).abs() < 1e-10);
    }

    #[test]
    fn rms_of_empty_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }
}
