//! Headline figures derived from market metrics and the resilience table.

use serde::{Deserialize, Serialize};

use crate::market::MarketMetrics;
use crate::resilience::{ResilienceMetrics, Status};

/// Volatility ratio above which the market is flagged as elevated.
pub const ELEVATED_VOLATILITY_RATIO: f64 = 1.1;
/// Volatility ratio below which the market is flagged as calm.
pub const CALM_VOLATILITY_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreadthSentiment {
    Bullish,
    Bearish,
}

impl BreadthSentiment {
    pub fn from_breadth(breadth_pct: f64) -> Self {
        if breadth_pct > 50.0 {
            BreadthSentiment::Bullish
        } else {
            BreadthSentiment::Bearish
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityRegime {
    Elevated,
    Normal,
    Calm,
}

impl VolatilityRegime {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > ELEVATED_VOLATILITY_RATIO {
            VolatilityRegime::Elevated
        } else if ratio < CALM_VOLATILITY_RATIO {
            VolatilityRegime::Calm
        } else {
            VolatilityRegime::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub market_breadth_pct: f64,
    pub breadth_sentiment: BreadthSentiment,
    pub volatility_ratio: f64,
    pub volatility_regime: VolatilityRegime,
    /// Mean recovery across tickers that recovered; `None` when none did.
    pub avg_recovery_days: Option<f64>,
    pub leading_count: usize,
    pub total_count: usize,
}

impl DashboardSummary {
    pub fn compute(market: &MarketMetrics, resilience: &[ResilienceMetrics]) -> Self {
        Self {
            market_breadth_pct: market.market_breadth_pct,
            breadth_sentiment: BreadthSentiment::from_breadth(market.market_breadth_pct),
            volatility_ratio: market.volatility_ratio,
            volatility_regime: VolatilityRegime::from_ratio(market.volatility_ratio),
            avg_recovery_days: average_recovery_days(resilience),
            leading_count: resilience
                .iter()
                .filter(|m| m.status == Status::Leading)
                .count(),
            total_count: resilience.len(),
        }
    }
}

pub fn average_recovery_days(resilience: &[ResilienceMetrics]) -> Option<f64> {
    let days: Vec<usize> = resilience.iter().filter_map(|m| m.recovery_days).collect();
    if days.is_empty() {
        return None;
    }
    Some(days.iter().sum::<usize>() as f64 / days.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(breadth: f64, ratio: f64) -> MarketMetrics {
        MarketMetrics {
            market_breadth_pct: breadth,
            current_volatility: ratio,
            historical_volatility: 1.0,
            volatility_ratio: ratio,
        }
    }

    fn row(status: Status, recovery_days: Option<usize>) -> ResilienceMetrics {
        ResilienceMetrics {
            status,
            recovery_days,
            ..ResilienceMetrics::empty("T")
        }
    }

    #[test]
    fn regime_thresholds_are_exclusive() {
        assert_eq!(VolatilityRegime::from_ratio(1.1), VolatilityRegime::Normal);
        assert_eq!(VolatilityRegime::from_ratio(1.11), VolatilityRegime::Elevated);
        assert_eq!(VolatilityRegime::from_ratio(0.9), VolatilityRegime::Normal);
        assert_eq!(VolatilityRegime::from_ratio(0.89), VolatilityRegime::Calm);
    }

    #[test]
    fn exactly_half_breadth_is_bearish() {
        assert_eq!(BreadthSentiment::from_breadth(50.0), BreadthSentiment::Bearish);
        assert_eq!(BreadthSentiment::from_breadth(50.1), BreadthSentiment::Bullish);
    }

    #[test]
    fn summary_counts_and_averages() {
        let rows = vec![
            row(Status::Leading, Some(10)),
            row(Status::Recovered, Some(30)),
            row(Status::Lagging, None),
        ];
        let s = DashboardSummary::compute(&market(66.7, 1.3), &rows);
        assert_eq!(s.leading_count, 1);
        assert_eq!(s.total_count, 3);
        assert_eq!(s.avg_recovery_days, Some(20.0));
        assert_eq!(s.breadth_sentiment, BreadthSentiment::Bullish);
        assert_eq!(s.volatility_regime, VolatilityRegime::Elevated);
    }

    #[test]
    fn no_recoveries_means_no_average() {
        assert_eq!(average_recovery_days(&[row(Status::Lagging, None)]), None);
        assert_eq!(average_recovery_days(&[]), None);
    }
}
