//! Momentum board — tickers ranked by their latest RSI, plus RSI banding.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::resilience::ResilienceMetrics;

/// Maximum number of tickers shown on the momentum board.
pub const MOMENTUM_BOARD_SIZE: usize = 30;

/// RSI-14 buckets, hottest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RsiBand {
    Overbought,
    Strong,
    Neutral,
    Soft,
    Weak,
    Oversold,
}

impl RsiBand {
    pub fn classify(rsi: f64) -> Self {
        if rsi >= 70.0 {
            RsiBand::Overbought
        } else if rsi >= 60.0 {
            RsiBand::Strong
        } else if rsi >= 50.0 {
            RsiBand::Neutral
        } else if rsi >= 40.0 {
            RsiBand::Soft
        } else if rsi >= 30.0 {
            RsiBand::Weak
        } else {
            RsiBand::Oversold
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumEntry {
    pub ticker: String,
    pub rsi: f64,
    pub band: RsiBand,
}

/// Up to `limit` tickers with a known RSI, highest RSI first.
///
/// Ties are broken by ticker so the board is deterministic.
pub fn momentum_board(metrics: &[ResilienceMetrics], limit: usize) -> Vec<MomentumEntry> {
    let mut entries: Vec<MomentumEntry> = metrics
        .iter()
        .filter_map(|m| {
            m.latest_rsi.map(|rsi| MomentumEntry {
                ticker: m.ticker.clone(),
                rsi,
                band: RsiBand::classify(rsi),
            })
        })
        .collect();
    entries.sort_by(|a, b| {
        b.rsi
            .partial_cmp(&a.rsi)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    entries.truncate(limit);
    entries
}

/// Rows worth plotting on a drawdown/recovery scatter: anything that moved.
pub fn resilience_scatter(metrics: &[ResilienceMetrics]) -> Vec<ResilienceMetrics> {
    metrics
        .iter()
        .filter(|m| m.max_drawdown_pct > 0.0 || m.total_recovery_pct != 0.0)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, rsi: Option<f64>) -> ResilienceMetrics {
        ResilienceMetrics {
            latest_rsi: rsi,
            ..ResilienceMetrics::empty(ticker)
        }
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(RsiBand::classify(70.0), RsiBand::Overbought);
        assert_eq!(RsiBand::classify(69.9), RsiBand::Strong);
        assert_eq!(RsiBand::classify(50.0), RsiBand::Neutral);
        assert_eq!(RsiBand::classify(40.0), RsiBand::Soft);
        assert_eq!(RsiBand::classify(30.0), RsiBand::Weak);
        assert_eq!(RsiBand::classify(29.99), RsiBand::Oversold);
    }

    #[test]
    fn board_sorts_desc_and_skips_unknown() {
        let rows = vec![
            row("A", Some(45.0)),
            row("B", None),
            row("C", Some(72.0)),
            row("D", Some(45.0)),
        ];
        let board = momentum_board(&rows, MOMENTUM_BOARD_SIZE);
        let tickers: Vec<&str> = board.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["C", "A", "D"]);
        assert_eq!(board[0].band, RsiBand::Overbought);
    }

    #[test]
    fn board_respects_limit() {
        let rows: Vec<ResilienceMetrics> = (0..40)
            .map(|i| row(&format!("T{i:02}"), Some(i as f64)))
            .collect();
        let board = momentum_board(&rows, MOMENTUM_BOARD_SIZE);
        assert_eq!(board.len(), 30);
        assert_eq!(board[0].ticker, "T39");
    }

    #[test]
    fn scatter_drops_motionless_rows() {
        let mut moved = row("A", None);
        moved.total_recovery_pct = -2.0;
        let mut dipped = row("B", None);
        dipped.max_drawdown_pct = 4.0;
        let rows = vec![moved, dipped, row("C", None)];
        let scatter = resilience_scatter(&rows);
        assert_eq!(scatter.len(), 2);
        assert!(scatter.iter().all(|m| m.ticker != "C"));
    }
}
