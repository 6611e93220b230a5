//! Crisis insight — how the selected stock weathered the selected crisis
//! compared with its benchmark.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{display_name, CrisisWindow, DailyRecord};
use crate::resilience::{compute_resilience, max_drawdown_pct};
use crate::store::TickerSeries;

/// Recoveries faster than this many records count as strong antifragility.
pub const STRONG_RECOVERY_DAYS: usize = 120;

/// Round to one decimal place, the precision insights are reported at.
///
/// Rounds from the exact binary value, so `0.15` (stored just below) gives
/// `0.1`, the same as the narrative text.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntifragilityTier {
    Strong,
    Moderate,
    Unrecovered,
}

impl AntifragilityTier {
    pub fn from_recovery(recovery_days: Option<usize>) -> Self {
        match recovery_days {
            Some(days) if days < STRONG_RECOVERY_DAYS => AntifragilityTier::Strong,
            Some(_) => AntifragilityTier::Moderate,
            None => AntifragilityTier::Unrecovered,
        }
    }
}

impl fmt::Display for AntifragilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AntifragilityTier::Strong => "Strong",
            AntifragilityTier::Moderate => "Moderate",
            AntifragilityTier::Unrecovered => "Unrecovered",
        };
        f.write_str(s)
    }
}

/// Percentages are rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub crisis_name: String,
    pub ticker: String,
    pub stock_drawdown_pct: f64,
    pub index_drawdown_pct: f64,
    pub recovery_days: Option<usize>,
    pub total_recovery_pct: f64,
}

impl Insight {
    /// A smaller drawdown than the index means the stock held up better.
    pub fn outperformed(&self) -> bool {
        self.stock_drawdown_pct < self.index_drawdown_pct
    }

    pub fn tier(&self) -> AntifragilityTier {
        AntifragilityTier::from_recovery(self.recovery_days)
    }

    /// Plain-English summary of the insight.
    pub fn narrative(&self) -> String {
        let name = display_name(&self.ticker);
        let mut text = format!(
            "During the {} period, {} fell {:.1}% (Index fell {:.1}%)",
            self.crisis_name, name, self.stock_drawdown_pct, self.index_drawdown_pct
        );
        match self.recovery_days {
            Some(days) => text.push_str(&format!(
                " and recovered its pre-crisis value in {days} trading days."
            )),
            None => text.push_str(&format!(
                " and has gained {:.1}% from the trough.",
                self.total_recovery_pct
            )),
        }
        if self.outperformed() {
            text.push_str(&format!(
                " {name} showed stronger resilience than the Index."
            ));
        }
        text
    }
}

/// Combine the selected ticker's resilience with the index drawdown.
///
/// `series` and `index` must already be filtered to `crisis`. Absent when
/// there is no ticker or crisis, or when either filtered series is empty.
pub fn synthesize_insight(
    ticker: Option<&str>,
    crisis: Option<&CrisisWindow>,
    series: &TickerSeries,
    index: &[DailyRecord],
) -> Option<Insight> {
    let ticker = ticker?;
    let crisis = crisis?;
    let records = series.get(ticker).filter(|r| !r.is_empty())?;
    if index.is_empty() {
        return None;
    }

    let stock = compute_resilience(ticker, records);
    Some(Insight {
        crisis_name: crisis.name().to_string(),
        ticker: ticker.to_string(),
        stock_drawdown_pct: round_to_tenth(stock.max_drawdown_pct),
        index_drawdown_pct: round_to_tenth(max_drawdown_pct(index)),
        recovery_days: stock.recovery_days,
        total_recovery_pct: round_to_tenth(stock.total_recovery_pct),
    })
}
