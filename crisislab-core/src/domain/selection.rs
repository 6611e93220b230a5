//! Selection state — the explicit input tuple every analysis is computed from.

use serde::{Deserialize, Serialize};

use super::benchmark::Benchmark;
use super::crisis::{default_crisis, CrisisWindow};

/// Ticker selected on a fresh session.
pub const DEFAULT_TICKER: &str = "RELIANCE.NS";

/// Which benchmark, ticker and crisis window the analysis should describe.
///
/// `crisis == None` means "all available history". Selections are values:
/// the transition methods return a new selection and never mutate shared
/// state, so a selection can double as a memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub benchmark: Benchmark,
    pub ticker: Option<String>,
    pub crisis: Option<CrisisWindow>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            benchmark: Benchmark::Nifty,
            ticker: Some(DEFAULT_TICKER.to_string()),
            crisis: Some(default_crisis()),
        }
    }
}

impl Selection {
    pub fn new(benchmark: Benchmark, ticker: Option<String>, crisis: Option<CrisisWindow>) -> Self {
        Self {
            benchmark,
            ticker,
            crisis,
        }
    }

    /// Switch benchmark. Tickers belong to a universe, so the ticker is cleared
    /// whenever the benchmark changes.
    pub fn with_benchmark(&self, benchmark: Benchmark) -> Self {
        if benchmark == self.benchmark {
            return self.clone();
        }
        Self {
            benchmark,
            ticker: None,
            crisis: self.crisis.clone(),
        }
    }

    pub fn with_ticker(&self, ticker: Option<String>) -> Self {
        Self {
            ticker,
            ..self.clone()
        }
    }

    /// Selecting the active window again clears it; any other window replaces it.
    pub fn toggle_crisis(&self, crisis: CrisisWindow) -> Self {
        let next = match &self.crisis {
            Some(current) if current.id() == crisis.id() => None,
            _ => Some(crisis),
        };
        Self {
            crisis: next,
            ..self.clone()
        }
    }

    pub fn clear_crisis(&self) -> Self {
        Self {
            crisis: None,
            ..self.clone()
        }
    }
}
