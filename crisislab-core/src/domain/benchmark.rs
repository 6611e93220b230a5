//! Benchmark indices and ticker naming helpers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two benchmark families a dataset carries: an index series plus its
/// constituent universe for each.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Benchmark {
    #[default]
    Nifty,
    Sensex,
}

impl Benchmark {
    pub const ALL: [Benchmark; 2] = [Benchmark::Nifty, Benchmark::Sensex];

    pub fn label(self) -> &'static str {
        match self {
            Benchmark::Nifty => "NIFTY 50",
            Benchmark::Sensex => "SENSEX",
        }
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Benchmark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "").as_str() {
            "nifty" | "nifty50" => Ok(Benchmark::Nifty),
            "sensex" => Ok(Benchmark::Sensex),
            other => Err(format!("unknown benchmark '{other}' (expected nifty or sensex)")),
        }
    }
}

/// Exchange suffixes stripped for display (NSE, BSE).
const EXCHANGE_SUFFIXES: [&str; 2] = [".NS", ".BO"];

/// Ticker without its exchange suffix: `RELIANCE.NS` → `RELIANCE`.
pub fn display_name(ticker: &str) -> &str {
    EXCHANGE_SUFFIXES
        .iter()
        .find_map(|suffix| ticker.strip_suffix(suffix))
        .unwrap_or(ticker)
}

/// Case-insensitive substring search over a ticker list. Order is preserved.
pub fn search_tickers<'a>(tickers: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.to_lowercase();
    tickers
        .iter()
        .filter(|t| t.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("NIFTY".parse::<Benchmark>().unwrap(), Benchmark::Nifty);
        assert_eq!("nifty-50".parse::<Benchmark>().unwrap(), Benchmark::Nifty);
        assert_eq!(" Sensex ".parse::<Benchmark>().unwrap(), Benchmark::Sensex);
        assert!("dow".parse::<Benchmark>().is_err());
    }

    #[test]
    fn serde_uses_upper_case_names() {
        assert_eq!(serde_json::to_string(&Benchmark::Sensex).unwrap(), "\"SENSEX\"");
    }

    #[test]
    fn strips_exchange_suffixes() {
        assert_eq!(display_name("RELIANCE.NS"), "RELIANCE");
        assert_eq!(display_name("TCS.BO"), "TCS");
        assert_eq!(display_name("INFY"), "INFY");
        assert_eq!(display_name("M&M.NS"), "M&M");
    }

    #[test]
    fn search_is_case_insensitive() {
        let tickers: Vec<String> = ["HDFCBANK.NS", "ICICIBANK.NS", "TCS.NS"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(search_tickers(&tickers, "bank"), vec!["HDFCBANK.NS", "ICICIBANK.NS"]);
        assert_eq!(search_tickers(&tickers, "").len(), 3);
        assert!(search_tickers(&tickers, "wipro").is_empty());
    }
}
