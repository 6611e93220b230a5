//! Daily records — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of an index or a stock, with pre-computed indicators.
///
/// Indicator fields are `None` when the data source could not compute them
/// (typically during the warm-up window). They are never treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub rsi14: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
}

impl DailyRecord {
    /// A record with only the close known; every other price is set to the
    /// close and every indicator is absent.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
            sma20: None,
            sma50: None,
            macd: None,
            signal_line: None,
            rsi14: None,
            bb_upper: None,
            bb_lower: None,
        }
    }

    /// True when the close sits above a known 50-day SMA.
    pub fn is_above_sma50(&self) -> bool {
        self.sma50.is_some_and(|sma| self.close > sma)
    }
}

/// A daily record belonging to one constituent of a benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub ticker: String,
    #[serde(flatten)]
    pub day: DailyRecord,
}

impl CompanyRecord {
    pub fn new(ticker: impl Into<String>, day: DailyRecord) -> Self {
        Self {
            ticker: ticker.into(),
            day,
        }
    }
}

/// Anything with a trading date and a closing price.
///
/// Lets the window filter and the drawdown tracker run over index and
/// company series alike.
pub trait PricePoint {
    fn date(&self) -> NaiveDate;
    fn close(&self) -> f64;
}

impl PricePoint for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn close(&self) -> f64 {
        self.close
    }
}

impl PricePoint for CompanyRecord {
    fn date(&self) -> NaiveDate {
        self.day.date
    }

    fn close(&self) -> f64 {
        self.day.close
    }
}
