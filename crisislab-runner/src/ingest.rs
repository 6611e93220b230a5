//! CSV ingestion for index and constituent sources.
//!
//! Every source shares one header layout: Date, Close, High, Low, Open, Volume
//! plus the optional indicator columns SMA_20, SMA_50, MACD, Signal_Line,
//! RSI_14, BB_Upper, BB_Lower. Constituent sources add a Ticker column.
//!
//! Normalization rules:
//! - Indicator cells that are missing, empty, `null`, `undefined` or not a
//!   number become `None`.
//! - The five OHLCV cells fall back to 0 under the same conditions.
//! - A missing ticker becomes the empty string (such rows are later ignored
//!   by grouping and breadth).
//! - A missing or unparsable Date fails the whole source.

use std::io::Read;

use chrono::NaiveDate;
use crisislab_core::domain::{CompanyRecord, DailyRecord};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: missing Date")]
    MissingDate { row: usize },

    #[error("row {row}: unparsable Date '{value}'")]
    BadDate { row: usize, value: String },
}

/// One CSV row with every cell kept as text until normalization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Open")]
    open: Option<String>,
    #[serde(rename = "High")]
    high: Option<String>,
    #[serde(rename = "Low")]
    low: Option<String>,
    #[serde(rename = "Close")]
    close: Option<String>,
    #[serde(rename = "Volume")]
    volume: Option<String>,
    #[serde(rename = "SMA_20")]
    sma20: Option<String>,
    #[serde(rename = "SMA_50")]
    sma50: Option<String>,
    #[serde(rename = "MACD")]
    macd: Option<String>,
    #[serde(rename = "Signal_Line")]
    signal_line: Option<String>,
    #[serde(rename = "RSI_14")]
    rsi14: Option<String>,
    #[serde(rename = "BB_Upper")]
    bb_upper: Option<String>,
    #[serde(rename = "BB_Lower")]
    bb_lower: Option<String>,
    #[serde(rename = "Ticker")]
    ticker: Option<String>,
}

/// Parse an optional numeric cell. Sentinel strings, NaN and infinities are absent.
pub fn parse_optional(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() || cell == "null" || cell == "undefined" {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a required OHLCV cell, defaulting to 0.
pub fn parse_required(cell: Option<&str>) -> f64 {
    parse_optional(cell).unwrap_or(0.0)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(cell: Option<&str>, row: usize) -> Result<NaiveDate, IngestError> {
    let raw = cell.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(IngestError::MissingDate { row });
    };
    let day_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").map_err(|_| IngestError::BadDate {
        row,
        value: raw.to_string(),
    })
}

impl RawRow {
    fn into_daily(self, row: usize) -> Result<(DailyRecord, Option<String>), IngestError> {
        let day = DailyRecord {
            date: parse_date(self.date.as_deref(), row)?,
            open: parse_required(self.open.as_deref()),
            high: parse_required(self.high.as_deref()),
            low: parse_required(self.low.as_deref()),
            close: parse_required(self.close.as_deref()),
            volume: parse_required(self.volume.as_deref()),
            sma20: parse_optional(self.sma20.as_deref()),
            sma50: parse_optional(self.sma50.as_deref()),
            macd: parse_optional(self.macd.as_deref()),
            signal_line: parse_optional(self.signal_line.as_deref()),
            rsi14: parse_optional(self.rsi14.as_deref()),
            bb_upper: parse_optional(self.bb_upper.as_deref()),
            bb_lower: parse_optional(self.bb_lower.as_deref()),
        };
        Ok((day, self.ticker))
    }
}

fn parse_rows<R, T, F>(reader: R, mut build: F) -> Result<Vec<T>, IngestError>
where
    R: Read,
    F: FnMut(DailyRecord, Option<String>) -> T,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, result) in csv_reader.deserialize::<RawRow>().enumerate() {
        // Data rows are numbered from 1; the header is not counted.
        let (day, ticker) = result?.into_daily(i + 1)?;
        out.push(build(day, ticker));
    }
    Ok(out)
}

/// Parse an index source (no Ticker column) in file order.
pub fn parse_index_csv<R: Read>(reader: R) -> Result<Vec<DailyRecord>, IngestError> {
    parse_rows(reader, |day, _| day)
}

/// Parse a constituent source in file order.
pub fn parse_company_csv<R: Read>(reader: R) -> Result<Vec<CompanyRecord>, IngestError> {
    parse_rows(reader, |day, ticker| {
        let ticker = ticker.map(|t| t.trim().to_string()).unwrap_or_default();
        CompanyRecord::new(ticker, day)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_CSV: &str = "\
Date,Close,High,Low,Open,Volume,SMA_20,SMA_50,MACD,Signal_Line,RSI_14,BB_Upper,BB_Lower
2020-02-03,11707.9,11749.9,11614.5,11627.5,0,12100.4,null,,undefined,38.2,12400,11800
2020-02-04,11979.65,11986.15,11783.4,11786.25,abc,12080.1,12050.3,-40.1,-30.2,52.9,12390,11770
";

    const COMPANY_CSV: &str = "\
Date,Close,High,Low,Open,Volume,SMA_20,SMA_50,RSI_14,Ticker
2020-02-03,1400.5,1410,1390,1395,1000,,1450.2,41.0,RELIANCE.NS
2020-02-03,2100,2110,2090,2095,500,,,,
";

    #[test]
    fn optional_sentinels_are_absent() {
        assert_eq!(parse_optional(None), None);
        assert_eq!(parse_optional(Some("")), None);
        assert_eq!(parse_optional(Some("  ")), None);
        assert_eq!(parse_optional(Some("null")), None);
        assert_eq!(parse_optional(Some("undefined")), None);
        assert_eq!(parse_optional(Some("NaN")), None);
        assert_eq!(parse_optional(Some("n/a")), None);
        assert_eq!(parse_optional(Some("inf")), None);
        assert_eq!(parse_optional(Some("-Infinity")), None);
        assert_eq!(parse_optional(Some(" 42.5 ")), Some(42.5));
        assert_eq!(parse_optional(Some("-3")), Some(-3.0));
    }

    #[test]
    fn required_fields_default_to_zero() {
        assert_eq!(parse_required(Some("null")), 0.0);
        assert_eq!(parse_required(None), 0.0);
        assert_eq!(parse_required(Some("7.25")), 7.25);
        assert_eq!(parse_required(Some("infinity")), 0.0);
    }

    #[test]
    fn index_rows_parse_with_absent_indicators() {
        let rows = parse_index_csv(INDEX_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 2, 3).unwrap());
        assert_eq!(first.close, 11707.9);
        assert_eq!(first.sma20, Some(12100.4));
        assert_eq!(first.sma50, None);
        assert_eq!(first.macd, None);
        assert_eq!(first.signal_line, None);
        assert_eq!(first.rsi14, Some(38.2));

        // Unparsable volume falls back to zero rather than failing the row.
        assert_eq!(rows[1].volume, 0.0);
        assert_eq!(rows[1].sma50, Some(12050.3));
    }

    #[test]
    fn company_rows_keep_ticker_and_tolerate_missing_columns() {
        let rows = parse_company_csv(COMPANY_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker, "RELIANCE.NS");
        assert_eq!(rows[0].day.sma50, Some(1450.2));
        // MACD columns are not in this header at all.
        assert_eq!(rows[0].day.macd, None);
        assert_eq!(rows[1].ticker, "");
    }

    #[test]
    fn empty_lines_are_skipped() {
        let csv = "Date,Close\n2020-01-01,10\n\n2020-01-02,11\n";
        assert_eq!(parse_index_csv(csv.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn timestamp_suffix_is_ignored() {
        let csv = "Date,Close\n2020-01-01 00:00:00+05:30,10\n";
        let rows = parse_index_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn bad_date_fails_the_source() {
        let csv = "Date,Close\n2020-01-01,10\nnot-a-date,11\n";
        let err = parse_index_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::BadDate { row: 2, .. }));
    }

    #[test]
    fn missing_date_fails_the_source() {
        let csv = "Date,Close\n,10\n";
        let err = parse_index_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingDate { row: 1 }));
    }

    #[test]
    fn header_only_source_is_empty() {
        let rows = parse_company_csv("Date,Close,Ticker\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
