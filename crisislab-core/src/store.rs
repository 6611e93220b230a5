//! Time series store — owns the loaded index series and constituent universes.
//!
//! The store is immutable once built. Crisis-window filtering borrows from it
//! (or copies the matching subsequence), and per-ticker grouping produces a
//! separate [`TickerSeries`] that downstream calculators share.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Benchmark, CompanyRecord, CrisisWindow, DailyRecord, PricePoint};

/// One benchmark's index series plus its constituents' records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkData {
    pub index: Vec<DailyRecord>,
    pub companies: Vec<CompanyRecord>,
}

impl BenchmarkData {
    pub fn new(index: Vec<DailyRecord>, companies: Vec<CompanyRecord>) -> Self {
        Self { index, companies }
    }

    pub fn record_count(&self) -> usize {
        self.index.len() + self.companies.len()
    }
}

/// All four source series of a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesStore {
    nifty: BenchmarkData,
    sensex: BenchmarkData,
}

impl TimeSeriesStore {
    pub fn new(nifty: BenchmarkData, sensex: BenchmarkData) -> Self {
        Self { nifty, sensex }
    }

    pub fn benchmark(&self, benchmark: Benchmark) -> &BenchmarkData {
        match benchmark {
            Benchmark::Nifty => &self.nifty,
            Benchmark::Sensex => &self.sensex,
        }
    }

    pub fn index(&self, benchmark: Benchmark) -> &[DailyRecord] {
        &self.benchmark(benchmark).index
    }

    pub fn companies(&self, benchmark: Benchmark) -> &[CompanyRecord] {
        &self.benchmark(benchmark).companies
    }

    pub fn tickers(&self, benchmark: Benchmark) -> Vec<String> {
        list_tickers(self.companies(benchmark))
    }

    pub fn record_count(&self) -> usize {
        self.nifty.record_count() + self.sensex.record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Records dated inside `window`, both boundaries included.
///
/// Without a window the full series is returned borrowed. The source is
/// never reordered or modified.
pub fn filter_by_window<'a, T>(series: &'a [T], window: Option<&CrisisWindow>) -> Cow<'a, [T]>
where
    T: PricePoint + Clone,
{
    match window {
        None => Cow::Borrowed(series),
        Some(w) => Cow::Owned(
            series
                .iter()
                .filter(|r| w.contains(r.date()))
                .cloned()
                .collect(),
        ),
    }
}

/// Distinct non-empty tickers in lexicographic order.
pub fn list_tickers(universe: &[CompanyRecord]) -> Vec<String> {
    universe
        .iter()
        .filter(|r| !r.ticker.is_empty())
        .map(|r| r.ticker.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Company records grouped by ticker, each group sorted ascending by date.
///
/// Built once per filtered dataset and shared by the resilience calculator
/// and the insight synthesizer. Records with an empty ticker are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerSeries {
    groups: BTreeMap<String, Vec<CompanyRecord>>,
}

impl TickerSeries {
    pub fn from_records(records: &[CompanyRecord]) -> Self {
        let mut groups: BTreeMap<String, Vec<CompanyRecord>> = BTreeMap::new();
        for record in records.iter().filter(|r| !r.ticker.is_empty()) {
            groups
                .entry(record.ticker.clone())
                .or_default()
                .push(record.clone());
        }
        // Stable sort: same-day duplicates keep their source order.
        for series in groups.values_mut() {
            series.sort_by_key(|r| r.day.date);
        }
        Self { groups }
    }

    pub fn get(&self, ticker: &str) -> Option<&[CompanyRecord]> {
        self.groups.get(ticker).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CompanyRecord])> {
        self.groups.iter().map(|(t, s)| (t.as_str(), s.as_slice()))
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
