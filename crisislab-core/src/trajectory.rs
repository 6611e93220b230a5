//! Dual-series trajectory — a stock and its benchmark rebased to 100.
//!
//! The two series are joined on date. Dates missing from either side are
//! dropped, never interpolated, so every emitted point carries two real closes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::domain::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub stock_index100: f64,
    pub index_index100: f64,
    pub stock_price: f64,
    pub index_price: f64,
}

/// Dates present in both series, ascending.
pub fn common_dates<S: PricePoint, I: PricePoint>(stock: &[S], index: &[I]) -> Vec<NaiveDate> {
    let index_dates: BTreeSet<NaiveDate> = index.iter().map(PricePoint::date).collect();
    stock
        .iter()
        .map(PricePoint::date)
        .filter(|d| index_dates.contains(d))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rebase both series to 100 at their first common date.
///
/// The rebasing point is the earliest shared date where both closes are
/// positive, which may be later than the window start when either series is
/// sparse or carries zero closes. Shared dates before it are skipped. Returns
/// an empty vector when no such date exists. If a date appears more than once
/// in a series, the last occurrence is used.
pub fn normalize_trajectory<S, I>(stock: &[S], index: &[I]) -> Vec<NormalizedPoint>
where
    S: PricePoint,
    I: PricePoint,
{
    let stock_by_date: HashMap<NaiveDate, f64> =
        stock.iter().map(|r| (r.date(), r.close())).collect();
    let index_by_date: HashMap<NaiveDate, f64> =
        index.iter().map(|r| (r.date(), r.close())).collect();

    let dates = common_dates(stock, index);
    let Some(start) = dates
        .iter()
        .position(|d| stock_by_date[d] > 0.0 && index_by_date[d] > 0.0)
    else {
        return Vec::new();
    };
    let base_stock = stock_by_date[&dates[start]];
    let base_index = index_by_date[&dates[start]];

    dates[start..]
        .iter()
        .map(|date| {
            let stock_price = stock_by_date[date];
            let index_price = index_by_date[date];
            NormalizedPoint {
                date: *date,
                stock_index100: stock_price / base_stock * 100.0,
                index_index100: index_price / base_index * 100.0,
                stock_price,
                index_price,
            }
        })
        .collect()
}
