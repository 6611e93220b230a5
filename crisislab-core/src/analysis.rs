//! The analysis pipeline: one selection in, one immutable snapshot out.
//!
//! Order of evaluation:
//! 1. Filter the selected benchmark's index and universe to the crisis window
//! 2. Group the filtered universe by ticker (shared by steps 3 and 6)
//! 3. Resilience metrics per ticker
//! 4. Market metrics over the *unfiltered* index and universe
//! 5. Trajectory of the selected ticker against the filtered index
//! 6. Insight for the selected ticker and crisis

use serde::{Deserialize, Serialize};

use crate::domain::Selection;
use crate::insight::{synthesize_insight, Insight};
use crate::market::MarketMetrics;
use crate::momentum::{momentum_board, resilience_scatter, MomentumEntry, MOMENTUM_BOARD_SIZE};
use crate::resilience::{compute_all, ResilienceMetrics};
use crate::store::{filter_by_window, TickerSeries, TimeSeriesStore};
use crate::summary::DashboardSummary;
use crate::trajectory::{normalize_trajectory, NormalizedPoint};

/// Everything a consumer needs to render one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub selection: Selection,
    pub tickers: Vec<String>,
    pub market: MarketMetrics,
    pub summary: DashboardSummary,
    pub resilience: Vec<ResilienceMetrics>,
    pub trajectory: Vec<NormalizedPoint>,
    pub insight: Option<Insight>,
    pub momentum: Vec<MomentumEntry>,
    pub scatter: Vec<ResilienceMetrics>,
}

impl AnalysisSnapshot {
    /// Resilience row for the selected ticker, if it traded in the window.
    pub fn selected_resilience(&self) -> Option<&ResilienceMetrics> {
        let ticker = self.selection.ticker.as_deref()?;
        self.resilience.iter().find(|m| m.ticker == ticker)
    }
}

/// Run the full pipeline for `selection`. Deterministic and side-effect free.
pub fn analyze(store: &TimeSeriesStore, selection: &Selection) -> AnalysisSnapshot {
    let crisis = selection.crisis.as_ref();
    let full_index = store.index(selection.benchmark);
    let full_universe = store.companies(selection.benchmark);

    let index = filter_by_window(full_index, crisis);
    let universe = filter_by_window(full_universe, crisis);
    let series = TickerSeries::from_records(&universe);

    let resilience = compute_all(&series);
    let market = MarketMetrics::compute(full_index, full_universe);

    let trajectory = selection
        .ticker
        .as_deref()
        .and_then(|t| series.get(t))
        .map(|records| normalize_trajectory(records, &index[..]))
        .unwrap_or_default();

    let insight = synthesize_insight(selection.ticker.as_deref(), crisis, &series, &index);

    AnalysisSnapshot {
        selection: selection.clone(),
        tickers: store.tickers(selection.benchmark),
        summary: DashboardSummary::compute(&market, &resilience),
        momentum: momentum_board(&resilience, MOMENTUM_BOARD_SIZE),
        scatter: resilience_scatter(&resilience),
        market,
        resilience,
        trajectory,
        insight,
    }
}
