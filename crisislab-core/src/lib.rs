//! CrisisLab Core — resilience analytics for equities through market crises.
//!
//! This crate contains the pure analytics engine:
//! - Domain types (daily records, crisis windows, benchmarks, selection state)
//! - Time series store with inclusive crisis-window filtering
//! - Per-ticker drawdown / recovery / momentum status
//! - Market breadth and volatility pulse over the full universe
//! - Stock-vs-index trajectories rebased to 100
//! - Crisis insights with a plain-English narrative
//!
//! Nothing here performs I/O; loading lives in `crisislab-runner`.

pub mod analysis;
pub mod domain;
pub mod insight;
pub mod market;
pub mod momentum;
pub mod resilience;
pub mod store;
pub mod summary;
pub mod trajectory;

pub use analysis::{analyze, AnalysisSnapshot};
pub use insight::{synthesize_insight, AntifragilityTier, Insight};
pub use market::MarketMetrics;
pub use momentum::{MomentumEntry, RsiBand};
pub use resilience::{compute_resilience, ResilienceMetrics, Status};
pub use store::{filter_by_window, list_tickers, BenchmarkData, TickerSeries, TimeSeriesStore};
pub use summary::{BreadthSentiment, DashboardSummary, VolatilityRegime};
pub use trajectory::{normalize_trajectory, NormalizedPoint};
