//! Domain types for CrisisLab

pub mod benchmark;
pub mod crisis;
pub mod record;
pub mod selection;

pub use benchmark::{display_name, search_tickers, Benchmark};
pub use crisis::{
    crisis_presets, default_crisis, find_crisis, CrisisError, CrisisWindow, DEFAULT_CRISIS_ID,
};
pub use record::{CompanyRecord, DailyRecord, PricePoint};
pub use selection::{Selection, DEFAULT_TICKER};
