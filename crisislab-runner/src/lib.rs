//! CrisisLab Runner — dataset loading, sessions and report export.
//!
//! This crate builds on `crisislab-core` to provide:
//! - TOML dataset configuration with a default selection
//! - CSV ingestion with parse-to-absent indicator handling
//! - Parallel all-or-nothing loading of the four sources
//! - A deterministic synthetic dataset for development
//! - A memoizing analysis session keyed by selection
//! - JSON and CSV report export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod ingest;
pub mod session;
pub mod synthetic;

pub use config::{ConfigError, DatasetConfig, SelectionConfig, SourceKind, SourcePaths};
pub use data_loader::{compute_dataset_hash, load_dataset, LoadError, LoadOptions, LoadedDataset};
pub use export::{
    export_json, export_resilience_csv, import_json, write_json, write_resilience_csv,
    ExportedReport, SCHEMA_VERSION,
};
pub use ingest::{parse_company_csv, parse_index_csv, IngestError};
pub use session::AnalysisSession;
pub use synthetic::generate_synthetic_dataset;
