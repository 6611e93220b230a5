//! Dataset loading for the runner.
//!
//! Reads the four configured CSV sources in parallel and builds a
//! [`TimeSeriesStore`]. Loading is all-or-nothing: if any source cannot be
//! opened or parsed the whole load fails, and nothing downstream runs.
//!
//! With `synthetic` set, the files are not touched at all and a deterministic
//! synthetic dataset is returned instead, tagged as such.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crisislab_core::domain::{Benchmark, CompanyRecord, DailyRecord};
use crisislab_core::store::{BenchmarkData, TimeSeriesStore};
use thiserror::Error;

use crate::config::{DatasetConfig, SourceKind};
use crate::ingest::{parse_company_csv, parse_index_csv, IngestError};
use crate::synthetic::generate_synthetic_dataset;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {kind} at {path}: {source} (use --synthetic for synthetic data)")]
    Open {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {kind} at {path}: {source}")]
    Parse {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: IngestError,
    },
}

impl LoadError {
    pub fn kind(&self) -> SourceKind {
        match self {
            LoadError::Open { kind, .. } | LoadError::Parse { kind, .. } => *kind,
        }
    }
}

/// Options controlling how the dataset is loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Skip the files and generate a synthetic dataset.
    pub synthetic: bool,
}

/// Row counts per source, for logging and reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub nifty_index: usize,
    pub sensex_index: usize,
    pub nifty_companies: usize,
    pub sensex_companies: usize,
}

impl SourceCounts {
    fn of(store: &TimeSeriesStore) -> Self {
        Self {
            nifty_index: store.index(Benchmark::Nifty).len(),
            sensex_index: store.index(Benchmark::Sensex).len(),
            nifty_companies: store.companies(Benchmark::Nifty).len(),
            sensex_companies: store.companies(Benchmark::Sensex).len(),
        }
    }

    pub fn total(&self) -> usize {
        self.nifty_index + self.sensex_index + self.nifty_companies + self.sensex_companies
    }
}

/// A fully loaded dataset plus its provenance.
#[derive(Debug)]
pub struct LoadedDataset {
    pub store: TimeSeriesStore,
    /// BLAKE3 over every record, in a fixed order.
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub counts: SourceCounts,
}

/// Load the dataset described by `config`.
pub fn load_dataset(config: &DatasetConfig, opts: &LoadOptions) -> Result<LoadedDataset, LoadError> {
    let (store, has_synthetic) = if opts.synthetic {
        tracing::warn!("generating synthetic dataset; results are not real market data");
        (generate_synthetic_dataset(), true)
    } else {
        tracing::info!(data_dir = %config.data_dir.display(), "loading dataset");
        (load_sources(config)?, false)
    };

    let dataset_hash = compute_dataset_hash(&store);
    let counts = SourceCounts::of(&store);
    tracing::info!(
        records = counts.total(),
        nifty_tickers = store.tickers(Benchmark::Nifty).len(),
        sensex_tickers = store.tickers(Benchmark::Sensex).len(),
        hash = %&dataset_hash[..12],
        "dataset ready"
    );

    Ok(LoadedDataset {
        store,
        dataset_hash,
        has_synthetic,
        counts,
    })
}

fn load_sources(config: &DatasetConfig) -> Result<TimeSeriesStore, LoadError> {
    let ((nifty_index, sensex_index), (nifty_companies, sensex_companies)) = rayon::join(
        || {
            rayon::join(
                || read_index(config, SourceKind::NiftyIndex),
                || read_index(config, SourceKind::SensexIndex),
            )
        },
        || {
            rayon::join(
                || read_companies(config, SourceKind::NiftyCompanies),
                || read_companies(config, SourceKind::SensexCompanies),
            )
        },
    );

    Ok(TimeSeriesStore::new(
        BenchmarkData::new(nifty_index?, nifty_companies?),
        BenchmarkData::new(sensex_index?, sensex_companies?),
    ))
}

fn open_source(config: &DatasetConfig, kind: SourceKind) -> Result<(PathBuf, File), LoadError> {
    let path = config.source_path(kind);
    match File::open(&path) {
        Ok(file) => Ok((path, file)),
        Err(source) => Err(LoadError::Open { kind, path, source }),
    }
}

fn read_index(config: &DatasetConfig, kind: SourceKind) -> Result<Vec<DailyRecord>, LoadError> {
    let (path, file) = open_source(config, kind)?;
    let rows = parse_index_csv(BufReader::new(file))
        .map_err(|source| LoadError::Parse { kind, path: path.clone(), source })?;
    tracing::debug!(source = %kind, rows = rows.len(), path = %path.display(), "parsed");
    Ok(rows)
}

fn read_companies(
    config: &DatasetConfig,
    kind: SourceKind,
) -> Result<Vec<CompanyRecord>, LoadError> {
    let (path, file) = open_source(config, kind)?;
    let rows = parse_company_csv(BufReader::new(file))
        .map_err(|source| LoadError::Parse { kind, path: path.clone(), source })?;
    tracing::debug!(source = %kind, rows = rows.len(), path = %path.display(), "parsed");
    Ok(rows)
}

fn hash_record(hasher: &mut blake3::Hasher, day: &DailyRecord) {
    hasher.update(day.date.to_string().as_bytes());
    for v in [day.open, day.high, day.low, day.close, day.volume] {
        hasher.update(&v.to_le_bytes());
    }
    for v in [
        day.sma20,
        day.sma50,
        day.macd,
        day.signal_line,
        day.rsi14,
        day.bb_upper,
        day.bb_lower,
    ] {
        match v {
            Some(x) => hasher.update(&[1]).update(&x.to_le_bytes()),
            None => hasher.update(&[0]),
        };
    }
}

/// Deterministic BLAKE3 hash over the whole store.
///
/// Benchmarks are hashed in a fixed order and records in source order, so two
/// loads of the same files always agree.
pub fn compute_dataset_hash(store: &TimeSeriesStore) -> String {
    let mut hasher = blake3::Hasher::new();
    for benchmark in Benchmark::ALL {
        hasher.update(benchmark.label().as_bytes());
        for day in store.index(benchmark) {
            hash_record(&mut hasher, day);
        }
        for rec in store.companies(benchmark) {
            hasher.update(rec.ticker.as_bytes());
            hasher.update(&[0xff]);
            hash_record(&mut hasher, &rec.day);
        }
    }
    hasher.finalize().to_hex().to_string()
}
