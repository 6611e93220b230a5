//! Dataset configuration loaded from TOML.
//!
//! ```toml
//! data_dir = "public/data"
//!
//! [sources]
//! nifty_index = "NIFTY_50_LITE.csv"
//! sensex_index = "SENSEX_LITE.csv"
//! nifty_companies = "NIFTY_50_COMPANIES_LITE.csv"
//! sensex_companies = "SENSEX_COMPANIES_LITE.csv"
//!
//! [selection]
//! benchmark = "NIFTY"
//! ticker = "RELIANCE.NS"
//! crisis = "covid-2020"
//! ```
//!
//! Every key is optional. An empty `ticker` or `crisis` string means "none",
//! which for the crisis selects all available history.

use std::fmt;
use std::path::{Path, PathBuf};

use crisislab_core::domain::{
    find_crisis, Benchmark, CrisisError, Selection, DEFAULT_CRISIS_ID, DEFAULT_TICKER,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Crisis(#[from] CrisisError),
}

/// The four sources every dataset is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    NiftyIndex,
    SensexIndex,
    NiftyCompanies,
    SensexCompanies,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::NiftyIndex,
        SourceKind::SensexIndex,
        SourceKind::NiftyCompanies,
        SourceKind::SensexCompanies,
    ];

    pub fn benchmark(self) -> Benchmark {
        match self {
            SourceKind::NiftyIndex | SourceKind::NiftyCompanies => Benchmark::Nifty,
            SourceKind::SensexIndex | SourceKind::SensexCompanies => Benchmark::Sensex,
        }
    }

    pub fn is_index(self) -> bool {
        matches!(self, SourceKind::NiftyIndex | SourceKind::SensexIndex)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::NiftyIndex => "NIFTY 50 index",
            SourceKind::SensexIndex => "SENSEX index",
            SourceKind::NiftyCompanies => "NIFTY 50 constituents",
            SourceKind::SensexCompanies => "SENSEX constituents",
        };
        f.write_str(s)
    }
}

/// File names of the four sources, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePaths {
    pub nifty_index: String,
    pub sensex_index: String,
    pub nifty_companies: String,
    pub sensex_companies: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            nifty_index: "NIFTY_50_LITE.csv".into(),
            sensex_index: "SENSEX_LITE.csv".into(),
            nifty_companies: "NIFTY_50_COMPANIES_LITE.csv".into(),
            sensex_companies: "SENSEX_COMPANIES_LITE.csv".into(),
        }
    }
}

impl SourcePaths {
    pub fn file_name(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::NiftyIndex => &self.nifty_index,
            SourceKind::SensexIndex => &self.sensex_index,
            SourceKind::NiftyCompanies => &self.nifty_companies,
            SourceKind::SensexCompanies => &self.sensex_companies,
        }
    }
}

/// Initial selection, by crisis id rather than full window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub benchmark: Benchmark,
    pub ticker: String,
    pub crisis: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            benchmark: Benchmark::Nifty,
            ticker: DEFAULT_TICKER.to_string(),
            crisis: DEFAULT_CRISIS_ID.to_string(),
        }
    }
}

impl SelectionConfig {
    /// Resolve the crisis id into a window and build a [`Selection`].
    pub fn to_selection(&self) -> Result<Selection, ConfigError> {
        let ticker = non_empty(&self.ticker).map(str::to_string);
        let crisis = non_empty(&self.crisis).map(find_crisis).transpose()?;
        Ok(Selection::new(self.benchmark, ticker, crisis))
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
    pub sources: SourcePaths,
    pub selection: SelectionConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public/data"),
            sources: SourcePaths::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl DatasetConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. The crisis id is validated eagerly.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.selection.to_selection()?;
        Ok(config)
    }

    /// Full path of one source file.
    pub fn source_path(&self, kind: SourceKind) -> PathBuf {
        self.data_dir.join(self.sources.file_name(kind))
    }

    pub fn to_selection(&self) -> Result<Selection, ConfigError> {
        self.selection.to_selection()
    }
}
