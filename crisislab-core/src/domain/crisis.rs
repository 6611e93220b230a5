//! Crisis windows — named, inclusive date ranges that scope the resilience analysis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrisisError {
    #[error("crisis window '{id}' starts {start} after it ends {end}")]
    InvertedRange {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("unknown crisis preset '{0}'")]
    UnknownPreset(String),
}

/// A historical stress period, inclusive on both ends.
///
/// Construction goes through [`CrisisWindow::new`], which rejects
/// `start_date > end_date`; deserialization enforces the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCrisisWindow")]
pub struct CrisisWindow {
    id: String,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: String,
}

#[derive(Deserialize)]
struct RawCrisisWindow {
    id: String,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    description: String,
}

impl TryFrom<RawCrisisWindow> for CrisisWindow {
    type Error = CrisisError;

    fn try_from(raw: RawCrisisWindow) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.name, raw.start_date, raw.end_date, raw.description)
    }
}

impl CrisisWindow {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: impl Into<String>,
    ) -> Result<Self, CrisisError> {
        let id = id.into();
        if start_date > end_date {
            return Err(CrisisError::InvertedRange {
                id,
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            start_date,
            end_date,
            description: description.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Inclusive on both boundaries.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Id of the window selected when no explicit choice has been made.
pub const DEFAULT_CRISIS_ID: &str = "covid-2020";

// (id, name, start, end, description)
type PresetRow = (
    &'static str,
    &'static str,
    (i32, u32, u32),
    (i32, u32, u32),
    &'static str,
);

const PRESET_TABLE: [PresetRow; 3] = [
    (
        "2008-crisis",
        "2008 GFC",
        (2008, 1, 1),
        (2009, 12, 31),
        "Global Financial Crisis",
    ),
    (
        "2020-covid",
        "2020 COVID",
        (2020, 2, 1),
        (2021, 12, 31),
        "COVID-19 Pandemic Crash",
    ),
    (
        "2024-momentum",
        "2024-25",
        (2024, 1, 1),
        (2025, 12, 31),
        "Current Momentum Analysis",
    ),
];

const DEFAULT_ROW: PresetRow = (
    DEFAULT_CRISIS_ID,
    "2020 COVID-19 Crash",
    (2020, 2, 1),
    (2020, 12, 31),
    "COVID-19 Pandemic Crash",
);

fn build_preset(row: &PresetRow) -> CrisisWindow {
    let (id, name, (sy, sm, sd), (ey, em, ed), description) = *row;
    // Table rows are calendar dates; `presets_are_ordered_and_valid` guards them.
    let start = NaiveDate::from_ymd_opt(sy, sm, sd).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(ey, em, ed).unwrap_or(NaiveDate::MIN);
    CrisisWindow {
        id: id.to_string(),
        name: name.to_string(),
        start_date: start,
        end_date: end,
        description: description.to_string(),
    }
}

/// The selectable crisis presets, in display order.
pub fn crisis_presets() -> Vec<CrisisWindow> {
    PRESET_TABLE.iter().map(build_preset).collect()
}

/// The window used by a fresh selection: the 2020 crash, calendar year only.
pub fn default_crisis() -> CrisisWindow {
    build_preset(&DEFAULT_ROW)
}

/// Look up a preset (or the default window) by id.
pub fn find_crisis(id: &str) -> Result<CrisisWindow, CrisisError> {
    PRESET_TABLE
        .iter()
        .chain(std::iter::once(&DEFAULT_ROW))
        .find(|row| row.0 == id)
        .map(build_preset)
        .ok_or_else(|| CrisisError::UnknownPreset(id.to_string()))
}
