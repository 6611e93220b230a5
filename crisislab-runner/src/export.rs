//! Report export — JSON snapshots and CSV resilience tables.
//!
//! JSON reports carry a `schema_version` and the dataset hash they were
//! computed from. Newer schema versions are rejected on import.

use std::path::Path;

use anyhow::{bail, Context, Result};
use crisislab_core::{AnalysisSnapshot, ResilienceMetrics};
use serde::{Deserialize, Serialize};

/// Current report schema version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedReport {
    pub schema_version: u32,
    pub dataset_hash: String,
    pub snapshot: AnalysisSnapshot,
}

impl ExportedReport {
    pub fn new(snapshot: AnalysisSnapshot, dataset_hash: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dataset_hash: dataset_hash.into(),
            snapshot,
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a snapshot to pretty JSON, stamped with schema and dataset hash.
pub fn export_json(snapshot: &AnalysisSnapshot, dataset_hash: &str) -> Result<String> {
    let report = ExportedReport::new(snapshot.clone(), dataset_hash);
    serde_json::to_string_pretty(&report).context("failed to serialize report to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ExportedReport> {
    let report: ExportedReport =
        serde_json::from_str(json).context("failed to deserialize report from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

pub fn write_json(path: &Path, snapshot: &AnalysisSnapshot, dataset_hash: &str) -> Result<()> {
    let json = export_json(snapshot, dataset_hash)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt_cell<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Resilience table as CSV. Absent values are empty cells.
///
/// Columns: ticker, max_drawdown_pct, total_recovery_pct, recovery_days,
/// current_price, latest_rsi, status
pub fn export_resilience_csv(rows: &[ResilienceMetrics]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "max_drawdown_pct",
        "total_recovery_pct",
        "recovery_days",
        "current_price",
        "latest_rsi",
        "status",
    ])?;

    for m in rows {
        wtr.write_record([
            m.ticker.clone(),
            format!("{:.4}", m.max_drawdown_pct),
            format!("{:.4}", m.total_recovery_pct),
            opt_cell(m.recovery_days),
            format!("{:.4}", m.current_price),
            opt_cell(m.latest_rsi.map(|r| format!("{r:.2}"))),
            m.status.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn write_resilience_csv(path: &Path, rows: &[ResilienceMetrics]) -> Result<()> {
    let csv = export_resilience_csv(rows)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::generate_synthetic_dataset;
    use crisislab_core::domain::Selection;
    use crisislab_core::{analyze, Status};

    fn snapshot() -> AnalysisSnapshot {
        analyze(&generate_synthetic_dataset(), &Selection::default())
    }

    #[test]
    fn json_round_trip_keeps_hash_and_version() {
        let snap = snapshot();
        let json = export_json(&snap, "abc123").unwrap();
        let report = import_json(&json).unwrap();
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.dataset_hash, "abc123");
        assert_eq!(report.snapshot, snap);
    }

    #[test]
    fn json_round_trip_is_bit_exact_for_floats() {
        let mut snap = snapshot();
        let awkward = [596.0 / 1480.0 * 100.0, 0.1 + 0.2, 1.0 / 3.0, 2.0_f64.sqrt() * 1e-7];
        for (m, v) in snap.resilience.iter_mut().zip(awkward) {
            m.max_drawdown_pct = v;
            m.total_recovery_pct = v * 7.0;
        }
        let report = import_json(&export_json(&snap, "h").unwrap()).unwrap();
        for (got, want) in report.snapshot.resilience.iter().zip(&snap.resilience) {
            assert_eq!(got.max_drawdown_pct.to_bits(), want.max_drawdown_pct.to_bits());
            assert_eq!(got.total_recovery_pct.to_bits(), want.total_recovery_pct.to_bits());
        }
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut report = ExportedReport::new(snapshot(), "h");
        report.schema_version = 99;
        let json = serde_json::to_string(&report).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 99"));
    }

    #[test]
    fn garbage_json_is_an_error() {
        assert!(import_json("{not json").is_err());
    }

    #[test]
    fn csv_has_header_and_empty_cells_for_absent_values() {
        let rows = vec![
            ResilienceMetrics {
                ticker: "A.NS".into(),
                max_drawdown_pct: 20.0,
                total_recovery_pct: 31.25,
                recovery_days: Some(4),
                current_price: 105.0,
                latest_rsi: Some(61.234),
                status: Status::Leading,
            },
            ResilienceMetrics::empty("B.NS"),
        ];
        let csv = export_resilience_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "ticker,max_drawdown_pct,total_recovery_pct,recovery_days,current_price,latest_rsi,status"
        );
        assert_eq!(lines[1], "A.NS,20.0000,31.2500,4,105.0000,61.23,Leading");
        assert_eq!(lines[2], "B.NS,0.0000,0.0000,,0.0000,,Lagging");
    }

    #[test]
    fn write_json_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&path, &snapshot(), "h").unwrap();
        let report = import_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.dataset_hash, "h");
    }
}
