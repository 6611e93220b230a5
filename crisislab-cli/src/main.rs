//! CrisisLab CLI — crisis resilience reports from the command line.
//!
//! Commands:
//! - `report` — load the dataset and print market pulse, resilience table,
//!   trajectory endpoints and the crisis insight for one selection
//! - `tickers` — list the constituents of a benchmark
//! - `presets` — list the built-in crisis windows

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crisislab_core::domain::{
    crisis_presets, default_crisis, display_name, find_crisis, search_tickers, Benchmark,
    CrisisWindow, Selection,
};
use crisislab_core::AnalysisSnapshot;
use crisislab_runner::{
    load_dataset, write_json, write_resilience_csv, AnalysisSession, DatasetConfig, LoadOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "crisislab",
    about = "CrisisLab CLI — how equities weathered market crises"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the data comes from; shared by every data-backed command.
#[derive(clap::Args)]
struct DataArgs {
    /// Path to a TOML dataset config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the four CSV sources. Overrides the config.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Use a generated dataset instead of the CSV files.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one benchmark / ticker / crisis selection.
    Report {
        #[command(flatten)]
        data: DataArgs,

        /// Benchmark: nifty or sensex.
        #[arg(long)]
        benchmark: Option<Benchmark>,

        /// Ticker to focus on (e.g. RELIANCE.NS).
        #[arg(long)]
        ticker: Option<String>,

        /// Crisis preset id (see `crisislab presets`).
        #[arg(long, conflicts_with = "all_history")]
        crisis: Option<String>,

        /// Analyze all available history instead of a crisis window.
        #[arg(long, default_value_t = false)]
        all_history: bool,

        /// Write the full snapshot as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the resilience table as CSV to this path.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the tickers of a benchmark.
    Tickers {
        #[command(flatten)]
        data: DataArgs,

        /// Benchmark: nifty or sensex.
        #[arg(long, default_value = "nifty")]
        benchmark: Benchmark,

        /// Case-insensitive substring filter.
        #[arg(long)]
        search: Option<String>,
    },
    /// List the built-in crisis windows.
    Presets,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            data,
            benchmark,
            ticker,
            crisis,
            all_history,
            json,
            csv,
        } => run_report(data, benchmark, ticker, crisis, all_history, json, csv),
        Commands::Tickers {
            data,
            benchmark,
            search,
        } => run_tickers(data, benchmark, search),
        Commands::Presets => {
            run_presets();
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(data: &DataArgs) -> Result<DatasetConfig> {
    let mut config = match &data.config {
        Some(path) => DatasetConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DatasetConfig::default(),
    };
    if let Some(dir) = &data.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn open_session(data: &DataArgs, config: &DatasetConfig) -> Result<AnalysisSession> {
    let opts = LoadOptions {
        synthetic: data.synthetic,
    };
    let loaded = load_dataset(config, &opts).context("failed to load market data")?;
    Ok(AnalysisSession::from_loaded(loaded))
}

fn run_report(
    data: DataArgs,
    benchmark: Option<Benchmark>,
    ticker: Option<String>,
    crisis: Option<String>,
    all_history: bool,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(&data)?;

    // Config first, then flags on top.
    let mut selection = config.to_selection()?;
    if let Some(b) = benchmark {
        selection = selection.with_benchmark(b);
    }
    if ticker.is_some() {
        selection = selection.with_ticker(ticker);
    }
    if all_history {
        selection = selection.clear_crisis();
    } else if let Some(id) = crisis {
        selection = Selection {
            crisis: Some(find_crisis(&id)?),
            ..selection
        };
    }

    tracing::info!(
        benchmark = %selection.benchmark,
        ticker = selection.ticker.as_deref().unwrap_or("-"),
        crisis = selection.crisis.as_ref().map_or("all", |c| c.id()),
        "running report"
    );
    let mut session = open_session(&data, &config)?;
    let snapshot = session.snapshot(&selection);

    if session.has_synthetic() {
        println!("NOTE: synthetic dataset, not real market data\n");
    }
    print_report(&snapshot);
    println!("\nDataset: {}", session.dataset_hash());

    if let Some(path) = json {
        write_json(&path, &snapshot, session.dataset_hash())?;
        println!("JSON report saved to: {}", path.display());
    }
    if let Some(path) = csv {
        write_resilience_csv(&path, &snapshot.resilience)?;
        println!("Resilience table saved to: {}", path.display());
    }
    Ok(())
}

fn window_label(crisis: Option<&CrisisWindow>) -> String {
    match crisis {
        Some(c) => format!("{} ({} to {})", c.name(), c.start_date(), c.end_date()),
        None => "All available history".to_string(),
    }
}

fn print_report(snap: &AnalysisSnapshot) {
    let sel = &snap.selection;
    println!("=== CrisisLab Report ===");
    println!("Benchmark:  {}", sel.benchmark.label());
    println!("Ticker:     {}", sel.ticker.as_deref().unwrap_or("-"));
    println!("Window:     {}", window_label(sel.crisis.as_ref()));

    let m = &snap.market;
    let s = &snap.summary;
    println!("\n--- Market Pulse ---");
    println!(
        "Breadth:    {:.1}% above SMA-50 ({:?})",
        m.market_breadth_pct, s.breadth_sentiment
    );
    println!(
        "Volatility: {:.2}% now vs {:.2}% trailing year, ratio {:.2} ({:?})",
        m.current_volatility, m.historical_volatility, m.volatility_ratio, s.volatility_regime
    );
    match s.avg_recovery_days {
        Some(avg) => println!("Avg recovery: {avg:.0} trading days"),
        None => println!("Avg recovery: -"),
    }
    println!("Leading:    {} of {}", s.leading_count, s.total_count);

    println!("\n--- Resilience ---");
    if snap.resilience.is_empty() {
        println!("No constituent data in this window.");
    } else {
        println!(
            "{:<16} {:>9} {:>10} {:>9} {:>11} {:>6}  {}",
            "Ticker", "Drawdown", "Recovery", "Days", "Price", "RSI", "Status"
        );
        for r in &snap.resilience {
            println!(
                "{:<16} {:>8.1}% {:>9.1}% {:>9} {:>11.2} {:>6}  {}",
                r.ticker,
                r.max_drawdown_pct,
                r.total_recovery_pct,
                r.recovery_days.map_or("-".to_string(), |d| d.to_string()),
                r.current_price,
                r.latest_rsi.map_or("-".to_string(), |v| format!("{v:.1}")),
                r.status,
            );
        }
    }

    println!("\n--- Trajectory (base 100) ---");
    match (snap.trajectory.first(), snap.trajectory.last()) {
        (Some(first), Some(last)) => {
            println!(
                "{} -> {}: stock {:.1}, index {:.1} ({} points)",
                first.date,
                last.date,
                last.stock_index100,
                last.index_index100,
                snap.trajectory.len()
            );
        }
        _ => println!("No common dates for the selected ticker and index."),
    }

    println!("\n--- Insight ---");
    match &snap.insight {
        Some(insight) => {
            println!("{}", insight.narrative());
            println!("Antifragility: {}", insight.tier());
        }
        None => println!("Select a ticker and a crisis window to see an insight."),
    }
}

fn run_tickers(data: DataArgs, benchmark: Benchmark, search: Option<String>) -> Result<()> {
    let config = resolve_config(&data)?;
    let session = open_session(&data, &config)?;
    let tickers = session.store().tickers(benchmark);
    let matches = search_tickers(&tickers, search.as_deref().unwrap_or(""));

    println!("{} constituents ({} shown):", benchmark.label(), matches.len());
    for t in matches {
        println!("  {:<16} {}", t, display_name(t));
    }
    Ok(())
}

fn run_presets() {
    let default = default_crisis();
    println!(
        "{:<14} {:<22} {:<10} {:<10}  {}",
        "ID", "Name", "Start", "End", "Description"
    );
    for p in std::iter::once(default).chain(crisis_presets()) {
        println!(
            "{:<14} {:<22} {:<10} {:<10}  {}",
            p.id(),
            p.name(),
            p.start_date().to_string(),
            p.end_date().to_string(),
            p.description()
        );
    }
}
