//! CLI definition and dispatch.

use chrono::DateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::validate_engine_config;
use crate::domain::metrics::SignalQuality;
use crate::domain::rule::RuleRegistry;
use crate::domain::series::Series;
use crate::domain::settings::EngineConfig;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "adaptrader", about = "Adaptive rule-weighted signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the engine over a CSV of OHLCV bars
    Run {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Parameter preset: "daily" or "intraday"
        #[arg(short, long, default_value = "daily")]
        preset: String,
        /// Apply volatility, time-of-day and persistence filters
        #[arg(long)]
        strict: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, default_value = "daily")]
        preset: String,
    },
    /// Show time range and size of a CSV data source
    Info {
        #[arg(short, long)]
        input: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            input,
            output,
            config,
            preset,
            strict,
        } => run_engine(&input, &output, config.as_ref(), &preset, strict),
        Command::Validate { config, preset } => run_validate(&config, &preset),
        Command::Info { input } => run_info(&input),
    }
}

fn resolve_preset(name: &str) -> Result<EngineConfig, ExitCode> {
    match EngineConfig::preset(name) {
        Some(c) => Ok(c),
        None => {
            eprintln!("error: unknown preset '{name}' (expected 'daily' or 'intraday')");
            Err(ExitCode::from(2))
        }
    }
}

fn resolve_config(config_path: Option<&PathBuf>, preset: &str) -> Result<EngineConfig, ExitCode> {
    let base = resolve_preset(preset)?;

    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = match FileConfigAdapter::from_file(path) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Err((&e).into());
                }
            };
            match EngineConfig::from_config(&adapter, base) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Err((&e).into());
                }
            }
        }
        None => base,
    };

    if let Err(e) = validate_engine_config(&config) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(config)
}

fn run_engine(
    input: &PathBuf,
    output: &PathBuf,
    config_path: Option<&PathBuf>,
    preset: &str,
    strict: bool,
) -> ExitCode {
    // Stage 1: Resolve config (preset, optional INI overlay, validation)
    let config = match resolve_config(config_path, preset) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let strict = strict || config.strict;

    // Stage 2: Load bars
    eprintln!("Loading bars from {}", input.display());
    let loader = CsvAdapter::new();
    let bars = match loader.load_series(&input.display().to_string()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} bars loaded", bars.len());

    // Stage 3: Prepare series
    let series = match Series::prepare(bars) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Run the engine
    let registry = RuleRegistry::standard();
    eprintln!(
        "Running: lookback {}, sensitivity {}, {} rules{}",
        config.lookback_window,
        config.sensitivity,
        registry.names().len(),
        if strict { ", strict mode" } else { "" },
    );
    let outcome = match run_backtest(series, &config, &registry, strict) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} bars evaluated", outcome.records.len());

    // Stage 5: Write the output table
    let writer = CsvReportAdapter::new();
    if let Err(e) = writer.write(&outcome, &output.display().to_string()) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Output written to: {}", output.display());

    // Stage 6: Signal quality summary
    let quality = SignalQuality::from_records(&outcome.records);
    eprintln!("\n{quality}");

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf, preset: &str) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match resolve_config(Some(config_path), preset) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!("\nConfiguration is valid.");
    eprintln!("  lookback_window:  {}", config.lookback_window);
    eprintln!("  sensitivity:      {}", config.sensitivity);
    eprintln!("  threshold_method: {}", config.threshold_method);
    eprintln!("  warm-up bars:     {}", config.max_warmup());
    ExitCode::SUCCESS
}

fn run_info(input: &PathBuf) -> ExitCode {
    let loader = CsvAdapter::new();
    match loader.describe(&input.display().to_string()) {
        Ok(Some((first_ts, last_ts, count, symbol))) => {
            println!(
                "{}: {} bars, {} to {}",
                symbol,
                count,
                format_ts(first_ts),
                format_ts(last_ts)
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", input.display());
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn format_ts(ts: i64) -> String {
    match DateTime::from_timestamp_millis(ts) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}
