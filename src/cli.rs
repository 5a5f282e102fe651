//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{CsvAdapter, write_returns};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::SimulationConfig;
use crate::domain::config_validation::{load_simulation_config, validate_simulation_config};
use crate::domain::error::SimError;
use crate::domain::returns::RealizedReturn;
use crate::domain::simulator::simulate_table;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "barrier-returns",
    about = "Resolve entry signals into take-profit / stop-loss trade returns"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve trades and write realized returns
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        /// Output CSV; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            config,
            data,
            output,
        } => run_simulate(&config, &data, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            (&e).into()
        }
    }
}

fn open_config(path: &Path) -> Result<FileConfigAdapter, SimError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| SimError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn load_config(path: &Path) -> Result<SimulationConfig, SimError> {
    load_simulation_config(&open_config(path)?)
}

/// Check a config file without building a run from it.
pub fn validate_config(path: &Path) -> Result<(), SimError> {
    validate_simulation_config(&open_config(path)?)
}

/// Load config and data from disk and compute the returns.
pub fn simulate_files(
    config_path: &Path,
    data_path: &Path,
) -> Result<Vec<RealizedReturn>, SimError> {
    let config = load_config(config_path)?;

    info!(path = %data_path.display(), "loading prices");
    let table = CsvAdapter::new(data_path.to_path_buf()).load_table()?;
    info!(
        bars = table.bar_count(),
        long_entries = table.long_entries.iter().flatten().count(),
        short_entries = table.short_entries.iter().flatten().count(),
        "table loaded"
    );

    simulate_table(&table, &config)
}

fn run_simulate(
    config_path: &Path,
    data_path: &Path,
    output: Option<&Path>,
) -> Result<(), SimError> {
    let returns = simulate_files(config_path, data_path)?;

    let total: f64 = returns.iter().map(|r| r.value).sum();
    let wins = returns.iter().filter(|r| r.value > 0.0).count();
    info!(trades = returns.len(), wins, total, "simulation complete");

    match output {
        Some(path) => {
            write_returns(File::create(path)?, &returns)?;
            info!(path = %path.display(), "returns written");
        }
        None => write_returns(io::stdout().lock(), &returns)?,
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SimError> {
    validate_config(config_path)?;
    info!(path = %config_path.display(), "configuration is valid");
    Ok(())
}
