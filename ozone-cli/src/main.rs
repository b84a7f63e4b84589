//! Ozone CLI: headless forecast and model inspection commands.
//!
//! Commands:
//! - `forecast`: print a forecast table (table, JSON or CSV) to stdout
//! - `inspect`: print model metadata, or why the model is unavailable

mod output;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ozone_core::config::DashboardConfig;
use ozone_core::forecast::{produce_forecast, ForecastRequest};
use ozone_core::loader::load_model;

use crate::output::{write_forecast, write_inspect, OutputFormat};

#[derive(Parser)]
#[command(name = "ozone", about = "Ozone CLI: daily ozone (O3) forecast")]
struct Cli {
    /// TOML config file. Defaults to ./ozone.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model file, overriding the config.
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the next N days and print the table.
    Forecast {
        /// Horizon in days (at least 1). Defaults to the config value.
        #[arg(long, short = 'd', value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Date of day 0 for the simulated forecast (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        today: Option<String>,

        /// Seed for uncertainty sampling, overriding the config.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Describe the model file or report why it cannot be used.
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = DashboardConfig::resolve(cli.config.as_deref(), Path::new("."))?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    match cli.command {
        Commands::Forecast {
            days,
            format,
            today,
            seed,
        } => run_forecast(&config, days, format, today, seed),
        Commands::Inspect => run_inspect(&config),
    }
}

fn run_forecast(
    config: &DashboardConfig,
    days: Option<u32>,
    format: OutputFormat,
    today: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let today = today
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let request = ForecastRequest::new(days.unwrap_or(config.default_horizon_days))?;
    let mut opts = config.producer_options();
    if let Some(seed) = seed {
        opts.seed = seed;
    }

    let load = load_model(&config.model_path);
    if let Some(warning) = load.warning() {
        eprintln!("{warning}");
    }
    let result = produce_forecast(request, &load, today, &opts)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_forecast(&mut out, &result, format)?;
    out.flush()?;
    Ok(())
}

fn run_inspect(config: &DashboardConfig) -> Result<()> {
    let load = load_model(&config.model_path);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_inspect(&mut out, &load)?;
    out.flush()?;
    Ok(())
}
