//! GFS forecast field CLI.
//!
//! Resolves forecast fields from run snapshots and prints them as JSON for
//! an external renderer:
//! - `params`: list supported parameters and their render policies
//! - `url`: print the dataset address of a run
//! - `resolve`: one field for one lead time
//! - `animate`: a frame sequence over a lead-time range

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use field_resolver::ResolverConfig;

#[derive(Parser, Debug)]
#[command(name = "forecast-cli")]
#[command(about = "Resolve GFS forecast fields into render-ready JSON")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported parameters
    Params {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the dataset URL of a run
    Url {
        #[command(flatten)]
        run: RunArgs,

        /// OPeNDAP provider base URL
        #[arg(long, env = "GFS_PROVIDER_URL")]
        provider: Option<String>,
    },

    /// Resolve one field
    Resolve {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        area: AreaArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Parameter id (pratesfc, tmp2m, wind10m, prmslmsl)
        #[arg(short, long)]
        parameter: String,

        /// Lead-time index into the run's time axis
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        lead: i64,
    },

    /// Resolve a frame sequence for animation
    Animate {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        area: AreaArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Parameter id (pratesfc, tmp2m, wind10m, prmslmsl)
        #[arg(short, long)]
        parameter: String,

        /// First lead-time index
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        start: i64,

        /// Last lead-time index (inclusive)
        #[arg(long, default_value = "24", allow_hyphen_values = true)]
        end: i64,

        /// Step between frames
        #[arg(long, default_value = "3")]
        step: usize,
    },
}

/// Which model run to read. Defaults to the latest run expected online.
#[derive(ClapArgs, Debug, Clone)]
struct RunArgs {
    /// Run date, YYYYMMDD or YYYY-MM-DD
    #[arg(short, long, requires = "cycle")]
    date: Option<String>,

    /// Model cycle: 00, 06, 12 or 18
    #[arg(short, long, requires = "date")]
    cycle: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
struct AreaArgs {
    /// Bounding box as "lat_min,lat_max,lon_min,lon_max"
    #[arg(long, conflicts_with = "region", allow_hyphen_values = true)]
    bbox: Option<String>,

    /// Named region preset (soetta, kalsel)
    #[arg(long, default_value = "soetta")]
    region: String,
}

#[derive(ClapArgs, Debug, Clone)]
struct OutputArgs {
    /// Directory of run snapshots
    #[arg(long, env = "GFS_SNAPSHOT_DIR")]
    snapshot_dir: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    let config = ResolverConfig::from_env();
    config.validate()?;
    debug!(config = ?config, "Loaded configuration");

    match cli.command {
        Command::Params { json } => commands::params(json),
        Command::Url { run, provider } => commands::url(&config, &run, provider.as_deref()),
        Command::Resolve {
            run,
            area,
            output,
            parameter,
            lead,
        } => commands::resolve(&config, &run, &area, &output, &parameter, lead),
        Command::Animate {
            run,
            area,
            output,
            parameter,
            start,
            end,
            step,
        } => commands::animate(&config, &run, &area, &output, &parameter, (start, end, step)),
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    // RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout carries the JSON payload
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
