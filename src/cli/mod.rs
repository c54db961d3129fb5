// src/cli/mod.rs — CLI definition (clap derive)

pub mod inspect;
pub mod optimize;
pub mod record;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::clock::SystemClock;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::optimizer::OptimizationEngine;
use crate::storage::SqliteStore;

#[derive(Parser)]
#[command(
    name = "wayrank",
    about = "Reorder navigation by when you actually go where",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a visit to a destination
    Record {
        /// Destination path (e.g. /orders)
        destination: String,
        /// Milliseconds spent at the destination
        #[arg(long)]
        dwell_ms: Option<f64>,
        /// Estimated revisits per week
        #[arg(long)]
        return_frequency: Option<f64>,
    },
    /// Reorder a catalog file for the current time slot
    Optimize {
        /// JSON array of {path, label, category}
        #[arg(long)]
        catalog: String,
        /// Category to reorder (repeatable; defaults to config)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Skip the remote sink for this run
        #[arg(long)]
        no_remote: bool,
        /// Print how the order was produced to stderr
        #[arg(long)]
        explain: bool,
    },
    /// Show the destination ranking for a time slot
    Patterns {
        /// Hour of day (0-23); defaults to now
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
        hour: Option<u8>,
        /// Day of week (0-6, Sunday = 0); defaults to today
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..7))]
        day: Option<u8>,
        /// Ignore day of week
        #[arg(long, conflicts_with = "day")]
        all_days: bool,
    },
    /// Compare this week's usage with last week's
    Drift,
    /// Show journal, cache and config state
    Status {
        /// Clear the journal and the cached plan
        #[arg(long)]
        reset: bool,
    },
    /// Run the usage sync endpoint
    Serve {
        /// Port to listen on (defaults to config)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Load config from `--config` or the default location.
pub fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(std::path::Path::new(path))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Open the local database and build an engine over it.
pub fn open_engine(config: &Config) -> anyhow::Result<OptimizationEngine> {
    paths::ensure_dirs()?;
    let store = SqliteStore::open(&paths::db_path())?;
    Ok(OptimizationEngine::from_config(
        config,
        Arc::new(store),
        Arc::new(SystemClock),
    ))
}
