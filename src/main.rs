// src/main.rs — wayrank entry point

use clap::Parser;

use wayrank::cli::{self, Cli, Commands};
use wayrank::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => cli::serve::run_serve(&config, port).await,
        Commands::Record {
            destination,
            dwell_ms,
            return_frequency,
        } => {
            let engine = cli::open_engine(&config)?;
            cli::record::run_record(&engine, &destination, dwell_ms, return_frequency).await
        }
        Commands::Optimize {
            catalog,
            categories,
            no_remote,
            explain,
        } => {
            if no_remote {
                config.remote.base_url = None;
            }
            let engine = cli::open_engine(&config)?;
            cli::optimize::run_optimize(
                &engine,
                &config,
                std::path::Path::new(&catalog),
                &categories,
                explain,
            )
            .await
        }
        Commands::Patterns {
            hour,
            day,
            all_days,
        } => {
            let engine = cli::open_engine(&config)?;
            cli::inspect::show_patterns(&engine, hour, day, all_days)
        }
        Commands::Drift => {
            let engine = cli::open_engine(&config)?;
            cli::inspect::show_drift(&engine)
        }
        Commands::Status { reset } => {
            let engine = cli::open_engine(&config)?;
            cli::status::show_status(&engine, &config, reset)
        }
    }
}
