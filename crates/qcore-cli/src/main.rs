mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("🚀 Q-Core CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let file_config = config::load(cli.config.as_deref())?;
    let progress = if cli.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = progress.reporter();

    let command_result = match cli.command {
        Commands::Search(args) => {
            info!("Dispatching to 'search' command.");
            commands::search::run_search(args)
        }
        Commands::Range(args) => {
            info!("Dispatching to 'range' command.");
            commands::search::run_range(args)
        }
        Commands::Box(args) => {
            info!("Dispatching to 'box' command.");
            commands::search::run_box(args)
        }
        Commands::Contacts(args) => {
            info!("Dispatching to 'contacts' command.");
            commands::contacts::run(args, &file_config)
        }
        Commands::Grid(args) => {
            info!("Dispatching to 'grid' command.");
            commands::grid::run(args, &file_config, &reporter)
        }
        Commands::Tunnel(args) => {
            info!("Dispatching to 'tunnel' command.");
            commands::tunnel::run(args, &file_config, &reporter)
        }
        Commands::Summary(args) => {
            info!("Dispatching to 'summary' command.");
            commands::summary::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}
