use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use candidate_registry::config::Config;
use candidate_registry::core::EntryId;
use candidate_registry::transport::{self, cli::CandidateArgs};
use candidate_registry::tui;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    env!("REGISTRY_VERSION_SUFFIX")
);

#[derive(Parser)]
#[command(name = "registry")]
#[command(author, version = VERSION, about = "Candidate registration form with local persistence", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the entries slot (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive registration form (default)
    Tui,

    /// Register a candidate
    Add(CandidateArgs),

    /// Check candidate fields without registering
    Validate(CandidateArgs),

    /// List registered candidates, newest first
    List {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Delete a registered candidate
    Delete {
        /// Entry id as shown by `list`
        id: i64,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the config file instead (fails if the file exists)
        #[arg(long)]
        init: bool,
    },
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        "candidate_registry=debug,registry=debug"
    } else {
        "candidate_registry=info,registry=info"
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    match log_file {
        // The TUI owns the terminal; logs go to a file instead
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let command = cli.command.unwrap_or(Commands::Tui);
    let log_file = matches!(command, Commands::Tui).then(|| config.log_path());
    init_logging(cli.verbose, log_file.as_deref())?;

    match command {
        Commands::Tui => {
            tui::run_tui(&config).await?;
        }
        Commands::Add(args) => {
            if !transport::cli::run_add(&config, args).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Validate(args) => {
            if !transport::cli::run_validate(&config, args).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List { format } => {
            transport::cli::run_list(&config, &format)?;
        }
        Commands::Delete { id } => {
            transport::cli::run_delete(&config, EntryId(id))?;
        }
        Commands::Config { init } => {
            let init_path = if init {
                let path = cli.config.clone().or_else(Config::config_path);
                Some(path.context("No platform config directory; pass --config")?)
            } else {
                None
            };
            transport::cli::run_config(&config, init_path.as_deref())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
