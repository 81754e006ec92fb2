use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use photowall_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "photowall")]
#[command(author, version, about = "A terminal photo gallery with a carousel viewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run {
        /// Route to open, e.g. /p/gallery/sunset
        path: Option<String>,
    },
    /// List the photo catalog
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print photo ids only
    Ids,
    /// Show one photo with its image URLs and share metadata
    Show {
        /// Photo id
        id: String,
    },
    /// Print the config file path
    Config {
        /// Write the default configuration if no file exists
        #[arg(long)]
        init: bool,
    },
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let is_tui = matches!(cli.command, None | Some(Commands::Run { .. }));
    init_logging(&config, is_tui)?;

    match cli.command {
        Some(Commands::Run { path }) => commands::run::run(config, path).await,
        None => commands::run::run(config, None).await,
        Some(Commands::List { json }) => commands::list::run(&config, json).await,
        Some(Commands::Ids) => commands::ids::run(&config).await,
        Some(Commands::Show { id }) => commands::show::run(&config, &id).await,
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}
