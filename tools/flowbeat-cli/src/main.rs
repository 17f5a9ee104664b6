//! flowbeat CLI: run the action detector on a raw flow frame.
//!
//! Usage:
//!   flowbeat detect <FRAME>       Detect actions in a JSON frame
//!   flowbeat normalize <FRAME>    Export the normalized frame as a grayscale PNG
//!   flowbeat config [--save]      Print (or write) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "flowbeat",
    about = "Detect timed actions in optical-flow frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect actions in a raw frame
    Detect {
        /// JSON file holding an array of rows (one row per video frame)
        frame: PathBuf,

        /// Write events as JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the minimum distance between extrema
        #[arg(long)]
        min_distance: Option<usize>,

        /// Print events as a JSON table
        #[arg(long)]
        json: bool,
    },

    /// Export the normalized frame as an 8-bit grayscale image
    Normalize {
        /// JSON file holding an array of rows (one row per video frame)
        frame: PathBuf,

        /// Output image path (format from the extension)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Also write it to the config file (`--config` or the standard location)
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => flowbeat_common::AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => flowbeat_common::AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    flowbeat_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Detect {
            frame,
            output,
            min_distance,
            json,
        } => commands::detect::run(config.pipeline, frame, output, min_distance, json),
        Commands::Normalize { frame, output } => {
            commands::normalize::run(&config.pipeline, frame, output)
        }
        Commands::Config { save } => commands::config::run(&config, save, cli.config.as_deref()),
    }
}
