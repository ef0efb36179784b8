//! Morph CLI - interactive image batch processor.
//!
//! Morph loads raster images into memory, applies per-pixel filters, and
//! writes the results back out, clearing exported images from the input set.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell
//! morph
//!
//! # One-shot: load a folder, grayscale everything, export
//! morph process ./photos --grayscale 100 --output ./done
//!
//! # View configuration
//! morph config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Morph - interactive image batch processor.
#[derive(Parser, Debug)]
#[command(name = "morph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands. With no subcommand, the interactive shell starts.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load images, apply filters, and export in one invocation
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match morph_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `morph config path`."
            );
            morph_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Morph v{}", morph_core::VERSION);

    match cli.command {
        Some(Commands::Process(args)) => cli::process::execute(args, &config),
        Some(Commands::Config(args)) => cli::config::execute(args),
        None => cli::shell::run(&config),
    }
}
