//! it-tune - Impulse Tracker patterns to Sprig tune text
//!
//! # Commands
//!
//! - `it-tune render` - Write pattern rows as `<ms>: C4~100 + D4^100,` lines
//! - `it-tune info` - Print module header, orders, patterns and instruments
//!
//! # Usage
//!
//! ```bash
//! # Pattern 0 with default settings, written to output.txt
//! it-tune render song.it
//!
//! # Whole song in play order with a config file
//! it-tune render song.it --song --config tune.toml -o song.txt
//! ```
//!
//! The tune.toml format is documented in the `config` module.

mod config;
mod info;
mod render;
mod tune;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// it-tune - Impulse Tracker patterns to Sprig tune text
#[derive(Parser)]
#[command(name = "it-tune")]
#[command(about = "Convert Impulse Tracker patterns to Sprig tune text")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write pattern rows as tune text
    Render(render::RenderArgs),

    /// Print a module summary
    Info(info::InfoArgs),
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render::execute(args),
        Commands::Info(args) => info::execute(args),
    }
}
