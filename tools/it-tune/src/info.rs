//! Info command - print a module summary

use anyhow::{Context, Result};
use clap::Args;
use it_pattern::Pattern;
use std::path::PathBuf;

use crate::config::TuneConfig;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Impulse Tracker module to read
    pub module: PathBuf,

    /// Path to tune.toml; only its `[load]` section is used
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also dump the rows of this pattern
    #[arg(short, long)]
    pub pattern: Option<usize>,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TuneConfig::load(path)?,
        None => TuneConfig::default(),
    };

    let song = it_pattern::load(&args.module, &config.load.options())
        .with_context(|| format!("Failed to load module: {}", args.module.display()))?;

    println!("Name:     {}", song.name());
    println!(
        "Tracker:  {:#06x} (compatible {:#06x})",
        song.created_with(),
        song.compatible_with()
    );
    println!("Tempo:    {} BPM", song.initial_tempo());
    println!("Speed:    {} ticks/row", song.initial_speed());
    println!("Channels: {}", song.num_channels());

    let orders: Vec<String> = song.orders().iter().map(u8::to_string).collect();
    println!("Orders:   [{}]", orders.join(", "));

    println!("Patterns: {}", song.patterns().len());
    for (index, pattern) in song.patterns().iter().enumerate() {
        println!("  {index:3}: {} rows", pattern.num_rows());
    }

    let label = if song.uses_instruments() {
        "Instruments"
    } else {
        "Samples"
    };
    println!("{label}: {}", song.instruments().len());
    for (index, instrument) in song.instruments().iter().enumerate() {
        println!("  {:2}: {}", index + 1, instrument.name);
    }

    if let Some(index) = args.pattern {
        println!();
        dump_pattern(song.pattern(index)?);
    }
    Ok(())
}

fn dump_pattern(pattern: &Pattern) {
    for row in pattern.rows() {
        let cells: Vec<String> = row.cells().map(|(_, cell)| cell.to_string()).collect();
        println!("{:3} | {}", row.index(), cells.join(" | "));
    }
}
