//! Render command - write pattern rows as tune text

use anyhow::{Context, Result};
use clap::Args;
use it_pattern::Song;
use std::path::PathBuf;

use crate::config::TuneConfig;
use crate::tune::TuneRenderer;

/// Arguments for the render command
#[derive(Args)]
pub struct RenderArgs {
    /// Impulse Tracker module to read
    pub module: PathBuf,

    /// Path to tune.toml (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pattern index to render; may be repeated (defaults to pattern 0)
    #[arg(short, long = "pattern", conflicts_with = "song")]
    pub patterns: Vec<usize>,

    /// Render every pattern in play order
    #[arg(long)]
    pub song: bool,

    /// Output file (overrides the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TuneConfig::load(path)?,
        None => TuneConfig::default(),
    };

    let song = it_pattern::load(&args.module, &config.load.options())
        .with_context(|| format!("Failed to load module: {}", args.module.display()))?;

    let row_ms = config
        .timing
        .row_ms(song.initial_tempo(), song.initial_speed())?;
    tracing::debug!(
        tempo = song.initial_tempo(),
        speed = song.initial_speed(),
        row_ms,
        "Row timing"
    );

    let selected = select_patterns(&song, &args)?;
    let renderer = TuneRenderer::new(&config, row_ms);

    let mut text = String::new();
    for &index in &selected {
        let pattern = song.pattern(index)?;
        renderer
            .render_pattern(pattern, &mut text)
            .with_context(|| format!("Failed to render pattern {index}"))?;
    }

    let output = args.output.unwrap_or(config.output);
    std::fs::write(&output, &text)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    println!(
        "Rendered {} pattern(s) from {} to {} ({} ms per row)",
        selected.len(),
        args.module.display(),
        output.display(),
        row_ms
    );
    Ok(())
}

/// Pattern indices to render, in output order
fn select_patterns(song: &Song, args: &RenderArgs) -> Result<Vec<usize>> {
    if args.song {
        let indices: Vec<usize> = song.playable_orders().map(|(_, index)| index).collect();
        if indices.is_empty() {
            anyhow::bail!("Order list has no playable patterns");
        }
        return Ok(indices);
    }

    if args.patterns.is_empty() {
        return Ok(vec![0]);
    }
    Ok(args.patterns.clone())
}
