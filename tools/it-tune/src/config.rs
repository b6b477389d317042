//! tune.toml configuration
//!
//! Every section and key is optional; an empty file gives the defaults:
//!
//! ```toml
//! max_channels = 5
//! separator = " + "
//! output = "output.txt"
//!
//! [timing]
//! formula = "rows-per-beat"
//! rows_per_beat = 4
//!
//! [glyphs]
//! assign = "instrument"
//! symbols = ["~", "^", "-", "/"]
//! # no_instrument = "~"
//!
//! [load]
//! min_compatible_version = 0x0200
//! dangling_instruments = "reject"
//! ```

use anyhow::{Context, Result};
use it_pattern::{DanglingInstruments, LoadOptions, MIN_COMPATIBLE_VERSION};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// tune.toml structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuneConfig {
    /// Channels visited per row, starting at channel 0
    #[serde(default = "default_max_channels")]
    pub max_channels: u8,

    /// Text between two tokens of a row
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Output file used when none is given on the command line
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub timing: Timing,

    #[serde(default)]
    pub glyphs: GlyphSection,

    #[serde(default)]
    pub load: LoadSection,
}

fn default_max_channels() -> u8 {
    5
}

fn default_separator() -> String {
    " + ".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("output.txt")
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            max_channels: default_max_channels(),
            separator: default_separator(),
            output: default_output(),
            timing: Timing::default(),
            glyphs: GlyphSection::default(),
            load: LoadSection::default(),
        }
    }
}

impl TuneConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse tune.toml")
    }
}

/// How long one row lasts, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "TimingSection")]
pub enum Timing {
    /// `60000 / bpm / rows_per_beat`, truncated
    RowsPerBeat { rows_per_beat: u32 },
    /// `60000 / bpm / speed`, rounded
    TicksPerRow,
    /// Tracker row length, `2500 * speed / bpm`, rounded
    Tracker,
    /// A fixed duration
    Fixed { ms: u32 },
}

/// `[timing]` as written in tune.toml
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingSection {
    #[serde(default)]
    formula: Formula,
    rows_per_beat: Option<u32>,
    ms: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Formula {
    #[default]
    RowsPerBeat,
    TicksPerRow,
    Tracker,
    Fixed,
}

impl TryFrom<TimingSection> for Timing {
    type Error = String;

    fn try_from(section: TimingSection) -> Result<Self, Self::Error> {
        let TimingSection {
            formula,
            rows_per_beat,
            ms,
        } = section;

        if rows_per_beat.is_some() && formula != Formula::RowsPerBeat {
            return Err(format!("rows_per_beat does not apply to formula {formula:?}"));
        }
        if ms.is_some() && formula != Formula::Fixed {
            return Err(format!("ms does not apply to formula {formula:?}"));
        }

        Ok(match formula {
            Formula::RowsPerBeat => Self::RowsPerBeat {
                rows_per_beat: rows_per_beat.unwrap_or_else(default_rows_per_beat),
            },
            Formula::TicksPerRow => Self::TicksPerRow,
            Formula::Tracker => Self::Tracker,
            Formula::Fixed => Self::Fixed {
                ms: ms.ok_or("formula \"fixed\" needs ms")?,
            },
        })
    }
}

fn default_rows_per_beat() -> u32 {
    4
}

impl Default for Timing {
    fn default() -> Self {
        Self::RowsPerBeat {
            rows_per_beat: default_rows_per_beat(),
        }
    }
}

impl Timing {
    /// Row duration for a song's initial tempo and speed
    pub fn row_ms(&self, bpm: u8, speed: u8) -> Result<u32> {
        let bpm = f64::from(bpm);
        let speed = f64::from(speed);
        if bpm == 0.0 {
            anyhow::bail!("Song tempo is 0 BPM");
        }

        let ms = match *self {
            Self::RowsPerBeat { rows_per_beat } => {
                if rows_per_beat == 0 {
                    anyhow::bail!("rows_per_beat must be at least 1");
                }
                (60_000.0 / bpm / f64::from(rows_per_beat)).trunc()
            }
            Self::TicksPerRow => {
                if speed == 0.0 {
                    anyhow::bail!("Song speed is 0 ticks per row");
                }
                (60_000.0 / bpm / speed).round()
            }
            Self::Tracker => (2_500.0 * speed / bpm).round(),
            Self::Fixed { ms } => return Ok(ms),
        };
        Ok(ms as u32)
    }
}

/// Which number picks a cell's glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlyphAssign {
    /// `symbols[instrument - 1]`
    #[default]
    Instrument,
    /// `symbols[channel]`
    Channel,
}

/// Glyph table section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlyphSection {
    #[serde(default)]
    pub assign: GlyphAssign,

    /// Sprig waveforms: sine, triangle, square, sawtooth
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Glyph for notes played without an instrument number; unset is an error
    #[serde(default)]
    pub no_instrument: Option<String>,
}

fn default_symbols() -> Vec<String> {
    ["~", "^", "-", "/"].map(String::from).to_vec()
}

impl Default for GlyphSection {
    fn default() -> Self {
        Self {
            assign: GlyphAssign::default(),
            symbols: default_symbols(),
            no_instrument: None,
        }
    }
}

/// Module loading section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadSection {
    #[serde(default = "default_min_version")]
    pub min_compatible_version: u16,

    #[serde(default)]
    pub dangling_instruments: DanglingPolicy,
}

fn default_min_version() -> u16 {
    MIN_COMPATIBLE_VERSION
}

impl Default for LoadSection {
    fn default() -> Self {
        Self {
            min_compatible_version: default_min_version(),
            dangling_instruments: DanglingPolicy::default(),
        }
    }
}

/// Config spelling of [`DanglingInstruments`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DanglingPolicy {
    #[default]
    Reject,
    Clear,
}

impl LoadSection {
    pub fn options(&self) -> LoadOptions {
        let policy = match self.dangling_instruments {
            DanglingPolicy::Reject => DanglingInstruments::Reject,
            DanglingPolicy::Clear => DanglingInstruments::Clear,
        };
        LoadOptions {
            min_compatible_version: self.min_compatible_version,
            dangling_instruments: policy,
        }
    }
}
