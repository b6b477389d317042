//! IT file writer
//!
//! Builds songs in code and writes them back to the IT format. Files written
//! here load back to an identical [`Song`].

use crate::error::{FormatError, IndexError};
use crate::module::{Cell, Instrument, InstrumentKind, ItFlags, Pattern, Song};
use crate::options::DanglingInstruments;
use crate::parser::resolve_instruments;
use crate::{
    DEFAULT_PATTERN_ROWS, MAX_CHANNELS, MAX_INSTRUMENTS, MAX_PATTERNS, MAX_PATTERN_ROWS,
    MIN_COMPATIBLE_VERSION,
};

mod encoding;
mod pattern_packer;
mod serializer;

#[cfg(test)]
mod tests;

pub use pattern_packer::pack_pattern;

/// Maximum length of the order list
const MAX_ORDERS: usize = 256;

/// Serialize a song to IT bytes
///
/// # Errors
/// * [`FormatError::Pattern`] - a pattern packs to more than 65535 bytes
pub fn write_song(song: &Song) -> Result<Vec<u8>, FormatError> {
    serializer::serialize_song(song)
}

/// Builder for [`Song`] values
#[derive(Debug, Clone)]
pub struct SongBuilder {
    song: Song,
}

impl Default for SongBuilder {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl SongBuilder {
    /// Create a 4-channel song at speed 6, tempo 125
    pub fn new(name: &str) -> Self {
        Self {
            song: Song {
                name: fit_string(name, 26),
                created_with: 0x0214, // IT 2.14
                compatible_with: MIN_COMPATIBLE_VERSION,
                flags: ItFlags::STEREO | ItFlags::INSTRUMENTS | ItFlags::LINEAR_SLIDES,
                initial_speed: 6,
                initial_tempo: 125,
                num_channels: 4,
                orders: Vec::new(),
                instruments: Vec::new(),
                patterns: Vec::new(),
            },
        }
    }

    /// Set the song name
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.song.name = fit_string(name, 26);
        self
    }

    /// Set initial speed (ticks per row)
    pub fn set_speed(&mut self, speed: u8) -> &mut Self {
        self.song.initial_speed = speed.max(1);
        self
    }

    /// Set initial tempo (BPM)
    pub fn set_tempo(&mut self, tempo: u8) -> &mut Self {
        self.song.initial_tempo = tempo.max(32);
        self
    }

    /// Set number of channels (1-64)
    ///
    /// Existing patterns are resized; cells in removed channels are dropped.
    pub fn set_channels(&mut self, channels: u8) -> &mut Self {
        let channels = channels.clamp(1, MAX_CHANNELS);
        for pattern in &mut self.song.patterns {
            let mut resized = Pattern::empty(pattern.num_rows(), channels);
            for row in 0..pattern.num_rows() {
                for channel in 0..channels.min(pattern.num_channels()) {
                    *resized.cell_mut(row, channel) = *pattern.cell_mut(row, channel);
                }
            }
            *pattern = resized;
        }
        self.song.num_channels = channels;
        self
    }

    /// Switch the instrument column to address samples instead of instruments
    pub fn use_samples(&mut self) -> &mut Self {
        self.song.flags = self.song.flags.without(ItFlags::INSTRUMENTS);
        self
    }

    /// Add an instrument
    /// Returns the 1-based instrument number
    pub fn add_instrument(&mut self, instrument: Instrument) -> u8 {
        self.song.instruments.push(Instrument {
            name: fit_string(&instrument.name, 26),
            filename: fit_string(&instrument.filename, 12),
            kind: instrument.kind,
        });
        self.song.instruments.len() as u8
    }

    /// Add an empty pattern with the given number of rows (1-200)
    /// Returns the 0-based pattern index
    pub fn add_pattern(&mut self, rows: u16) -> u8 {
        let rows = rows.clamp(1, MAX_PATTERN_ROWS);
        self.song
            .patterns
            .push(Pattern::empty(rows, self.song.num_channels));
        (self.song.patterns.len() - 1) as u8
    }

    /// Add an empty 64-row pattern
    pub fn add_default_pattern(&mut self) -> u8 {
        self.add_pattern(DEFAULT_PATTERN_ROWS)
    }

    /// Set a cell in a pattern
    ///
    /// Out-of-range pitches and volumes are clamped (see [`Cell::clamped`]),
    /// so whatever is set here reads back unchanged after writing.
    pub fn set_cell(
        &mut self,
        pattern: u8,
        row: u16,
        channel: u8,
        cell: Cell,
    ) -> Result<&mut Self, IndexError> {
        let count = self.song.patterns.len();
        let target = self
            .song
            .patterns
            .get_mut(pattern as usize)
            .ok_or(IndexError::Pattern {
                index: pattern as usize,
                count,
            })?;
        // Bounds check before taking the mutable slot
        target.cell(row, channel)?;
        *target.cell_mut(row, channel) = cell.clamped();
        Ok(self)
    }

    /// Set the pattern order table (at most 256 entries)
    pub fn set_orders(&mut self, orders: &[u8]) -> &mut Self {
        self.song.orders = orders.iter().copied().take(MAX_ORDERS).collect();
        self
    }

    /// Validate and return the song
    ///
    /// # Errors
    /// * [`FormatError::TooManyInstruments`] / [`FormatError::TooManyPatterns`]
    /// * [`FormatError::Pattern`] with a dangling instrument reference
    pub fn build(&self) -> Result<Song, FormatError> {
        let mut song = self.song.clone();

        if song.instruments.len() > MAX_INSTRUMENTS as usize {
            return Err(FormatError::TooManyInstruments(song.instruments.len() as u16));
        }
        if song.patterns.len() > MAX_PATTERNS as usize {
            return Err(FormatError::TooManyPatterns(song.patterns.len() as u16));
        }

        let kind = if song.uses_instruments() {
            InstrumentKind::Instrument
        } else {
            InstrumentKind::Sample
        };
        for instrument in &mut song.instruments {
            instrument.kind = kind;
        }

        let count = song.instruments.len();
        for (index, pattern) in song.patterns.iter_mut().enumerate() {
            resolve_instruments(pattern, count, DanglingInstruments::Reject).map_err(|source| {
                FormatError::Pattern {
                    index: index as u16,
                    source,
                }
            })?;
        }

        Ok(song)
    }

    /// Build the song and return it as IT file bytes
    pub fn write(&self) -> Result<Vec<u8>, FormatError> {
        write_song(&self.build()?)
    }
}

/// Cut a string the way it reads back from a fixed-size, zero-padded field
fn fit_string(s: &str, len: usize) -> String {
    let mut end = s.len().min(len);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let s = &s[..end];
    let s = s.split('\0').next().unwrap_or_default();
    s.trim_end().to_string()
}
