//! IT song data structures

mod cell;
mod instrument;
mod pattern;
mod row;

pub use cell::{note_from_name, Cell, Effect, Note, Volume, VolumeCommand};
pub use instrument::{Instrument, InstrumentKind};
pub use pattern::Pattern;
pub use row::{Row, RowCells};

use crate::error::IndexError;
use crate::{ORDER_END, ORDER_SKIP};

/// A fully decoded IT song
///
/// Built once by [`load`](crate::load), [`parse`](crate::parse) or
/// [`SongBuilder`](crate::SongBuilder) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub(crate) name: String,
    pub(crate) created_with: u16,
    pub(crate) compatible_with: u16,
    pub(crate) flags: ItFlags,
    pub(crate) initial_speed: u8,
    pub(crate) initial_tempo: u8,
    pub(crate) num_channels: u8,
    pub(crate) orders: Vec<u8>,
    pub(crate) instruments: Vec<Instrument>,
    pub(crate) patterns: Vec<Pattern>,
}

impl Song {
    /// Song name (max 26 chars)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tracker version that wrote the file (`Cwt/v`)
    pub fn created_with(&self) -> u16 {
        self.created_with
    }

    /// Oldest tracker version able to read the file (`Cmwt`)
    pub fn compatible_with(&self) -> u16 {
        self.compatible_with
    }

    /// Header flags
    pub fn flags(&self) -> ItFlags {
        self.flags
    }

    /// Initial tempo (BPM)
    pub fn initial_tempo(&self) -> u8 {
        self.initial_tempo
    }

    /// Initial speed (ticks per row)
    pub fn initial_speed(&self) -> u8 {
        self.initial_speed
    }

    /// Number of channels in every pattern
    pub fn num_channels(&self) -> u8 {
        self.num_channels
    }

    /// Raw order list, including skip (254) and end (255) markers
    pub fn orders(&self) -> &[u8] {
        &self.orders
    }

    /// Instrument table; the instrument column is a 1-based index into it
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Instrument by its 1-based pattern number
    pub fn instrument(&self, number: u8) -> Option<&Instrument> {
        self.instruments.get((number as usize).checked_sub(1)?)
    }

    /// Check if the instrument column names instruments (vs samples)
    pub fn uses_instruments(&self) -> bool {
        self.flags.contains(ItFlags::INSTRUMENTS)
    }

    /// All patterns, by pattern index
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Pattern by index
    pub fn pattern(&self, index: usize) -> Result<&Pattern, IndexError> {
        self.patterns.get(index).ok_or(IndexError::Pattern {
            index,
            count: self.patterns.len(),
        })
    }

    /// Pattern played at an order position
    pub fn pattern_at_order(&self, order: usize) -> Result<&Pattern, IndexError> {
        let entry = *self.orders.get(order).ok_or(IndexError::Order {
            order,
            len: self.orders.len(),
        })?;
        if entry == ORDER_SKIP || entry == ORDER_END {
            return Err(IndexError::OrderMarker {
                order,
                marker: entry,
            });
        }
        self.pattern(entry as usize)
    }

    /// `(order position, pattern index)` pairs in play order
    ///
    /// Skip markers are passed over and the sequence stops at the first end
    /// marker.
    pub fn playable_orders(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.orders
            .iter()
            .enumerate()
            .take_while(|&(_, &entry)| entry != ORDER_END)
            .filter(|&(_, &entry)| entry != ORDER_SKIP)
            .map(|(order, &entry)| (order, entry as usize))
    }
}

/// IT module flags (from header offset 0x002C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItFlags(u16);

impl ItFlags {
    /// Stereo output
    pub const STEREO: Self = Self(0x0001);
    /// Vol0MixOptimizations - skip mixing silent channels
    pub const VOL0_MIX_OPT: Self = Self(0x0002);
    /// Use instruments (vs samples-only mode)
    pub const INSTRUMENTS: Self = Self(0x0004);
    /// Use linear slides (vs Amiga slides)
    pub const LINEAR_SLIDES: Self = Self(0x0008);
    /// Use old effects (S3M compatibility)
    pub const OLD_EFFECTS: Self = Self(0x0010);
    /// Link G memory with E/F for portamento
    pub const LINK_G_MEMORY: Self = Self(0x0020);

    /// Create flags from raw u16
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Check if flag is set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Remove flags
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for ItFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
