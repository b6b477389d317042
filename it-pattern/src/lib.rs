//! IT-Pattern: Impulse Tracker pattern decoder and row iterator
//!
//! This crate loads an Impulse Tracker `.it` module, decodes its packed pattern
//! data into a fixed grid of cells and lets callers walk a row channel by
//! channel. Sample audio, envelopes and playback are out of scope: only the
//! data needed to read notes, instruments, volumes and effects is kept.
//!
//! # Key Features
//!
//! - **Eager, all-or-nothing loading**: a [`Song`] is either fully decoded or
//!   not returned at all
//! - **Carry-forward decoding**: per-channel "use last value" memory is
//!   resolved while decoding, so every [`Cell`] is self-contained
//! - **Caller-driven iteration**: [`Pattern::for_each_channel`] stops as soon
//!   as the visitor returns [`ControlFlow::Break`](std::ops::ControlFlow)
//! - **Writer**: [`SongBuilder`] and [`write_song`] produce IT files that load
//!   back to the same [`Song`]
//!
//! # IT Pattern Format Overview
//!
//! Each pattern is stored as an 8-byte header (packed length, row count) and a
//! packed stream. Every row is a list of channel entries terminated by a zero
//! byte. An entry starts with a channel marker; bit 7 announces a new mask
//! byte, otherwise the channel's previous mask is reused. The mask says which
//! fields follow (note, instrument, volume, effect) and which are copied from
//! the channel's last explicit value.
//!
//! # Usage
//!
//! ```ignore
//! use std::ops::ControlFlow;
//! use it_pattern::{load, LoadOptions};
//!
//! let song = load("song.it", &LoadOptions::default()).unwrap();
//! let pattern = song.pattern(0).unwrap();
//!
//! pattern
//!     .for_each_channel(0, |channel, cell| {
//!         println!("{channel}: {}", cell.note);
//!         ControlFlow::Continue(())
//!     })
//!     .unwrap();
//! ```
//!
//! # Format Reference
//!
//! - Impulse Tracker Technical Specification (ITTECH.TXT)
//! - <https://github.com/schismtracker/schismtracker/wiki/ITTECH.TXT>

mod error;
mod module;
mod options;
mod parser;
mod writer;

pub use error::{FormatError, IndexError, ItError, PatternError};
pub use module::{
    note_from_name, Cell, Effect, Instrument, InstrumentKind, ItFlags, Note, Pattern, Row,
    RowCells, Song, Volume, VolumeCommand,
};
pub use options::{DanglingInstruments, LoadOptions};
pub use parser::{decompress, load, parse};
pub use writer::{pack_pattern, write_song, SongBuilder};

// =============================================================================
// Constants
// =============================================================================

/// IT format magic string "IMPM"
pub const IT_MAGIC: &[u8; 4] = b"IMPM";

/// Instrument magic string "IMPI"
pub const INSTRUMENT_MAGIC: &[u8; 4] = b"IMPI";

/// Sample magic string "IMPS"
pub const SAMPLE_MAGIC: &[u8; 4] = b"IMPS";

/// Size of the fixed module header
pub const HEADER_SIZE: usize = 192;

/// Default minimum compatible version (2.00)
pub const MIN_COMPATIBLE_VERSION: u16 = 0x0200;

/// Maximum number of channels addressable by a pattern
pub const MAX_CHANNELS: u8 = 64;

/// Maximum number of patterns supported
pub const MAX_PATTERNS: u16 = 256;

/// Maximum pattern length (rows)
pub const MAX_PATTERN_ROWS: u16 = 200;

/// Rows in a pattern stored with a zero offset
pub const DEFAULT_PATTERN_ROWS: u16 = 64;

/// Maximum instruments in an IT file
pub const MAX_INSTRUMENTS: u16 = 99;

/// Maximum samples in an IT file
pub const MAX_SAMPLES: u16 = 99;

// =============================================================================
// Note Constants
// =============================================================================

/// Note value for "note fade"
pub const NOTE_FADE: u8 = 253;

/// Note value for "note cut" (===)
pub const NOTE_CUT: u8 = 254;

/// Note value for "note off" (^^^)
pub const NOTE_OFF: u8 = 255;

/// Maximum playable note (B-9)
pub const NOTE_MAX: u8 = 119;

// =============================================================================
// Order Constants
// =============================================================================

/// Order value for "skip" (+++)
pub const ORDER_SKIP: u8 = 254;

/// Order value for "end" (---)
pub const ORDER_END: u8 = 255;

// =============================================================================
// Mask Bits
// =============================================================================

/// Channel entry mask bits
pub mod mask {
    /// Note byte follows
    pub const NOTE: u8 = 0x01;
    /// Instrument byte follows
    pub const INSTRUMENT: u8 = 0x02;
    /// Volume column byte follows
    pub const VOLUME: u8 = 0x04;
    /// Effect command and parameter bytes follow
    pub const EFFECT: u8 = 0x08;
    /// Reuse the channel's last note
    pub const LAST_NOTE: u8 = 0x10;
    /// Reuse the channel's last instrument
    pub const LAST_INSTRUMENT: u8 = 0x20;
    /// Reuse the channel's last volume
    pub const LAST_VOLUME: u8 = 0x40;
    /// Reuse the channel's last effect
    pub const LAST_EFFECT: u8 = 0x80;
}

/// Channel marker bit announcing a new mask byte
pub const MARKER_NEW_MASK: u8 = 0x80;
