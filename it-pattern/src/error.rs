//! Error types for IT module loading

use std::io;
use std::path::PathBuf;

/// Errors returned by [`load`](crate::load) and the navigation methods of
/// [`Song`](crate::Song)
#[derive(Debug, thiserror::Error)]
pub enum ItError {
    /// The module file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes are not a valid IT module
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A pattern, order or row index was out of range
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// The module bytes are malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("file too small to be an IT module ({len} bytes, header needs 192)")]
    TooSmall { len: usize },

    #[error("invalid magic bytes (expected 'IMPM')")]
    InvalidMagic,

    #[error("unsupported IT version: 0x{found:04X} (minimum 0x{minimum:04X})")]
    UnsupportedVersion { found: u16, minimum: u16 },

    #[error("too many instruments: {0} (max 99)")]
    TooManyInstruments(u16),

    #[error("too many samples: {0} (max 99)")]
    TooManySamples(u16),

    #[error("too many patterns: {0} (max 256)")]
    TooManyPatterns(u16),

    #[error("unexpected end of file at offset 0x{offset:X}")]
    UnexpectedEof { offset: u64 },

    #[error("instrument {index} has an invalid header at offset 0x{offset:08X}")]
    InvalidInstrument { index: u16, offset: u32 },

    #[error("sample {index} has an invalid header at offset 0x{offset:08X}")]
    InvalidSample { index: u16, offset: u32 },

    #[error("pattern {index} offset 0x{offset:08X} is out of bounds")]
    PatternOffset { index: u16, offset: u32 },

    #[error("pattern {index}: {source}")]
    Pattern {
        index: u16,
        #[source]
        source: PatternError,
    },
}

/// A single pattern block failed to decode
///
/// Offsets are relative to the start of the packed data (after the 8-byte
/// pattern header).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("invalid row count {0} (expected 1..=200)")]
    InvalidRows(u16),

    #[error("packed data truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("packed data continues past the last of {rows} rows at offset {offset}")]
    ExtraRows { rows: u16, offset: usize },

    #[error("row {row}, channel {channel}: instrument {instrument} is not defined")]
    DanglingInstrument { row: u16, channel: u8, instrument: u8 },

    #[error("packed data is {len} bytes (max 65535)")]
    Oversized { len: usize },
}

/// A caller asked for something outside the song
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("pattern {index} out of range ({count} patterns)")]
    Pattern { index: usize, count: usize },

    #[error("row {row} out of range ({rows} rows)")]
    Row { row: u16, rows: u16 },

    #[error("channel {channel} out of range ({channels} channels)")]
    Channel { channel: u8, channels: u8 },

    #[error("order {order} out of range ({len} orders)")]
    Order { order: usize, len: usize },

    #[error("order {order} holds marker {marker}, not a pattern")]
    OrderMarker { order: usize, marker: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_context() {
        let err = FormatError::Pattern {
            index: 3,
            source: PatternError::Truncated { offset: 17 },
        };
        let msg = err.to_string();
        assert!(msg.contains("pattern 3"));
        assert!(msg.contains("offset 17"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ItError::Io {
            path: PathBuf::from("missing.it"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.it"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_index_error_converts() {
        let err: ItError = IndexError::Row { row: 64, rows: 64 }.into();
        assert!(matches!(err, ItError::Index(IndexError::Row { .. })));
    }
}
