//! IT file parser

use std::io::{Cursor, Seek, SeekFrom};
use std::path::Path;

use crate::error::{FormatError, ItError, PatternError};
use crate::module::{Instrument, InstrumentKind, ItFlags, Pattern, Song};
use crate::options::LoadOptions;
use crate::{
    DEFAULT_PATTERN_ROWS, HEADER_SIZE, IT_MAGIC, MAX_CHANNELS, MAX_INSTRUMENTS, MAX_PATTERNS,
    MAX_SAMPLES,
};

mod cell;
mod helpers;
mod instrument;
mod pattern;

use helpers::{read_bytes, read_string, read_u16, read_u32, read_u8};
use instrument::parse_header;
pub(crate) use pattern::resolve_instruments;

pub use pattern::decompress;

/// Size of the header in front of every packed pattern block
const PATTERN_HEADER_SIZE: usize = 8;

/// Read and parse an IT file
///
/// # Errors
/// * [`ItError::Io`] - the file cannot be read
/// * [`ItError::Format`] - the file is not a valid IT module
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Song, ItError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ItError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "Loaded module file");

    Ok(parse(&data, options)?)
}

/// Parse IT file bytes into a [`Song`]
///
/// The whole song is decoded before returning; on error nothing is kept.
pub fn parse(data: &[u8], options: &LoadOptions) -> Result<Song, FormatError> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::TooSmall { len: data.len() });
    }

    // Validate magic "IMPM"
    if &data[0..4] != IT_MAGIC {
        return Err(FormatError::InvalidMagic);
    }

    let mut cursor = Cursor::new(data);
    cursor.set_position(4);

    // Song name (26 bytes, null-terminated)
    let name = read_string(&read_bytes::<26>(&mut cursor)?);

    // Pattern row highlight (2 bytes) - skip
    skip(&mut cursor, 2)?;

    let num_orders = read_u16(&mut cursor)?;

    let num_instruments = read_u16(&mut cursor)?;
    if num_instruments > MAX_INSTRUMENTS {
        return Err(FormatError::TooManyInstruments(num_instruments));
    }

    let num_samples = read_u16(&mut cursor)?;
    if num_samples > MAX_SAMPLES {
        return Err(FormatError::TooManySamples(num_samples));
    }

    let num_patterns = read_u16(&mut cursor)?;
    if num_patterns > MAX_PATTERNS {
        return Err(FormatError::TooManyPatterns(num_patterns));
    }

    // Cwt/v - created with tracker version
    let created_with = read_u16(&mut cursor)?;

    // Cmwt - compatible with version
    let compatible_with = read_u16(&mut cursor)?;
    if compatible_with < options.min_compatible_version {
        return Err(FormatError::UnsupportedVersion {
            found: compatible_with,
            minimum: options.min_compatible_version,
        });
    }

    let flags = ItFlags::from_bits(read_u16(&mut cursor)?);

    // Special (2), global volume (1), mix volume (1) - skip
    skip(&mut cursor, 4)?;

    let initial_speed = read_u8(&mut cursor)?;
    let initial_tempo = read_u8(&mut cursor)?;

    // Separation (1), pitch wheel depth (1), message length (2),
    // message offset (4), reserved (4) - skip
    skip(&mut cursor, 12)?;

    // Channel pan (64 bytes); +128 = channel disabled
    let channel_pan = read_bytes::<64>(&mut cursor)?;
    let num_channels = channel_count(&channel_pan);

    // Channel volume (64 bytes) - skip
    skip(&mut cursor, 64)?;

    let order_start = cursor.position() as usize;
    let order_end = order_start + num_orders as usize;
    let orders = data
        .get(order_start..order_end)
        .ok_or(FormatError::UnexpectedEof {
            offset: data.len() as u64,
        })?
        .to_vec();
    cursor.set_position(order_end as u64);

    let instrument_offsets = read_offsets(&mut cursor, num_instruments)?;
    let sample_offsets = read_offsets(&mut cursor, num_samples)?;
    let pattern_offsets = read_offsets(&mut cursor, num_patterns)?;

    // The instrument column names samples when the module is in sample mode
    let instruments = if flags.contains(ItFlags::INSTRUMENTS) {
        read_instrument_table(data, &instrument_offsets, InstrumentKind::Instrument)?
    } else {
        read_instrument_table(data, &sample_offsets, InstrumentKind::Sample)?
    };

    tracing::debug!(
        name = %name,
        channels = num_channels,
        orders = num_orders,
        instruments = instruments.len(),
        patterns = num_patterns,
        "Parsed IT header"
    );

    let patterns = decode_patterns(data, &pattern_offsets, num_channels, instruments.len(), options)?;

    Ok(Song {
        name,
        created_with,
        compatible_with,
        flags,
        initial_speed,
        initial_tempo,
        num_channels,
        orders,
        instruments,
        patterns,
    })
}

/// Highest enabled channel plus one (at least one channel)
fn channel_count(channel_pan: &[u8; 64]) -> u8 {
    let highest = channel_pan.iter().rposition(|&pan| pan < 128).unwrap_or(0);
    (highest + 1).min(MAX_CHANNELS as usize) as u8
}

fn skip(cursor: &mut Cursor<&[u8]>, bytes: i64) -> Result<(), FormatError> {
    let offset = cursor.position();
    cursor
        .seek(SeekFrom::Current(bytes))
        .map_err(|_| FormatError::UnexpectedEof { offset })?;
    Ok(())
}

fn read_offsets(cursor: &mut Cursor<&[u8]>, count: u16) -> Result<Vec<u32>, FormatError> {
    (0..count).map(|_| read_u32(cursor)).collect()
}

fn read_instrument_table(
    data: &[u8],
    offsets: &[u32],
    kind: InstrumentKind,
) -> Result<Vec<Instrument>, FormatError> {
    offsets
        .iter()
        .enumerate()
        .map(|(index, &offset)| {
            if offset == 0 {
                return Ok(Instrument {
                    kind,
                    ..Default::default()
                });
            }

            parse_header(data, offset as usize, kind).ok_or(match kind {
                InstrumentKind::Instrument => FormatError::InvalidInstrument {
                    index: index as u16,
                    offset,
                },
                InstrumentKind::Sample => FormatError::InvalidSample {
                    index: index as u16,
                    offset,
                },
            })
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_patterns(
    data: &[u8],
    offsets: &[u32],
    num_channels: u8,
    instrument_count: usize,
    options: &LoadOptions,
) -> Result<Vec<Pattern>, FormatError> {
    offsets
        .iter()
        .enumerate()
        .map(|(index, &offset)| {
            decode_pattern(data, index as u16, offset, num_channels, instrument_count, options)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn decode_patterns(
    data: &[u8],
    offsets: &[u32],
    num_channels: u8,
    instrument_count: usize,
    options: &LoadOptions,
) -> Result<Vec<Pattern>, FormatError> {
    use rayon::prelude::*;

    offsets
        .par_iter()
        .enumerate()
        .map(|(index, &offset)| {
            decode_pattern(data, index as u16, offset, num_channels, instrument_count, options)
        })
        .collect()
}

/// Decode the pattern stored at `offset`
fn decode_pattern(
    data: &[u8],
    index: u16,
    offset: u32,
    num_channels: u8,
    instrument_count: usize,
    options: &LoadOptions,
) -> Result<Pattern, FormatError> {
    if offset == 0 {
        // Empty pattern - default 64 rows
        return Ok(Pattern::empty(DEFAULT_PATTERN_ROWS, num_channels));
    }

    let start = offset as usize;
    if start + PATTERN_HEADER_SIZE > data.len() {
        return Err(FormatError::PatternOffset { index, offset });
    }

    // Pattern header: packed length (2), rows (2), reserved (4)
    let mut cursor = Cursor::new(data);
    cursor.set_position(start as u64);
    let packed_length = read_u16(&mut cursor)? as usize;
    let num_rows = read_u16(&mut cursor)?;

    let block_start = start + PATTERN_HEADER_SIZE;
    let block_end = block_start + packed_length;
    let block = data.get(block_start..block_end).ok_or(FormatError::Pattern {
        index,
        source: PatternError::Truncated {
            offset: data.len() - block_start,
        },
    })?;

    let wrap = |source| FormatError::Pattern { index, source };
    let mut pattern = decompress(block, num_rows, num_channels).map_err(wrap)?;
    resolve_instruments(&mut pattern, instrument_count, options.dangling_instruments).map_err(wrap)?;

    tracing::debug!(index, rows = num_rows, packed_length, "Decoded pattern");

    Ok(pattern)
}
