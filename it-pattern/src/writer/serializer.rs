//! IT file serialization orchestration

use super::encoding::{
    write_instrument_header, write_sample_header, write_string, INSTRUMENT_HEADER_SIZE,
    SAMPLE_HEADER_SIZE,
};
use super::pack_pattern;
use crate::error::{FormatError, PatternError};
use crate::module::Song;
use crate::{HEADER_SIZE, IT_MAGIC, MAX_CHANNELS};

/// Serialize a complete song to IT bytes
///
/// The instrument table is written as `IMPI` headers when the song uses
/// instruments and as `IMPS` headers otherwise. No sample data is written.
pub(crate) fn serialize_song(song: &Song) -> Result<Vec<u8>, FormatError> {
    let uses_instruments = song.uses_instruments();
    let (num_instruments, num_samples, entry_size) = if uses_instruments {
        (song.instruments.len(), 0, INSTRUMENT_HEADER_SIZE)
    } else {
        (0, song.instruments.len(), SAMPLE_HEADER_SIZE)
    };

    let packed_patterns = song
        .patterns
        .iter()
        .enumerate()
        .map(|(index, pattern)| {
            let packed = pack_pattern(pattern);
            if packed.len() > u16::MAX as usize {
                return Err(FormatError::Pattern {
                    index: index as u16,
                    source: PatternError::Oversized { len: packed.len() },
                });
            }
            Ok(packed)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // ========== Layout ==========

    let offset_table_start = HEADER_SIZE + song.orders.len();
    let offset_table_size = (song.instruments.len() + song.patterns.len()) * 4;
    let entries_start = offset_table_start + offset_table_size;

    let entry_offsets: Vec<u32> = (0..song.instruments.len())
        .map(|i| (entries_start + i * entry_size) as u32)
        .collect();

    let mut pattern_offsets = Vec::with_capacity(packed_patterns.len());
    let mut current = entries_start + song.instruments.len() * entry_size;
    for packed in &packed_patterns {
        pattern_offsets.push(current as u32);
        current += 8 + packed.len();
    }

    let mut output = Vec::with_capacity(current);

    // ========== Header ==========

    write_header(&mut output, song, num_instruments as u16, num_samples as u16);

    // ========== Order Table ==========

    output.extend_from_slice(&song.orders);

    // ========== Offset Tables ==========

    // Instrument offsets, then sample offsets; only one of them is non-empty
    for &offset in entry_offsets.iter().chain(&pattern_offsets) {
        output.extend_from_slice(&offset.to_le_bytes());
    }

    // ========== Instrument / Sample Headers ==========

    for instrument in &song.instruments {
        if uses_instruments {
            write_instrument_header(&mut output, instrument);
        } else {
            write_sample_header(&mut output, instrument);
        }
    }

    // ========== Patterns ==========

    for (pattern, packed) in song.patterns.iter().zip(&packed_patterns) {
        output.extend_from_slice(&(packed.len() as u16).to_le_bytes());
        output.extend_from_slice(&pattern.num_rows().to_le_bytes());
        output.extend_from_slice(&[0u8; 4]);
        output.extend_from_slice(packed);
    }

    Ok(output)
}

/// Write the 192-byte IT file header
fn write_header(output: &mut Vec<u8>, song: &Song, num_instruments: u16, num_samples: u16) {
    output.extend_from_slice(IT_MAGIC);
    write_string(output, &song.name, 26);

    // PHilight - 4/16 row highlight
    output.extend_from_slice(&[0x04, 0x10]);

    output.extend_from_slice(&(song.orders.len() as u16).to_le_bytes());
    output.extend_from_slice(&num_instruments.to_le_bytes());
    output.extend_from_slice(&num_samples.to_le_bytes());
    output.extend_from_slice(&(song.patterns.len() as u16).to_le_bytes());
    output.extend_from_slice(&song.created_with.to_le_bytes());
    output.extend_from_slice(&song.compatible_with.to_le_bytes());
    output.extend_from_slice(&song.flags.bits().to_le_bytes());

    // Special
    output.extend_from_slice(&0u16.to_le_bytes());

    // GV, MV, IS, IT, Sep, PWD
    output.extend_from_slice(&[
        128,
        48,
        song.initial_speed,
        song.initial_tempo,
        128,
        0,
    ]);

    // MsgLgth, MsgOff, reserved
    output.extend_from_slice(&[0u8; 10]);

    // Channel pan: centre for used channels, disabled (+128) for the rest
    for channel in 0..MAX_CHANNELS {
        output.push(if channel < song.num_channels { 32 } else { 32 | 128 });
    }

    // Channel volume
    output.extend_from_slice(&[64u8; 64]);
}
