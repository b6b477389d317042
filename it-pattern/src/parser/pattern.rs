//! Pattern decompression

use crate::error::PatternError;
use crate::module::Pattern;
use crate::options::DanglingInstruments;
use crate::{MARKER_NEW_MASK, MAX_CHANNELS, MAX_PATTERN_ROWS};

use super::cell::{decode_cell, BlockReader, ChannelMemory};

/// Decompress one packed pattern block into a `num_rows` x `num_channels` grid
///
/// `block` is the packed data that follows the 8-byte pattern header. Rows the
/// stream does not reach stay empty. Entries addressed to channels at or past
/// `num_channels` are consumed, and still update that channel's memory, but
/// are not stored.
///
/// # Errors
/// * [`PatternError::InvalidRows`] - `num_rows` is 0 or above 200
/// * [`PatternError::Truncated`] - an entry or the final row runs past the block
/// * [`PatternError::ExtraRows`] - data follows the last declared row
pub fn decompress(block: &[u8], num_rows: u16, num_channels: u8) -> Result<Pattern, PatternError> {
    if num_rows == 0 || num_rows > MAX_PATTERN_ROWS {
        return Err(PatternError::InvalidRows(num_rows));
    }

    let mut pattern = Pattern::empty(num_rows, num_channels);
    let mut memory = [ChannelMemory::default(); MAX_CHANNELS as usize];
    let mut reader = BlockReader::new(block);

    let mut row = 0u16;
    let mut row_open = false;

    while !reader.is_at_end() {
        let offset = reader.position();
        let marker = reader.read_u8()?;

        if row >= num_rows {
            return Err(PatternError::ExtraRows {
                rows: num_rows,
                offset,
            });
        }

        if marker == 0 {
            // End of row
            row += 1;
            row_open = false;
            continue;
        }

        let channel = (marker - 1) & 0x3F;
        let channel_memory = &mut memory[channel as usize];

        if marker & MARKER_NEW_MASK != 0 {
            channel_memory.mask = reader.read_u8()?;
        }

        let cell = decode_cell(channel_memory.mask, &mut reader, channel_memory)?;
        row_open = true;

        if channel < num_channels {
            *pattern.cell_mut(row, channel) = cell;
        } else {
            tracing::trace!(row, channel, "Dropping entry for disabled channel");
        }
    }

    if row_open {
        // Block ended inside a row
        return Err(PatternError::Truncated {
            offset: block.len(),
        });
    }

    Ok(pattern)
}

/// Check every instrument reference against the instrument table
///
/// `count` is the number of defined instruments; valid references are
/// `1..=count`.
pub(crate) fn resolve_instruments(
    pattern: &mut Pattern,
    count: usize,
    policy: DanglingInstruments,
) -> Result<(), PatternError> {
    for (row, channel, cell) in pattern.cells_mut() {
        if cell.instrument as usize <= count {
            continue;
        }

        match policy {
            DanglingInstruments::Reject => {
                return Err(PatternError::DanglingInstrument {
                    row,
                    channel,
                    instrument: cell.instrument,
                });
            }
            DanglingInstruments::Clear => {
                tracing::warn!(
                    row,
                    channel,
                    instrument = cell.instrument,
                    "Clearing reference to undefined instrument"
                );
                cell.instrument = 0;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Cell, Note, Volume};

    #[test]
    fn test_short_stream_pads_rows() {
        // Row 0: channel 0 plays C-4 with instrument 1, then nothing else
        let block = [0x81, 0x03, 48, 1, 0];
        let pattern = decompress(&block, 4, 2).unwrap();

        assert_eq!(pattern.num_rows(), 4);
        assert_eq!(pattern.cells().len(), 8);
        assert_eq!(pattern.cell(0, 0).unwrap().note, Note::Pitch(48));
        assert!(pattern.cells()[1..].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_mask_reused_without_marker_bit() {
        // Channel 1 declares mask 0x01 once, then sends only note bytes
        let block = [0x82, 0x01, 48, 0, 0x02, 50, 0];
        let pattern = decompress(&block, 2, 2).unwrap();

        assert_eq!(pattern.cell(0, 1).unwrap().note, Note::Pitch(48));
        assert_eq!(pattern.cell(1, 1).unwrap().note, Note::Pitch(50));
    }

    #[test]
    fn test_carry_forward_spans_rows() {
        // Row 0: explicit instrument 2 and volume 32
        // Row 1: empty
        // Row 2: reuse last instrument and volume
        let block = [0x81, 0x06, 2, 32, 0, 0, 0x81, 0x60, 0];
        let pattern = decompress(&block, 3, 1).unwrap();

        let cell = pattern.cell(2, 0).unwrap();
        assert_eq!(cell.instrument, 2);
        assert_eq!(cell.volume, Volume::Set(32));
        assert!(pattern.cell(1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_memory_is_per_channel() {
        // Channel 0 sets instrument 5; channel 1 asks for its own last instrument
        let block = [0x81, 0x02, 5, 0x82, 0x20, 0];
        let pattern = decompress(&block, 1, 2).unwrap();

        assert_eq!(pattern.cell(0, 0).unwrap().instrument, 5);
        assert_eq!(pattern.cell(0, 1).unwrap().instrument, 0);
    }

    #[test]
    fn test_disabled_channel_consumed() {
        // Channel 3 is past the 2 stored channels but its bytes must be skipped
        let block = [0x84, 0x0F, 60, 1, 64, 1, 6, 0x81, 0x01, 50, 0];
        let pattern = decompress(&block, 1, 2).unwrap();

        assert_eq!(pattern.cell(0, 0).unwrap().note, Note::Pitch(50));
    }

    #[test]
    fn test_truncated_mid_entry() {
        let block = [0x81, 0x03, 48];
        assert_eq!(
            decompress(&block, 4, 1),
            Err(PatternError::Truncated { offset: 3 })
        );
    }

    #[test]
    fn test_truncated_mid_row() {
        // Complete entry but no row terminator
        let block = [0x81, 0x01, 48];
        assert_eq!(
            decompress(&block, 4, 1),
            Err(PatternError::Truncated { offset: 3 })
        );
    }

    #[test]
    fn test_extra_rows_rejected() {
        let block = [0, 0, 0];
        assert_eq!(
            decompress(&block, 2, 1),
            Err(PatternError::ExtraRows { rows: 2, offset: 2 })
        );
    }

    #[test]
    fn test_invalid_row_count() {
        assert_eq!(decompress(&[], 0, 1), Err(PatternError::InvalidRows(0)));
        assert_eq!(decompress(&[], 201, 1), Err(PatternError::InvalidRows(201)));
    }

    #[test]
    fn test_dangling_instrument_policies() {
        let block = [0x81, 0x02, 3, 0];
        let mut pattern = decompress(&block, 1, 1).unwrap();

        assert_eq!(
            resolve_instruments(&mut pattern.clone(), 2, DanglingInstruments::Reject),
            Err(PatternError::DanglingInstrument {
                row: 0,
                channel: 0,
                instrument: 3
            })
        );

        resolve_instruments(&mut pattern, 2, DanglingInstruments::Clear).unwrap();
        assert_eq!(pattern.cell(0, 0).unwrap().instrument, 0);
    }
}
