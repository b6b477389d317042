//! IT pattern compression

use crate::mask;
use crate::module::{Effect, Pattern};
use crate::{MARKER_NEW_MASK, MAX_CHANNELS};

/// Last values written on one channel
#[derive(Debug, Clone, Copy, Default)]
struct PackMemory {
    mask: Option<u8>,
    note: Option<u8>,
    instrument: Option<u8>,
    volume: Option<u8>,
    effect: Option<Effect>,
}

/// Set `explicit` when `value` differs from the channel's last value,
/// `reuse` when it repeats it
fn field_bits<T: PartialEq + Copy>(
    value: T,
    last: &mut Option<T>,
    explicit: u8,
    reuse: u8,
) -> u8 {
    if *last == Some(value) {
        reuse
    } else {
        *last = Some(value);
        explicit
    }
}

/// Pack pattern data using IT compression
///
/// Empty cells are omitted, repeated values use the "last value" mask bits and
/// a mask equal to the channel's previous one is not written again. Every row
/// is terminated, so the stream always decodes to `pattern.num_rows()` rows.
pub fn pack_pattern(pattern: &Pattern) -> Vec<u8> {
    let mut output = Vec::new();
    let mut memory = [PackMemory::default(); MAX_CHANNELS as usize];

    for row in pattern.rows() {
        for (channel, cell) in row.cells() {
            if cell.is_empty() {
                continue;
            }

            let last = &mut memory[channel as usize];
            let mut entry_mask = 0u8;

            let note = cell.note.to_raw();
            if let Some(note) = note {
                entry_mask |= field_bits(note, &mut last.note, mask::NOTE, mask::LAST_NOTE);
            }

            if cell.instrument != 0 {
                entry_mask |= field_bits(
                    cell.instrument,
                    &mut last.instrument,
                    mask::INSTRUMENT,
                    mask::LAST_INSTRUMENT,
                );
            }

            let volume = cell.volume.to_raw();
            if let Some(volume) = volume {
                entry_mask |= field_bits(volume, &mut last.volume, mask::VOLUME, mask::LAST_VOLUME);
            }

            if let Some(effect) = cell.effect {
                entry_mask |= field_bits(effect, &mut last.effect, mask::EFFECT, mask::LAST_EFFECT);
            }

            if entry_mask == 0 {
                continue;
            }

            // Channel marker, with the mask only when it changed
            let marker = channel + 1;
            if last.mask == Some(entry_mask) {
                output.push(marker);
            } else {
                output.push(marker | MARKER_NEW_MASK);
                output.push(entry_mask);
                last.mask = Some(entry_mask);
            }

            if entry_mask & mask::NOTE != 0
                && let Some(note) = note
            {
                output.push(note);
            }
            if entry_mask & mask::INSTRUMENT != 0 {
                output.push(cell.instrument);
            }
            if entry_mask & mask::VOLUME != 0
                && let Some(volume) = volume
            {
                output.push(volume);
            }
            if entry_mask & mask::EFFECT != 0
                && let Some(effect) = cell.effect
            {
                output.push(effect.command);
                output.push(effect.param);
            }
        }

        // End of row marker
        output.push(0);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Cell, Note};

    fn pattern_with(cells: &[(u16, u8, Cell)], rows: u16, channels: u8) -> Pattern {
        let mut pattern = Pattern::empty(rows, channels);
        for &(row, channel, cell) in cells {
            *pattern.cell_mut(row, channel) = cell;
        }
        pattern
    }

    #[test]
    fn test_empty_pattern_is_row_terminators() {
        let packed = pack_pattern(&Pattern::empty(4, 2));
        assert_eq!(packed, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_channel_marker_is_one_based() {
        let cell = Cell {
            note: Note::Pitch(48),
            ..Cell::EMPTY
        };
        let packed = pack_pattern(&pattern_with(&[(0, 0, cell)], 1, 1));
        assert_eq!(packed, vec![0x81, 0x01, 48, 0]);
    }

    #[test]
    fn test_repeats_use_last_value_and_mask() {
        let cell = Cell::play(Note::Pitch(48), 1, 64);
        let packed = pack_pattern(&pattern_with(&[(0, 0, cell), (1, 0, cell), (2, 0, cell)], 3, 1));
        assert_eq!(
            packed,
            vec![
                0x81, 0x07, 48, 1, 64, 0, // explicit
                0x81, 0x70, 0, // all reused, new mask
                0x01, 0, // same mask again
            ]
        );
    }
}
