//! Channel entry decoding

use crate::error::PatternError;
use crate::mask;
use crate::module::{Cell, Effect, Note, Volume};

/// Byte reader over one packed pattern block
///
/// Every read past the end of the block is a truncation.
pub(crate) struct BlockReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, PatternError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(PatternError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }
}

/// Last explicit values seen on one channel
///
/// Scoped to a single pattern decode.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChannelMemory {
    pub(crate) mask: u8,
    note: Note,
    instrument: u8,
    volume: Volume,
    effect: Option<Effect>,
}

/// Decode one channel entry whose mask is already known
///
/// Fields are consumed in the fixed order note, instrument, volume, effect
/// command, effect parameter. Explicit fields update `memory`; "last value"
/// bits read it.
pub(crate) fn decode_cell(
    entry_mask: u8,
    reader: &mut BlockReader<'_>,
    memory: &mut ChannelMemory,
) -> Result<Cell, PatternError> {
    let mut cell = Cell::EMPTY;

    if entry_mask & mask::NOTE != 0 {
        memory.note = Note::from_raw(reader.read_u8()?);
        cell.note = memory.note;
    } else if entry_mask & mask::LAST_NOTE != 0 {
        cell.note = memory.note;
    }

    if entry_mask & mask::INSTRUMENT != 0 {
        memory.instrument = reader.read_u8()?;
        cell.instrument = memory.instrument;
    } else if entry_mask & mask::LAST_INSTRUMENT != 0 {
        cell.instrument = memory.instrument;
    }

    if entry_mask & mask::VOLUME != 0 {
        memory.volume = Volume::from_raw(reader.read_u8()?);
        cell.volume = memory.volume;
    } else if entry_mask & mask::LAST_VOLUME != 0 {
        cell.volume = memory.volume;
    }

    if entry_mask & mask::EFFECT != 0 {
        let command = reader.read_u8()?;
        let param = reader.read_u8()?;
        memory.effect = Some(Effect::new(command, param));
        cell.effect = memory.effect;
    } else if entry_mask & mask::LAST_EFFECT != 0 {
        cell.effect = memory.effect;
    }

    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOTE_OFF;

    #[test]
    fn test_fields_in_fixed_order() {
        let data = [48, 1, 64, 1, 6];
        let mut reader = BlockReader::new(&data);
        let mut memory = ChannelMemory::default();

        let cell = decode_cell(0x0F, &mut reader, &mut memory).unwrap();

        assert_eq!(cell, Cell::play(Note::Pitch(48), 1, 64).with_effect(1, 6));
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_unseen_channel_defaults() {
        let mut reader = BlockReader::new(&[]);
        let mut memory = ChannelMemory::default();

        let cell = decode_cell(0xF0, &mut reader, &mut memory).unwrap();

        assert_eq!(cell.note, Note::Empty);
        assert_eq!(cell.instrument, 0);
        assert_eq!(cell.volume, Volume::Default);
        assert_eq!(cell.effect, None);
    }

    #[test]
    fn test_last_value_bits_reuse_memory() {
        let data = [60, 3];
        let mut reader = BlockReader::new(&data);
        let mut memory = ChannelMemory::default();
        decode_cell(0x03, &mut reader, &mut memory).unwrap();

        let cell = decode_cell(0x30, &mut reader, &mut memory).unwrap();
        assert_eq!(cell.note, Note::Pitch(60));
        assert_eq!(cell.instrument, 3);
    }

    #[test]
    fn test_note_off_byte() {
        let data = [NOTE_OFF];
        let mut reader = BlockReader::new(&data);
        let cell = decode_cell(0x01, &mut reader, &mut ChannelMemory::default()).unwrap();
        assert_eq!(cell.note, Note::Off);
    }

    #[test]
    fn test_missing_effect_param_is_truncation() {
        let data = [1];
        let mut reader = BlockReader::new(&data);
        let result = decode_cell(0x08, &mut reader, &mut ChannelMemory::default());
        assert_eq!(result, Err(PatternError::Truncated { offset: 1 }));
    }
}
