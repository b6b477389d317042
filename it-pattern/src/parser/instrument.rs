//! Instrument and sample header parsing
//!
//! Only the identifying fields are read. Both header kinds start with a magic
//! and a 12-byte DOS filename; the name sits at 0x20 in `IMPI` headers and at
//! 0x14 in `IMPS` headers.

use crate::module::{Instrument, InstrumentKind};
use crate::{INSTRUMENT_MAGIC, SAMPLE_MAGIC};

use super::helpers::read_string;

const FILENAME_OFFSET: usize = 0x04;
const INSTRUMENT_NAME_OFFSET: usize = 0x20;
const SAMPLE_NAME_OFFSET: usize = 0x14;
const NAME_LEN: usize = 26;

/// Parse the header at `offset`, or `None` if it is out of bounds or has the
/// wrong magic
pub(crate) fn parse_header(data: &[u8], offset: usize, kind: InstrumentKind) -> Option<Instrument> {
    let (magic, name_offset) = match kind {
        InstrumentKind::Instrument => (INSTRUMENT_MAGIC, INSTRUMENT_NAME_OFFSET),
        InstrumentKind::Sample => (SAMPLE_MAGIC, SAMPLE_NAME_OFFSET),
    };

    let header = data.get(offset..offset.checked_add(name_offset + NAME_LEN)?)?;
    if &header[..4] != magic {
        return None;
    }

    Some(Instrument {
        name: read_string(&header[name_offset..name_offset + NAME_LEN]),
        filename: read_string(&header[FILENAME_OFFSET..FILENAME_OFFSET + 12]),
        kind,
    })
}
