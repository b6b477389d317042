//! Low-level encoding functions for IT file components

use crate::module::Instrument;
use crate::{INSTRUMENT_MAGIC, SAMPLE_MAGIC};

/// Size of a written `IMPI` instrument header
pub(crate) const INSTRUMENT_HEADER_SIZE: usize = 550;

/// Size of a written `IMPS` sample header
pub(crate) const SAMPLE_HEADER_SIZE: usize = 80;

/// Write a fixed-length string, padded with zeros
pub(crate) fn write_string(output: &mut Vec<u8>, s: &str, len: usize) {
    let bytes = s.as_bytes();
    let copy_len = bytes.len().min(len);
    output.extend_from_slice(&bytes[..copy_len]);
    output.resize(output.len() + (len - copy_len), 0);
}

/// Write an instrument header with neutral playback settings
///
/// The keyboard table maps every note to itself with no sample, and all three
/// envelopes are disabled.
pub(crate) fn write_instrument_header(output: &mut Vec<u8>, instrument: &Instrument) {
    let start = output.len();

    output.extend_from_slice(INSTRUMENT_MAGIC);
    write_string(output, &instrument.filename, 12);

    // Reserved, NNA, DCT, DCA
    output.extend_from_slice(&[0, 0, 0, 0]);
    // Fadeout
    output.extend_from_slice(&0u16.to_le_bytes());
    // PPS, PPC (C-5)
    output.extend_from_slice(&[0, 60]);
    // GbV, DfP (32, pan disabled), RV, RP
    output.extend_from_slice(&[128, 32, 0, 0]);
    // TrkVers, NoS, reserved
    output.extend_from_slice(&[0, 0, 0, 0]);

    write_string(output, &instrument.name, 26);

    // IFC, IFR, MCh, MPr, MIDIBnk
    output.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

    // Note-Sample-Keyboard table (120 x note, sample)
    for note in 0..120u8 {
        output.push(note);
        output.push(0);
    }

    // Volume, panning and pitch envelopes (82 bytes each)
    output.resize(start + INSTRUMENT_HEADER_SIZE, 0);
}

/// Write a sample header with no sample data
pub(crate) fn write_sample_header(output: &mut Vec<u8>, sample: &Instrument) {
    let start = output.len();

    output.extend_from_slice(SAMPLE_MAGIC);
    write_string(output, &sample.filename, 12);

    // Reserved, GvL, Flg (no data), Vol
    output.extend_from_slice(&[0, 64, 0, 64]);

    write_string(output, &sample.name, 26);

    // Cvt (signed), DfP
    output.extend_from_slice(&[0x01, 32]);

    // Length, loop begin, loop end
    output.extend_from_slice(&[0u8; 12]);
    // C5 speed
    output.extend_from_slice(&8363u32.to_le_bytes());

    // Sustain loop, sample pointer, auto-vibrato
    output.resize(start + SAMPLE_HEADER_SIZE, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_string_pads_and_truncates() {
        let mut output = Vec::new();
        write_string(&mut output, "Kick", 6);
        write_string(&mut output, "TooLong", 3);
        assert_eq!(output, b"Kick\0\0Too");
    }

    #[test]
    fn test_header_sizes_and_name_offsets() {
        let instrument = Instrument::new("Bass");

        let mut output = Vec::new();
        write_instrument_header(&mut output, &instrument);
        assert_eq!(output.len(), INSTRUMENT_HEADER_SIZE);
        assert_eq!(&output[0x20..0x24], b"Bass");
        // Keyboard table starts at 0x40
        assert_eq!(&output[0x40..0x44], &[0, 0, 1, 0]);

        let mut output = Vec::new();
        write_sample_header(&mut output, &instrument);
        assert_eq!(output.len(), SAMPLE_HEADER_SIZE);
        assert_eq!(&output[0x14..0x18], b"Bass");
        assert_eq!(&output[0x3C..0x40], &8363u32.to_le_bytes());
    }
}
