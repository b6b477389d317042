//! Helper functions for reading binary data

use std::io::{Cursor, Read};

use crate::error::FormatError;

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N], FormatError> {
    let offset = cursor.position();
    let mut buf = [0u8; N];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| FormatError::UnexpectedEof { offset })?;
    Ok(buf)
}

/// Read a single byte
pub(crate) fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, FormatError> {
    Ok(read_array::<1>(cursor)?[0])
}

/// Read a 16-bit little-endian integer
pub(crate) fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, FormatError> {
    Ok(u16::from_le_bytes(read_array(cursor)?))
}

/// Read a 32-bit little-endian integer
pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, FormatError> {
    Ok(u32::from_le_bytes(read_array(cursor)?))
}

/// Read `N` raw bytes
pub(crate) fn read_bytes<const N: usize>(
    cursor: &mut Cursor<&[u8]>,
) -> Result<[u8; N], FormatError> {
    read_array(cursor)
}

/// Read a null-terminated or fixed-length string
pub(crate) fn read_string(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len])
        .trim_end()
        .to_string()
}
