use std::ops::Range;

use super::error::FormatError;
use super::layout;

/// Bounds-checked little-endian reads over an immutable byte slice.
///
/// Offsets and ranges are relative to the start of the slice; `base` records
/// where that slice sits in the whole file so errors can point at absolute
/// positions.
///
/// # Examples
/// This reader lives in an internal module, so the example is marked as text.
/// ```text
/// use asekit_core::format::reader::AseReader;
///
/// let reader = AseReader::new(&[0xE0, 0xA5, 0x01]);
/// assert_eq!(reader.read_u16_le(0..2).unwrap(), 0xA5E0);
/// assert!(reader.read_u16_le(2..4).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AseReader<'a> {
    bytes: &'a [u8],
    base: usize,
}

impl<'a> AseReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, base: 0 }
    }

    pub fn with_base(bytes: &'a [u8], base: usize) -> Self {
        Self { bytes, base }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FormatError> {
        if self.bytes.len() < needed {
            return Err(FormatError::TooShort {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FormatError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or(FormatError::TooShort {
                needed: offset + 1,
                actual: self.bytes.len(),
            })
    }

    pub fn read_u16_le(&self, range: Range<usize>) -> Result<u16, FormatError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_i16_le(&self, range: Range<usize>) -> Result<i16, FormatError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(i16::from_le_bytes(bytes))
    }

    pub fn read_u32_le(&self, range: Range<usize>) -> Result<u32, FormatError> {
        let bytes = self.read_array::<4>(range)?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], FormatError> {
        self.bytes.get(range.clone()).ok_or(FormatError::TooShort {
            needed: range.end,
            actual: self.bytes.len(),
        })
    }

    /// Everything from `offset` to the end of the slice.
    pub fn read_rest(&self, offset: usize) -> Result<&'a [u8], FormatError> {
        self.read_slice(offset..self.bytes.len().max(offset))
    }

    /// Read a WORD length prefix at `offset` followed by that many UTF-8
    /// bytes. Invalid sequences are replaced; a length past the end of the
    /// slice is a `MalformedString`.
    pub fn read_sized_string(&self, offset: usize) -> Result<String, FormatError> {
        let length = self.read_u16_le(offset..offset + layout::STRING_LENGTH_SIZE)?;
        let start = offset + layout::STRING_LENGTH_SIZE;
        let end = start + length as usize;
        let bytes = self
            .bytes
            .get(start..end)
            .ok_or(FormatError::MalformedString {
                offset: self.base + offset,
                length,
            })?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], FormatError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| FormatError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AseReader;
    use crate::format::error::FormatError;

    #[test]
    fn reads_little_endian_values() {
        let bytes = [0xE0, 0xA5, 0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF];
        let reader = AseReader::new(&bytes);
        assert_eq!(reader.read_u16_le(0..2).unwrap(), 0xA5E0);
        assert_eq!(reader.read_u32_le(2..6).unwrap(), 0x1234_5678);
        assert_eq!(reader.read_i16_le(6..8).unwrap(), -2);
        assert_eq!(reader.read_u8(2).unwrap(), 0x78);
    }

    #[test]
    fn out_of_bounds_reads_fail() {
        let reader = AseReader::new(&[1, 2, 3]);
        assert_eq!(
            reader.read_u32_le(0..4).unwrap_err(),
            FormatError::TooShort {
                needed: 4,
                actual: 3
            }
        );
        assert!(reader.read_u8(3).is_err());
        assert!(reader.require_len(4).is_err());
        assert!(reader.require_len(3).is_ok());
    }

    #[test]
    fn read_rest_past_end_is_empty_or_error() {
        let reader = AseReader::new(&[1, 2, 3]);
        assert_eq!(reader.read_rest(1).unwrap(), &[2, 3]);
        assert!(reader.read_rest(3).unwrap().is_empty());
        assert!(reader.read_rest(4).is_err());
    }

    #[test]
    fn sized_string_reads_prefix_and_body() {
        let bytes = [0xAA, 4, 0, b'B', b'a', b's', b'e', 0xBB];
        let reader = AseReader::new(&bytes);
        assert_eq!(reader.read_sized_string(1).unwrap(), "Base");
    }

    #[test]
    fn sized_string_empty() {
        let reader = AseReader::new(&[0, 0]);
        assert_eq!(reader.read_sized_string(0).unwrap(), "");
    }

    #[test]
    fn sized_string_overrun_is_malformed() {
        let bytes = [9, 0, b'a', b'b'];
        let reader = AseReader::with_base(&bytes, 100);
        assert_eq!(
            reader.read_sized_string(0).unwrap_err(),
            FormatError::MalformedString {
                offset: 100,
                length: 9
            }
        );
    }

    #[test]
    fn sized_string_replaces_invalid_utf8() {
        let bytes = [2, 0, 0xFF, b'x'];
        let reader = AseReader::new(&bytes);
        assert_eq!(reader.read_sized_string(0).unwrap(), "\u{FFFD}x");
    }
}
