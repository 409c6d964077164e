//! Bit-granular stream parser for serialization record decoding.
//!
//! The [`Parser`] type provides methods for reading primitive values, bit groups, and
//! length-prefixed strings from a fully-buffered byte stream. It is used internally by
//! the record decoder, but is also available for advanced users who need to decode
//! custom record payloads.
//!
//! # Example
//!
//! ```rust
//! use nrbf::Parser;
//! let data = [0x01, 0x02, 0x03, 0x04];
//! let mut parser = Parser::new(&data);
//! let value = parser.read_le::<u16>()?;
//! assert_eq!(value, 0x0201);
//! # Ok::<(), nrbf::Error>(())
//! ```

use crate::{
    reader::io::{read_le_at, NrbfIO},
    Error::{MalformedLength, TruncatedInput},
    Result,
};

/// A cursor for reading binary serialization stream data.
///
/// `Parser` maintains a bit-level position over a borrowed byte slice. All multi-byte
/// reads are little-endian and require the cursor to sit on a byte boundary. Sub-byte
/// reads are deliberately limited to what the wire format needs: the 7-bit groups of
/// variable-length size prefixes and the magnitude/sign split of signed bytes. Within
/// a byte, bits are consumed least-significant first; across bytes, the low byte comes
/// first.
///
/// All read operations are bounds-checked so that truncated or corrupted streams fail
/// with an error instead of reading out of bounds.
///
/// # Examples
///
/// ```rust
/// use nrbf::Parser;
///
/// let data = [0x81, 0x02, 0x2A, 0x00, 0x00, 0x00];
/// let mut parser = Parser::new(&data);
///
/// // A 7-bit encoded length: group 1 with continuation, group 2 without
/// assert_eq!(parser.read_7bit_encoded_len()?, 257);
///
/// // Followed by a byte-aligned little-endian value
/// assert_eq!(parser.read_le::<u32>()?, 42);
/// # Ok::<(), nrbf::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    bit_position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` from a byte slice
    ///
    /// ## Arguments
    /// * 'data' - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser {
            data,
            bit_position: 0,
        }
    }

    /// Returns the length of the data in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the parser has no data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if there is more data to parse
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.bit_position < self.data.len() * 8
    }

    /// Get the current byte position of the parser, rounded up to the next boundary
    /// when the cursor sits inside a byte
    #[must_use]
    pub fn pos(&self) -> usize {
        self.bit_position.div_ceil(8)
    }

    /// Returns true if the cursor sits on a byte boundary
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.bit_position % 8 == 0
    }

    /// Number of whole bytes left between the cursor and the end of the data
    #[must_use]
    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.pos()
    }

    /// Read the next `count` bits as a little-endian integer and advance the cursor.
    ///
    /// Within a byte, bits are taken least-significant first; across bytes, the low
    /// byte contributes the low bits.
    ///
    /// ## Arguments
    /// * 'count' - Number of bits to read, 1 to 32
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] if fewer than `count` bits remain, or
    /// [`Error::Malformed`](crate::Error::Malformed) for a count outside 1..=32
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        let value = self.peek_bits(count)?;
        self.bit_position += count as usize;
        Ok(value)
    }

    /// Read the next `count` bits as a little-endian integer without advancing.
    ///
    /// ## Arguments
    /// * 'count' - Number of bits to read, 1 to 32
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] if fewer than `count` bits remain, or
    /// [`Error::Malformed`](crate::Error::Malformed) for a count outside 1..=32
    pub fn peek_bits(&self, count: u32) -> Result<u32> {
        if count == 0 || count > 32 {
            return Err(malformed_error!("Invalid bit read width - {}", count));
        }

        if self.bit_position + count as usize > self.data.len() * 8 {
            return Err(TruncatedInput);
        }

        let mut value = 0_u32;
        for i in 0..count as usize {
            let pos = self.bit_position + i;
            let bit = (self.data[pos / 8] >> (pos % 8)) & 1;
            value |= u32::from(bit) << i;
        }

        Ok(value)
    }

    /// Read `count` raw bytes and advance the cursor.
    ///
    /// ## Arguments
    /// * 'count' - Number of bytes to read
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] if fewer than `count` bytes remain, or
    /// [`Error::Malformed`](crate::Error::Malformed) when the cursor is not byte-aligned
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if !self.is_aligned() {
            return Err(malformed_error!(
                "Byte read at unaligned bit position - {}",
                self.bit_position
            ));
        }

        let start = self.bit_position / 8;
        if start + count > self.data.len() {
            return Err(TruncatedInput);
        }

        self.bit_position += count * 8;
        Ok(&self.data[start..start + count])
    }

    /// Read a type T from the current position in little-endian, and advance accordingly
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] if reading would exceed the data length, or
    /// [`Error::Malformed`](crate::Error::Malformed) when the cursor is not byte-aligned
    pub fn read_le<T: NrbfIO>(&mut self) -> Result<T> {
        if !self.is_aligned() {
            return Err(malformed_error!(
                "Value read at unaligned bit position - {}",
                self.bit_position
            ));
        }

        let mut offset = self.bit_position / 8;
        let value = read_le_at::<T>(self.data, &mut offset)?;
        self.bit_position = offset * 8;

        Ok(value)
    }

    /// Read a signed byte stored as 7 magnitude bits followed by a sign bit.
    ///
    /// With the sign bit set the value is `magnitude - 128`, which maps the byte
    /// `0x80` to -128 and `0xFF` to -1.
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] if no full byte remains
    pub fn read_sbyte(&mut self) -> Result<i8> {
        let magnitude = self.read_bits(7)? as i16;
        let sign = self.read_bits(1)?;

        let value = if sign == 1 { magnitude - 128 } else { magnitude };

        #[allow(clippy::cast_possible_truncation)]
        let value = value as i8;
        Ok(value)
    }

    /// Read a 7-bit encoded length (used for string size prefixes).
    ///
    /// Each group carries 7 value bits followed by one continuation bit; groups are
    /// concatenated low-to-high. At most five groups are permitted.
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] if the stream ends mid-prefix, or [`MalformedLength`]
    /// when the prefix does not terminate within five groups or exceeds 32 bits
    pub fn read_7bit_encoded_len(&mut self) -> Result<u32> {
        let mut value = 0_u64;

        for group in 0..5 {
            let bits = u64::from(self.read_bits(7)?);
            value |= bits << (7 * group);

            if self.read_bits(1)? == 0 {
                if value > u64::from(u32::MAX) {
                    return Err(MalformedLength);
                }

                #[allow(clippy::cast_possible_truncation)]
                let value = value as u32;
                return Ok(value);
            }
        }

        Err(MalformedLength)
    }

    /// Read a length-prefixed string (a 7-bit encoded byte length followed by UTF-8 data).
    ///
    /// # Errors
    /// Returns [`TruncatedInput`] or [`MalformedLength`] for an invalid prefix,
    /// [`MalformedLength`] when the declared length exceeds the remaining input, or
    /// [`Error::Malformed`](crate::Error::Malformed) for invalid UTF-8
    pub fn read_prefixed_string_utf8(&mut self) -> Result<String> {
        let length = self.read_7bit_encoded_len()? as usize;

        if length > self.remaining_bytes() {
            return Err(MalformedLength);
        }

        let start = self.pos();
        let string_data = self.read_bytes(length)?;

        String::from_utf8(string_data.to_vec()).map_err(|_| {
            malformed_error!(
                "Invalid string - {} - {} - {:?}",
                start,
                start + length,
                string_data
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_lsb_first() {
        // 0xAC = 1010_1100: bits come out 0,0,1,1,0,1,0,1
        let mut parser = Parser::new(&[0xAC]);
        assert_eq!(parser.read_bits(2).unwrap(), 0b00);
        assert_eq!(parser.read_bits(3).unwrap(), 0b011);
        assert_eq!(parser.read_bits(3).unwrap(), 0b101);
        assert!(matches!(parser.read_bits(1), Err(TruncatedInput)));
    }

    #[test]
    fn test_read_bits_across_bytes() {
        // Low byte first: 16 bits of [0x01, 0x02] read as 0x0201
        let mut parser = Parser::new(&[0x01, 0x02]);
        assert_eq!(parser.read_bits(16).unwrap(), 0x0201);
    }

    #[test]
    fn test_read_bits_invalid_width() {
        let mut parser = Parser::new(&[0xFF; 8]);
        assert!(parser.read_bits(0).is_err());
        assert!(parser.read_bits(33).is_err());
        assert_eq!(parser.read_bits(32).unwrap(), u32::MAX);
    }

    #[test]
    fn test_peek_bits_does_not_advance() {
        let mut parser = Parser::new(&[0x81]);
        assert_eq!(parser.peek_bits(8).unwrap(), 0x81);
        assert_eq!(parser.peek_bits(8).unwrap(), 0x81);
        assert_eq!(parser.read_bits(8).unwrap(), 0x81);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn test_read_le_u32() {
        let mut parser = Parser::new(&[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(parser.read_le::<u32>().unwrap(), 16_777_216);

        let mut parser = Parser::new(&[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(parser.read_le::<i32>().unwrap(), 16_777_216);
    }

    #[test]
    fn test_read_le_unaligned() {
        let mut parser = Parser::new(&[0xFF, 0xFF]);
        parser.read_bits(3).unwrap();
        assert!(matches!(
            parser.read_le::<u8>(),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_read_bytes() {
        let mut parser = Parser::new(&[0x01, 0x02, 0x03]);
        assert_eq!(parser.read_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(parser.pos(), 2);
        assert!(matches!(parser.read_bytes(2), Err(TruncatedInput)));
    }

    #[test]
    fn test_read_sbyte() {
        let test_cases = vec![
            (0x80_u8, -128_i8),
            (0xFF, -1),
            (0x7F, 127),
            (0x00, 0),
            (0x81, -127),
        ];

        for (input, expected) in test_cases {
            let data = [input];
            let mut parser = Parser::new(&data);
            assert_eq!(parser.read_sbyte().unwrap(), expected);
        }
    }

    #[test]
    fn test_read_7bit_encoded_len() {
        let test_cases = vec![
            (vec![0x00], 0),
            (vec![0x7F], 127),
            (vec![0x81, 0x02], 257),
            (vec![0x80, 0x01], 128),
            (vec![0xFF, 0x7F], 16383),
            (vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F], u32::MAX),
        ];

        for (input, expected) in test_cases {
            let mut parser = Parser::new(&input);
            assert_eq!(parser.read_7bit_encoded_len().unwrap(), expected);
        }
    }

    #[test]
    fn test_read_7bit_encoded_len_truncated() {
        let mut parser = Parser::new(&[0x80]);
        assert!(matches!(
            parser.read_7bit_encoded_len(),
            Err(TruncatedInput)
        ));
    }

    #[test]
    fn test_read_7bit_encoded_len_too_many_groups() {
        let mut parser = Parser::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert!(matches!(
            parser.read_7bit_encoded_len(),
            Err(MalformedLength)
        ));
    }

    #[test]
    fn test_read_7bit_encoded_len_overflow() {
        // Five valid groups whose value does not fit in 32 bits
        let mut parser = Parser::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F]);
        assert!(matches!(
            parser.read_7bit_encoded_len(),
            Err(MalformedLength)
        ));
    }

    #[test]
    fn test_read_prefixed_string() {
        let test_cases = vec![
            (vec![0x05, b'h', b'e', b'l', b'l', b'o'], "hello"),
            (vec![0x00], ""),
            (
                vec![0x06, 0xE4, 0xB8, 0xAD, 0xE6, 0x96, 0x87],
                "\u{4E2D}\u{6587}",
            ),
        ];

        for (input, expected) in test_cases {
            let mut parser = Parser::new(&input);
            assert_eq!(parser.read_prefixed_string_utf8().unwrap(), expected);
        }
    }

    #[test]
    fn test_read_prefixed_string_length_past_end() {
        let mut parser = Parser::new(&[0x7F, b'a', b'b']);
        assert!(matches!(
            parser.read_prefixed_string_utf8(),
            Err(MalformedLength)
        ));
    }

    #[test]
    fn test_read_prefixed_string_invalid_utf8() {
        let mut parser = Parser::new(&[0x02, 0xC0, 0xC0]);
        assert!(matches!(
            parser.read_prefixed_string_utf8(),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_read_f32_f64() {
        let f32_bytes = 1.5_f32.to_le_bytes();
        let mut parser = Parser::new(&f32_bytes);
        assert_eq!(parser.read_le::<f32>().unwrap(), 1.5);

        let f64_bytes = (-2.25_f64).to_le_bytes();
        let mut parser = Parser::new(&f64_bytes);
        assert_eq!(parser.read_le::<f64>().unwrap(), -2.25);
    }
}
