/*
    sim86
    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.
*/
use crate::error::StreamError;

/// The [BitReader] trait is the stream the decoder consumes: bit-granular reads for the opcode
/// and mode fields, byte-aligned reads for displacement and data.
pub trait BitReader {
    /// Reads `n` (0..=8) bits, most significant first. The read may not cross a byte boundary.
    fn read_bits(&mut self, n: u8) -> Result<u8, StreamError>;

    /// Reads `n` whole bytes. The cursor must be byte aligned.
    fn read_bytes(&mut self, n: usize) -> Result<&[u8], StreamError>;

    /// Peeks the next byte without advancing. The cursor must be byte aligned.
    fn peek_u8(&self) -> Result<u8, StreamError>;

    /// Current cursor position in bits.
    fn bit_position(&self) -> usize;

    #[inline]
    fn is_aligned(&self) -> bool {
        self.bit_position() % 8 == 0
    }

    /// Reads a single byte.
    fn read_u8(&mut self) -> Result<u8, StreamError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads up to two bytes as a little-endian value.
    fn read_le16(&mut self, n: usize) -> Result<u16, StreamError> {
        let bytes = self.read_bytes(n.min(2))?;
        Ok(bytes
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, b)| acc | ((*b as u16) << (i * 8))))
    }
}

/// A [BitReader] over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct SliceBitReader<'a> {
    bytes: &'a [u8],
    bit_pos: usize,
}

impl<'a> SliceBitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, bit_pos: 0 }
    }

    /// Number of whole bytes not yet touched by the cursor.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.bit_pos.div_ceil(8))
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Byte offset of the cursor, rounded down.
    pub fn byte_position(&self) -> usize {
        self.bit_pos / 8
    }
}

impl BitReader for SliceBitReader<'_> {
    fn read_bits(&mut self, n: u8) -> Result<u8, StreamError> {
        if n > 8 {
            return Err(StreamError::BitCountTooLarge(n));
        }
        if n == 0 {
            return Ok(0);
        }
        let in_byte = (self.bit_pos % 8) as u32;
        if in_byte + n as u32 > 8 {
            return Err(StreamError::ByteBoundary {
                bit_offset: self.bit_pos,
                requested: n,
            });
        }
        let byte = *self
            .bytes
            .get(self.bit_pos / 8)
            .ok_or(StreamError::UnexpectedEof { needed: 1, available: 0 })?;

        self.bit_pos += n as usize;
        Ok((byte << in_byte) >> (8 - n as u32))
    }

    fn read_bytes(&mut self, n: usize) -> Result<&[u8], StreamError> {
        if !self.is_aligned() {
            return Err(StreamError::Misaligned { bit_offset: self.bit_pos });
        }
        let start = self.bit_pos / 8;
        let available = self.bytes.len().saturating_sub(start);
        if n > available {
            return Err(StreamError::UnexpectedEof { needed: n, available });
        }
        self.bit_pos += n * 8;
        Ok(&self.bytes[start..start + n])
    }

    fn peek_u8(&self) -> Result<u8, StreamError> {
        if !self.is_aligned() {
            return Err(StreamError::Misaligned { bit_offset: self.bit_pos });
        }
        self.bytes
            .get(self.bit_pos / 8)
            .copied()
            .ok_or(StreamError::UnexpectedEof { needed: 1, available: 0 })
    }

    #[inline]
    fn bit_position(&self) -> usize {
        self.bit_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bits_msb_first() {
        let mut r = SliceBitReader::new(&[0b1000_1010, 0b1100_0100]);
        assert_eq!(r.read_bits(6).unwrap(), 0b100010);
        assert_eq!(r.read_bits(1).unwrap(), 1);
        assert_eq!(r.read_bits(1).unwrap(), 0);
        assert_eq!(r.read_bits(2).unwrap(), 0b11);
        assert_eq!(r.read_bits(3).unwrap(), 0b000);
        assert_eq!(r.read_bits(3).unwrap(), 0b100);
        assert!(r.is_empty());
    }

    #[test]
    fn full_byte_read() {
        let mut r = SliceBitReader::new(&[0xA5]);
        assert_eq!(r.read_bits(8).unwrap(), 0xA5);
        assert_eq!(r.bit_position(), 8);
    }

    #[test]
    fn zero_bit_read_does_not_advance() {
        let mut r = SliceBitReader::new(&[0xFF]);
        assert_eq!(r.read_bits(0).unwrap(), 0);
        assert_eq!(r.bit_position(), 0);
    }

    #[test]
    fn bit_read_cannot_cross_bytes() {
        let mut r = SliceBitReader::new(&[0xFF, 0xFF]);
        r.read_bits(6).unwrap();
        assert_eq!(
            r.read_bits(3),
            Err(StreamError::ByteBoundary { bit_offset: 6, requested: 3 })
        );
        assert_eq!(r.read_bits(9), Err(StreamError::BitCountTooLarge(9)));
    }

    #[test]
    fn byte_read_requires_alignment() {
        let mut r = SliceBitReader::new(&[0xFF, 0xFF]);
        r.read_bits(4).unwrap();
        assert_eq!(r.read_bytes(1), Err(StreamError::Misaligned { bit_offset: 4 }));
        assert_eq!(r.peek_u8(), Err(StreamError::Misaligned { bit_offset: 4 }));
    }

    #[test]
    fn eof() {
        let mut r = SliceBitReader::new(&[0x01]);
        assert_eq!(r.read_bytes(2), Err(StreamError::UnexpectedEof { needed: 2, available: 1 }));
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_bits(1), Err(StreamError::UnexpectedEof { needed: 1, available: 0 }));
        assert!(r.peek_u8().is_err());
    }

    #[test]
    fn little_endian_words() {
        let mut r = SliceBitReader::new(&[0xF0, 0xAA, 0x7F]);
        assert_eq!(r.read_le16(2).unwrap(), 0xAAF0);
        assert_eq!(r.read_le16(1).unwrap(), 0x007F);
        assert_eq!(r.read_le16(0).unwrap(), 0);
    }
}
