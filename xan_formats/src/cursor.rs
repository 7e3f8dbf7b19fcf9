//! Bounds-checked readers over borrowed byte regions.
//!
//! Every stream inside a Xan payload (sizes, vectors, literal pixels, the
//! packed image data) gets its own `ByteCursor`, so an overrun names the
//! stream it happened in instead of wandering into a neighbouring segment.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Stream, XanError};

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    stream: Stream,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8], stream: Stream) -> Self {
        Self {
            data,
            pos: 0,
            stream,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes from the current position to the end of the region.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], XanError> {
        if len > self.remaining() {
            return Err(self.overrun(len));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn peek_u8(&self) -> Result<u8, XanError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.overrun(1))
    }

    pub fn read_u8(&mut self) -> Result<u8, XanError> {
        let value = self.peek_u8()?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_be16(&mut self) -> Result<u16, XanError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_be24(&mut self) -> Result<u32, XanError> {
        Ok(BigEndian::read_u24(self.take(3)?))
    }

    pub fn read_be32(&mut self) -> Result<u32, XanError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_le16(&mut self) -> Result<u16, XanError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_le32(&mut self) -> Result<u32, XanError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_tag(&mut self) -> Result<[u8; 4], XanError> {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(self.take(4)?);
        Ok(tag)
    }

    fn overrun(&self, needed: usize) -> XanError {
        XanError::Truncated {
            stream: self.stream,
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}

/// Single-bit reader, least significant bit of each byte first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    pub fn read_bit(&mut self) -> Result<u8, XanError> {
        let byte_index = self.bit_pos >> 3;
        let byte = self
            .data
            .get(byte_index)
            .copied()
            .ok_or(XanError::Truncated {
                stream: Stream::Bitstream,
                offset: byte_index,
                needed: 1,
                available: 0,
            })?;
        let bit = (byte >> (self.bit_pos & 7)) & 1;
        self.bit_pos += 1;
        Ok(bit)
    }

    #[inline]
    pub fn bits_consumed(&self) -> usize {
        self.bit_pos
    }
}
