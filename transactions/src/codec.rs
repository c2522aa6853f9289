//! Little-endian byte reader and writer helpers for the wire formats.

use crate::EnvelopeError;

/// A cursor over a borrowed byte buffer.
#[derive(Debug)]
pub struct Reader<'a> {
    buffer: &'a [u8],
    read: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, read: 0 }
    }

    pub fn position(&self) -> usize {
        self.read
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.read
    }

    /// The bytes consumed since `start`, a position previously returned by
    /// [`Reader::position`].
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.buffer[start.min(self.read)..self.read]
    }

    /// Returns true if reading is finished.
    pub fn is_finished(&self) -> bool {
        self.read == self.buffer.len()
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], EnvelopeError> {
        if len > self.remaining() {
            return Err(EnvelopeError::UnexpectedEnd(self.read));
        }
        let result = &self.buffer[self.read..self.read + len];
        self.read += len;
        Ok(result)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], EnvelopeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, EnvelopeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, EnvelopeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, EnvelopeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, EnvelopeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact-size integer (1, 3, 5 or 9 bytes).
    pub fn read_varint(&mut self) -> Result<u64, EnvelopeError> {
        match self.read_u8()? {
            0xfd => self.read_u16_le().map(u64::from),
            0xfe => self.read_u32_le().map(u64::from),
            0xff => self.read_u64_le(),
            n => Ok(u64::from(n)),
        }
    }

    /// Read a compact-size length and check that that many bytes could follow.
    ///
    /// Every counted item takes at least one byte, so a count larger than the
    /// remaining input is rejected before anything is allocated.
    pub fn read_length(&mut self) -> Result<usize, EnvelopeError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| EnvelopeError::LengthOverflow(len))?;
        if len > self.remaining() {
            return Err(EnvelopeError::UnexpectedEnd(self.read));
        }
        Ok(len)
    }

    /// Read a compact-size length followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], EnvelopeError> {
        let len = self.read_length()?;
        self.read_slice(len)
    }
}

/// Append a compact-size integer.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Append a compact-size length followed by the bytes.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}
