//! Forward-seeking block cursor over a GIF stream.
//!
//! Reads one or two bytes at a time and seeks over everything else, so the
//! underlying stream is never buffered. Any short read maps to
//! [`GifError::UnexpectedEof`] carrying the offset where data ran out.

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::trace;

use crate::types::GifError;

pub struct BlockCursor<S> {
    stream: S,
    offset: u64,
}

impl<S: Read + Seek> BlockCursor<S> {
    /// Wrap `stream`, starting at its current position.
    pub fn new(mut stream: S) -> Result<Self, GifError> {
        let offset = stream.stream_position()?;
        Ok(Self { stream, offset })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), GifError> {
        match self.stream.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(GifError::UnexpectedEof {
                offset: self.offset,
            }),
            Err(e) => Err(GifError::Io(e)),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, GifError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, GifError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Seek forward `n` bytes. Seeking past the end is not an error by
    /// itself; the next read reports it.
    pub fn skip(&mut self, n: u64) -> Result<(), GifError> {
        if n == 0 {
            return Ok(());
        }
        let delta = i64::try_from(n).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        self.offset = self.stream.seek(SeekFrom::Current(delta))?;
        Ok(())
    }

    /// Follow a chain of length-prefixed sub-blocks up to and including the
    /// zero-length terminator.
    pub fn skip_sub_blocks(&mut self) -> Result<(), GifError> {
        loop {
            let len = self.read_u8()?;
            if len == 0 {
                return Ok(());
            }
            trace!(offset = self.offset, len, "skipping sub-block");
            self.skip(u64::from(len))?;
        }
    }
}

impl<S: Read + Write + Seek> BlockCursor<S> {
    /// Rewrite the 2-byte field that was just read, leaving the cursor
    /// right after it.
    pub fn overwrite_u16_le(&mut self, value: u16) -> Result<(), GifError> {
        self.offset = self.stream.seek(SeekFrom::Current(-2))?;
        self.stream.write_all(&value.to_le_bytes())?;
        self.offset += 2;
        Ok(())
    }
}
