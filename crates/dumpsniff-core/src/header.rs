//! Bounded reads of a file's leading bytes.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::trace;

/// Number of leading bytes any detector needs to look at
pub const HEADER_CAPACITY: usize = 20;

/// The first [`HEADER_CAPACITY`] bytes of a file.
///
/// `len` is the number of bytes actually available, which is shorter than the
/// capacity for tiny files. Bytes past `len` are always zero and never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteHeader {
    bytes: [u8; HEADER_CAPACITY],
    len: usize,
}

impl ByteHeader {
    /// Builds a header from an in-memory prefix, keeping at most
    /// [`HEADER_CAPACITY`] bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let len = data.len().min(HEADER_CAPACITY);
        let mut bytes = [0u8; HEADER_CAPACITY];
        bytes[..len].copy_from_slice(&data[..len]);
        Self { bytes, len }
    }

    /// Reads the header of the file at `path`.
    ///
    /// A file shorter than the capacity is not an error. Fails only when the
    /// path cannot be opened, is not a regular file, or the read itself fails.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_read(path, e))?;

        let metadata = file.metadata().map_err(|e| Error::file_read(path, e))?;
        if !metadata.is_file() {
            return Err(Error::not_regular_file(path));
        }

        let header = Self::read_from(file).map_err(|e| Error::file_read(path, e))?;
        trace!("Read {} header bytes from {}", header.len, path.display());
        Ok(header)
    }

    /// Reads up to [`HEADER_CAPACITY`] bytes from `reader`, stopping early at EOF.
    pub fn read_from(mut reader: impl Read) -> std::io::Result<Self> {
        let mut bytes = [0u8; HEADER_CAPACITY];
        let mut len = 0;

        while len < HEADER_CAPACITY {
            match reader.read(&mut bytes[len..]) {
                Ok(0) => break,
                Ok(n) => len += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Self { bytes, len })
    }

    /// The bytes actually read
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of bytes actually read
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for zero-length files
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
