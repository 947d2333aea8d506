//! Byte sources that feed a document into the digest.

use crate::config::DEFAULT_READ_CHUNK_SIZE;
use crate::error::{Result, SignerError};
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Read};

/// Something that can deliver the full bytes of a document to a hasher.
pub trait DocumentSource {
    /// Feed every remaining byte into `hasher` and return how many were fed.
    fn feed(&mut self, hasher: &mut Sha256) -> Result<u64>;
}

impl<'a> DocumentSource for &'a [u8] {
    fn feed(&mut self, hasher: &mut Sha256) -> Result<u64> {
        let data: &'a [u8] = *self;
        hasher.update(data);
        *self = &data[data.len()..];
        Ok(data.len() as u64)
    }
}

/// A reader consumed in fixed-size chunks, so memory use stays bounded.
#[derive(Debug)]
pub struct ChunkedReader<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read> ChunkedReader<R> {
    /// Wrap a reader using the default chunk size.
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_READ_CHUNK_SIZE)
    }

    /// Wrap a reader with an explicit chunk size (zero is treated as one).
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Get back the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> DocumentSource for ChunkedReader<R> {
    fn feed(&mut self, hasher: &mut Sha256) -> Result<u64> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total = 0u64;

        loop {
            let bytes_read = match self.reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            hasher.update(&buffer[..bytes_read]);
            total += bytes_read as u64;
        }

        Ok(total)
    }
}

/// Read exactly `expected_len` bytes into a buffer of that size.
///
/// A reader that ends early yields [`SignerError::InputRead`]; partial
/// documents must never reach the signer.
pub fn read_full<R: Read>(reader: &mut R, expected_len: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; expected_len];
    let mut filled = 0;

    while filled < expected_len {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => {
                return Err(SignerError::InputRead {
                    expected: expected_len,
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(buffer)
}

/// Read a whole stream as a list of owned chunks of at most `chunk_size` bytes.
pub fn read_in_parts<R: Read>(reader: &mut R, chunk_size: usize) -> Result<Vec<Vec<u8>>> {
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut parts = Vec::new();

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => parts.push(buffer[..n].to_vec()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(parts)
}
