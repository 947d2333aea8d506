//! SHA-256 digesting of document bytes.

use crate::config::DEFAULT_READ_CHUNK_SIZE;
use crate::error::{Result, SignerError};
use crate::source::{ChunkedReader, DocumentSource};
use base64::Engine;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The size of a SHA-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// A SHA-256 digest of raw document bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DocumentDigest([u8; DIGEST_SIZE]);

impl DocumentDigest {
    /// Create a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the digest.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Encode the digest as a base64 string.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    /// Encode the digest as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode a digest from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| SignerError::InvalidFormat(format!("Invalid digest hex: {}", e)))?;
        let arr: [u8; DIGEST_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            SignerError::InvalidFormat(format!(
                "Invalid digest length: expected {}, got {}",
                DIGEST_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for DocumentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentDigest({})", self.to_hex())
    }
}

impl AsRef<[u8]> for DocumentDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Digest a byte slice.
pub fn digest_bytes(data: &[u8]) -> DocumentDigest {
    DocumentDigest(Sha256::digest(data).into())
}

/// Digest everything a [`DocumentSource`] delivers.
pub fn digest_source<S: DocumentSource + ?Sized>(source: &mut S) -> Result<DocumentDigest> {
    let mut hasher = Sha256::new();
    source.feed(&mut hasher)?;
    Ok(DocumentDigest(hasher.finalize().into()))
}

/// Digest a reader in chunks.
pub fn digest_reader<R: Read>(reader: &mut R) -> Result<DocumentDigest> {
    digest_reader_chunked(reader, DEFAULT_READ_CHUNK_SIZE)
}

/// Digest a reader in chunks of at most `chunk_size` bytes.
pub fn digest_reader_chunked<R: Read>(reader: &mut R, chunk_size: usize) -> Result<DocumentDigest> {
    digest_source(&mut ChunkedReader::with_chunk_size(reader, chunk_size))
}

/// Digest a file in chunks.
pub fn digest_file<P: AsRef<Path>>(path: P) -> Result<DocumentDigest> {
    digest_file_chunked(path, DEFAULT_READ_CHUNK_SIZE)
}

/// Digest a file in chunks of at most `chunk_size` bytes.
pub fn digest_file_chunked<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<DocumentDigest> {
    let mut file = File::open(path)?;
    digest_reader_chunked(&mut file, chunk_size)
}
