//! Signature verification functionality.
//!
//! Every check answers with a plain `bool`. A malformed signature and a
//! signature that does not match are indistinguishable to the caller; the
//! reason is only logged at debug level.

use crate::config::DEFAULT_READ_CHUNK_SIZE;
use crate::error::{Result, SignerError};
use crate::hash::{
    digest_bytes, digest_file_chunked, digest_reader_chunked, digest_source, DocumentDigest,
};
use crate::keys::{KeyManager, PublicKey};
use crate::signature::{decode_signature, SignatureRecord, ALGORITHM, FORMAT_VERSION};
use crate::source::DocumentSource;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Verifies signatures against a public key.
#[derive(Debug, Clone, Copy)]
pub struct Verifier<'a> {
    public_key: &'a PublicKey,
    read_chunk_size: usize,
}

impl<'a> Verifier<'a> {
    /// Create a verifier using the manager's public key.
    pub fn new(keys: &'a KeyManager) -> Self {
        Self::with_public_key(keys.public_key()).with_read_chunk_size(keys.read_chunk_size())
    }

    /// Create a verifier from a standalone public key.
    pub fn with_public_key(public_key: &'a PublicKey) -> Self {
        Self {
            public_key,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }

    /// Set the buffer size used when digesting a reader.
    pub fn with_read_chunk_size(mut self, read_chunk_size: usize) -> Self {
        self.read_chunk_size = read_chunk_size.max(1);
        self
    }

    /// Check a base64 signature over a byte slice.
    pub fn verify_bytes(&self, data: &[u8], signature: &str) -> bool {
        self.verify_digest(&digest_bytes(data), signature)
    }

    /// Check a base64 signature over data from a reader.
    ///
    /// Only read failures are errors; a bad signature is `Ok(false)`.
    pub fn verify_reader<R: Read>(&self, reader: &mut R, signature: &str) -> Result<bool> {
        let digest = digest_reader_chunked(reader, self.read_chunk_size)?;
        Ok(self.verify_digest(&digest, signature))
    }

    /// Check a base64 signature over a file.
    pub fn verify_file<P: AsRef<Path>>(&self, path: P, signature: &str) -> Result<bool> {
        let digest = digest_file_chunked(path, self.read_chunk_size)?;
        Ok(self.verify_digest(&digest, signature))
    }

    /// Check a base64 signature over everything a document source delivers.
    pub fn verify_source<S: DocumentSource + ?Sized>(
        &self,
        source: &mut S,
        signature: &str,
    ) -> Result<bool> {
        Ok(self.verify_digest(&digest_source(source)?, signature))
    }

    /// Check a base64 signature against a precomputed digest.
    pub fn verify_digest(&self, digest: &DocumentDigest, signature: &str) -> bool {
        match self.check(digest, signature) {
            Ok(()) => {
                debug!(digest = %digest.to_hex(), "signature valid");
                true
            }
            Err(e) => {
                debug!(digest = %digest.to_hex(), error = %e, "signature rejected");
                false
            }
        }
    }

    /// Check a detached record against the document it claims to cover.
    pub fn verify_record(&self, data: &[u8], record: &SignatureRecord) -> bool {
        let actual = digest_bytes(data);
        let check = || -> Result<()> {
            if record.version != FORMAT_VERSION || record.algorithm != ALGORITHM {
                return Err(SignerError::VerificationFailed(format!(
                    "unsupported record {} / {}",
                    record.version, record.algorithm
                )));
            }
            let expected = record.digest()?;
            if expected != actual {
                return Err(SignerError::VerificationFailed(format!(
                    "digest mismatch: expected {}, got {}",
                    expected.to_hex(),
                    actual.to_hex()
                )));
            }
            if record.key_fingerprint != self.public_key.fingerprint() {
                return Err(SignerError::VerificationFailed(format!(
                    "record signed by key {}",
                    record.key_fingerprint
                )));
            }
            self.check(&actual, record.signature.as_str())
        };

        match check() {
            Ok(()) => true,
            Err(e) => {
                debug!(digest = %actual.to_hex(), error = %e, "signature record rejected");
                false
            }
        }
    }

    fn check(&self, digest: &DocumentDigest, signature: &str) -> Result<()> {
        let bytes = decode_signature(signature)?;
        self.public_key.verify_digest(digest, &bytes)
    }
}

/// Convenience function to verify bytes against a base64 signature.
pub fn verify_bytes(keys: &KeyManager, data: &[u8], signature: &str) -> bool {
    Verifier::new(keys).verify_bytes(data, signature)
}
