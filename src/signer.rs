//! Document signing functionality.

use crate::error::Result;
use crate::hash::{
    digest_bytes, digest_file_chunked, digest_reader_chunked, digest_source, DocumentDigest,
};
use crate::keys::{KeyManager, KeyPair};
use crate::signature::{EncodedSignature, SignatureRecord};
use crate::source::DocumentSource;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Signs documents with the manager's private key.
#[derive(Debug)]
pub struct Signer<'a> {
    keypair: &'a KeyPair,
    read_chunk_size: usize,
    metadata: HashMap<String, String>,
}

impl<'a> Signer<'a> {
    /// Create a signer backed by the given key manager.
    pub fn new(keys: &'a KeyManager) -> Self {
        Self {
            keypair: keys.key_pair(),
            read_chunk_size: keys.read_chunk_size(),
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata key-value pair to signature records.
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sign a byte slice.
    pub fn sign_bytes(&self, data: &[u8]) -> Result<EncodedSignature> {
        self.sign_digest(&digest_bytes(data))
    }

    /// Sign data from a reader, read in the manager's chunk size.
    pub fn sign_reader<R: Read>(&self, reader: &mut R) -> Result<EncodedSignature> {
        self.sign_digest(&digest_reader_chunked(reader, self.read_chunk_size)?)
    }

    /// Sign a file.
    pub fn sign_file<P: AsRef<Path>>(&self, path: P) -> Result<EncodedSignature> {
        self.sign_digest(&digest_file_chunked(path, self.read_chunk_size)?)
    }

    /// Sign everything a document source delivers.
    pub fn sign_source<S: DocumentSource + ?Sized>(&self, source: &mut S) -> Result<EncodedSignature> {
        self.sign_digest(&digest_source(source)?)
    }

    /// Sign a precomputed document digest.
    pub fn sign_digest(&self, digest: &DocumentDigest) -> Result<EncodedSignature> {
        let signature = self.keypair.sign_digest(digest)?;
        debug!(digest = %digest.to_hex(), "signed document");
        Ok(EncodedSignature::from_bytes(&signature))
    }

    /// Sign a byte slice and wrap the result in a detached record.
    pub fn record_bytes(&self, data: &[u8]) -> Result<SignatureRecord> {
        let digest = digest_bytes(data);
        let signature = self.sign_digest(&digest)?;
        Ok(SignatureRecord::new(
            &digest,
            signature,
            self.keypair.public_key().fingerprint(),
            self.metadata.clone(),
        ))
    }
}

/// Convenience function to sign bytes with the manager's key.
pub fn sign_bytes(keys: &KeyManager, data: &[u8]) -> Result<EncodedSignature> {
    Signer::new(keys).sign_bytes(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignerConfig;
    use crate::source::ChunkedReader;
    use std::io::Cursor;
    use std::sync::OnceLock;

    fn keys() -> &'static KeyManager {
        static KEYS: OnceLock<KeyManager> = OnceLock::new();
        KEYS.get_or_init(|| KeyManager::initialize().unwrap())
    }

    #[test]
    fn test_sign_bytes() {
        let signature = Signer::new(keys()).sign_bytes(b"Test document content").unwrap();

        // 2048-bit signature is 256 bytes, 344 base64 characters.
        assert_eq!(signature.as_str().len(), 344);
        assert_eq!(signature.decode().unwrap().len(), 256);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let data = b"Same document twice";
        let first = sign_bytes(keys(), data).unwrap();
        let second = sign_bytes(keys(), data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_inputs_agree() {
        let data = b"Document delivered several ways";
        let signer = Signer::new(keys());

        let from_bytes = signer.sign_bytes(data).unwrap();
        let from_reader = signer.sign_reader(&mut Cursor::new(data)).unwrap();
        let from_source = signer
            .sign_source(&mut ChunkedReader::with_chunk_size(Cursor::new(data), 5))
            .unwrap();
        let from_digest = signer.sign_digest(&digest_bytes(data)).unwrap();

        assert_eq!(from_bytes, from_reader);
        assert_eq!(from_bytes, from_source);
        assert_eq!(from_bytes, from_digest);
    }

    /// Reader that remembers the largest buffer it was asked to fill.
    struct RecordingReader<'d> {
        inner: Cursor<&'d [u8]>,
        largest_read: usize,
    }

    impl Read for RecordingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.largest_read = self.largest_read.max(buf.len());
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_sign_reader_uses_configured_chunk_size() {
        let config = SignerConfig {
            read_chunk_size: 64,
            ..SignerConfig::default()
        };
        let manager = KeyManager::from_config(&config).unwrap();
        let data = vec![3u8; 1000];
        let mut reader = RecordingReader {
            inner: Cursor::new(data.as_slice()),
            largest_read: 0,
        };

        let signature = Signer::new(&manager).sign_reader(&mut reader).unwrap();
        assert_eq!(reader.largest_read, 64);
        assert_eq!(signature, sign_bytes(&manager, &data).unwrap());
    }

    #[test]
    fn test_sign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.txt");
        std::fs::write(&path, b"file body").unwrap();

        let from_file = Signer::new(keys()).sign_file(&path).unwrap();
        assert_eq!(from_file, sign_bytes(keys(), b"file body").unwrap());
    }

    #[test]
    fn test_sign_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Signer::new(keys()).sign_file(dir.path().join("missing"));
        assert!(matches!(result, Err(crate::error::SignerError::Io(_))));
    }

    #[test]
    fn test_record_with_metadata() {
        let record = Signer::new(keys())
            .with_metadata("purpose", "testing")
            .with_metadata("version", "1.0")
            .record_bytes(b"Test document content")
            .unwrap();

        assert_eq!(record.key_fingerprint, keys().public_key().fingerprint());
        assert_eq!(record.metadata.get("purpose"), Some(&"testing".to_string()));
        assert_eq!(record.metadata.get("version"), Some(&"1.0".to_string()));
        assert_eq!(record.digest().unwrap(), digest_bytes(b"Test document content"));
    }
}
