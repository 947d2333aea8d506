//! Encoded signatures and detached signature records.

use crate::error::Result;
use crate::hash::DocumentDigest;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// The current version of the signature record format.
pub const FORMAT_VERSION: &str = "1.0";

/// Algorithm identifier written into signature records.
pub const ALGORITHM: &str = "RSASSA-PKCS1-v1_5-SHA256";

/// A signature in its transport form: standard base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedSignature(String);

impl EncodedSignature {
    /// Encode raw signature bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// Decode back to raw signature bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_signature(&self.0)
    }

    /// The base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the base64 text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedSignature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<EncodedSignature> for String {
    fn from(sig: EncodedSignature) -> Self {
        sig.0
    }
}

pub(crate) fn decode_signature(encoded: &str) -> Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
}

/// A detached signature the caller keeps next to the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Format version for compatibility.
    pub version: String,

    /// Signature algorithm identifier.
    pub algorithm: String,

    /// SHA-256 digest of the document (hex encoded).
    pub document_digest: String,

    /// The signature (base64 encoded).
    pub signature: EncodedSignature,

    /// Fingerprint of the public key that verifies this signature.
    pub key_fingerprint: String,

    /// Timestamp when the signature was created.
    pub timestamp: DateTime<Utc>,

    /// Optional additional metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl SignatureRecord {
    pub(crate) fn new(
        digest: &DocumentDigest,
        signature: EncodedSignature,
        key_fingerprint: &str,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            algorithm: ALGORITHM.to_string(),
            document_digest: digest.to_hex(),
            signature,
            key_fingerprint: key_fingerprint.to_string(),
            timestamp: Utc::now(),
            metadata,
        }
    }

    /// Get the document digest.
    pub fn digest(&self) -> Result<DocumentDigest> {
        DocumentDigest::from_hex(&self.document_digest)
    }

    /// Save the record to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a record from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the record to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignerError;
    use crate::hash::digest_bytes;

    #[test]
    fn test_encoded_signature_roundtrip() {
        let bytes = [0u8, 1, 2, 250, 251, 252];
        let encoded = EncodedSignature::from_bytes(&bytes);
        assert_eq!(encoded.as_str(), "AAEC+vv8");
        assert_eq!(encoded.decode().unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let result = decode_signature("not-valid-base64!!");
        assert!(matches!(result, Err(SignerError::Decoding(_))));
    }

    #[test]
    fn test_record_json_shape() {
        let digest = digest_bytes(b"Test document content");
        let mut metadata = HashMap::new();
        metadata.insert("purpose".to_string(), "contract".to_string());

        let record = SignatureRecord::new(
            &digest,
            EncodedSignature::from_bytes(b"sig"),
            "abcd",
            metadata,
        );
        let json = record.to_json().unwrap();

        assert!(json.contains("\"version\": \"1.0\""));
        assert!(json.contains("\"algorithm\": \"RSASSA-PKCS1-v1_5-SHA256\""));
        assert!(json.contains("\"signature\": \"c2ln\""));
        assert!(json.contains(&digest.to_hex()));

        let restored = SignatureRecord::from_json(&json).unwrap();
        assert_eq!(restored.digest().unwrap(), digest);
        assert_eq!(restored.metadata.get("purpose"), Some(&"contract".to_string()));
    }

    #[test]
    fn test_record_without_metadata_omits_field() {
        let digest = digest_bytes(b"x");
        let record =
            SignatureRecord::new(&digest, EncodedSignature::from_bytes(b"s"), "ff", HashMap::new());
        assert!(!record.to_json().unwrap().contains("metadata"));
    }
}
