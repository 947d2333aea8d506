//! Error types for the doc-signer library.

use thiserror::Error;

/// The main error type for doc-signer operations.
#[derive(Error, Debug)]
pub enum SignerError {
    /// Error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error with JSON serialization/deserialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with base64 decoding.
    #[error("Base64 decode error: {0}")]
    Decoding(#[from] base64::DecodeError),

    /// The key pair could not be generated.
    #[error("Key initialization failed: {0}")]
    KeyInitialization(String),

    /// The RSA signing primitive failed.
    #[error("Signing failed: {0}")]
    Signing(#[source] rsa::Error),

    /// A signature did not validate against the public key.
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    /// A document source delivered fewer bytes than announced.
    #[error("Input read error: expected {expected} bytes, got {actual}")]
    InputRead { expected: usize, actual: usize },

    /// Invalid key encoding.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid signature record content.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for SignerError {
    fn from(err: toml::de::Error) -> Self {
        SignerError::Config(err.to_string())
    }
}

/// Result type alias for doc-signer operations.
pub type Result<T> = std::result::Result<T, SignerError>;
