//! # doc-signer
//!
//! Document signing and verification using SHA-256 digests and RSA
//! PKCS#1 v1.5 signatures.
//!
//! ## Features
//!
//! - **SHA-256 digests** over the raw document bytes
//! - **RSA PKCS#1 v1.5 signatures**, deterministic for a given key and document
//! - **Base64 transport encoding** for signatures
//! - **Boolean verification** that never fails on malformed input
//! - **Streaming** digests through [`DocumentSource`]
//!
//! ## Sign and Verify
//!
//! ```rust
//! use doc_signer::{KeyManager, Signer, Verifier};
//!
//! let keys = KeyManager::initialize().unwrap();
//! let document = b"Hello, Go!";
//!
//! let signature = Signer::new(&keys).sign_bytes(document).unwrap();
//!
//! let verifier = Verifier::new(&keys);
//! assert!(verifier.verify_bytes(document, signature.as_str()));
//! assert!(!verifier.verify_bytes(b"Hello, Go?", signature.as_str()));
//! assert!(!verifier.verify_bytes(document, "not-valid-base64!!"));
//! ```
//!
//! ## Verify in Another Process
//!
//! ```rust
//! use doc_signer::{KeyManager, PublicKey, Signer, Verifier};
//!
//! let keys = KeyManager::initialize().unwrap();
//! let pem = keys.public_key().to_pem().unwrap();
//! let signature = Signer::new(&keys).sign_bytes(b"contract").unwrap();
//!
//! let imported = PublicKey::from_pem(&pem).unwrap();
//! assert!(Verifier::with_public_key(&imported).verify_bytes(b"contract", signature.as_str()));
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod keys;
pub mod signature;
pub mod signer;
pub mod source;
pub mod verifier;

// Re-export main types for convenience
pub use config::SignerConfig;
pub use error::{Result, SignerError};
pub use hash::{
    digest_bytes, digest_file, digest_file_chunked, digest_reader, digest_reader_chunked,
    digest_source, DocumentDigest,
};
pub use keys::{KeyManager, KeyPair, PublicKey};
pub use signature::{EncodedSignature, SignatureRecord};
pub use signer::{sign_bytes, Signer};
pub use source::{read_full, read_in_parts, ChunkedReader, DocumentSource};
pub use verifier::{verify_bytes, Verifier};
