//! RSA key generation and the process-lifetime key manager.

use crate::config::{
    check_key_bits, SignerConfig, DEFAULT_KEY_BITS, DEFAULT_READ_CHUNK_SIZE,
};
use crate::error::{Result, SignerError};
use crate::hash::{digest_bytes, DocumentDigest};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt;
use tracing::{info, warn};

/// An RSA key pair. The public half is always derived from the private half.
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new key pair from the OS random source.
    pub fn generate(bits: usize) -> Result<Self> {
        check_key_bits(bits).map_err(SignerError::KeyInitialization)?;
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| SignerError::KeyInitialization(e.to_string()))?;
        Self::from_private_key(private_key).map_err(|e| match e {
            SignerError::InvalidKey(msg) => SignerError::KeyInitialization(msg),
            other => other,
        })
    }

    /// Wrap an existing private key.
    ///
    /// The modulus must satisfy the same size limits as generated keys.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Result<Self> {
        check_key_bits(private_key.size() * 8).map_err(SignerError::InvalidKey)?;
        private_key
            .validate()
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        let public_key = PublicKey::from_rsa(private_key.to_public_key())?;
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Load a private key from PKCS#8 PEM text.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Self::from_private_key(private_key)
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Sign a SHA-256 digest with PKCS#1 v1.5 padding.
    pub(crate) fn sign_digest(&self, digest: &DocumentDigest) -> Result<Vec<u8>> {
        self.private_key
            .sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha256>(), digest.as_bytes())
            .map_err(SignerError::Signing)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.public_key.bits())
            .field("fingerprint", &self.public_key.fingerprint())
            .finish_non_exhaustive()
    }
}

/// An RSA public key for verifying signatures.
#[derive(Clone)]
pub struct PublicKey {
    key: RsaPublicKey,
    der: Vec<u8>,
    fingerprint: String,
}

impl PublicKey {
    fn from_rsa(key: RsaPublicKey) -> Result<Self> {
        let der = key
            .to_public_key_der()
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?
            .into_vec();
        let fingerprint = digest_bytes(&der).to_hex();
        Ok(Self {
            key,
            der,
            fingerprint,
        })
    }

    /// Decode a public key from PKIX (SubjectPublicKeyInfo) DER.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Self::from_rsa(key)
    }

    /// Decode a public key from PKIX PEM text.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Self::from_rsa(key)
    }

    /// PKIX (SubjectPublicKeyInfo) DER encoding.
    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    /// PKCS#1 `RSAPublicKey` DER encoding.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .key
            .to_pkcs1_der()
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(doc.into_vec())
    }

    /// PKIX PEM encoding.
    pub fn to_pem(&self) -> Result<String> {
        self.key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))
    }

    /// Lowercase hex SHA-256 of the PKIX DER encoding.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.key.size() * 8
    }

    /// Check a raw PKCS#1 v1.5 signature over a SHA-256 digest.
    pub fn verify_digest(&self, digest: &DocumentDigest, signature: &[u8]) -> Result<()> {
        self.key
            .verify(Pkcs1v15Sign::new::<Sha256>(), digest.as_bytes(), signature)
            .map_err(|e| SignerError::VerificationFailed(e.to_string()))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.fingerprint)
    }
}

/// Holds the one key pair used for signing and verification.
///
/// Create it once at startup and share it by reference or `Arc`. Signing and
/// verification only borrow it immutably, so they run in parallel freely.
/// [`KeyManager::reinitialize`] takes `&mut self` and therefore cannot overlap
/// with any in-flight operation.
#[derive(Debug)]
pub struct KeyManager {
    key_pair: KeyPair,
    read_chunk_size: usize,
}

impl KeyManager {
    /// Generate a fresh key pair with the default modulus size.
    ///
    /// A failure here means no signatures can be produced; callers should
    /// refuse to start.
    pub fn initialize() -> Result<Self> {
        Self::with_bits(DEFAULT_KEY_BITS)
    }

    /// Generate a fresh key pair with the configured modulus size and read
    /// chunk size.
    pub fn from_config(config: &SignerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_bits(config.key_bits)?.with_read_chunk_size(config.read_chunk_size))
    }

    /// Generate a fresh key pair with an explicit modulus size.
    pub fn with_bits(bits: usize) -> Result<Self> {
        let key_pair = KeyPair::generate(bits)?;
        info!(
            bits,
            fingerprint = key_pair.public_key().fingerprint(),
            "generated signing key pair"
        );
        Ok(Self::from_key_pair(key_pair))
    }

    /// Use an existing key pair.
    pub fn from_key_pair(key_pair: KeyPair) -> Self {
        Self {
            key_pair,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }

    /// Set the buffer size used when signers and verifiers digest a reader.
    pub fn with_read_chunk_size(mut self, read_chunk_size: usize) -> Self {
        self.read_chunk_size = read_chunk_size.max(1);
        self
    }

    /// Buffer size used when digesting a reader.
    pub fn read_chunk_size(&self) -> usize {
        self.read_chunk_size
    }

    /// Replace the key pair with a freshly generated one of the same size.
    ///
    /// Every signature issued under the previous key stops verifying.
    pub fn reinitialize(&mut self) -> Result<()> {
        let bits = self.key_pair.public_key().bits();
        let previous = self.key_pair.public_key().fingerprint().to_string();
        self.key_pair = KeyPair::generate(bits)?;
        warn!(
            previous = %previous,
            fingerprint = self.key_pair.public_key().fingerprint(),
            "signing key pair replaced; earlier signatures will no longer verify"
        );
        Ok(())
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub(crate) fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }
}
