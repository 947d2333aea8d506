//! Signer configuration.
//!
//! Values come from [`SignerConfig::default`], a TOML document, or the
//! process environment. Every field is optional in each source.

use crate::error::{Result, SignerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Modulus size used when nothing else is configured.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest modulus size accepted.
pub const MIN_KEY_BITS: usize = 2048;

/// Largest modulus size accepted; public keys above it cannot be re-imported.
pub const MAX_KEY_BITS: usize = 4096;

/// Chunk size for streaming document reads (1 MiB).
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024 * 1024;

/// Environment variable overriding [`SignerConfig::key_bits`].
pub const ENV_KEY_BITS: &str = "DOC_SIGNER_KEY_BITS";

/// Environment variable overriding [`SignerConfig::read_chunk_size`].
pub const ENV_READ_CHUNK_SIZE: &str = "DOC_SIGNER_READ_CHUNK_SIZE";

/// Settings for key generation and document reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// RSA modulus size in bits.
    pub key_bits: usize,

    /// Buffer size used when digesting a reader.
    pub read_chunk_size: usize,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl SignerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_KEY_BITS) {
            config.key_bits = parse_usize(ENV_KEY_BITS, &value)?;
        }
        if let Some(value) = lookup(ENV_READ_CHUNK_SIZE) {
            config.read_chunk_size = parse_usize(ENV_READ_CHUNK_SIZE, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        check_key_bits(self.key_bits).map_err(SignerError::Config)?;
        if self.read_chunk_size == 0 {
            return Err(SignerError::Config(
                "read_chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_key_bits(bits: usize) -> std::result::Result<(), String> {
    if bits < MIN_KEY_BITS {
        return Err(format!(
            "key size {} is below the minimum of {} bits",
            bits, MIN_KEY_BITS
        ));
    }
    if bits > MAX_KEY_BITS {
        return Err(format!(
            "key size {} is above the maximum of {} bits",
            bits, MAX_KEY_BITS
        ));
    }
    if bits % 8 != 0 {
        return Err(format!("key size {} is not a multiple of 8", bits));
    }
    Ok(())
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| SignerError::Config(format!("{} must be an integer, got {:?}", name, value)))
}
