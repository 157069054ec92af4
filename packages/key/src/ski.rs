//! Subject Key Identifiers
//!
//! An SKI names a key without revealing private material. Asymmetric keys
//! are identified by the SHA-256 digest of their uncompressed public point,
//! so a private key and its public half share an SKI. Symmetric keys are
//! identified by `SHA-256(domain_tag || raw)`; the domain tag keeps the two
//! symmetric families apart even for identical bytes.

use crate::{KeyError, Result};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of an SKI in bytes
pub const SKI_LEN: usize = 32;

/// Subject Key Identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ski([u8; SKI_LEN]);

impl Ski {
    /// Digest `parts` in order into an SKI
    pub(crate) fn digest(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Raw identifier bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding, used as the key's alias on disk
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse an SKI from its hex encoding
    ///
    /// # Errors
    ///
    /// Returns an error if `alias` is not hex or does not decode to 32 bytes.
    pub fn from_hex(alias: &str) -> Result<Self> {
        let mut bytes = [0u8; SKI_LEN];
        hex::decode_to_slice(alias, &mut bytes).map_err(|e| {
            KeyError::invalid_input(format!(
                "SKI alias must be {} hex characters: {e}",
                SKI_LEN * 2
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Ski {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Ski {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes = <[u8; SKI_LEN]>::try_from(bytes).map_err(|_| {
            KeyError::invalid_input(format!(
                "SKI must be {SKI_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Ski {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Ski {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ski({})", self.to_hex())
    }
}
