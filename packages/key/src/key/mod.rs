//! Key model
//!
//! [`Key`] is the closed set of key kinds the provider handles. Values are
//! immutable once built; importers create them from external material and
//! the key store persists and reloads them.

mod asymmetric;
mod symmetric;

pub use asymmetric::{Curve, CurveFamily, PrivateKey, PublicKey};
pub use symmetric::{AES128_KEY_LEN, SymmetricAlgorithm, SymmetricKey};

use crate::{KeyError, Result, Ski};
use zeroize::Zeroizing;

/// Any key handled by the provider
#[derive(Debug, Clone)]
pub enum Key {
    /// AES-128 or HMAC secret
    Symmetric(SymmetricKey),
    /// Elliptic-curve private key
    Private(PrivateKey),
    /// Elliptic-curve public key
    Public(PublicKey),
}

impl Key {
    /// Subject Key Identifier
    #[must_use]
    pub fn ski(&self) -> Ski {
        match self {
            Self::Symmetric(key) => key.ski(),
            Self::Private(key) => key.ski(),
            Self::Public(key) => key.ski(),
        }
    }

    /// True for symmetric keys
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Self::Symmetric(_))
    }

    /// True for symmetric and asymmetric private keys
    #[must_use]
    pub fn is_private(&self) -> bool {
        !matches!(self, Self::Public(_))
    }

    /// Whether [`Key::bytes`] may return material
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        match self {
            Self::Symmetric(key) => key.is_exportable(),
            Self::Private(_) => false,
            Self::Public(_) => true,
        }
    }

    /// Algorithm tag of this key
    #[must_use]
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Symmetric(key) => key.algorithm().algorithm(),
            Self::Private(key) => key.curve().algorithm(),
            Self::Public(key) => key.curve().algorithm(),
        }
    }

    /// Curve of an asymmetric key
    #[must_use]
    pub fn curve(&self) -> Option<CurveFamily> {
        match self {
            Self::Symmetric(_) => None,
            Self::Private(key) => Some(key.curve()),
            Self::Public(key) => Some(key.curve()),
        }
    }

    /// Exported key material
    ///
    /// Raw bytes for exportable symmetric keys, SubjectPublicKeyInfo DER for
    /// public keys.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for private keys and non-exportable symmetric keys.
    pub fn bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            Self::Symmetric(key) => key.bytes(),
            Self::Private(_) => Err(KeyError::unsupported("private keys are not exportable")),
            Self::Public(key) => key.to_spki_der().map(Zeroizing::new),
        }
    }

    /// Public half of an asymmetric key
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for symmetric keys.
    pub fn public_key(&self) -> Result<Key> {
        match self {
            Self::Symmetric(_) => Err(KeyError::unsupported(
                "cannot call this method on a symmetric key",
            )),
            Self::Private(key) => Ok(Self::Public(key.public_key())),
            Self::Public(key) => Ok(Self::Public(key.clone())),
        }
    }
}

/// Keys are equal when their SKIs and their private/symmetric roles match
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.ski() == other.ski()
            && self.is_private() == other.is_private()
            && self.is_symmetric() == other.is_symmetric()
    }
}

impl Eq for Key {}

impl From<SymmetricKey> for Key {
    fn from(key: SymmetricKey) -> Self {
        Self::Symmetric(key)
    }
}

impl From<PrivateKey> for Key {
    fn from(key: PrivateKey) -> Self {
        Self::Private(key)
    }
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self {
        Self::Public(key)
    }
}
