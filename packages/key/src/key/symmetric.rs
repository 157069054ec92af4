//! Symmetric keys

use crate::opts;
use crate::{KeyError, Result, Ski};
use std::fmt;
use zeroize::Zeroizing;

/// Length of an AES-128 key in bytes
pub const AES128_KEY_LEN: usize = 16;

/// Symmetric key families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymmetricAlgorithm {
    /// 16-byte AES-128 block cipher key
    Aes128,
    /// HMAC secret of any non-zero length
    Hmac,
}

impl SymmetricAlgorithm {
    /// Algorithm tag shared with the options of this family
    #[must_use]
    pub const fn algorithm(self) -> &'static str {
        match self {
            Self::Aes128 => opts::AES128,
            Self::Hmac => opts::HMAC,
        }
    }

    /// SKI domain separation byte
    pub(crate) const fn domain_tag(self) -> u8 {
        match self {
            Self::Aes128 => 0x01,
            Self::Hmac => 0x02,
        }
    }
}

/// Symmetric key material
///
/// The raw bytes are wiped on drop. Keys are not exportable unless
/// [`SymmetricKey::with_exportable`] says otherwise.
#[derive(Clone)]
pub struct SymmetricKey {
    algorithm: SymmetricAlgorithm,
    raw: Zeroizing<Vec<u8>>,
    exportable: bool,
}

impl SymmetricKey {
    /// Create a key of `algorithm` from raw bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `raw` is empty, or is not exactly
    /// [`AES128_KEY_LEN`] bytes for [`SymmetricAlgorithm::Aes128`].
    pub fn new(algorithm: SymmetricAlgorithm, raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Err(KeyError::invalid_input(
                "invalid raw material, it must not be empty",
            ));
        }
        if algorithm == SymmetricAlgorithm::Aes128 && raw.len() != AES128_KEY_LEN {
            return Err(KeyError::invalid_input(format!(
                "invalid key length [{}], must be {AES128_KEY_LEN} bytes",
                raw.len()
            )));
        }

        Ok(Self {
            algorithm,
            raw: Zeroizing::new(raw.to_vec()),
            exportable: false,
        })
    }

    /// Create an AES-128 key
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless `raw` is exactly 16 bytes.
    pub fn aes128(raw: &[u8]) -> Result<Self> {
        Self::new(SymmetricAlgorithm::Aes128, raw)
    }

    /// Create an HMAC key
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `raw` is empty.
    pub fn hmac(raw: &[u8]) -> Result<Self> {
        Self::new(SymmetricAlgorithm::Hmac, raw)
    }

    /// Set whether the raw bytes may be extracted with [`SymmetricKey::bytes`]
    #[must_use]
    pub fn with_exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    /// Key family
    #[must_use]
    pub fn algorithm(&self) -> SymmetricAlgorithm {
        self.algorithm
    }

    /// Whether the raw bytes may be extracted
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        self.exportable
    }

    /// Subject Key Identifier
    #[must_use]
    pub fn ski(&self) -> Ski {
        Ski::digest(&[&[self.algorithm.domain_tag()][..], self.raw.as_slice()])
    }

    /// Raw bytes of an exportable key
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if the key is not exportable.
    pub fn bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        if !self.exportable {
            return Err(KeyError::unsupported(format!(
                "{} key is not exportable",
                self.algorithm.algorithm()
            )));
        }
        Ok(self.raw.clone())
    }

    /// Raw bytes regardless of exportability, for persistence only
    pub(crate) fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &self.algorithm)
            .field("ski", &self.ski())
            .field("exportable", &self.exportable)
            .finish_non_exhaustive()
    }
}
