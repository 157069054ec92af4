//! File name suffixes of stored keys

use crate::{Key, KeyError, SymmetricAlgorithm};
use std::fmt;
use std::str::FromStr;

/// Kind of record stored in a key file, encoded in its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySuffix {
    /// AES-128 secret (`aeskey`)
    AesKey,
    /// HMAC secret (`hmackey`)
    HmacKey,
    /// EC private key (`sk`)
    PrivateKey,
    /// EC public key (`pk`)
    PublicKey,
}

impl KeySuffix {
    /// Every suffix, in lookup order
    pub const ALL: [Self; 4] = [Self::AesKey, Self::HmacKey, Self::PrivateKey, Self::PublicKey];

    /// Suffix as written in file names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AesKey => "aeskey",
            Self::HmacKey => "hmackey",
            Self::PrivateKey => "sk",
            Self::PublicKey => "pk",
        }
    }

    /// Suffix `key` is stored under
    #[must_use]
    pub fn for_key(key: &Key) -> Self {
        match key {
            Key::Symmetric(k) => match k.algorithm() {
                SymmetricAlgorithm::Aes128 => Self::AesKey,
                SymmetricAlgorithm::Hmac => Self::HmacKey,
            },
            Key::Private(_) => Self::PrivateKey,
            Key::Public(_) => Self::PublicKey,
        }
    }

    /// File name of the key with hex encoded SKI `alias`
    pub(super) fn file_name(self, alias: &str) -> String {
        format!("{alias}_{self}")
    }
}

impl fmt::Display for KeySuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeySuffix {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suffix| suffix.as_str() == s)
            .ok_or_else(|| KeyError::invalid_input(format!("unknown key file suffix [{s}]")))
    }
}
