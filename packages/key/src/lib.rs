//! # Keystone Key Management
//!
//! Key model, importers and persistent storage for a pluggable
//! cryptographic service provider.
//!
//! ## Features
//!
//! - **Key Model**: AES-128 and HMAC secrets, P-256 and P-384 key pairs,
//!   identified by a SHA-256 Subject Key Identifier
//! - **Importers**: raw secrets, SPKI and PKCS#8 DER, parsed public keys and
//!   X.509 certificates, dispatched on the type of the options value
//! - **Key Storage**: one PEM record per key in a directory, optionally
//!   sealed with a password, with a bounded scan for unindexed keys
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keystone_key::prelude::*;
//!
//! let registry = ImporterRegistry::with_defaults();
//! let key = registry.import(&[7u8; 16][..], &Aes128ImportKeyOpts::default())?;
//!
//! let store = FileKeyStore::open(Some(&b"hunter2"[..]), "./keys", false)?;
//! store.store_key(&key)?;
//! let loaded = store.get_key(key.ski().as_bytes())?;
//! assert_eq!(loaded, key);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod import;
pub mod key;
pub mod opts;
pub mod ski;
pub mod store;

pub use error::{ErrorKind, KeyError, Result};
pub use import::{ImporterRegistry, KeyImporter, RawMaterial};
pub use key::{
    AES128_KEY_LEN, Curve, CurveFamily, Key, PrivateKey, PublicKey, SymmetricAlgorithm,
    SymmetricKey,
};
pub use ski::{SKI_LEN, Ski};
pub use store::{FALLBACK_SCAN_MAX_FILE_SIZE, FileKeyStore, KeyStore, KeySuffix, StoredKeyEntry};

/// Common imports for working with keys
pub mod prelude {
    pub use crate::import::{ImporterRegistry, KeyImporter, RawMaterial};
    pub use crate::opts::*;
    pub use crate::store::{FileKeyStore, KeyStore};
    pub use crate::{Key, KeyError, Result, Ski};
}
