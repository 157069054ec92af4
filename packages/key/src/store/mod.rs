//! Key persistence

mod file_store;

pub use file_store::{FALLBACK_SCAN_MAX_FILE_SIZE, FileKeyStore, KeySuffix, StoredKeyEntry};

use crate::{Key, Result};

/// Durable key storage addressed by Subject Key Identifier
pub trait KeyStore: Send + Sync {
    /// Whether the store rejects writes
    fn read_only(&self) -> bool;

    /// Load the key whose SKI is `ski`
    ///
    /// A key pair shares one SKI. When the private key is stored it is
    /// returned, and its public half is available through
    /// [`Key::public_key`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty SKI, `StoreState` if the store is
    /// not initialized, `NotFound` if no stored key has this SKI, and
    /// `Decode`/`Io` if the matching record cannot be read.
    fn get_key(&self, ski: &[u8]) -> Result<Key>;

    /// Persist `key` under its SKI
    ///
    /// A stored private key supersedes its public half: storing the public
    /// key afterwards is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreState` if the store is read-only or not initialized, and
    /// `Encode`/`Io` if the record cannot be written.
    fn store_key(&self, key: &Key) -> Result<()>;
}
