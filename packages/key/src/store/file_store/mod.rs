//! File-based Key Storage Implementation
//!
//! Keys live as one PEM record per file in a single directory, named
//! `<hex(ski)>_<suffix>`. Records are sealed with the store password when
//! one is configured.

mod core;
mod lookup;
mod persist;
mod suffix;

pub use self::core::{FALLBACK_SCAN_MAX_FILE_SIZE, FileKeyStore};
pub use lookup::StoredKeyEntry;
pub use suffix::KeySuffix;

use super::KeyStore;
use crate::{Key, Result};

impl KeyStore for FileKeyStore {
    fn read_only(&self) -> bool {
        self.state
            .read()
            .as_ref()
            .is_some_and(|store| store.read_only)
    }

    fn get_key(&self, ski: &[u8]) -> Result<Key> {
        self.load_key(ski)
    }

    fn store_key(&self, key: &Key) -> Result<()> {
        self.persist_key(key)
    }
}
