//! Key lookup
//!
//! A key is first looked up under its conventional file name. A key pair has
//! a single record: once the private key is stored, its SKI resolves to the
//! private key and the public half is reached through it. When no such
//! file exists every small regular file in the directory is tried as a
//! private key record, which finds keys dropped into the directory under
//! arbitrary names.

use super::core::{FALLBACK_SCAN_MAX_FILE_SIZE, FileKeyStore, OpenStore, not_initialized};
use super::suffix::KeySuffix;
use crate::{Key, KeyError, PrivateKey, PublicKey, Result, Ski, SymmetricKey};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// A file following the `<hex(ski)>_<suffix>` naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoredKeyEntry {
    /// SKI encoded in the file name
    pub ski: Ski,
    /// Record kind encoded in the file name
    pub suffix: KeySuffix,
}

impl FileKeyStore {
    pub(super) fn load_key(&self, ski: &[u8]) -> Result<Key> {
        if ski.is_empty() {
            return Err(KeyError::invalid_input(
                "invalid SKI. Cannot be of zero length",
            ));
        }

        let state = self.state.read();
        let store = state.as_ref().ok_or_else(not_initialized)?;
        let alias = hex::encode(ski);

        if let Some((suffix, file)) = store.find_indexed(&alias) {
            let key = store.load_record(&alias, suffix, &file)?;
            if key.ski().as_bytes() != ski {
                return Err(KeyError::SkiMismatch {
                    alias,
                    found: key.ski().to_hex(),
                });
            }
            tracing::trace!(alias = %alias, suffix = %suffix, "Loaded key");
            return Ok(key);
        }

        match store.fallback_scan(ski, &alias)? {
            Some(key) => Ok(key),
            None => Err(KeyError::NotFound {
                ski: alias,
                path: store.path.clone(),
            }),
        }
    }

    /// Keys stored under conventional file names, sorted by SKI
    ///
    /// Files that do not follow the naming convention are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreState` if the store is not initialized and `Io` if the
    /// directory cannot be read.
    pub fn list_keys(&self) -> Result<Vec<StoredKeyEntry>> {
        let state = self.state.read();
        let store = state.as_ref().ok_or_else(not_initialized)?;

        let entries = fs::read_dir(&store.path)
            .map_err(|e| KeyError::io("read directory", &store.path, e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| KeyError::io("read directory", &store.path, e))?;
            let is_file = entry.file_type().is_ok_and(|t| t.is_file());
            if !is_file {
                continue;
            }
            if let Some(parsed) = entry.file_name().to_str().and_then(parse_file_name) {
                keys.push(parsed);
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }

    /// Whether a key with this SKI is stored under its conventional name
    ///
    /// The fallback scan is not consulted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty SKI and `StoreState` if the store
    /// is not initialized.
    pub fn contains_key(&self, ski: &[u8]) -> Result<bool> {
        if ski.is_empty() {
            return Err(KeyError::invalid_input(
                "invalid SKI. Cannot be of zero length",
            ));
        }

        let state = self.state.read();
        let store = state.as_ref().ok_or_else(not_initialized)?;
        Ok(store.find_indexed(&hex::encode(ski)).is_some())
    }
}

impl OpenStore {
    /// First regular file named `<alias>_<suffix>`, suffixes in lookup order
    fn find_indexed(&self, alias: &str) -> Option<(KeySuffix, PathBuf)> {
        KeySuffix::ALL.into_iter().find_map(|suffix| {
            let file = self.record_path(alias, suffix)?;
            Some((suffix, file))
        })
    }

    /// Path of `<alias>_<suffix>` if it is a regular file
    pub(super) fn record_path(&self, alias: &str, suffix: KeySuffix) -> Option<PathBuf> {
        let file = self.key_path(&suffix.file_name(alias));
        let is_file = fs::metadata(&file).is_ok_and(|meta| meta.is_file());
        is_file.then_some(file)
    }

    fn load_record(&self, alias: &str, suffix: KeySuffix, file: &Path) -> Result<Key> {
        let record = Zeroizing::new(
            fs::read(file).map_err(|e| KeyError::io("read key file", file, e))?,
        );

        match suffix {
            KeySuffix::AesKey => Ok(Key::Symmetric(SymmetricKey::aes128(
                &self.open_secret(alias, &record)?,
            )?)),
            KeySuffix::HmacKey => Ok(Key::Symmetric(SymmetricKey::hmac(
                &self.open_secret(alias, &record)?,
            )?)),
            KeySuffix::PrivateKey => {
                let der = keystone_codec::pem_to_private_key(&record, &self.password)
                    .map_err(|e| KeyError::decode(format!("failed loading private key [{alias}]"), e))?;
                Ok(Key::Private(PrivateKey::from_pkcs8_der(&der)?))
            }
            KeySuffix::PublicKey => {
                let der = keystone_codec::pem_to_public_key(&record, &self.password)
                    .map_err(|e| KeyError::decode(format!("failed loading public key [{alias}]"), e))?;
                Ok(Key::Public(PublicKey::from_spki_der(&der)?))
            }
        }
    }

    fn open_secret(&self, alias: &str, record: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        keystone_codec::pem_to_secret(record, &self.password)
            .map_err(|e| KeyError::decode(format!("failed loading secret key [{alias}]"), e))
    }

    /// Try every small regular file as a private key record
    ///
    /// Files that cannot be read or decoded are skipped.
    fn fallback_scan(&self, ski: &[u8], alias: &str) -> Result<Option<Key>> {
        tracing::debug!(
            alias = %alias,
            path = %self.path.display(),
            "Key not found by name, scanning key store"
        );

        let entries = fs::read_dir(&self.path)
            .map_err(|e| KeyError::io("read directory", &self.path, e))?;

        for entry in entries.flatten() {
            let file = entry.path();
            let Ok(meta) = fs::metadata(&file) else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            if meta.len() > FALLBACK_SCAN_MAX_FILE_SIZE {
                tracing::trace!(
                    file = %file.display(),
                    size = meta.len(),
                    "Skipping oversized file"
                );
                continue;
            }

            let Some(key) = self.try_private_key(&file) else {
                tracing::trace!(file = %file.display(), "Skipping file, not a private key");
                continue;
            };
            if key.ski().as_bytes() == ski {
                tracing::debug!(alias = %alias, file = %file.display(), "Found key by scan");
                return Ok(Some(Key::Private(key)));
            }
        }

        Ok(None)
    }

    fn try_private_key(&self, file: &Path) -> Option<PrivateKey> {
        let record = Zeroizing::new(fs::read(file).ok()?);
        let der = keystone_codec::pem_to_private_key(&record, &self.password).ok()?;
        PrivateKey::from_pkcs8_der(&der).ok()
    }
}

fn parse_file_name(name: &str) -> Option<StoredKeyEntry> {
    let (alias, suffix) = name.rsplit_once('_')?;
    Some(StoredKeyEntry {
        ski: Ski::from_hex(alias).ok()?,
        suffix: suffix.parse().ok()?,
    })
}
