//! Key persistence

use super::core::{FileKeyStore, OpenStore, not_initialized};
use super::suffix::KeySuffix;
use crate::{Key, KeyError, Result};
use keystone_codec::CodecError;
use std::fs;
use std::io::{self, Write};
use zeroize::Zeroizing;

impl FileKeyStore {
    pub(super) fn persist_key(&self, key: &Key) -> Result<()> {
        let state = self.state.write();
        let store = state.as_ref().ok_or_else(not_initialized)?;
        if store.read_only {
            return Err(KeyError::store_state("read only KeyStore"));
        }

        let alias = key.ski().to_hex();
        let private_stored = store.record_path(&alias, KeySuffix::PrivateKey).is_some();
        if matches!(key, Key::Public(_)) && private_stored {
            tracing::debug!(alias = %alias, "Private key already stored, skipping public key");
            return Ok(());
        }

        let suffix = KeySuffix::for_key(key);
        let record = store.encode_record(&alias, key)?;
        store.write_record(&alias, suffix, &record)?;
        if suffix == KeySuffix::PrivateKey {
            store.remove_record(&alias, KeySuffix::PublicKey)?;
        }

        tracing::debug!(alias = %alias, suffix = %suffix, "Stored key");
        Ok(())
    }
}

impl OpenStore {
    fn encode_record(&self, alias: &str, key: &Key) -> Result<Zeroizing<Vec<u8>>> {
        let failed = |e: CodecError| KeyError::encode(format!("failed storing key [{alias}]"), e);

        match key {
            Key::Symmetric(k) => {
                keystone_codec::secret_to_pem(k.raw(), &self.password).map_err(failed)
            }
            Key::Private(k) => {
                let der = k.to_pkcs8_der().map_err(failed)?;
                keystone_codec::private_key_to_pem(&der, &self.password).map_err(failed)
            }
            Key::Public(k) => {
                let der = k.spki_document().map_err(failed)?;
                keystone_codec::public_key_to_pem(&der, &self.password)
                    .map(Zeroizing::new)
                    .map_err(failed)
            }
        }
    }

    /// Remove `<alias>_<suffix>` if present
    fn remove_record(&self, alias: &str, suffix: KeySuffix) -> Result<()> {
        let file = self.key_path(&suffix.file_name(alias));
        match fs::remove_file(&file) {
            Ok(()) => {
                tracing::trace!(file = %file.display(), "Removed superseded key file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KeyError::io("remove key file", &file, e)),
        }
    }

    /// Write `record` to `<alias>_<suffix>`, readable by the owner only
    fn write_record(&self, alias: &str, suffix: KeySuffix, record: &[u8]) -> Result<()> {
        let file = self.key_path(&suffix.file_name(alias));

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600); // rw-------
        }

        let mut out = options
            .open(&file)
            .map_err(|e| KeyError::io("create key file", &file, e))?;
        out.write_all(record)
            .map_err(|e| KeyError::io("write key file", &file, e))?;
        out.sync_all()
            .map_err(|e| KeyError::io("sync key file", &file, e))
    }
}
