//! Raw symmetric secret importers

use super::{ImporterRegistry, KeyImporter, RawMaterial};
use crate::opts::{Aes128ImportKeyOpts, HmacImportKeyOpts};
use crate::{Key, Result, SymmetricKey};

/// Imports a 16-byte AES-128 key
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes128KeyImporter;

impl KeyImporter for Aes128KeyImporter {
    type Opts = Aes128ImportKeyOpts;

    fn import(
        &self,
        _registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        opts: &Self::Opts,
    ) -> Result<Key> {
        let raw = raw.non_empty_bytes()?;
        let key = SymmetricKey::aes128(raw)?.with_exportable(opts.exportable);
        Ok(Key::Symmetric(key))
    }
}

/// Imports an HMAC secret of any non-zero length
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacKeyImporter;

impl KeyImporter for HmacKeyImporter {
    type Opts = HmacImportKeyOpts;

    fn import(
        &self,
        _registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        opts: &Self::Opts,
    ) -> Result<Key> {
        let raw = raw.non_empty_bytes()?;
        let key = SymmetricKey::hmac(raw)?.with_exportable(opts.exportable);
        Ok(Key::Symmetric(key))
    }
}
