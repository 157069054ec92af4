//! Certificate importer
//!
//! The certificate's embedded key is handed back to the registry under the
//! native public key options of its curve, so whatever importer is
//! registered there handles it.

use super::{ImporterRegistry, KeyImporter, RawMaterial};
use crate::opts::{
    KeyImportOpts, P256PublicKeyImportOpts, P384PublicKeyImportOpts, X509PublicKeyImportOpts,
};
use crate::{CurveFamily, Key, KeyError, Result};
use p256::pkcs8::DecodePublicKey;

/// Imports the public key of an X.509 certificate
#[derive(Debug, Clone, Copy, Default)]
pub struct X509PublicKeyImporter;

impl KeyImporter for X509PublicKeyImporter {
    type Opts = X509PublicKeyImportOpts;

    fn import(
        &self,
        registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        opts: &Self::Opts,
    ) -> Result<Key> {
        let RawMaterial::Certificate(cert) = raw else {
            return Err(KeyError::invalid_input(format!(
                "invalid raw material, expected X.509 certificate, got {}",
                raw.kind()
            )));
        };

        let spki = keystone_codec::certificate_public_key_der(cert)
            .map_err(|e| KeyError::decode("failed reading certificate public key", e))?;
        let oids = keystone_codec::spki_algorithm(&spki)
            .map_err(|e| KeyError::decode("failed reading certificate public key", e))?;
        let temporary = opts.ephemeral();

        match CurveFamily::from_oids(&oids)? {
            CurveFamily::P256 => {
                let pk = p256::PublicKey::from_public_key_der(&spki).map_err(|e| {
                    KeyError::decode("failed parsing certificate public key", e.into())
                })?;
                registry.import(&pk, &P256PublicKeyImportOpts { temporary })
            }
            CurveFamily::P384 => {
                let pk = p384::PublicKey::from_public_key_der(&spki).map_err(|e| {
                    KeyError::decode("failed parsing certificate public key", e.into())
                })?;
                registry.import(&pk, &P384PublicKeyImportOpts { temporary })
            }
        }
    }
}
