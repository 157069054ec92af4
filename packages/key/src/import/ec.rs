//! Elliptic-curve importers, one instantiation per curve

use super::{ImporterRegistry, KeyImporter, RawMaterial};
use crate::{Curve, Key, KeyError, Result};
use std::fmt;
use std::marker::PhantomData;

macro_rules! curve_importer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<C: Curve> {
            curve: PhantomData<fn() -> C>,
        }

        impl<C: Curve> $name<C> {
            /// Importer for curve `C`
            #[must_use]
            pub const fn new() -> Self {
                Self { curve: PhantomData }
            }
        }

        impl<C: Curve> Default for $name<C> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<C: Curve> Clone for $name<C> {
            fn clone(&self) -> Self {
                Self::new()
            }
        }

        impl<C: Curve> fmt::Debug for $name<C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}<{:?}>", stringify!($name), C::FAMILY)
            }
        }
    };
}

curve_importer! {
    /// Imports a SubjectPublicKeyInfo DER public key on curve `C`
    PkixPublicKeyImporter
}

curve_importer! {
    /// Imports a PKCS#8 DER private key on curve `C`
    Pkcs8PrivateKeyImporter
}

curve_importer! {
    /// Imports an already parsed public key object of curve `C`
    NativePublicKeyImporter
}

impl<C: Curve> KeyImporter for PkixPublicKeyImporter<C> {
    type Opts = C::PkixOpts;

    fn import(
        &self,
        _registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        _opts: &Self::Opts,
    ) -> Result<Key> {
        let der = raw.non_empty_bytes()?;
        let key = C::parse_public_key(der)
            .map_err(|e| KeyError::decode("failed converting PKIX to public key", e))?;
        Ok(Key::Public(key))
    }
}

impl<C: Curve> KeyImporter for Pkcs8PrivateKeyImporter<C> {
    type Opts = C::PrivateOpts;

    fn import(
        &self,
        _registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        _opts: &Self::Opts,
    ) -> Result<Key> {
        let der = raw.non_empty_bytes()?;
        let key = C::parse_private_key(der)
            .map_err(|e| KeyError::decode("failed converting PKCS#8 to private key", e))?;
        Ok(Key::Private(key))
    }
}

impl<C: Curve> KeyImporter for NativePublicKeyImporter<C> {
    type Opts = C::NativeOpts;

    fn import(
        &self,
        _registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        _opts: &Self::Opts,
    ) -> Result<Key> {
        let key = C::native_public_key(&raw).ok_or_else(|| {
            KeyError::invalid_input(format!(
                "invalid raw material, expected {} public key, got {}",
                C::FAMILY.algorithm(),
                raw.kind()
            ))
        })?;
        Ok(Key::Public(key.clone().into()))
    }
}
