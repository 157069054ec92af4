//! Importer registry
//!
//! Raw material is turned into a [`Key`] by the importer registered for the
//! concrete options type the caller passes. The registry is populated once,
//! usually with [`ImporterRegistry::with_defaults`], and is read-only after
//! that, so a shared reference can serve any number of threads.

mod ec;
mod symmetric;
mod x509;

pub use ec::{NativePublicKeyImporter, Pkcs8PrivateKeyImporter, PkixPublicKeyImporter};
pub use symmetric::{Aes128KeyImporter, HmacKeyImporter};
pub use x509::X509PublicKeyImporter;

use crate::opts::KeyImportOpts;
use crate::{Key, KeyError, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use x509_cert::Certificate;

/// External material handed to an importer
#[derive(Debug, Clone, Copy)]
pub enum RawMaterial<'a> {
    /// Byte buffer: raw secret, SubjectPublicKeyInfo DER or PKCS#8 DER
    Bytes(&'a [u8]),
    /// Parsed P-256 public key
    P256PublicKey(&'a p256::PublicKey),
    /// Parsed P-384 public key
    P384PublicKey(&'a p384::PublicKey),
    /// Parsed X.509 certificate
    Certificate(&'a Certificate),
}

impl<'a> RawMaterial<'a> {
    /// Human readable shape of the material, for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "byte array",
            Self::P256PublicKey(_) => "P256 public key",
            Self::P384PublicKey(_) => "P384 public key",
            Self::Certificate(_) => "X.509 certificate",
        }
    }

    /// Borrow the byte buffer, rejecting other shapes and empty buffers
    pub(crate) fn non_empty_bytes(self) -> Result<&'a [u8]> {
        match self {
            Self::Bytes(bytes) if bytes.is_empty() => Err(KeyError::invalid_input(
                "invalid raw material, it must not be empty",
            )),
            Self::Bytes(bytes) => Ok(bytes),
            other => Err(KeyError::invalid_input(format!(
                "invalid raw material, expected byte array, got {}",
                other.kind()
            ))),
        }
    }
}

impl<'a> From<&'a [u8]> for RawMaterial<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a p256::PublicKey> for RawMaterial<'a> {
    fn from(key: &'a p256::PublicKey) -> Self {
        Self::P256PublicKey(key)
    }
}

impl<'a> From<&'a p384::PublicKey> for RawMaterial<'a> {
    fn from(key: &'a p384::PublicKey) -> Self {
        Self::P384PublicKey(key)
    }
}

impl<'a> From<&'a Certificate> for RawMaterial<'a> {
    fn from(cert: &'a Certificate) -> Self {
        Self::Certificate(cert)
    }
}

/// Converts raw material into a key for one options type
///
/// `registry` is the registry the outer import call was issued against.
/// Importers that delegate to another format go back through it.
pub trait KeyImporter: Send + Sync + 'static {
    /// Options type this importer is registered under
    type Opts: KeyImportOpts;

    /// Import `raw` as directed by `opts`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for material of the wrong shape, `Decode` for
    /// unparseable material, and `Unsupported` for well-formed material of an
    /// algorithm this importer does not handle.
    fn import(
        &self,
        registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        opts: &Self::Opts,
    ) -> Result<Key>;
}

/// Object-safe view of a [`KeyImporter`] with its options type erased
trait ErasedImporter: Send + Sync {
    fn import_erased(
        &self,
        registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        opts: &dyn Any,
    ) -> Result<Key>;

    fn name(&self) -> &'static str;
}

impl<I: KeyImporter> ErasedImporter for I {
    fn import_erased(
        &self,
        registry: &ImporterRegistry,
        raw: RawMaterial<'_>,
        opts: &dyn Any,
    ) -> Result<Key> {
        let opts = opts.downcast_ref::<I::Opts>().ok_or_else(|| {
            KeyError::unsupported(format!(
                "importer {} received options of a different type",
                std::any::type_name::<I>()
            ))
        })?;
        self.import(registry, raw, opts)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<I>()
    }
}

/// Map from options type to importer
pub struct ImporterRegistry {
    importers: HashMap<TypeId, Box<dyn ErasedImporter>>,
}

impl ImporterRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            importers: HashMap::new(),
        }
    }

    /// Registry with every built-in importer registered
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Aes128KeyImporter);
        registry.register(HmacKeyImporter);
        registry.register(PkixPublicKeyImporter::<p256::NistP256>::new());
        registry.register(PkixPublicKeyImporter::<p384::NistP384>::new());
        registry.register(Pkcs8PrivateKeyImporter::<p256::NistP256>::new());
        registry.register(Pkcs8PrivateKeyImporter::<p384::NistP384>::new());
        registry.register(NativePublicKeyImporter::<p256::NistP256>::new());
        registry.register(NativePublicKeyImporter::<p384::NistP384>::new());
        registry.register(X509PublicKeyImporter);
        registry
    }

    /// Register `importer` under its options type
    ///
    /// Returns `true` if an importer for the same options type was replaced.
    pub fn register<I: KeyImporter>(&mut self, importer: I) -> bool {
        self.importers
            .insert(TypeId::of::<I::Opts>(), Box::new(importer))
            .is_some()
    }

    /// Whether an importer is registered for options type `O`
    #[must_use]
    pub fn contains<O: KeyImportOpts>(&self) -> bool {
        self.importers.contains_key(&TypeId::of::<O>())
    }

    /// Number of registered importers
    #[must_use]
    pub fn len(&self) -> usize {
        self.importers.len()
    }

    /// Whether no importer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }

    /// Import `raw` with the importer registered for `O`
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if nothing is registered for `O`, otherwise
    /// whatever the importer returns.
    pub fn import<'a, O: KeyImportOpts>(
        &self,
        raw: impl Into<RawMaterial<'a>>,
        opts: &O,
    ) -> Result<Key> {
        let importer = self.importers.get(&TypeId::of::<O>()).ok_or_else(|| {
            KeyError::unsupported(format!(
                "unsupported 'KeyImportOpts' provided [{}]",
                opts.algorithm()
            ))
        })?;
        importer.import_erased(self, raw.into(), opts)
    }
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ImporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.importers.values().map(|i| i.name()).collect();
        names.sort_unstable();
        f.debug_struct("ImporterRegistry")
            .field("importers", &names)
            .finish()
    }
}
