//! Typed key options
//!
//! Each options struct is an immutable record naming one operation, one
//! algorithm and, for imports, one source format. The importer registry
//! dispatches on the concrete options type, so adding a format means adding
//! a struct here and an importer for it.

use std::any::Any;
use std::fmt::Debug;

/// NIST P-256 elliptic curve
pub const P256: &str = "P256";
/// NIST P-384 elliptic curve
pub const P384: &str = "P384";
/// Elliptic-curve re-randomization
pub const EC_RERAND: &str = "EC_RERAND";
/// AES at the provider's default security level
pub const AES: &str = "AES";
/// AES with 128 bit keys
pub const AES128: &str = "AES128";
/// HMAC
pub const HMAC: &str = "HMAC";
/// HMAC output truncated to 256 bits, used as an AES key
pub const HMAC_TRUNCATED_256: &str = "HMAC_TRUNCATED_256";
/// X.509 certificate
pub const X509_CERTIFICATE: &str = "X509Certificate";

/// Options for importing key material
pub trait KeyImportOpts: Any + Send + Sync + Debug {
    /// Algorithm tag of the key to import
    fn algorithm(&self) -> &'static str;

    /// Whether the imported key is meant to be short-lived
    fn ephemeral(&self) -> bool;
}

/// Options for key generation
pub trait KeyGenOpts: Any + Send + Sync + Debug {
    /// Algorithm tag of the key to generate
    fn algorithm(&self) -> &'static str;

    /// Whether the generated key is meant to be short-lived
    fn ephemeral(&self) -> bool;
}

/// Options for key derivation
pub trait KeyDerivOpts: Any + Send + Sync + Debug {
    /// Algorithm tag of the derivation
    fn algorithm(&self) -> &'static str;

    /// Whether the derived key is meant to be short-lived
    fn ephemeral(&self) -> bool;
}

macro_rules! key_opts {
    (
        $(#[$meta:meta])*
        $name:ident: $trait:ident => $tag:expr $(, $field:ident: $ty:ty => $doc:literal)*
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            /// Whether the key is meant to be short-lived
            pub temporary: bool,
            $(
                #[doc = $doc]
                pub $field: $ty,
            )*
        }

        impl $trait for $name {
            fn algorithm(&self) -> &'static str {
                $tag
            }

            fn ephemeral(&self) -> bool {
                self.temporary
            }
        }
    };
}

key_opts! {
    /// Generate a P-256 key pair
    P256KeyGenOpts: KeyGenOpts => P256
}

key_opts! {
    /// Generate a P-384 key pair
    P384KeyGenOpts: KeyGenOpts => P384
}

key_opts! {
    /// Generate an AES-128 key
    Aes128KeyGenOpts: KeyGenOpts => AES128
}

key_opts! {
    /// Generate an HMAC secret
    HmacKeyGenOpts: KeyGenOpts => HMAC
}

key_opts! {
    /// Re-randomize an EC key by the scalar derived from `expansion`
    EcReRandKeyOpts: KeyDerivOpts => EC_RERAND,
        expansion: Vec<u8> => "Expansion value mixed into the scalar"
}

key_opts! {
    /// Derive an AES key as HMAC output truncated to 256 bits
    HmacTruncated256AesDeriveKeyOpts: KeyDerivOpts => HMAC_TRUNCATED_256,
        arg: Vec<u8> => "HMAC input"
}

key_opts! {
    /// Derive a key as full HMAC output
    HmacDeriveKeyOpts: KeyDerivOpts => HMAC,
        arg: Vec<u8> => "HMAC input"
}

key_opts! {
    /// Import a raw 16-byte AES-128 key
    Aes128ImportKeyOpts: KeyImportOpts => AES128,
        exportable: bool => "Whether the imported key may be exported again"
}

key_opts! {
    /// Import a raw HMAC secret
    HmacImportKeyOpts: KeyImportOpts => HMAC,
        exportable: bool => "Whether the imported key may be exported again"
}

key_opts! {
    /// Import a P-256 public key from SubjectPublicKeyInfo DER
    P256PkixPublicKeyImportOpts: KeyImportOpts => P256
}

key_opts! {
    /// Import a P-384 public key from SubjectPublicKeyInfo DER
    P384PkixPublicKeyImportOpts: KeyImportOpts => P384
}

key_opts! {
    /// Import a P-256 private key from PKCS#8 DER
    P256PrivateKeyImportOpts: KeyImportOpts => P256
}

key_opts! {
    /// Import a P-384 private key from PKCS#8 DER
    P384PrivateKeyImportOpts: KeyImportOpts => P384
}

key_opts! {
    /// Import a parsed `p256::PublicKey`
    P256PublicKeyImportOpts: KeyImportOpts => P256
}

key_opts! {
    /// Import a parsed `p384::PublicKey`
    P384PublicKeyImportOpts: KeyImportOpts => P384
}

key_opts! {
    /// Import the public key embedded in a parsed X.509 certificate
    X509PublicKeyImportOpts: KeyImportOpts => X509_CERTIFICATE
}
