//! Elliptic-curve keys
//!
//! Each supported curve is its own enum arm with the curve crate's typed key
//! as payload. [`Curve`] ties a curve marker type (`p256::NistP256`,
//! `p384::NistP384`) to those arms so importers can be written once and
//! instantiated per curve.

use crate::import::RawMaterial;
use crate::opts;
use crate::{KeyError, Result, Ski};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use keystone_codec::{AlgorithmOids, CodecError};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use zeroize::Zeroizing;

/// Supported curve families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveFamily {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
}

impl CurveFamily {
    /// Algorithm tag shared with the options of this curve
    #[must_use]
    pub const fn algorithm(self) -> &'static str {
        match self {
            Self::P256 => opts::P256,
            Self::P384 => opts::P384,
        }
    }

    /// Resolve the curve of an EC key document from its algorithm OIDs
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for non-EC algorithms and unknown curves.
    pub fn from_oids(oids: &AlgorithmOids) -> Result<Self> {
        if oids.algorithm != ID_EC_PUBLIC_KEY {
            return Err(KeyError::unsupported(format!(
                "public key algorithm [{}] not recognized, supported: [P256, P384]",
                oids.algorithm
            )));
        }
        match oids.parameters {
            Some(oid) if oid == SECP_256_R_1 => Ok(Self::P256),
            Some(oid) if oid == SECP_384_R_1 => Ok(Self::P384),
            Some(oid) => Err(KeyError::unsupported(format!(
                "elliptic curve [{oid}] not recognized, supported: [P256, P384]"
            ))),
            None => Err(KeyError::unsupported(
                "elliptic curve key without named curve parameters",
            )),
        }
    }
}

/// Elliptic-curve private key
#[derive(Debug, Clone)]
pub enum PrivateKey {
    /// P-256 private key
    P256(p256::SecretKey),
    /// P-384 private key
    P384(p384::SecretKey),
}

impl PrivateKey {
    /// Curve of this key
    #[must_use]
    pub fn curve(&self) -> CurveFamily {
        match self {
            Self::P256(_) => CurveFamily::P256,
            Self::P384(_) => CurveFamily::P384,
        }
    }

    /// Public half of this key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::P256(sk) => PublicKey::P256(sk.public_key()),
            Self::P384(sk) => PublicKey::P384(sk.public_key()),
        }
    }

    /// Subject Key Identifier, shared with the public half
    #[must_use]
    pub fn ski(&self) -> Ski {
        self.public_key().ski()
    }

    /// PKCS#8 DER encoding
    pub(crate) fn to_pkcs8_der(&self) -> std::result::Result<Zeroizing<Vec<u8>>, CodecError> {
        let document = match self {
            Self::P256(sk) => sk.to_pkcs8_der()?,
            Self::P384(sk) => sk.to_pkcs8_der()?,
        };
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// Parse a PKCS#8 document of any supported curve
    ///
    /// # Errors
    ///
    /// Returns `Decode` for malformed documents and `Unsupported` for
    /// algorithms or curves outside [`CurveFamily`].
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let oids = keystone_codec::pkcs8_algorithm(der)
            .map_err(|e| KeyError::decode("failed reading PKCS#8 algorithm", e))?;
        let parsed = match CurveFamily::from_oids(&oids)? {
            CurveFamily::P256 => p256::NistP256::parse_private_key(der),
            CurveFamily::P384 => p384::NistP384::parse_private_key(der),
        };
        parsed.map_err(|e| KeyError::decode("failed parsing PKCS#8 private key", e))
    }
}

impl From<p256::SecretKey> for PrivateKey {
    fn from(key: p256::SecretKey) -> Self {
        Self::P256(key)
    }
}

impl From<p384::SecretKey> for PrivateKey {
    fn from(key: p384::SecretKey) -> Self {
        Self::P384(key)
    }
}

/// Elliptic-curve public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// P-256 public key
    P256(p256::PublicKey),
    /// P-384 public key
    P384(p384::PublicKey),
}

impl PublicKey {
    /// Curve of this key
    #[must_use]
    pub fn curve(&self) -> CurveFamily {
        match self {
            Self::P256(_) => CurveFamily::P256,
            Self::P384(_) => CurveFamily::P384,
        }
    }

    /// Subject Key Identifier: SHA-256 of the uncompressed SEC1 point
    #[must_use]
    pub fn ski(&self) -> Ski {
        match self {
            Self::P256(pk) => Ski::digest(&[pk.to_encoded_point(false).as_bytes()]),
            Self::P384(pk) => Ski::digest(&[pk.to_encoded_point(false).as_bytes()]),
        }
    }

    /// SubjectPublicKeyInfo DER encoding
    ///
    /// # Errors
    ///
    /// Returns `Encode` if the curve crate fails to encode the key.
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        self.spki_document()
            .map_err(|e| KeyError::encode("failed encoding public key", e))
    }

    pub(crate) fn spki_document(&self) -> std::result::Result<Vec<u8>, CodecError> {
        let document = match self {
            Self::P256(pk) => pk.to_public_key_der()?,
            Self::P384(pk) => pk.to_public_key_der()?,
        };
        Ok(document.as_bytes().to_vec())
    }

    /// Parse a SubjectPublicKeyInfo document of any supported curve
    ///
    /// # Errors
    ///
    /// Returns `Decode` for malformed documents and `Unsupported` for
    /// algorithms or curves outside [`CurveFamily`].
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let oids = keystone_codec::spki_algorithm(der)
            .map_err(|e| KeyError::decode("failed reading public key algorithm", e))?;
        let parsed = match CurveFamily::from_oids(&oids)? {
            CurveFamily::P256 => p256::NistP256::parse_public_key(der),
            CurveFamily::P384 => p384::NistP384::parse_public_key(der),
        };
        parsed.map_err(|e| KeyError::decode("failed parsing public key", e))
    }
}

impl From<p256::PublicKey> for PublicKey {
    fn from(key: p256::PublicKey) -> Self {
        Self::P256(key)
    }
}

impl From<p384::PublicKey> for PublicKey {
    fn from(key: p384::PublicKey) -> Self {
        Self::P384(key)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Curve marker types the importers are generic over
///
/// Implemented for `p256::NistP256` and `p384::NistP384` only.
pub trait Curve: sealed::Sealed + Send + Sync + 'static {
    /// Runtime tag of this curve
    const FAMILY: CurveFamily;

    /// The curve crate's public key type
    type Native: Clone + Into<PublicKey>;

    /// Options selecting SubjectPublicKeyInfo import on this curve
    type PkixOpts: opts::KeyImportOpts;

    /// Options selecting PKCS#8 private key import on this curve
    type PrivateOpts: opts::KeyImportOpts;

    /// Options selecting import of a parsed public key of this curve
    type NativeOpts: opts::KeyImportOpts;

    /// Parse a SubjectPublicKeyInfo document on this curve
    ///
    /// # Errors
    ///
    /// Returns the curve crate's parse error wrapped in [`CodecError`].
    fn parse_public_key(der: &[u8]) -> std::result::Result<PublicKey, CodecError>;

    /// Parse a PKCS#8 document on this curve
    ///
    /// # Errors
    ///
    /// Returns the curve crate's parse error wrapped in [`CodecError`].
    fn parse_private_key(der: &[u8]) -> std::result::Result<PrivateKey, CodecError>;

    /// Borrow a public key object of this curve out of raw material
    fn native_public_key<'a>(raw: &RawMaterial<'a>) -> Option<&'a Self::Native>;
}

macro_rules! impl_curve {
    ($curve:ty, $family:ident, $krate:ident, $raw:ident, $pkix:ident, $private:ident, $native:ident) => {
        impl sealed::Sealed for $curve {}

        impl Curve for $curve {
            const FAMILY: CurveFamily = CurveFamily::$family;

            type Native = $krate::PublicKey;
            type PkixOpts = opts::$pkix;
            type PrivateOpts = opts::$private;
            type NativeOpts = opts::$native;

            fn parse_public_key(der: &[u8]) -> std::result::Result<PublicKey, CodecError> {
                Ok(PublicKey::$family($krate::PublicKey::from_public_key_der(
                    der,
                )?))
            }

            fn parse_private_key(der: &[u8]) -> std::result::Result<PrivateKey, CodecError> {
                Ok(PrivateKey::$family($krate::SecretKey::from_pkcs8_der(der)?))
            }

            fn native_public_key<'a>(raw: &RawMaterial<'a>) -> Option<&'a Self::Native> {
                match raw {
                    RawMaterial::$raw(key) => Some(*key),
                    _ => None,
                }
            }
        }
    };
}

impl_curve!(
    p256::NistP256,
    P256,
    p256,
    P256PublicKey,
    P256PkixPublicKeyImportOpts,
    P256PrivateKeyImportOpts,
    P256PublicKeyImportOpts
);
impl_curve!(
    p384::NistP384,
    P384,
    p384,
    P384PublicKey,
    P384PkixPublicKeyImportOpts,
    P384PrivateKeyImportOpts,
    P384PublicKeyImportOpts
);
