//! DER inspection helpers
//!
//! Key documents and certificates are only inspected here, never converted
//! into curve types: callers pick the curve from the returned OIDs and parse
//! with the matching curve crate.

use crate::Result;
use x509_cert::der::{Decode, DecodePem, Encode};

pub use spki::ObjectIdentifier;
pub use x509_cert::Certificate;

/// Algorithm and parameter OIDs of a key document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlgorithmOids {
    /// Key algorithm, e.g. `id-ecPublicKey`
    pub algorithm: ObjectIdentifier,
    /// Algorithm parameters when they are an OID, e.g. the named curve
    pub parameters: Option<ObjectIdentifier>,
}

/// Read the algorithm OIDs of a PKCS#8 private key document
///
/// # Errors
///
/// Returns an error if `der` is not a PKCS#8 `PrivateKeyInfo` or its
/// parameters are present but not an OID.
pub fn pkcs8_algorithm(der: &[u8]) -> Result<AlgorithmOids> {
    let info = pkcs8::PrivateKeyInfo::try_from(der)?;
    let (algorithm, parameters) = info.algorithm.oids()?;
    Ok(AlgorithmOids {
        algorithm,
        parameters,
    })
}

/// Read the algorithm OIDs of a SubjectPublicKeyInfo document
///
/// # Errors
///
/// Returns an error if `der` is not a `SubjectPublicKeyInfo` or its
/// parameters are present but not an OID.
pub fn spki_algorithm(der: &[u8]) -> Result<AlgorithmOids> {
    let info = spki::SubjectPublicKeyInfoRef::try_from(der)?;
    let (algorithm, parameters) = info.algorithm.oids()?;
    Ok(AlgorithmOids {
        algorithm,
        parameters,
    })
}

/// Parse a DER encoded X.509 certificate
///
/// # Errors
///
/// Returns an error if `der` is not a well-formed certificate.
pub fn certificate_from_der(der: &[u8]) -> Result<Certificate> {
    Ok(Certificate::from_der(der)?)
}

/// Parse a PEM encoded X.509 certificate
///
/// # Errors
///
/// Returns an error if `pem` is not a single well-formed `CERTIFICATE` block.
pub fn certificate_from_pem(pem: &[u8]) -> Result<Certificate> {
    Ok(Certificate::from_pem(pem)?)
}

/// DER encoding of the certificate's embedded SubjectPublicKeyInfo
///
/// # Errors
///
/// Returns an error if re-encoding the public key info fails.
pub fn certificate_public_key_der(certificate: &Certificate) -> Result<Vec<u8>> {
    Ok(certificate
        .tbs_certificate
        .subject_public_key_info
        .to_der()?)
}
