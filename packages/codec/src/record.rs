//! PEM records for key material
//!
//! Every record is a single PEM block. Without a password the block carries
//! the DER document (or raw secret) directly under a standard label, so files
//! produced by other tools (`openssl genpkey`, ...) decode as-is. With a
//! password the body is sealed and the label gains a `SEALED ` prefix.
//!
//! An empty password means "no password". Plaintext records decode whether
//! or not a password is supplied; sealed records require the right one.

use crate::seal::{open, seal};
use crate::{CodecError, Result};
use pem::Pem;
use zeroize::Zeroizing;

struct RecordKind {
    plain: &'static str,
    sealed: &'static str,
    expected: &'static str,
}

const PRIVATE_KEY: RecordKind = RecordKind {
    plain: "PRIVATE KEY",
    sealed: "SEALED PRIVATE KEY",
    expected: "PRIVATE KEY | SEALED PRIVATE KEY",
};

const PUBLIC_KEY: RecordKind = RecordKind {
    plain: "PUBLIC KEY",
    sealed: "SEALED PUBLIC KEY",
    expected: "PUBLIC KEY | SEALED PUBLIC KEY",
};

const SECRET_KEY: RecordKind = RecordKind {
    plain: "SECRET KEY",
    sealed: "SEALED SECRET KEY",
    expected: "SECRET KEY | SEALED SECRET KEY",
};

fn encode(kind: &RecordKind, payload: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let block = if password.is_empty() {
        Pem::new(kind.plain, payload.to_vec())
    } else {
        Pem::new(kind.sealed, seal(payload, password, kind.sealed.as_bytes())?)
    };
    let record = Zeroizing::new(pem::encode(&block).into_bytes());
    // The block owns a copy of the payload
    drop(Zeroizing::new(block.into_contents()));
    Ok(record)
}

fn decode(kind: &RecordKind, record: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let block = pem::parse(record)?;
    if block.tag() == kind.plain {
        Ok(Zeroizing::new(block.into_contents()))
    } else if block.tag() == kind.sealed {
        open(block.contents(), password, kind.sealed.as_bytes())
    } else {
        Err(CodecError::UnexpectedTag {
            expected: kind.expected,
            found: block.tag().to_string(),
        })
    }
}

/// Encode a PKCS#8 private key document as a PEM record
///
/// # Errors
///
/// Returns an error if sealing fails.
pub fn private_key_to_pem(pkcs8_der: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    encode(&PRIVATE_KEY, pkcs8_der, password)
}

/// Decode a private key record back into its PKCS#8 DER document
///
/// # Errors
///
/// Returns an error if the record is not PEM, carries another label, or
/// cannot be unsealed with `password`.
pub fn pem_to_private_key(record: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    decode(&PRIVATE_KEY, record, password)
}

/// Encode a SubjectPublicKeyInfo document as a PEM record
///
/// # Errors
///
/// Returns an error if sealing fails.
pub fn public_key_to_pem(spki_der: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    encode(&PUBLIC_KEY, spki_der, password).map(|record| record.to_vec())
}

/// Decode a public key record back into its SubjectPublicKeyInfo DER document
///
/// # Errors
///
/// Returns an error if the record is not PEM, carries another label, or
/// cannot be unsealed with `password`.
pub fn pem_to_public_key(record: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    decode(&PUBLIC_KEY, record, password).map(|der| der.to_vec())
}

/// Encode raw symmetric key bytes as a PEM record
///
/// # Errors
///
/// Returns an error if sealing fails.
pub fn secret_to_pem(raw: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    encode(&SECRET_KEY, raw, password)
}

/// Decode a symmetric key record back into raw bytes
///
/// # Errors
///
/// Returns an error if the record is not PEM, carries another label, or
/// cannot be unsealed with `password`.
pub fn pem_to_secret(record: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    decode(&SECRET_KEY, record, password)
}
