//! # Keystone Codec
//!
//! Record encoding used by the keystone key store.
//!
//! ## Features
//!
//! - **PEM records**: private keys (PKCS#8), public keys (SPKI) and raw
//!   symmetric secrets wrapped in PEM blocks
//! - **Password sealing**: AES-256-GCM with an Argon2id-derived key when the
//!   store is configured with a password
//! - **Algorithm inspection**: algorithm and curve OIDs of PKCS#8 and SPKI
//!   documents
//! - **Certificates**: X.509 parsing and embedded public key extraction
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keystone_codec::{pem_to_secret, secret_to_pem};
//!
//! let record = secret_to_pem(&[7u8; 16], b"hunter2")?;
//! let secret = pem_to_secret(&record, b"hunter2")?;
//! assert_eq!(&secret[..], &[7u8; 16]);
//! ```

#![forbid(unsafe_code)]

pub mod asn1;
pub mod error;
pub mod record;
mod seal;

pub use asn1::{
    AlgorithmOids, Certificate, ObjectIdentifier, certificate_from_der, certificate_from_pem,
    certificate_public_key_der, pkcs8_algorithm, spki_algorithm,
};
pub use error::{CodecError, Result};
pub use record::{
    pem_to_private_key, pem_to_public_key, pem_to_secret, private_key_to_pem, public_key_to_pem,
    secret_to_pem,
};
