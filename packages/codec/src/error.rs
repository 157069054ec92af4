//! Error handling for record encoding and decoding

use thiserror::Error;

/// Codec errors
///
/// Decryption failures carry no detail: a wrong password, a
/// missing password and a tampered record all surface as [`CodecError::Decrypt`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not a well-formed PEM block
    #[error("PEM decoding failed: {0}")]
    Pem(#[from] pem::PemError),

    /// The PEM block carries a label this record type does not accept
    #[error("unexpected PEM block [{found}], expected [{expected}]")]
    UnexpectedTag {
        /// Labels accepted for this record type
        expected: &'static str,
        /// Label found in the input
        found: String,
    },

    /// A sealed record could not be opened
    #[error("record could not be decrypted")]
    Decrypt,

    /// Sealing a record failed
    #[error("record encryption failed")]
    Encrypt,

    /// Deriving the sealing key from the password failed
    #[error("password key derivation failed: {0}")]
    KeyDerivation(String),

    /// Malformed DER
    #[error("DER error: {0}")]
    Der(#[from] der::Error),

    /// Malformed SubjectPublicKeyInfo or algorithm identifier
    #[error("SubjectPublicKeyInfo error: {0}")]
    Spki(#[from] spki::Error),

    /// Malformed PKCS#8 document
    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] pkcs8::Error),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
