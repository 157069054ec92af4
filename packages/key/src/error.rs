//! Comprehensive error handling for key module

use keystone_codec::CodecError;
use std::path::PathBuf;
use thiserror::Error;

/// Key-specific errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Raw material of the wrong shape, an empty payload or a wrong fixed length
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input (shape, never content)
        reason: String,
    },

    /// Malformed DER/PEM content or a record that could not be decrypted
    #[error("Decode failure: {context}: {source}")]
    Decode {
        /// What was being decoded, including the key alias when known
        context: String,
        /// Underlying codec error
        #[source]
        source: CodecError,
    },

    /// Key material could not be encoded into its persisted form
    #[error("Encode failure: {context}: {source}")]
    Encode {
        /// What was being encoded, including the key alias when known
        context: String,
        /// Underlying codec error
        #[source]
        source: CodecError,
    },

    /// A stored record holds a different key than its file name says
    #[error("Decode failure: key file [{alias}] holds key [{found}]")]
    SkiMismatch {
        /// Hex encoded SKI the file is named after
        alias: String,
        /// Hex encoded SKI of the key the file holds
        found: String,
    },

    /// Well-formed input of an algorithm, curve or key class that is not supported
    #[error("Unsupported: {reason}")]
    Unsupported {
        /// Why the input is not supported
        reason: String,
    },

    /// Operation not allowed in the store's current state
    #[error("Key store state error: {reason}")]
    StoreState {
        /// Description of the state conflict
        reason: String,
    },

    /// Key not found by indexed lookup nor by the fallback scan
    #[error("Key with SKI [{ski}] not found in [{}]", .path.display())]
    NotFound {
        /// Hex encoded SKI that was requested
        ski: String,
        /// Directory that was searched
        path: PathBuf,
    },

    /// Filesystem operation failed
    #[error("IO error: {operation} [{}] failed: {source}", .path.display())]
    Io {
        /// Operation that failed
        operation: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Error categories callers can branch on without matching every field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`KeyError::InvalidInput`]
    InvalidInput,
    /// See [`KeyError::Decode`] and [`KeyError::SkiMismatch`]
    Decode,
    /// See [`KeyError::Encode`]
    Encode,
    /// See [`KeyError::Unsupported`]
    Unsupported,
    /// See [`KeyError::StoreState`]
    StoreState,
    /// See [`KeyError::NotFound`]
    NotFound,
    /// See [`KeyError::Io`]
    Io,
}

impl KeyError {
    /// Create an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a `Decode` error wrapping a codec failure
    pub fn decode(context: impl Into<String>, source: CodecError) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Create an `Encode` error wrapping a codec failure
    pub fn encode(context: impl Into<String>, source: CodecError) -> Self {
        Self::Encode {
            context: context.into(),
            source,
        }
    }

    /// Create an `Unsupported` error
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Create a `StoreState` error
    pub fn store_state(reason: impl Into<String>) -> Self {
        Self::StoreState {
            reason: reason.into(),
        }
    }

    /// Create an `Io` error for `operation` on `path`
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Decode { .. } | Self::SkiMismatch { .. } => ErrorKind::Decode,
            Self::Encode { .. } => ErrorKind::Encode,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::StoreState { .. } => ErrorKind::StoreState,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Check if the error indicates a missing key
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
